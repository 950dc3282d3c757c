//! Recorded stream replay.
//!
//! Plays back a captured response body (the raw `data:` lines) as if it
//! were arriving from the network, cut into fixed-size chunks with an
//! optional delay between them. Useful for offline demos and for exercising
//! the decoder against awkward chunk boundaries.

use crate::error::TransportError;
use crate::sse::spawn_decoder;
use async_trait::async_trait;
use futures::StreamExt;
use std::convert::Infallible;
use std::path::Path;
use std::time::Duration;
use streamchat_application::{CompletionTransport, StreamHandle};
use streamchat_domain::{ChatRequest, StreamError};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const DEFAULT_REPLAY_CHUNK_SIZE: usize = 64;
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// [`CompletionTransport`] that ignores the request and replays a body.
#[derive(Debug, Clone)]
pub struct ReplayTransport {
    body: Vec<u8>,
    chunk_size: usize,
    chunk_delay: Duration,
    channel_capacity: usize,
}

impl ReplayTransport {
    pub fn from_bytes(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            chunk_size: DEFAULT_REPLAY_CHUNK_SIZE,
            chunk_delay: Duration::ZERO,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let path = path.as_ref();
        let body = std::fs::read(path).map_err(|source| TransportError::ReplayRead {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded replay file {} ({} bytes)", path.display(), body.len());
        Ok(Self::from_bytes(body))
    }

    /// Bytes per simulated network read (at least 1).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

#[async_trait]
impl CompletionTransport for ReplayTransport {
    async fn open_stream(
        &self,
        request: &ChatRequest,
        cancellation: CancellationToken,
    ) -> Result<StreamHandle, StreamError> {
        if self.is_empty() {
            return Err(StreamError::NoResponseBody);
        }

        debug!(
            "Replaying {} bytes in {}-byte chunks (model {})",
            self.len(),
            self.chunk_size,
            request.model
        );

        let chunks: Vec<Vec<u8>> = self
            .body
            .chunks(self.chunk_size)
            .map(<[u8]>::to_vec)
            .collect();
        let delay = self.chunk_delay;
        let byte_stream = futures::stream::iter(chunks).then(move |chunk| async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok::<_, Infallible>(chunk)
        });

        Ok(spawn_decoder(
            byte_stream,
            cancellation,
            self.channel_capacity,
        ))
    }
}
