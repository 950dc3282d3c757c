//! Background decoding task.
//!
//! Owns the byte stream of one response in a [`tokio::spawn`] task, runs it
//! through a [`TransportDecoder`] and forwards the decoded events over an
//! `mpsc` channel wrapped in a [`StreamHandle`].

use super::decoder::TransportDecoder;
use futures::{Stream, StreamExt};
use std::fmt::Display;
use streamchat_application::StreamHandle;
use streamchat_domain::{StreamError, StreamEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Spawn a decoder task over `byte_stream`.
///
/// The task ends after the terminal event, when the handle is dropped, or
/// when `cancellation` fires. In the last two cases the byte stream is
/// dropped without a terminal event being sent.
pub fn spawn_decoder<S, B, E>(
    byte_stream: S,
    cancellation: CancellationToken,
    capacity: usize,
) -> StreamHandle
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));
    tokio::spawn(async move {
        decode_loop(byte_stream, tx, cancellation).await;
    });
    StreamHandle::new(rx)
}

async fn decode_loop<S, B, E>(
    byte_stream: S,
    tx: mpsc::Sender<StreamEvent>,
    cancellation: CancellationToken,
) where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut byte_stream = std::pin::pin!(byte_stream);
    let mut decoder = TransportDecoder::new();

    loop {
        let next = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                debug!("Stream decoding cancelled");
                return;
            }
            _ = tx.closed() => {
                debug!("Stream receiver dropped");
                return;
            }
            next = byte_stream.next() => next,
        };

        let events = match next {
            Some(Ok(chunk)) => decoder.feed(chunk.as_ref()),
            Some(Err(e)) => {
                warn!("Stream read failed: {}", e);
                let _ = tx
                    .send(StreamEvent::Error(StreamError::StreamRead(e.to_string())))
                    .await;
                return;
            }
            None => decoder.finish(),
        };

        for event in events {
            if tx.send(event).await.is_err() {
                debug!("Stream receiver dropped");
                return;
            }
        }

        if decoder.is_finished() {
            let stats = decoder.stats();
            debug!(
                "Stream finished: {} records, {} fragments, {} malformed",
                stats.records, stats.fragments, stats.malformed
            );
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn data(content: &str) -> Vec<u8> {
        format!(
            "data: {}\n",
            serde_json::json!({"choices": [{"delta": {"content": content}}]})
        )
        .into_bytes()
    }

    async fn drain(mut handle: StreamHandle) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        while let Some(event) = handle.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_forwards_decoded_events() {
        let chunks: Vec<Result<Vec<u8>, String>> = vec![
            Ok(data("Hel")),
            Ok(data("lo")),
            Ok(b"data: [DONE]\n".to_vec()),
        ];
        let handle = spawn_decoder(stream::iter(chunks), CancellationToken::new(), 4);

        assert_eq!(
            drain(handle).await,
            vec![
                StreamEvent::fragment("Hel"),
                StreamEvent::fragment("lo"),
                StreamEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_read_error_ends_with_error_event() {
        let chunks: Vec<Result<Vec<u8>, String>> =
            vec![Ok(data("par")), Err("connection reset".to_string()), Ok(data("never"))];
        let handle = spawn_decoder(stream::iter(chunks), CancellationToken::new(), 1);

        assert_eq!(
            drain(handle).await,
            vec![
                StreamEvent::fragment("par"),
                StreamEvent::Error(StreamError::StreamRead("connection reset".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_end_of_body_without_done_completes() {
        let chunks: Vec<Result<Vec<u8>, String>> = vec![Ok(data("x"))];
        let handle = spawn_decoder(stream::iter(chunks), CancellationToken::new(), 4);

        assert_eq!(
            drain(handle).await,
            vec![StreamEvent::fragment("x"), StreamEvent::Done]
        );
    }

    #[tokio::test]
    async fn test_cancellation_closes_without_terminal_event() {
        let chunks: Vec<Result<Vec<u8>, String>> = vec![Ok(data("first"))];
        let byte_stream = stream::iter(chunks).chain(stream::pending());
        let token = CancellationToken::new();
        let mut handle = spawn_decoder(byte_stream, token.clone(), 4);

        assert_eq!(handle.recv().await, Some(StreamEvent::fragment("first")));
        token.cancel();
        assert_eq!(handle.recv().await, None);
    }
}
