//! Completion transport port
//!
//! Defines how the application layer opens a streamed chat completion.
//! Adapters (HTTP, recorded replay) live in the infrastructure layer.

use async_trait::async_trait;
use streamchat_domain::{ChatRequest, StreamError, StreamEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Handle for receiving decoded events of one completion stream.
///
/// Wraps an `mpsc::Receiver<StreamEvent>` fed by the adapter's decoder task.
/// Dropping the handle tells the decoder to stop.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Build a handle that yields a fixed list of events, then closes.
    ///
    /// Useful for replaying an already decoded sequence.
    pub fn from_events(events: Vec<StreamEvent>) -> Self {
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            // Capacity covers every event, so this cannot fail.
            let _ = tx.try_send(event);
        }
        Self::new(rx)
    }

    /// Receive the next event, or `None` once the decoder has gone away.
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        self.receiver.recv().await
    }

    /// Consume the stream and concatenate all fragment text.
    ///
    /// Bypasses flush batching; useful when only the final text matters.
    pub async fn collect_text(mut self) -> Result<String, StreamError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Fragment(fragment) => full_text.push_str(fragment.text()),
                StreamEvent::Done => return Ok(full_text),
                StreamEvent::Error(e) => return Err(e),
            }
        }
        Err(StreamError::StreamRead(
            "stream closed before completion".to_string(),
        ))
    }
}

/// Opens streamed chat completions.
///
/// An `Err` means no stream was produced at all (connection failure,
/// non-success status, missing body). Failures after that point arrive as
/// [`StreamEvent::Error`] on the returned handle.
///
/// Cancelling `cancellation` must tear down the underlying connection and
/// close the handle without a terminal event.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn open_stream(
        &self,
        request: &ChatRequest,
        cancellation: CancellationToken,
    ) -> Result<StreamHandle, StreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_text_concatenates_fragments() {
        let handle = StreamHandle::from_events(vec![
            StreamEvent::fragment("Hello"),
            StreamEvent::fragment(", world"),
            StreamEvent::Done,
        ]);
        assert_eq!(handle.collect_text().await.unwrap(), "Hello, world");
    }

    #[tokio::test]
    async fn test_collect_text_surfaces_errors() {
        let handle = StreamHandle::from_events(vec![
            StreamEvent::fragment("Hel"),
            StreamEvent::Error(StreamError::StreamRead("reset".to_string())),
        ]);
        assert_eq!(
            handle.collect_text().await,
            Err(StreamError::StreamRead("reset".to_string()))
        );
    }

    #[tokio::test]
    async fn test_collect_text_without_terminal_is_an_error() {
        let handle = StreamHandle::from_events(vec![StreamEvent::fragment("x")]);
        assert!(matches!(
            handle.collect_text().await,
            Err(StreamError::StreamRead(_))
        ));
    }
}
