//! Assembly observer port
//!
//! The consumer side of the response assembler. Implementations live in the
//! presentation layer (console rendering, transcript view) and only ever see
//! owned snapshots of the assembled text.

use streamchat_domain::StreamError;
use tokio::sync::mpsc;

/// Callbacks fired while a response is assembled.
///
/// For one Assembly, `on_update` fires zero or more times with a growing
/// snapshot, followed by exactly one of `on_complete` or `on_error`. A
/// cancelled Assembly fires neither.
pub trait AssemblyObserver: Send + Sync {
    /// Cumulative text after a flush.
    fn on_update(&self, snapshot: &str);

    /// The Assembly completed normally.
    fn on_complete(&self);

    /// The Assembly failed; `partial` is everything flushed so far.
    fn on_error(&self, partial: &str, error: &StreamError);
}

/// No-op observer for when nobody is watching.
pub struct NoObserver;

impl AssemblyObserver for NoObserver {
    fn on_update(&self, _snapshot: &str) {}
    fn on_complete(&self) {}
    fn on_error(&self, _partial: &str, _error: &StreamError) {}
}

/// One observer callback, as a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyUpdate {
    Update(String),
    Complete,
    Error { partial: String, error: StreamError },
}

/// Observer that forwards every callback into a channel.
///
/// Turns the push-based callbacks into a pull-based sequence for consumers
/// that prefer to poll (or for tests that want to inspect the exact order).
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<AssemblyUpdate>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AssemblyUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl AssemblyObserver for ChannelObserver {
    fn on_update(&self, snapshot: &str) {
        // Receiver gone means nobody is listening any more
        let _ = self.tx.send(AssemblyUpdate::Update(snapshot.to_string()));
    }

    fn on_complete(&self) {
        let _ = self.tx.send(AssemblyUpdate::Complete);
    }

    fn on_error(&self, partial: &str, error: &StreamError) {
        let _ = self.tx.send(AssemblyUpdate::Error {
            partial: partial.to_string(),
            error: error.clone(),
        });
    }
}

/// Drain every update currently queued in `rx`.
pub fn drain_updates(rx: &mut mpsc::UnboundedReceiver<AssemblyUpdate>) -> Vec<AssemblyUpdate> {
    let mut updates = Vec::new();
    while let Ok(update) = rx.try_recv() {
        updates.push(update);
    }
    updates
}
