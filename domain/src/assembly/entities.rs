//! Assembly entity - the per-request accumulator of a streamed response.

use crate::core::error::DomainError;
use std::fmt;

/// Lifecycle of an [`Assembly`].
///
/// `Idle → Streaming → {Completed | Failed | Cancelled}`. The three right-hand
/// states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssemblyState {
    /// Created, nothing received yet.
    #[default]
    Idle,
    /// At least one fragment or the terminal signal has arrived.
    Streaming,
    /// Terminal success flush done.
    Completed,
    /// Terminal error flush done.
    Failed,
    /// The caller stopped the stream; flushed text stays as it is.
    Cancelled,
}

impl AssemblyState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AssemblyState::Completed | AssemblyState::Failed | AssemblyState::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssemblyState::Idle => "idle",
            AssemblyState::Streaming => "streaming",
            AssemblyState::Completed => "completed",
            AssemblyState::Failed => "failed",
            AssemblyState::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AssemblyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable state of one in-flight response.
///
/// `full_text` only ever grows. Callers get snapshots (owned `String`s) from
/// [`flush`](Self::flush), never a handle into the Assembly itself.
#[derive(Debug, Default)]
pub struct Assembly {
    full_text: String,
    pending: String,
    pending_chars: usize,
    state: AssemblyState,
}

impl Assembly {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AssemblyState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Text already surfaced to the consumer.
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Text received but not yet flushed.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Length of the pending buffer in characters.
    pub fn pending_chars(&self) -> usize {
        self.pending_chars
    }

    /// Append fragment text to the pending buffer.
    pub fn push(&mut self, text: &str) -> Result<(), DomainError> {
        self.ensure_open()?;
        self.state = AssemblyState::Streaming;
        self.pending.push_str(text);
        self.pending_chars += text.chars().count();
        Ok(())
    }

    /// Move the pending buffer into `full_text`.
    ///
    /// Returns the new snapshot, or `None` when there was nothing to move.
    pub fn flush(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        self.full_text.push_str(&self.pending);
        self.pending.clear();
        self.pending_chars = 0;
        Some(self.full_text.clone())
    }

    /// Terminal success: flush whatever is pending and close.
    pub fn complete(&mut self) -> Result<Option<String>, DomainError> {
        self.close(AssemblyState::Completed)
    }

    /// Terminal failure: flush whatever is pending and close.
    ///
    /// Text received before the failure is kept and surfaced, never dropped.
    pub fn fail(&mut self) -> Result<Option<String>, DomainError> {
        self.close(AssemblyState::Failed)
    }

    /// Stop without a terminal flush.
    ///
    /// Text already flushed stays valid; the unflushed remainder is discarded.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.ensure_open()?;
        self.pending.clear();
        self.pending_chars = 0;
        self.state = AssemblyState::Cancelled;
        Ok(())
    }

    /// Consume the Assembly, yielding the accumulated text.
    pub fn into_text(self) -> String {
        self.full_text
    }

    fn close(&mut self, terminal: AssemblyState) -> Result<Option<String>, DomainError> {
        self.ensure_open()?;
        self.state = AssemblyState::Streaming;
        let snapshot = self.flush();
        self.state = terminal;
        Ok(snapshot)
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.state.is_terminal() {
            return Err(DomainError::AssemblyClosed(self.state));
        }
        Ok(())
    }
}
