//! Accumulated view of one reply, for `final` and `json` output

use serde::Serialize;
use std::sync::Mutex;
use streamchat_application::{AssemblyObserver, AssemblyOutcome};
use streamchat_domain::{AssemblyState, StreamError};

#[derive(Debug, Default)]
struct TranscriptState {
    text: String,
    updates: usize,
    state: AssemblyState,
    error: Option<StreamError>,
}

/// Observer that keeps the latest snapshot instead of printing it.
#[derive(Debug, Default)]
pub struct TranscriptView {
    state: Mutex<TranscriptState>,
}

/// JSON shape printed by `--output json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplySummary {
    pub status: &'static str,
    pub text: String,
    pub updates: usize,
    pub error: Option<ErrorSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorSummary {
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
}

impl From<&StreamError> for ErrorSummary {
    fn from(error: &StreamError) -> Self {
        let http_status = match error {
            StreamError::Connection { status, .. } => *status,
            _ => None,
        };
        Self {
            kind: error.kind().as_str(),
            message: error.to_string(),
            http_status,
        }
    }
}

impl TranscriptView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.state.lock().map(|s| s.text.clone()).unwrap_or_default()
    }

    pub fn updates(&self) -> usize {
        self.state.lock().map(|s| s.updates).unwrap_or_default()
    }

    pub fn state(&self) -> AssemblyState {
        self.state.lock().map(|s| s.state).unwrap_or_default()
    }

    /// Summary of the finished reply.
    ///
    /// Status, text and error come from `outcome`, since a cancelled reply
    /// never reaches the observer.
    pub fn summary(&self, outcome: &AssemblyOutcome) -> ReplySummary {
        ReplySummary {
            status: outcome.state().as_str(),
            text: outcome.text().to_string(),
            updates: self.updates(),
            error: outcome.error().map(ErrorSummary::from),
        }
    }
}

impl AssemblyObserver for TranscriptView {
    fn on_update(&self, snapshot: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.text = snapshot.to_string();
            state.updates += 1;
            state.state = AssemblyState::Streaming;
        }
    }

    fn on_complete(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.state = AssemblyState::Completed;
        }
    }

    fn on_error(&self, partial: &str, error: &StreamError) {
        if let Ok(mut state) = self.state.lock() {
            state.text = partial.to_string();
            state.state = AssemblyState::Failed;
            state.error = Some(error.clone());
        }
    }
}
