//! Domain error types
//!
//! [`StreamError`] is the failure taxonomy surfaced to callers of the
//! streaming core. Malformed wire records are not part of it: they are
//! recovered locally by the decoder (see [`MalformedRecord`](crate::stream::record::MalformedRecord)).

use crate::assembly::entities::AssemblyState;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Assembly is already {0} and accepts no further input")]
    AssemblyClosed(AssemblyState),

    #[error("Message must not be empty")]
    EmptyMessage,
}

/// Terminal failure of a single streamed response.
///
/// Every variant ends the Assembly it belongs to; none of them is fatal to
/// the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The request never produced a stream (connect failure or non-success status).
    #[error("Connection error{}: {message}", status_suffix(.status))]
    Connection {
        status: Option<u16>,
        message: String,
    },

    /// The underlying transport failed after the stream started.
    #[error("Stream read error: {0}")]
    StreamRead(String),

    /// The transport answered but there was no body to read.
    #[error("No response body")]
    NoResponseBody,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Discriminant of [`StreamError`], handy for logging and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamErrorKind {
    Connection,
    StreamRead,
    NoResponseBody,
}

impl StreamError {
    pub fn connection(message: impl Into<String>) -> Self {
        StreamError::Connection {
            status: None,
            message: message.into(),
        }
    }

    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        StreamError::Connection {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> StreamErrorKind {
        match self {
            StreamError::Connection { .. } => StreamErrorKind::Connection,
            StreamError::StreamRead(_) => StreamErrorKind::StreamRead,
            StreamError::NoResponseBody => StreamErrorKind::NoResponseBody,
        }
    }

    /// True when the failure happened before any content could arrive.
    pub fn is_before_content(&self) -> bool {
        !matches!(self, StreamError::StreamRead(_))
    }
}

impl StreamErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamErrorKind::Connection => "connection",
            StreamErrorKind::StreamRead => "stream_read",
            StreamErrorKind::NoResponseBody => "no_response_body",
        }
    }
}

impl std::fmt::Display for StreamErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
