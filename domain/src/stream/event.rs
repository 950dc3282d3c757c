//! Events produced by the transport decoder.
//!
//! [`StreamEvent`] bridges infrastructure-level decoding (bytes off the wire)
//! to the application-level assembler. A well-formed event sequence is zero
//! or more [`Fragment`](StreamEvent::Fragment)s followed by exactly one
//! terminal event ([`Done`](StreamEvent::Done) or [`Error`](StreamEvent::Error)).

use super::fragment::Fragment;
use crate::core::error::StreamError;

/// An event in a decoded completion stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Assistant text (possibly empty when it only carries the stop signal).
    Fragment(Fragment),
    /// The stream finished normally.
    Done,
    /// The stream failed; no further events follow.
    Error(StreamError),
}

impl StreamEvent {
    pub fn fragment(text: impl Into<String>) -> Self {
        StreamEvent::Fragment(Fragment::text_only(text))
    }

    /// Returns the fragment text if this is a Fragment event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Fragment(f) => Some(f.text()),
            _ => None,
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done | StreamEvent::Error(_))
    }
}
