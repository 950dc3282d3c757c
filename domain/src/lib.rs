//! Domain layer for streamchat
//!
//! This crate contains the core entities and value objects of the streaming
//! chat client. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Stream
//!
//! A completion stream arrives as newline-delimited `data: <JSON>` records
//! ending with `data: [DONE]`. Each record is classified into a
//! [`StreamRecord`]; data records yield [`Fragment`]s of assistant text.
//!
//! ## Assembly
//!
//! An [`Assembly`] accumulates the fragments of one response. Buffered text
//! is surfaced ("flushed") according to a [`FlushPolicy`], and the Assembly
//! moves through [`AssemblyState`] until it reaches a terminal state.

pub mod assembly;
pub mod config;
pub mod conversation;
pub mod core;
pub mod stream;

// Re-export commonly used types
pub use assembly::{
    entities::{Assembly, AssemblyState},
    policy::{DEFAULT_FLUSH_DELAY, DEFAULT_FLUSH_THRESHOLD_CHARS, FlushPolicy},
};
pub use config::{
    OutputFormat,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use conversation::{
    entities::{Conversation, Message, Role},
    request::ChatRequest,
};
pub use core::error::{DomainError, StreamError, StreamErrorKind};
pub use stream::{
    event::StreamEvent,
    fragment::Fragment,
    record::{ChatCompletionChunk, ChunkChoice, ChunkDelta, MalformedRecord, StreamRecord},
};
