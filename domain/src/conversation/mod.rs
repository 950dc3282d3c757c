//! Conversation domain.
//!
//! - [`entities::Conversation`] - ordered chat history
//! - [`entities::Message`] - a single message within it
//! - [`request::ChatRequest`] - the request body sent upstream

pub mod entities;
pub mod request;
