//! Completion stream decoding
//!
//! - [`TransportDecoder`] - byte chunks in, [`StreamEvent`](streamchat_domain::StreamEvent)s out
//! - [`spawn_decoder`] - runs a decoder over a byte stream on a background task

pub mod decoder;
pub mod stream;

pub use decoder::{DEFAULT_MAX_LINE_BYTES, DecoderStats, TransportDecoder};
pub use stream::spawn_decoder;
