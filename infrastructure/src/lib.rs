//! Infrastructure layer for streamchat
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the completion stream decoder, the HTTP and replay
//! transports, configuration loading and the JSONL transcript.

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod replay;
pub mod sse;

pub use config::{
    ConfigLoader, FileConfig, FileLoggingConfig, FileOutputConfig, FileProviderConfig,
    FileStreamConfig,
};
pub use error::TransportError;
pub use http::{HttpCompletionTransport, HttpTransportConfig};
pub use logging::JsonlConversationLogger;
pub use replay::{DEFAULT_REPLAY_CHUNK_SIZE, ReplayTransport};
pub use sse::{DEFAULT_MAX_LINE_BYTES, DecoderStats, TransportDecoder, spawn_decoder};
