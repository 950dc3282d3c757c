//! Presentation layer for streamchat
//!
//! This crate contains CLI definitions, reply renderers,
//! progress indicators, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::{Cli, OutputFormat};
pub use config::{OutputConfig, ReplConfig};
pub use output::{ConsoleRenderer, ReplyPrinter, ReplySummary, TranscriptView};
pub use progress::WaitingIndicator;
