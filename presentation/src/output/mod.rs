//! Rendering of assembled replies
//!
//! - [`ConsoleRenderer`] - prints deltas as they are flushed (`stream`)
//! - [`TranscriptView`] - keeps the latest snapshot (`final`, `json`)
//! - [`ReplyPrinter`] - picks the observer for the configured format and
//!   prints the result of one turn

pub mod console;
pub mod reply;
pub mod transcript;

pub use console::ConsoleRenderer;
pub use reply::ReplyPrinter;
pub use transcript::{ErrorSummary, ReplySummary, TranscriptView};
