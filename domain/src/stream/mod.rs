//! Completion stream domain.
//!
//! - [`record::StreamRecord`] - one classified line of the wire stream
//! - [`fragment::Fragment`] - a unit of assistant text
//! - [`event::StreamEvent`] - what the decoder hands to the assembler

pub mod event;
pub mod fragment;
pub mod record;
