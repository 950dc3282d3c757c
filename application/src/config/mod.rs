//! Application-level configuration.
//!
//! - [`ChatParams`] - model, sampling and flush settings for one request

pub mod chat_params;

pub use chat_params::{ChatParams, DEFAULT_MODEL};
