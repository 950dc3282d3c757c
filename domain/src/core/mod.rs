//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] - domain-level errors
//! - [`error::StreamError`] - terminal failures of a streamed response

pub mod error;
