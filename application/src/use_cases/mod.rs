//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod assemble_response;
pub mod send_message;
