//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod assembly_observer;
pub mod completion_transport;
pub mod conversation_logger;
