//! Application layer for streamchat
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ChatParams, DEFAULT_MODEL};
pub use ports::{
    assembly_observer::{AssemblyObserver, AssemblyUpdate, ChannelObserver, NoObserver, drain_updates},
    completion_transport::{CompletionTransport, StreamHandle},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
};
pub use use_cases::assemble_response::{AssemblyOutcome, ResponseAssembler};
pub use use_cases::send_message::{SendMessageError, SendMessageUseCase};
