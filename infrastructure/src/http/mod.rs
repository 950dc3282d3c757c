//! HTTP completion transport

pub mod transport;

pub use transport::{HttpCompletionTransport, HttpTransportConfig};
