//! Error types for building transports

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while setting up a completion transport.
///
/// These happen before any request is made; failures of a request itself
/// are [`StreamError`](streamchat_domain::StreamError)s.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("API key not found: set the {env} environment variable or provider.api_key")]
    MissingApiKey { env: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),

    #[error("Failed to read replay file {}: {source}", path.display())]
    ReplayRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
