//! Output format value object

use serde::{Deserialize, Serialize};

/// How a streamed reply is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Render text as it is flushed (default)
    #[default]
    Stream,
    /// Print only the final text
    Final,
    /// JSON summary of the assembled reply
    Json,
}
