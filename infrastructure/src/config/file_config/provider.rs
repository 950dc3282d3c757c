//! Provider configuration from TOML (`[provider]` section)

use crate::error::TransportError;
use serde::{Deserialize, Serialize};

/// OpenAI-compatible endpoint configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL of the API (with or without a trailing `/v1`).
    pub base_url: String,
    /// Environment variable holding the API key (default: "OPENAI_API_KEY").
    /// Set to an empty string for endpoints that need no key.
    pub api_key_env: String,
    /// Direct API key (prefer `api_key_env`).
    pub api_key: Option<String>,
    /// Model to request.
    pub model: String,
    /// Prepended to every request as a system message.
    pub system_prompt: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// TCP/TLS connect timeout.
    pub connect_timeout_seconds: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            model: streamchat_application::DEFAULT_MODEL.to_string(),
            system_prompt: None,
            temperature: None,
            max_tokens: None,
            connect_timeout_seconds: 30,
        }
    }
}

impl FileProviderConfig {
    /// Resolve the API key: `api_key` first, then the `api_key_env` variable.
    ///
    /// Returns `Ok(None)` when `api_key_env` is empty and no key is set.
    pub fn resolve_api_key(&self) -> Result<Option<String>, TransportError> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Ok(Some(key.clone()));
        }
        if self.api_key_env.trim().is_empty() {
            return Ok(None);
        }
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(Some(key)),
            _ => Err(TransportError::MissingApiKey {
                env: self.api_key_env.clone(),
            }),
        }
    }
}
