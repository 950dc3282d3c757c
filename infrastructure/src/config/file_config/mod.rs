//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod output;
mod provider;
mod stream;

pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use provider::FileProviderConfig;
pub use stream::FileStreamConfig;

use crate::error::TransportError;
use crate::http::HttpTransportConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use streamchat_application::ChatParams;
use streamchat_domain::{ConfigIssue, ConfigIssueCode};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Endpoint, credentials and model
    pub provider: FileProviderConfig,
    /// Flush pacing
    pub stream: FileStreamConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Transcript logging
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.provider.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "provider.model".to_string(),
                },
                "provider.model cannot be empty",
            ));
        }

        let base_url = self.provider.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidValue {
                    field: "provider.base_url".to_string(),
                    value: self.provider.base_url.clone(),
                },
                format!(
                    "provider.base_url must start with http:// or https:// (got '{}')",
                    self.provider.base_url
                ),
            ));
        }

        if let Some(temperature) = self.provider.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "provider.temperature".to_string(),
                    value: temperature.to_string(),
                },
                format!(
                    "provider.temperature {} is outside 0.0..=2.0; the provider may reject it",
                    temperature
                ),
            ));
        }

        if self.stream.flush_threshold_chars == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "stream.flush_threshold_chars".to_string(),
                    value: "0".to_string(),
                },
                "stream.flush_threshold_chars = 0 is treated as 1",
            ));
        }

        if self.stream.channel_capacity == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "stream.channel_capacity".to_string(),
                    value: "0".to_string(),
                },
                "stream.channel_capacity = 0 is treated as 1",
            ));
        }

        issues
    }

    /// Request and assembly parameters for the send-message use case.
    pub fn to_chat_params(&self) -> ChatParams {
        ChatParams {
            model: self.provider.model.trim().to_string(),
            system_prompt: self
                .provider
                .system_prompt
                .clone()
                .filter(|p| !p.trim().is_empty()),
            temperature: self.provider.temperature,
            max_tokens: self.provider.max_tokens,
            flush: self.stream.to_flush_policy(),
        }
    }

    /// Settings for the HTTP transport, resolving the API key.
    pub fn to_http_transport_config(&self) -> Result<HttpTransportConfig, TransportError> {
        Ok(HttpTransportConfig {
            base_url: self.provider.base_url.trim().to_string(),
            api_key: self.provider.resolve_api_key()?,
            connect_timeout: Duration::from_secs(self.provider.connect_timeout_seconds),
            channel_capacity: self.stream.channel_capacity(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamchat_domain::{OutputFormat, Severity};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[provider]
base_url = "http://localhost:11434/v1"
api_key_env = ""
model = "llama3"
system_prompt = "Answer in one sentence."
temperature = 0.3
max_tokens = 512

[stream]
flush_threshold_chars = 16
flush_delay_ms = 0

[output]
format = "final"
color = false

[logging]
conversation_log = "/tmp/chat.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.model, "llama3");
        assert_eq!(config.provider.temperature, Some(0.3));
        assert_eq!(config.stream.flush_threshold_chars, 16);
        assert_eq!(config.output.format, Some(OutputFormat::Final));
        assert!(!config.output.color);
        assert!(config.validate().is_empty());

        let params = config.to_chat_params();
        assert_eq!(params.model, "llama3");
        assert_eq!(params.system_prompt.as_deref(), Some("Answer in one sentence."));
        assert_eq!(params.max_tokens, Some(512));
        assert_eq!(params.flush.threshold_chars(), 16);
        assert!(params.flush.delay().is_zero());

        let http = config.to_http_transport_config().unwrap();
        assert_eq!(http.base_url, "http://localhost:11434/v1");
        assert!(http.api_key.is_none());
        assert_eq!(http.channel_capacity, 64);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[stream]
flush_delay_ms = 10
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.stream.flush_delay_ms, 10);
        // Defaults should apply
        assert_eq!(config.stream.flush_threshold_chars, 4);
        assert_eq!(config.provider, FileProviderConfig::default());
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_errors_and_warnings() {
        let mut config = FileConfig::default();
        config.provider.model = "  ".to_string();
        config.provider.base_url = "api.openai.com".to_string();
        config.provider.temperature = Some(3.5);
        config.stream.flush_threshold_chars = 0;
        config.stream.channel_capacity = 0;

        let issues = config.validate();
        let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).collect();
        let warnings: Vec<_> = issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .collect();

        assert_eq!(errors.len(), 2);
        assert_eq!(warnings.len(), 3);
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::InvalidValue { field, .. } if field == "provider.base_url"
        )));
    }

    #[test]
    fn test_blank_system_prompt_is_dropped() {
        let mut config = FileConfig::default();
        config.provider.system_prompt = Some("   ".to_string());
        assert!(config.to_chat_params().system_prompt.is_none());
    }
}
