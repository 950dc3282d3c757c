//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript path; a leading `~/` expands to the home directory.
    pub conversation_log: Option<String>,
}

impl FileLoggingConfig {
    pub fn conversation_log_path(&self) -> Option<PathBuf> {
        self.conversation_log
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(expand_home)
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_log_by_default() {
        assert!(FileLoggingConfig::default().conversation_log_path().is_none());
    }

    #[test]
    fn test_plain_path_is_kept() {
        let config = FileLoggingConfig {
            conversation_log: Some("/tmp/transcript.jsonl".to_string()),
        };
        assert_eq!(
            config.conversation_log_path(),
            Some(PathBuf::from("/tmp/transcript.jsonl"))
        );
    }

    #[test]
    fn test_home_is_expanded() {
        let config = FileLoggingConfig {
            conversation_log: Some("~/logs/t.jsonl".to_string()),
        };
        let path = config.conversation_log_path().unwrap();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("logs/t.jsonl"));
        }
    }
}
