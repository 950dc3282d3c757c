//! Stream configuration from TOML (`[stream]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use streamchat_domain::{DEFAULT_FLUSH_DELAY, DEFAULT_FLUSH_THRESHOLD_CHARS, FlushPolicy};

/// Flush pacing and channel sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStreamConfig {
    /// Buffered characters that trigger a flush (0 is treated as 1).
    pub flush_threshold_chars: usize,
    /// Pause before each threshold flush, in milliseconds.
    pub flush_delay_ms: u64,
    /// Decoded events buffered between decoder and assembler (0 is treated as 1).
    pub channel_capacity: usize,
}

impl Default for FileStreamConfig {
    fn default() -> Self {
        Self {
            flush_threshold_chars: DEFAULT_FLUSH_THRESHOLD_CHARS,
            flush_delay_ms: DEFAULT_FLUSH_DELAY.as_millis() as u64,
            channel_capacity: 64,
        }
    }
}

impl FileStreamConfig {
    pub fn to_flush_policy(&self) -> FlushPolicy {
        FlushPolicy::new(
            self.flush_threshold_chars,
            Duration::from_millis(self.flush_delay_ms),
        )
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_domain_policy() {
        assert_eq!(FileStreamConfig::default().to_flush_policy(), FlushPolicy::default());
    }

    #[test]
    fn test_zero_values_are_clamped() {
        let config = FileStreamConfig {
            flush_threshold_chars: 0,
            flush_delay_ms: 0,
            channel_capacity: 0,
        };
        let policy = config.to_flush_policy();
        assert_eq!(policy.threshold_chars(), 1);
        assert!(policy.delay().is_zero());
        assert_eq!(config.channel_capacity(), 1);
    }
}
