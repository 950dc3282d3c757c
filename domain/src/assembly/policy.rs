//! Output smoothing policy.

use std::time::Duration;

/// Default number of buffered characters that triggers a flush.
pub const DEFAULT_FLUSH_THRESHOLD_CHARS: usize = 4;

/// Default pacing delay applied before a threshold flush.
pub const DEFAULT_FLUSH_DELAY: Duration = Duration::from_millis(50);

/// When to surface buffered text, and how fast.
///
/// A threshold of zero would flush on every fragment including empty ones;
/// it is clamped to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushPolicy {
    threshold_chars: usize,
    delay: Duration,
}

impl Default for FlushPolicy {
    fn default() -> Self {
        Self {
            threshold_chars: DEFAULT_FLUSH_THRESHOLD_CHARS,
            delay: DEFAULT_FLUSH_DELAY,
        }
    }
}

impl FlushPolicy {
    pub fn new(threshold_chars: usize, delay: Duration) -> Self {
        Self {
            threshold_chars: threshold_chars.max(1),
            delay,
        }
    }

    /// Flush on every non-empty fragment, without pacing.
    pub fn immediate() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn threshold_chars(&self) -> usize {
        self.threshold_chars
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn with_threshold_chars(self, threshold_chars: usize) -> Self {
        Self::new(threshold_chars, self.delay)
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        Self::new(self.threshold_chars, delay)
    }

    /// True once the pending buffer is large enough to flush.
    pub fn is_reached(&self, pending_chars: usize) -> bool {
        pending_chars >= self.threshold_chars
    }
}
