//! Fragments of assistant text.

/// A unit of newly generated assistant text.
///
/// `stop` is set when the record that carried this text also reported the
/// stop finish reason. A stop fragment may have empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    text: String,
    stop: bool,
}

impl Fragment {
    pub fn new(text: impl Into<String>, stop: bool) -> Self {
        Self {
            text: text.into(),
            stop,
        }
    }

    /// A plain text fragment without a stop signal.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_stop(&self) -> bool {
        self.stop
    }
}
