//! Wire records of a streamed chat completion.
//!
//! The upstream service sends newline-delimited records of the form
//! `data: <JSON>` and terminates the stream with the literal line
//! `data: [DONE]`. [`StreamRecord::parse`] classifies one complete line.

use super::fragment::Fragment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix carried by every data line.
///
/// Matched exactly: `data:{...}` without the space is malformed.
pub const DATA_PREFIX: &str = "data: ";

/// The line that ends a stream.
pub const DONE_SENTINEL: &str = "data: [DONE]";

/// `finish_reason` value that marks the end of the assistant turn.
pub const STOP_REASON: &str = "stop";

/// A line that could not be turned into a [`StreamRecord`].
///
/// Recovered locally: the line is skipped and the stream continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedRecord {
    #[error("line does not start with 'data: '")]
    MissingDataPrefix,

    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid JSON payload: {0}")]
    InvalidJson(String),
}

/// One classified line of the wire stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamRecord {
    /// A `data: {...}` line carrying a completion chunk.
    Data(ChatCompletionChunk),
    /// The `data: [DONE]` sentinel.
    Done,
}

impl StreamRecord {
    /// Classify one complete line.
    ///
    /// Returns `Ok(None)` for lines that carry nothing: blank lines and SSE
    /// comment lines (`: keep-alive`).
    pub fn parse(line: &str) -> Result<Option<Self>, MalformedRecord> {
        let line = line.trim();
        if line.is_empty() || line.starts_with(':') {
            return Ok(None);
        }
        if line == DONE_SENTINEL {
            return Ok(Some(StreamRecord::Done));
        }

        let payload = line
            .strip_prefix(DATA_PREFIX)
            .ok_or(MalformedRecord::MissingDataPrefix)?;

        serde_json::from_str::<ChatCompletionChunk>(payload)
            .map(|chunk| Some(StreamRecord::Data(chunk)))
            .map_err(|e| MalformedRecord::InvalidJson(e.to_string()))
    }

    /// Parse a complete line given as raw bytes.
    pub fn parse_bytes(line: &[u8]) -> Result<Option<Self>, MalformedRecord> {
        let line = std::str::from_utf8(line).map_err(|_| MalformedRecord::InvalidUtf8)?;
        Self::parse(line)
    }

    /// The fragment carried by this record, if any.
    pub fn fragment(&self) -> Option<Fragment> {
        match self {
            StreamRecord::Data(chunk) => chunk.fragment(),
            StreamRecord::Done => None,
        }
    }
}

/// Payload of a data line.
///
/// Only `choices` is required; the rest is informational and defaulted so
/// that small upstream variations never turn a record into a malformed one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub object: Option<String>,
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// Extract the fragment from the first choice.
    ///
    /// Yields `None` when the first choice has neither content nor a stop
    /// reason (e.g. the opening `{"role":"assistant","content":""}` delta).
    pub fn fragment(&self) -> Option<Fragment> {
        let choice = self.choices.first()?;
        let text = choice.delta.content.as_deref().unwrap_or_default();
        let stop = choice.finish_reason.as_deref() == Some(STOP_REASON);

        if text.is_empty() && !stop {
            return None;
        }
        Some(Fragment::new(text, stop))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_line_with_content() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hi"},"index":0,"finish_reason":null}],"id":"c1","model":"gpt","object":"chat.completion.chunk"}"#;
        let record = StreamRecord::parse(line).unwrap().unwrap();
        let fragment = record.fragment().unwrap();
        assert_eq!(fragment.text(), "Hi");
        assert!(!fragment.is_stop());

        let StreamRecord::Data(chunk) = record else {
            panic!("expected data record");
        };
        assert_eq!(chunk.id.as_deref(), Some("c1"));
        assert_eq!(chunk.model.as_deref(), Some("gpt"));
    }

    #[test]
    fn test_parse_done_sentinel() {
        assert_eq!(
            StreamRecord::parse("data: [DONE]").unwrap(),
            Some(StreamRecord::Done)
        );
        assert_eq!(
            StreamRecord::parse("  data: [DONE]\r").unwrap(),
            Some(StreamRecord::Done)
        );
    }

    #[test]
    fn test_blank_and_comment_lines_carry_nothing() {
        assert_eq!(StreamRecord::parse("").unwrap(), None);
        assert_eq!(StreamRecord::parse("   \r").unwrap(), None);
        assert_eq!(StreamRecord::parse(": keep-alive").unwrap(), None);
    }

    #[test]
    fn test_missing_prefix_is_malformed() {
        assert_eq!(
            StreamRecord::parse(r#"{"choices":[]}"#),
            Err(MalformedRecord::MissingDataPrefix)
        );
        assert_eq!(
            StreamRecord::parse("event: message"),
            Err(MalformedRecord::MissingDataPrefix)
        );
        assert_eq!(
            StreamRecord::parse(r#"data:{"choices":[]}"#),
            Err(MalformedRecord::MissingDataPrefix)
        );
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let result = StreamRecord::parse("data: {not json");
        assert!(matches!(result, Err(MalformedRecord::InvalidJson(_))));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let result = StreamRecord::parse_bytes(b"data: \xff\xfe");
        assert_eq!(result, Err(MalformedRecord::InvalidUtf8));
    }

    #[test]
    fn test_stop_reason_without_content_yields_stop_fragment() {
        let line = r#"data: {"choices":[{"delta":{},"index":0,"finish_reason":"stop"}]}"#;
        let fragment = StreamRecord::parse(line).unwrap().unwrap().fragment().unwrap();
        assert_eq!(fragment.text(), "");
        assert!(fragment.is_stop());
    }

    #[test]
    fn test_role_only_delta_yields_no_fragment() {
        let line = r#"data: {"choices":[{"delta":{"role":"assistant","content":""},"index":0,"finish_reason":null}]}"#;
        let record = StreamRecord::parse(line).unwrap().unwrap();
        assert!(record.fragment().is_none());
    }

    #[test]
    fn test_other_finish_reasons_do_not_signal_stop() {
        let line = r#"data: {"choices":[{"delta":{"content":"x"},"index":0,"finish_reason":"length"}]}"#;
        let fragment = StreamRecord::parse(line).unwrap().unwrap().fragment().unwrap();
        assert!(!fragment.is_stop());
    }

    #[test]
    fn test_only_first_choice_is_used() {
        let line = r#"data: {"choices":[{"delta":{"content":"a"},"index":0},{"delta":{"content":"b"},"index":1}]}"#;
        let fragment = StreamRecord::parse(line).unwrap().unwrap().fragment().unwrap();
        assert_eq!(fragment.text(), "a");
    }

    #[test]
    fn test_empty_choices_yield_no_fragment() {
        let record = StreamRecord::parse(r#"data: {"choices":[]}"#).unwrap().unwrap();
        assert!(record.fragment().is_none());
        assert!(matches!(record, StreamRecord::Data(_)));
    }
}
