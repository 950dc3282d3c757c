//! Incremental decoder for `data:`-framed completion streams.
//!
//! The network hands over arbitrary byte chunks: a record may be split
//! across chunks, and a multi-byte UTF-8 character may be split between
//! them too. [`TransportDecoder`] keeps the bytes after the last newline
//! and only decodes complete lines, so the produced events do not depend on
//! how the stream was chunked.

use streamchat_domain::{StreamEvent, StreamRecord};
use tracing::{debug, trace, warn};

/// Longest line excerpt written to the log for a malformed record.
const LOG_PREVIEW_CHARS: usize = 120;

/// Longest line held back while waiting for its newline.
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

/// Counters for one decoded stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// Records recognized (data lines and the sentinel).
    pub records: usize,
    /// Fragments emitted.
    pub fragments: usize,
    /// Lines skipped as malformed.
    pub malformed: usize,
}

/// Line-buffering stream decoder.
///
/// Feed raw chunks with [`feed`](Self::feed) and call
/// [`finish`](Self::finish) at end of input. After the sentinel (or
/// `finish`) the decoder is finished and ignores further input.
///
/// A line that grows past `max_line_bytes` without a newline is counted as
/// malformed and skipped up to its newline.
#[derive(Debug)]
pub struct TransportDecoder {
    buffer: Vec<u8>,
    /// Prefix of `buffer` already known to contain no newline.
    scanned: usize,
    /// Dropping the rest of an oversized line.
    discarding: bool,
    max_line_bytes: usize,
    finished: bool,
    stats: DecoderStats,
}

impl Default for TransportDecoder {
    fn default() -> Self {
        Self {
            buffer: Vec::new(),
            scanned: 0,
            discarding: false,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            finished: false,
            stats: DecoderStats::default(),
        }
    }
}

impl TransportDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes.max(1);
        self
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Bytes held back waiting for a newline.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Decode every complete line in `chunk` (plus what was buffered).
    pub fn feed(&mut self, mut chunk: &[u8]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.finished {
            trace!("Ignoring {} bytes after end of stream", chunk.len());
            return events;
        }

        if self.discarding {
            match chunk.iter().position(|b| *b == b'\n') {
                Some(pos) => {
                    self.discarding = false;
                    chunk = &chunk[pos + 1..];
                }
                None => return events,
            }
        }

        let mut buffer = std::mem::take(&mut self.buffer);
        buffer.extend_from_slice(chunk);

        let mut start = 0;
        let mut search_from = self.scanned;
        while let Some(pos) = buffer[search_from..].iter().position(|b| *b == b'\n') {
            let end = search_from + pos;
            self.decode_line(&buffer[start..end], &mut events);
            start = end + 1;
            search_from = start;
            if self.finished {
                let discarded = buffer.len() - start;
                if discarded > 0 {
                    debug!("Discarding {} bytes after [DONE]", discarded);
                }
                return events;
            }
        }

        buffer.drain(..start);
        if buffer.len() > self.max_line_bytes {
            self.stats.malformed += 1;
            warn!(
                "Skipping stream record longer than {} bytes",
                self.max_line_bytes
            );
            buffer.clear();
            self.discarding = true;
        }
        self.scanned = buffer.len();
        self.buffer = buffer;
        events
    }

    /// Signal end of input.
    ///
    /// A trailing line without a newline is decoded. If the sentinel never
    /// arrived, the stream is treated as complete and `Done` is emitted.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }

        let rest = std::mem::take(&mut self.buffer);
        self.scanned = 0;
        if !rest.is_empty() {
            self.decode_line(&rest, &mut events);
        }

        if !self.finished {
            debug!("Stream ended without [DONE]; treating as complete");
            self.finished = true;
            events.push(StreamEvent::Done);
        }
        events
    }

    fn decode_line(&mut self, line: &[u8], events: &mut Vec<StreamEvent>) {
        match StreamRecord::parse_bytes(line) {
            Ok(None) => {}
            Ok(Some(StreamRecord::Done)) => {
                self.stats.records += 1;
                self.finished = true;
                events.push(StreamEvent::Done);
            }
            Ok(Some(record)) => {
                self.stats.records += 1;
                if let Some(fragment) = record.fragment() {
                    self.stats.fragments += 1;
                    events.push(StreamEvent::Fragment(fragment));
                }
            }
            Err(e) => {
                self.stats.malformed += 1;
                let preview: String = String::from_utf8_lossy(line)
                    .chars()
                    .take(LOG_PREVIEW_CHARS)
                    .collect();
                warn!("Skipping malformed stream record: {} ({})", e, preview);
            }
        }
    }
}
