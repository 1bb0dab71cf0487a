//! Incremental decoder for newline-delimited JSON generate responses.
//!
//! The inference server streams one JSON object per line, each carrying a
//! `response` fragment. The decoder has two states:
//!
//! - `Streaming`: bytes arrive in chunks; every complete line is parsed on its
//!   own and its `response` fragment appended to the answer. A line split
//!   across two chunks is held back until its newline arrives.
//! - `Fallback`: the whole body is parsed as one JSON document. Entered
//!   when `Streaming` produced no text by the end of the body.

use serde_json::Value;
use tracing::{debug, trace};

/// Answer used when the body carries no `response` text at all.
pub const NO_RESPONSE: &str = "No response from Ollama.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodePhase {
    Streaming,
    Fallback,
}

/// Decode state for one generate call. Dropped when the call completes.
#[derive(Debug)]
pub struct StreamDecoder {
    phase: DecodePhase,
    /// Accumulated `response` text
    answer: String,
    /// Bytes after the last newline seen
    pending: Vec<u8>,
    /// Every byte fed so far, kept for the fallback parse
    body: Vec<u8>,
}

impl StreamDecoder {
    /// A decoder in `Streaming`, ready for the first chunk.
    pub fn new() -> Self {
        Self {
            phase: DecodePhase::Streaming,
            answer: String::new(),
            pending: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Consume one chunk of the body.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.body.extend_from_slice(chunk);
        self.pending.extend_from_slice(chunk);
        while let Some(line_end) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=line_end).collect();
            self.consume_line(&line);
        }
    }

    /// Signal the end of the body and produce the final answer.
    pub fn finish(mut self) -> String {
        // A last line without a trailing newline
        let tail = std::mem::take(&mut self.pending);
        self.consume_line(&tail);

        if !self.answer.is_empty() {
            return self.answer;
        }

        self.phase = DecodePhase::Fallback;
        debug!(phase = ?self.phase, bytes = self.body.len(), "No streamed text, decoding whole body");
        decode_body(&self.body)
    }

    fn consume_line(&mut self, line: &[u8]) {
        let line = String::from_utf8_lossy(line);
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        match serde_json::from_str::<Value>(line) {
            Ok(json) => {
                if let Some(fragment) = json.get("response").and_then(Value::as_str) {
                    self.answer.push_str(fragment);
                }
            }
            Err(e) => {
                trace!(error = %e, line = %line, "Ignoring unparseable stream line");
            }
        }
    }
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a complete body: its `response` field, the raw text if it is not
/// JSON, or the placeholder when neither yields any text.
pub fn decode_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => json
            .get("response")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_RESPONSE)
            .to_string(),
        Err(_) if text.is_empty() => NO_RESPONSE.to_string(),
        Err(_) => text.into_owned(),
    }
}
