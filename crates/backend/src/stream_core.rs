//! Decoder for the backend's generation stream.
//!
//! The stream is a sequence of `data: <json>` lines, chunked with no
//! alignment guarantee. The decoder walks each event's candidate parts and
//! re-emits them as normalized events: thinking runs bracketed by markers,
//! text deltas, and one tool-call batch per finish signal.

use serde_json::Value as JsonValue;

use crate::bridge_types::chat::{StreamEvent, ToolCall, ToolCallFunction};

/// Markers wrapped around a run of thinking output.
pub const THINKING_OPEN: &str = "<think>\n";
pub const THINKING_CLOSE: &str = "\n</think>\n";

const DATA_PREFIX: &str = "data: ";

/// Per-call stream decoder. One instance serves exactly one generation.
///
/// Lines that do not parse are dropped and counted rather than surfaced,
/// so the decoder keeps consuming whatever arrives. Lines split across
/// chunk boundaries are not reassembled; a fragment parses as garbage on
/// both sides and is dropped the same way.
pub struct StreamDecoder {
    thinking_open: bool,
    tool_calls: Vec<ToolCall>,
    discarded_lines: u64,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self {
            thinking_open: false,
            tool_calls: Vec::new(),
            discarded_lines: 0,
        }
    }

    /// Number of `data:` lines dropped because they did not parse.
    pub fn discarded_lines(&self) -> u64 {
        self.discarded_lines
    }

    /// Tool calls still buffered. Non-zero after end of stream means the
    /// backend never sent a finish signal; the batch is dropped, not
    /// flushed.
    pub fn pending_tool_calls(&self) -> usize {
        self.tool_calls.len()
    }

    /// Feed one transport chunk, invoking `emit` for every decoded event
    /// in order.
    pub fn push(&mut self, chunk: &[u8], emit: &mut dyn FnMut(StreamEvent)) {
        let text = String::from_utf8_lossy(chunk);
        for line in text.split('\n') {
            let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
                continue;
            };
            match serde_json::from_str::<JsonValue>(payload) {
                Ok(event) => self.handle_event(&event, emit),
                Err(_) => self.discarded_lines += 1,
            }
        }
    }

    fn handle_event(&mut self, event: &JsonValue, emit: &mut dyn FnMut(StreamEvent)) {
        let Some(candidate) = event.pointer("/response/candidates/0") else {
            return;
        };

        if let Some(parts) = candidate.pointer("/content/parts").and_then(|v| v.as_array()) {
            for part in parts {
                self.handle_part(part, emit);
            }
        }

        let finished = candidate
            .get("finishReason")
            .and_then(|v| v.as_str())
            .is_some_and(|reason| !reason.is_empty());
        if finished && !self.tool_calls.is_empty() {
            self.close_thinking(emit);
            emit(StreamEvent::ToolCalls {
                tool_calls: std::mem::take(&mut self.tool_calls),
            });
        }
    }

    fn handle_part(&mut self, part: &JsonValue, emit: &mut dyn FnMut(StreamEvent)) {
        if part.get("thought").and_then(|v| v.as_bool()) == Some(true) {
            if !self.thinking_open {
                emit(StreamEvent::Thinking {
                    content: THINKING_OPEN.to_string(),
                });
                self.thinking_open = true;
            }
            let text = part.get("text").and_then(|v| v.as_str()).unwrap_or_default();
            emit(StreamEvent::Thinking {
                content: text.to_string(),
            });
        } else if let Some(text) = part.get("text").and_then(|v| v.as_str()) {
            // keep-alive fragments: whitespace-only text carries nothing
            if text.trim().is_empty() {
                return;
            }
            self.close_thinking(emit);
            emit(StreamEvent::Text {
                content: text.to_string(),
            });
        } else if let Some(call) = part.get("functionCall") {
            let args = call
                .get("args")
                .cloned()
                .unwrap_or_else(|| JsonValue::Object(Default::default()));
            self.tool_calls.push(ToolCall {
                id: call
                    .get("id")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                kind: "function".to_string(),
                function: ToolCallFunction {
                    name: call
                        .get("name")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string(),
                    arguments: args.to_string(),
                },
            });
        }
    }

    fn close_thinking(&mut self, emit: &mut dyn FnMut(StreamEvent)) {
        if self.thinking_open {
            emit(StreamEvent::Thinking {
                content: THINKING_CLOSE.to_string(),
            });
            self.thinking_open = false;
        }
    }
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}
