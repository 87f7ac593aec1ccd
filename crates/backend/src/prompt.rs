//! Folding of OpenAI chat messages into the backend's ordered turn list.
//!
//! The backend models a conversation as alternating `user`/`model` turns,
//! each holding a part list. One input message does not always map to one
//! turn: consecutive tool-call-only assistant messages extend the previous
//! model turn, and parallel tool results group into a single user turn.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::bridge_types::chat::{ChatMessage, ChatRole, ContentPart, MessageContent, ToolCall};

/// Role of one backend conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// One entry of the backend's `contents` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnContent {
    pub role: TurnRole,
    pub parts: Vec<TurnPart>,
}

impl TurnContent {
    pub fn user(parts: Vec<TurnPart>) -> Self {
        Self {
            role: TurnRole::User,
            parts,
        }
    }

    pub fn model(parts: Vec<TurnPart>) -> Self {
        Self {
            role: TurnRole::Model,
            parts,
        }
    }
}

/// One part of a backend turn. Exactly one payload per part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnPart {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thought: Option<bool>,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: FunctionCall,
    },
    FunctionResponse {
        #[serde(rename = "functionResponse")]
        function_response: FunctionResponse,
    },
}

impl TurnPart {
    pub fn text(text: impl Into<String>) -> Self {
        TurnPart::Text {
            text: text.into(),
            thought: None,
        }
    }

    pub fn thought(text: impl Into<String>) -> Self {
        TurnPart::Text {
            text: text.into(),
            thought: Some(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub id: String,
    pub name: String,
    pub args: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub id: String,
    pub name: String,
    pub response: FunctionOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionOutput {
    pub output: JsonValue,
}

/// Text and inline images pulled out of one message's content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedContent {
    pub text: String,
    pub images: Vec<InlineData>,
}

fn data_uri_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^data:image/(\w+);base64,(.+)$").expect("valid pattern"))
}

fn think_span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<think>(.*?)</think>").expect("valid pattern"))
}

fn image_markdown_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!\[.*?\]\(data:image/[^)]+\)").expect("valid pattern"))
}

fn image_done_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[图像生成完成[^\]]*\]").expect("valid pattern"))
}

fn blank_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("valid pattern"))
}

/// Pull plain text and inlined base64 images out of a content value.
///
/// Image parts whose URL is not a `data:image/...;base64,...` URI are
/// dropped, as are part tags the bridge does not recognize.
pub fn extract_content(content: &MessageContent) -> ExtractedContent {
    let mut extracted = ExtractedContent::default();
    match content {
        MessageContent::Text(text) => extracted.text = text.clone(),
        MessageContent::Parts(parts) => {
            for part in parts {
                match part {
                    ContentPart::Text { text } => extracted.text.push_str(text),
                    ContentPart::ImageUrl { image_url } => {
                        if let Some(caps) = data_uri_re().captures(&image_url.url) {
                            extracted.images.push(InlineData {
                                mime_type: format!("image/{}", &caps[1]),
                                data: caps[2].to_string(),
                            });
                        }
                    }
                    ContentPart::Unknown => {}
                }
            }
        }
    }
    extracted
}

/// Split `<think>...</think>` spans out of assistant text. Returns the
/// non-empty span bodies (trimmed, in order of appearance) and the text
/// with all spans removed. Order of passes is a contract:
/// extract, then strip, then whitespace cleanup by the caller.
fn split_think_spans(text: &str) -> (Vec<String>, String) {
    let spans: Vec<String> = think_span_re()
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|span| !span.is_empty())
        .collect();
    let remainder = think_span_re().replace_all(text, "").into_owned();
    (spans, remainder)
}

/// Remove inline image markdown and the generation-complete marker that
/// image models echo into their visible output.
fn strip_image_markup(text: &str) -> String {
    let text = image_markdown_re().replace_all(text, "");
    image_done_marker_re().replace_all(&text, "").into_owned()
}

/// Collapse runs of three or more newlines to a single blank line.
fn collapse_blank_lines(text: &str) -> String {
    blank_run_re().replace_all(text, "\n\n").into_owned()
}

/// Kind of the turn currently open for appension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenKind {
    /// Plain user turn. Never extended.
    User,
    /// Model turn; tool-call-only assistant messages may extend it.
    Model,
    /// User turn holding function responses; further tool results join it.
    ToolResponses,
}

/// Builder for the backend turn list. At most one turn is open for
/// appension at a time; opening a turn of a different kind seals the
/// previous one. This replaces peeking at the tail of the output list.
struct TurnFolder {
    sealed: Vec<TurnContent>,
    open: Option<(OpenKind, TurnContent)>,
}

impl TurnFolder {
    fn new() -> Self {
        Self {
            sealed: Vec::new(),
            open: None,
        }
    }

    fn open_kind(&self) -> Option<OpenKind> {
        self.open.as_ref().map(|(kind, _)| *kind)
    }

    fn seal(&mut self) {
        if let Some((_, turn)) = self.open.take() {
            self.sealed.push(turn);
        }
    }

    fn open_turn(&mut self, kind: OpenKind, turn: TurnContent) {
        self.seal();
        self.open = Some((kind, turn));
    }

    /// Append parts to the open turn. Callers check `open_kind` first.
    fn push_parts(&mut self, parts: Vec<TurnPart>) {
        if let Some((_, turn)) = self.open.as_mut() {
            turn.parts.extend(parts);
        }
    }

    /// Function name recorded for `call_id` in the newest model turn that
    /// carries it, or empty when no turn does.
    fn lookup_function_name(&self, call_id: &str) -> String {
        let open = self.open.iter().map(|(_, turn)| turn);
        for turn in open.chain(self.sealed.iter().rev()) {
            if turn.role != TurnRole::Model {
                continue;
            }
            for part in &turn.parts {
                if let TurnPart::FunctionCall { function_call } = part {
                    if function_call.id == call_id {
                        return function_call.name.clone();
                    }
                }
            }
        }
        String::new()
    }

    fn finish(mut self) -> Vec<TurnContent> {
        self.seal();
        self.sealed
    }
}

/// Fold the full message history into backend turns, in input order.
pub fn fold_messages(
    messages: &[ChatMessage],
    thinking_enabled: bool,
    model_name: &str,
) -> Vec<TurnContent> {
    let is_image_model = model_name.ends_with("-image");
    let mut folder = TurnFolder::new();
    for message in messages {
        match message.role {
            ChatRole::User | ChatRole::System => {
                fold_user_message(&mut folder, message, thinking_enabled)
            }
            ChatRole::Assistant => fold_assistant_message(&mut folder, message, is_image_model),
            ChatRole::Tool => fold_tool_message(&mut folder, message),
        }
    }
    folder.finish()
}

fn fold_user_message(folder: &mut TurnFolder, message: &ChatMessage, thinking_enabled: bool) {
    let extracted = extract_content(&message.content);
    let mut parts = Vec::new();
    if !extracted.text.is_empty() {
        if thinking_enabled && !extracted.images.is_empty() {
            // thinking mode rejects untagged text next to inline data
            parts.push(TurnPart::Text {
                text: extracted.text,
                thought: Some(false),
            });
        } else {
            parts.push(TurnPart::text(extracted.text));
        }
    }
    parts.extend(
        extracted
            .images
            .into_iter()
            .map(|inline_data| TurnPart::InlineData { inline_data }),
    );
    if parts.is_empty() {
        parts.push(TurnPart::text(""));
    }
    folder.open_turn(OpenKind::User, TurnContent::user(parts));
}

fn fold_assistant_message(folder: &mut TurnFolder, message: &ChatMessage, is_image_model: bool) {
    let tool_parts = translate_tool_calls(message.tool_calls.as_deref().unwrap_or_default());
    let has_tool_calls = !tool_parts.is_empty();
    let has_content = match &message.content {
        MessageContent::Text(text) => !text.trim().is_empty(),
        MessageContent::Parts(_) => true,
    };

    // Multi-step tool emission arrives as several assistant messages that
    // carry only tool calls; the backend expects them on one model turn.
    if has_tool_calls && !has_content && folder.open_kind() == Some(OpenKind::Model) {
        folder.push_parts(tool_parts);
        return;
    }

    let mut parts = Vec::new();
    if has_content {
        let text = assistant_text(&message.content);
        let (thoughts, remainder) = split_think_spans(&text);
        parts.extend(thoughts.into_iter().map(TurnPart::thought));

        let visible = if is_image_model {
            strip_image_markup(&remainder)
        } else {
            remainder
        };
        let visible = collapse_blank_lines(&visible).trim().to_string();
        if !visible.is_empty() {
            parts.push(TurnPart::text(visible));
        }
    }
    parts.extend(tool_parts);
    if parts.is_empty() {
        parts.push(TurnPart::text(""));
    }
    folder.open_turn(OpenKind::Model, TurnContent::model(parts));
}

fn fold_tool_message(folder: &mut TurnFolder, message: &ChatMessage) {
    let call_id = message.tool_call_id.clone().unwrap_or_default();
    let name = folder.lookup_function_name(&call_id);
    let part = TurnPart::FunctionResponse {
        function_response: FunctionResponse {
            id: call_id,
            name,
            response: FunctionOutput {
                output: content_value(&message.content),
            },
        },
    };

    // Parallel tool results after one multi-call model turn share a turn.
    if folder.open_kind() == Some(OpenKind::ToolResponses) {
        folder.push_parts(vec![part]);
    } else {
        folder.open_turn(OpenKind::ToolResponses, TurnContent::user(vec![part]));
    }
}

fn translate_tool_calls(tool_calls: &[ToolCall]) -> Vec<TurnPart> {
    tool_calls
        .iter()
        .map(|call| {
            let args = match serde_json::from_str::<JsonValue>(&call.function.arguments) {
                Ok(value) => value,
                Err(err) => {
                    debug!(
                        call_id = %call.id,
                        error = %err,
                        "tool-call arguments are not valid JSON, substituting {{}}"
                    );
                    JsonValue::Object(Default::default())
                }
            };
            TurnPart::FunctionCall {
                function_call: FunctionCall {
                    id: call.id.clone(),
                    name: call.function.name.clone(),
                    args,
                },
            }
        })
        .collect()
}

fn assistant_text(content: &MessageContent) -> String {
    match content {
        MessageContent::Text(text) => text.clone(),
        MessageContent::Parts(parts) => parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect(),
    }
}

fn content_value(content: &MessageContent) -> JsonValue {
    serde_json::to_value(content).unwrap_or(JsonValue::Null)
}

/// Completion-style models take one flat prompt string instead of a turn
/// list: system messages end with a blank line, user content is appended
/// as-is, assistant content is wrapped in single newlines.
pub fn fold_completion_prompt(messages: &[ChatMessage]) -> Vec<TurnContent> {
    let mut prompt = String::new();
    for message in messages {
        let text = assistant_text(&message.content);
        match message.role {
            ChatRole::System => {
                prompt.push_str(&text);
                prompt.push_str("\n\n");
            }
            ChatRole::User => prompt.push_str(&text),
            ChatRole::Assistant => {
                prompt.push('\n');
                prompt.push_str(&text);
                prompt.push('\n');
            }
            ChatRole::Tool => {}
        }
    }
    vec![TurnContent::user(vec![TurnPart::text(prompt)])]
}
