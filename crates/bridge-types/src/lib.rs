//! Shared data model for the bridge's OpenAI-compatible surface.
//!
//! - chat.rs: chat messages, tool declarations, sampling parameters, and
//!   the normalized stream events handed to callers
//! - catalog.rs: the OpenAI model-listing shape

pub mod catalog;
pub mod chat;

pub use catalog::{ModelEntry, ModelList};
pub use chat::{
    ChatMessage, ChatRole, ContentPart, FunctionDefinition, ImageUrl, MessageContent,
    SamplingParameters, StreamEvent, ToolCall, ToolCallFunction, ToolDefinition,
};
