use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::generation_config::{build_generation_config, GenerationConfig};
use crate::backend::prepare_tools::{prepare_tools, FunctionDeclarationGroup, ToolConfig};
use crate::backend::prompt::{fold_messages, TurnContent, TurnPart};
use crate::bridge_core::config::BridgeConfig;
use crate::bridge_core::error::BridgeError;
use crate::bridge_core::ids;
use crate::bridge_types::chat::{ChatMessage, SamplingParameters, ToolDefinition};

/// Models that run with thinking on even without the `-thinking` suffix.
const IMPLICIT_THINKING_MODELS: [&str; 3] =
    ["gemini-2.5-pro", "rev19-uic3-1p", "gpt-oss-120b-medium"];

/// Prefix of internal completion-only models; those cannot be served
/// through the chat path.
const COMPLETION_MODEL_PREFIX: &str = "chat_";

/// Full backend request envelope. All identifiers are freshly generated
/// per call and never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub project: String,
    pub request_id: String,
    pub request: GenerateRequest,
    pub model: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<TurnContent>,
    pub generation_config: GenerationConfig,
    pub session_id: String,
    pub system_instruction: TurnContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<FunctionDeclarationGroup>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_config: Option<ToolConfig>,
}

/// Whether the given (caller-facing) model name runs with thinking on.
pub fn thinking_enabled(model_name: &str) -> bool {
    model_name.ends_with("-thinking")
        || model_name.starts_with("gemini-3-pro-")
        || IMPLICIT_THINKING_MODELS.contains(&model_name)
}

/// Backend model name: the caller-facing name minus the `-thinking` tag.
pub fn resolve_model_name(model_name: &str) -> &str {
    model_name.strip_suffix("-thinking").unwrap_or(model_name)
}

/// Assemble the complete backend envelope for one chat call.
///
/// Fails fast on reserved completion-only model names; no backend traffic
/// happens for those.
pub fn build_request_envelope(
    cfg: &BridgeConfig,
    messages: &[ChatMessage],
    model_name: &str,
    parameters: &SamplingParameters,
    tools: &[ToolDefinition],
) -> Result<RequestEnvelope, BridgeError> {
    let thinking = thinking_enabled(model_name);
    let actual_model = resolve_model_name(model_name);

    if actual_model.starts_with(COMPLETION_MODEL_PREFIX) {
        return Err(BridgeError::UnsupportedModel {
            model: actual_model.to_string(),
        });
    }

    let generation_config =
        build_generation_config(parameters, &cfg.defaults, thinking, actual_model, false);
    let prepared = prepare_tools(tools);

    debug!(
        model = actual_model,
        thinking,
        tools = tools.len(),
        "assembled backend request"
    );

    Ok(RequestEnvelope {
        project: ids::project_id(),
        request_id: ids::request_id(),
        request: GenerateRequest {
            contents: fold_messages(messages, thinking, actual_model),
            generation_config,
            session_id: ids::session_id(),
            system_instruction: TurnContent::user(vec![TurnPart::text(
                cfg.system_instruction.clone(),
            )]),
            tools: prepared.tools,
            tool_config: prepared.tool_config,
        },
        model: actual_model.to_string(),
        user_agent: cfg.api.user_agent.clone(),
    })
}
