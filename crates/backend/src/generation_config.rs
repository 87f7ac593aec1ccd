use serde::{Deserialize, Serialize};

use crate::bridge_core::config::SamplingDefaults;
use crate::bridge_types::chat::SamplingParameters;

/// Sentinel tokens generation must stop at.
const STOP_SEQUENCES: [&str; 5] = [
    "<|user|>",
    "<|bot|>",
    "<|context_request|>",
    "<|endoftext|>",
    "<|end_of_turn|>",
];

/// The one model that rejects `thinkingConfig` outright.
const NO_THINKING_CONFIG_MODEL: &str = "gemini-2.5-flash-image";

/// Backend `generationConfig` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub candidate_count: u32,
    pub max_output_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub include_thoughts: bool,
    pub thinking_budget: u32,
}

/// Map caller sampling parameters onto the backend's generation config,
/// falling back to the configured defaults for anything absent.
///
/// `non_chat` yields the bare three-field config some internal models
/// require. For chat models the fixed stop list is attached, plus a
/// `thinkingConfig` unless `actual_model_name` is the known exception.
/// Thinking-enabled claude variants reject `topP`, so it is dropped there.
pub fn build_generation_config(
    parameters: &SamplingParameters,
    defaults: &SamplingDefaults,
    thinking_enabled: bool,
    actual_model_name: &str,
    non_chat: bool,
) -> GenerationConfig {
    let mut config = GenerationConfig {
        temperature: parameters.temperature.unwrap_or(defaults.temperature),
        candidate_count: 1,
        max_output_tokens: parameters.max_tokens.unwrap_or(defaults.max_tokens),
        top_p: None,
        top_k: None,
        stop_sequences: None,
        thinking_config: None,
    };

    if non_chat {
        return config;
    }

    config.top_p = Some(parameters.top_p.unwrap_or(defaults.top_p));
    config.top_k = Some(parameters.top_k.unwrap_or(defaults.top_k));
    config.stop_sequences = Some(STOP_SEQUENCES.iter().map(|s| s.to_string()).collect());

    if actual_model_name != NO_THINKING_CONFIG_MODEL {
        config.thinking_config = Some(ThinkingConfig {
            include_thoughts: thinking_enabled,
            thinking_budget: if thinking_enabled { 1024 } else { 0 },
        });
    }

    if thinking_enabled && actual_model_name.contains("claude") {
        config.top_p = None;
    }

    config
}
