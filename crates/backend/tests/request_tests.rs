use serde_json::json;

use crate::backend::request::{
    build_request_envelope, resolve_model_name, thinking_enabled, RequestEnvelope,
};
use crate::bridge_core::config::BridgeConfig;
use crate::bridge_core::error::BridgeError;
use crate::bridge_types::chat::{
    ChatMessage, ChatRole, FunctionDefinition, MessageContent, SamplingParameters, ToolDefinition,
};

fn user(text: &str) -> ChatMessage {
    ChatMessage {
        role: ChatRole::User,
        content: MessageContent::Text(text.to_string()),
        tool_calls: None,
        tool_call_id: None,
    }
}

fn envelope_for(model: &str) -> Result<RequestEnvelope, BridgeError> {
    build_request_envelope(
        &BridgeConfig::default(),
        &[user("hi")],
        model,
        &SamplingParameters::default(),
        &[],
    )
}

#[test]
fn thinking_suffix_is_detected_and_stripped() {
    assert!(thinking_enabled("gemini-2.5-flash-thinking"));
    assert_eq!(
        resolve_model_name("gemini-2.5-flash-thinking"),
        "gemini-2.5-flash"
    );
    assert_eq!(resolve_model_name("gemini-2.5-flash"), "gemini-2.5-flash");
}

#[test]
fn allow_listed_models_think_without_the_suffix() {
    assert!(thinking_enabled("gemini-2.5-pro"));
    assert!(thinking_enabled("rev19-uic3-1p"));
    assert!(thinking_enabled("gpt-oss-120b-medium"));
    assert!(thinking_enabled("gemini-3-pro-preview"));
    assert!(!thinking_enabled("gemini-2.5-flash"));
}

#[test]
fn reserved_completion_models_are_rejected() {
    match envelope_for("chat_bison") {
        Err(BridgeError::UnsupportedModel { model }) => assert_eq!(model, "chat_bison"),
        other => panic!("expected UnsupportedModel, got {other:?}"),
    }
    // the suffix strips first, so a tagged name is rejected the same way
    assert!(matches!(
        envelope_for("chat_bison-thinking"),
        Err(BridgeError::UnsupportedModel { .. })
    ));
}

#[test]
fn envelope_carries_the_resolved_model_and_fresh_identifiers() {
    let envelope = envelope_for("gemini-2.5-flash-thinking").expect("envelope builds");
    assert_eq!(envelope.model, "gemini-2.5-flash");
    assert_eq!(envelope.user_agent, "antigravity");
    assert!(envelope.request_id.starts_with("agent-"));
    assert!(envelope.request.session_id.parse::<i64>().expect("i64") < 0);

    let second = envelope_for("gemini-2.5-flash-thinking").expect("envelope builds");
    assert_ne!(envelope.request_id, second.request_id);
    assert_ne!(envelope.request.session_id, second.request.session_id);
}

#[test]
fn tools_and_tool_config_attach_only_when_present() {
    let bare = envelope_for("gemini-2.5-flash").expect("envelope builds");
    assert!(bare.request.tools.is_none());
    assert!(bare.request.tool_config.is_none());

    let tools = vec![ToolDefinition {
        kind: "function".to_string(),
        function: FunctionDefinition {
            name: "lookup".to_string(),
            description: None,
            parameters: json!({"type": "object"}),
        },
    }];
    let with_tools = build_request_envelope(
        &BridgeConfig::default(),
        &[user("hi")],
        "gemini-2.5-flash",
        &SamplingParameters::default(),
        &tools,
    )
    .expect("envelope builds");
    assert_eq!(
        with_tools.request.tools.as_ref().map(|t| t.len()),
        Some(1)
    );
    assert!(with_tools.request.tool_config.is_some());
}

#[test]
fn envelope_serializes_with_camel_case_wire_names() {
    let envelope = envelope_for("gemini-2.5-flash").expect("envelope builds");
    let value = serde_json::to_value(&envelope).expect("serializes");

    let top = value.as_object().expect("object");
    for key in ["project", "requestId", "request", "model", "userAgent"] {
        assert!(top.contains_key(key), "missing {key}");
    }

    let request = value["request"].as_object().expect("object");
    for key in [
        "contents",
        "generationConfig",
        "sessionId",
        "systemInstruction",
    ] {
        assert!(request.contains_key(key), "missing {key}");
    }
    // absent without tools
    assert!(!request.contains_key("tools"));
    assert!(!request.contains_key("toolConfig"));
}

#[test]
fn system_instruction_is_a_user_turn_with_configured_text() {
    let mut cfg = BridgeConfig::default();
    cfg.system_instruction = "be terse".to_string();
    let envelope = build_request_envelope(
        &cfg,
        &[user("hi")],
        "gemini-2.5-flash",
        &SamplingParameters::default(),
        &[],
    )
    .expect("envelope builds");

    let value = serde_json::to_value(&envelope.request.system_instruction).expect("serializes");
    assert_eq!(
        value,
        json!({"role": "user", "parts": [{"text": "be terse"}]})
    );
}
