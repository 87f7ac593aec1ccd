use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::bridge_types::chat::ToolDefinition;

/// Backend-shaped tool declarations plus the calling-mode config. Both are
/// absent when the request carries no tools.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedTools {
    pub tools: Option<Vec<FunctionDeclarationGroup>>,
    pub tool_config: Option<ToolConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDeclarationGroup {
    pub function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    pub function_calling_config: FunctionCallingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallingConfig {
    pub mode: String,
}

impl ToolConfig {
    pub fn validated() -> Self {
        Self {
            function_calling_config: FunctionCallingConfig {
                mode: "VALIDATED".to_string(),
            },
        }
    }
}

/// Translate OpenAI function declarations into the backend's shape.
///
/// The backend rejects the JSON-Schema `$schema` meta key, so it is
/// removed from a cloned copy; the caller's tool objects are never touched.
pub fn prepare_tools(tools: &[ToolDefinition]) -> PreparedTools {
    if tools.is_empty() {
        return PreparedTools {
            tools: None,
            tool_config: None,
        };
    }

    let groups = tools
        .iter()
        .map(|tool| {
            let mut parameters = tool.function.parameters.clone();
            if let Some(map) = parameters.as_object_mut() {
                map.remove("$schema");
            }
            FunctionDeclarationGroup {
                function_declarations: vec![FunctionDeclaration {
                    name: tool.function.name.clone(),
                    description: tool.function.description.clone(),
                    parameters,
                }],
            }
        })
        .collect();

    PreparedTools {
        tools: Some(groups),
        tool_config: Some(ToolConfig::validated()),
    }
}
