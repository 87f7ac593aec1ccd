use chrono::Utc;
use serde_json::Value as JsonValue;

use crate::bridge_types::catalog::{ModelEntry, ModelList};

/// Adapt the backend's `{models: {<id>: {...}}}` listing to the OpenAI
/// list shape, preserving the backend's key order.
pub fn to_model_list(response: &JsonValue) -> ModelList {
    let created = Utc::now().timestamp();
    let data = response
        .get("models")
        .and_then(|v| v.as_object())
        .map(|models| {
            models
                .keys()
                .map(|id| ModelEntry {
                    id: id.clone(),
                    object: "model".to_string(),
                    created,
                    owned_by: "google".to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    ModelList {
        object: "list".to_string(),
        data,
    }
}
