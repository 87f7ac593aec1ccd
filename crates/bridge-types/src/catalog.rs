use serde::{Deserialize, Serialize};

/// OpenAI-compatible model listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelList {
    /// Always `"list"`.
    pub object: String,
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    /// Always `"model"`.
    pub object: String,
    /// Unix seconds at listing time; the backend does not report one.
    pub created: i64,
    pub owned_by: String,
}
