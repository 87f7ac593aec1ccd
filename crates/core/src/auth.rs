use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Bearer token handed out by the token store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
}

/// Credential source the bridge calls out to. Acquisition, rotation and
/// persistence all live behind this trait; the bridge only consumes tokens
/// and reports ones the backend rejects.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Next usable token, or None when the store is empty.
    async fn get_token(&self) -> Option<AccessToken>;

    /// Mark the given token unusable. Called after the backend answers 403.
    async fn disable_current_token(&self, token: &AccessToken);
}
