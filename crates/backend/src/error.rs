use serde::{Deserialize, Serialize};

use crate::bridge_core::error::{BridgeError, TransportError};

/// Error body shape the backend returns on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendErrorData {
    pub error: BackendErrorInner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendErrorInner {
    pub code: Option<i64>,
    pub message: String,
    pub status: Option<String>,
}

/// Map a transport failure to the bridge error surface. A parseable
/// backend error body contributes its message; otherwise the raw body is
/// carried through.
pub fn map_transport_error(te: TransportError) -> BridgeError {
    match te {
        TransportError::HttpStatus { status, body } => {
            let body = match serde_json::from_str::<BackendErrorData>(&body) {
                Ok(data) => data.error.message,
                Err(_) => body,
            };
            BridgeError::Upstream { status, body }
        }
        other => BridgeError::Transport(other),
    }
}
