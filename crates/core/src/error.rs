use std::time::Duration;
use thiserror::Error;

/// Error surface of one bridge call.
///
/// Everything here terminates the call before streaming starts; failures
/// discovered mid-stream (undecodable event lines, malformed tool-call
/// arguments) are swallowed with documented fallback values and never
/// surface through this enum.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The token provider had no usable token.
    #[error("no access token available; run the login flow first")]
    Authentication,
    /// Backend returned 403. The current token has been disabled as a side
    /// effect before this error is returned.
    #[error("backend denied access and the current token was disabled: {body}")]
    PermissionDenied { body: String },
    /// Any other non-2xx backend response.
    #[error("backend request failed (status {status}): {body}")]
    Upstream { status: u16, body: String },
    /// Model family that cannot be served through the chat path.
    #[error("unsupported completion model: {model}")]
    UnsupportedModel { model: String },
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http status {status}")]
    HttpStatus {
        status: u16,
        /// Raw upstream body; treat as sensitive when logging.
        body: String,
    },
    #[error("network: {0}")]
    Network(String),
    #[error("connect timeout after {0:?}")]
    ConnectTimeout(Duration),
    #[error("body read error: {0}")]
    BodyRead(String),
    #[error("other: {0}")]
    Other(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
