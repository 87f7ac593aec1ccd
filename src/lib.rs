//! OpenAI-compatible protocol bridge for the Antigravity generative backend.
//!
//! The crate translates an OpenAI-shaped chat request (messages, tools,
//! sampling parameters) into the backend's nested envelope, posts it, and
//! decodes the backend's `data:`-line event stream back into normalized
//! text / thinking / tool-call events.

#[path = "../crates/bridge-types/src/lib.rs"]
pub mod types;
#[path = "../crates/core/src/lib.rs"]
pub mod core;
#[path = "../crates/backend/src/lib.rs"]
pub mod backend;
#[path = "../crates/transports/reqwest/src/lib.rs"]
pub mod transport_reqwest;

pub mod transports {
    pub use crate::transport_reqwest as reqwest;
}

// Convenience re-exports of the main surface
pub use crate::backend::client::BackendClient;
pub use crate::backend::request::{build_request_envelope, RequestEnvelope};
pub use crate::backend::stream_core::StreamDecoder;
pub use crate::core::auth::{AccessToken, TokenProvider};
pub use crate::core::config::BridgeConfig;
pub use crate::core::error::{BridgeError, TransportError};
pub use crate::types::chat::{ChatMessage, StreamEvent};

pub(crate) use crate::core as bridge_core;
pub(crate) use crate::transport_reqwest as reqwest_transport;
pub(crate) use crate::types as bridge_types;
