//! Antigravity backend surface: request translation, stream decoding and
//! the client that ties them to a transport.
//!
//! - prompt.rs: chat-message folding into backend turns
//! - generation_config.rs: sampling-parameter mapping
//! - prepare_tools.rs: tool-declaration translation
//! - request.rs: request envelope assembly
//! - stream_core.rs: streaming event decoder
//! - models.rs: model-listing adapter
//! - error.rs: backend error-body mapping
//! - client.rs: token + transport orchestration

pub mod client;
pub mod error;
pub mod generation_config;
pub mod models;
pub mod prepare_tools;
pub mod prompt;
pub mod request;
pub mod stream_core;

// Re-exports for convenience
pub use client::BackendClient;
pub use request::{build_request_envelope, RequestEnvelope};
pub use stream_core::StreamDecoder;

#[cfg(test)]
#[path = "../tests/prompt_tests.rs"]
mod prompt_tests;

#[cfg(test)]
#[path = "../tests/generation_config_tests.rs"]
mod generation_config_tests;

#[cfg(test)]
#[path = "../tests/prepare_tools_tests.rs"]
mod prepare_tools_tests;

#[cfg(test)]
#[path = "../tests/request_tests.rs"]
mod request_tests;

#[cfg(test)]
#[path = "../tests/stream_core_tests.rs"]
mod stream_core_tests;

#[cfg(test)]
#[path = "../tests/models_tests.rs"]
mod models_tests;

#[cfg(test)]
#[path = "../tests/client_tests.rs"]
mod client_tests;
