//! Ambient kernel shared by every bridge surface: error taxonomy, the
//! transport abstraction, process configuration, the token-provider seam,
//! and per-request identifier generation.

pub mod auth;
pub mod config;
pub mod error;
pub mod ids;
pub mod transport;

pub use crate::core::auth::{AccessToken, TokenProvider};
pub use crate::core::config::{BridgeConfig, EndpointConfig, SamplingDefaults};
pub use crate::core::error::{BridgeError, TransportError};
pub use crate::core::transport::{ByteStream, HttpTransport, TransportConfig};

#[cfg(test)]
#[path = "../tests/ids_tests.rs"]
mod ids_tests;
