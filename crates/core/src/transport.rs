use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;
use serde_json::Value;

use crate::core::error::TransportError;

/// Byte stream yielded by a streaming POST. Chunks arrive in network order
/// and carry no framing guarantees.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Overall request timeout (None = rely on the connect timeout only).
    pub request_timeout: Option<Duration>,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: None,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Minimal HTTP seam the bridge needs: one JSON POST returning a parsed
/// body, one JSON POST returning the raw byte stream. Content-encoding
/// negotiation (gzip) is the implementation's responsibility.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST a JSON body and return the parsed JSON response.
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<Value, TransportError>;

    /// POST a JSON body and return the response body as a byte stream.
    /// Non-2xx statuses surface as `TransportError::HttpStatus` with the
    /// body already read.
    async fn post_json_stream(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<ByteStream, TransportError>;
}
