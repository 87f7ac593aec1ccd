//! reqwest-backed `HttpTransport`.
//!
//! Gzip negotiation is delegated to reqwest's `gzip` feature: the client
//! advertises `Accept-Encoding: gzip` and transparently decompresses, so
//! the decoder upstream always sees plain bytes.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::bridge_core::error::TransportError;
use crate::bridge_core::transport::{ByteStream, HttpTransport, TransportConfig};

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn try_new(cfg: &TransportConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder().connect_timeout(cfg.connect_timeout);
        if let Some(timeout) = cfg.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|err| {
            TransportError::Other(format!("reqwest client build failed: {err}"))
        })?;
        Ok(Self { client })
    }

    pub fn new(cfg: &TransportConfig) -> Self {
        match Self::try_new(cfg) {
            Ok(transport) => transport,
            Err(err) => {
                debug!(error = %err, "falling back to reqwest::Client::new");
                Self {
                    client: Client::new(),
                }
            }
        }
    }

    async fn send(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<reqwest::Response, TransportError> {
        let mut request = self.client.post(url);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        let response = request
            .json(body)
            .send()
            .await
            .map_err(|err| map_send_error(err, cfg))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

fn map_send_error(err: reqwest::Error, cfg: &TransportConfig) -> TransportError {
    if err.is_timeout() {
        return TransportError::ConnectTimeout(cfg.connect_timeout);
    }
    TransportError::Network(err.to_string())
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<Value, TransportError> {
        let response = self.send(url, headers, body, cfg).await?;
        response
            .json::<Value>()
            .await
            .map_err(|err| TransportError::BodyRead(err.to_string()))
    }

    async fn post_json_stream(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<ByteStream, TransportError> {
        let response = self.send(url, headers, body, cfg).await?;
        let stream = response
            .bytes_stream()
            .map(|item| item.map_err(|err| TransportError::BodyRead(err.to_string())));
        Ok(Box::pin(stream))
    }
}
