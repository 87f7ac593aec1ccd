use std::sync::Arc;

use futures_util::StreamExt;
use serde_json::json;
use tracing::{debug, warn};

use crate::backend::error::map_transport_error;
use crate::backend::models::to_model_list;
use crate::backend::request::RequestEnvelope;
use crate::backend::stream_core::StreamDecoder;
use crate::bridge_core::auth::{AccessToken, TokenProvider};
use crate::bridge_core::config::BridgeConfig;
use crate::bridge_core::error::{BridgeError, TransportError};
use crate::bridge_core::transport::{HttpTransport, TransportConfig};
use crate::bridge_types::catalog::ModelList;
use crate::bridge_types::chat::StreamEvent;

const TRACE_PREFIX: &str = "[ANTIGRAVITY]";

/// Client for one backend deployment. Each call acquires a token, posts,
/// and (for generation) decodes the response stream into the caller's
/// callback. No state is shared between calls.
pub struct BackendClient<T: HttpTransport = crate::reqwest_transport::ReqwestTransport> {
    cfg: BridgeConfig,
    transport_cfg: TransportConfig,
    http: T,
    tokens: Arc<dyn TokenProvider>,
}

impl<T: HttpTransport> BackendClient<T> {
    pub fn new(cfg: BridgeConfig, http: T, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            cfg,
            transport_cfg: TransportConfig::default(),
            http,
            tokens,
        }
    }

    pub fn with_transport_config(mut self, transport_cfg: TransportConfig) -> Self {
        self.transport_cfg = transport_cfg;
        self
    }

    async fn acquire_token(&self) -> Result<AccessToken, BridgeError> {
        match self.tokens.get_token().await {
            Some(token) if !token.access_token.is_empty() => Ok(token),
            _ => Err(BridgeError::Authentication),
        }
    }

    fn request_headers(&self, token: &AccessToken) -> Vec<(String, String)> {
        vec![
            ("Host".to_string(), self.cfg.api.host.clone()),
            ("User-Agent".to_string(), self.cfg.api.user_agent.clone()),
            (
                "Authorization".to_string(),
                format!("Bearer {}", token.access_token),
            ),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]
    }

    /// Handle a 403 by disabling the token that earned it.
    async fn forbidden(&self, token: &AccessToken, body: String) -> BridgeError {
        self.tokens.disable_current_token(token).await;
        warn!("{} backend answered 403, current token disabled", TRACE_PREFIX);
        BridgeError::PermissionDenied { body }
    }

    /// Stream one generation. Events reach `on_event` synchronously, in
    /// decode order; the call returns once the backend closes the stream.
    pub async fn generate(
        &self,
        envelope: &RequestEnvelope,
        mut on_event: impl FnMut(StreamEvent),
    ) -> Result<(), BridgeError> {
        let token = self.acquire_token().await?;
        let body = serde_json::to_value(envelope)?;
        debug!(
            "{} POST {} model={}",
            TRACE_PREFIX, self.cfg.api.url, envelope.model
        );

        let mut stream = match self
            .http
            .post_json_stream(
                &self.cfg.api.url,
                &self.request_headers(&token),
                &body,
                &self.transport_cfg,
            )
            .await
        {
            Ok(stream) => stream,
            Err(TransportError::HttpStatus { status: 403, body }) => {
                return Err(self.forbidden(&token, body).await);
            }
            Err(other) => return Err(map_transport_error(other)),
        };

        let mut decoder = StreamDecoder::new();
        while let Some(chunk) = stream.next().await {
            decoder.push(&chunk?, &mut on_event);
        }

        if decoder.discarded_lines() > 0 {
            debug!(
                "{} dropped {} undecodable stream lines",
                TRACE_PREFIX,
                decoder.discarded_lines()
            );
        }
        if decoder.pending_tool_calls() > 0 {
            warn!(
                "{} stream ended without a finish signal; {} buffered tool calls dropped",
                TRACE_PREFIX,
                decoder.pending_tool_calls()
            );
        }
        Ok(())
    }

    /// Fetch the backend's model catalog in the OpenAI list shape.
    pub async fn list_models(&self) -> Result<ModelList, BridgeError> {
        let token = self.acquire_token().await?;
        let response = match self
            .http
            .post_json(
                &self.cfg.api.models_url,
                &self.request_headers(&token),
                &json!({}),
                &self.transport_cfg,
            )
            .await
        {
            Ok(value) => value,
            Err(TransportError::HttpStatus { status: 403, body }) => {
                return Err(self.forbidden(&token, body).await);
            }
            Err(other) => return Err(map_transport_error(other)),
        };
        Ok(to_model_list(&response))
    }
}
