//! HTTP Cabinet API Client
//!
//! reqwest implementation of [`CabinetApi`] against the cabinet REST backend.
//!
//! # Endpoints
//!
//! - `GET /me` - consolidated user/profile/presets snapshot
//! - `GET /protocols` - protocol catalog
//! - `POST /me/protocol`, `POST /me/sni` - profile writes
//! - `GET|POST /presets`, `DELETE /presets/{id}`, `GET /presets/{id}/config` - presets
//!
//! Every request carries `Content-Type: application/json` and, when the
//! [`AuthBridge`] yields a token, the `X-Telegram-Init-Data` header.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::traits::{ApiError, ApiResult, CabinetApi, INIT_DATA_HEADER};
use crate::auth::AuthBridge;
use crate::config::CabinetConfig;
use crate::model::{NewPreset, Preset, PresetConfig, PresetId, ProtocolDescriptor, Session};

/// Cabinet backend client
#[derive(Clone, Debug)]
pub struct HttpApiClient {
    /// Base URL without trailing slash
    base_url: String,
    /// Token source for the init-data header
    auth: AuthBridge,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpApiClient {
    /// Create a client without a request timeout
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, auth: AuthBridge) -> ApiResult<Self> {
        Self::with_timeout(base_url, auth, None)
    }

    /// Create a client with an optional per-request timeout
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn with_timeout(
        base_url: impl Into<String>,
        auth: AuthBridge,
        timeout: Option<Duration>,
    ) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
            http_client,
        })
    }

    /// Create from a loaded [`CabinetConfig`]
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn from_config(config: &CabinetConfig, auth: AuthBridge) -> ApiResult<Self> {
        Self::with_timeout(config.base_url.clone(), auth, config.request_timeout)
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API path
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue one request and return the parsed JSON body
    ///
    /// An empty success body (e.g. `204 No Content`) yields `Value::Null`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] for non-2xx responses, [`ApiError::Transport`] when
    /// no response arrived, [`ApiError::Decode`] for a body that is not JSON.
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> ApiResult<Value> {
        let mut builder = self
            .http_client
            .request(method.clone(), self.url(path))
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.auth.token() {
            builder = builder.header(INIT_DATA_HEADER, token);
        }

        if let Some(body) = body {
            builder = builder.body(serde_json::to_vec(&body)?);
        }

        tracing::debug!(method = %method, path = path, "Cabinet API request");

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %method, path = path, error = %e, "Cabinet API unreachable");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                method = %method,
                path = path,
                status = status.as_u16(),
                "Cabinet API returned an error status"
            );
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Issue one request and decode the body into `T`
    async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ApiResult<T> {
        let value = self.request(method, path, body).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl CabinetApi for HttpApiClient {
    async fn fetch_me(&self) -> ApiResult<Session> {
        self.request_as(Method::GET, "/me", None).await
    }

    async fn fetch_protocols(&self) -> ApiResult<Vec<ProtocolDescriptor>> {
        self.request_as(Method::GET, "/protocols", None).await
    }

    async fn switch_protocol(&self, protocol: &str) -> ApiResult<()> {
        let body = serde_json::json!({ "protocol": protocol });
        self.request(Method::POST, "/me/protocol", Some(body))
            .await
            .map(|_| ())
    }

    async fn update_sni(&self, sni: &str) -> ApiResult<()> {
        let body = serde_json::json!({ "sni": sni });
        self.request(Method::POST, "/me/sni", Some(body))
            .await
            .map(|_| ())
    }

    async fn list_presets(&self) -> ApiResult<Vec<Preset>> {
        self.request_as(Method::GET, "/presets", None).await
    }

    async fn create_preset(&self, preset: &NewPreset) -> ApiResult<Preset> {
        let body = serde_json::to_value(preset)?;
        self.request_as(Method::POST, "/presets", Some(body)).await
    }

    async fn delete_preset(&self, id: PresetId) -> ApiResult<()> {
        self.request(Method::DELETE, &format!("/presets/{id}"), None)
            .await
            .map(|_| ())
    }

    async fn get_preset_config(&self, id: PresetId) -> ApiResult<PresetConfig> {
        self.request_as(Method::GET, &format!("/presets/{id}/config"), None)
            .await
    }
}
