//! Cabinet API Traits
//!
//! The seam between the session store and the backend. The store only ever
//! talks to a [`CabinetApi`]; the HTTP implementation lives in
//! [`super::HttpApiClient`] and tests substitute their own.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{NewPreset, Preset, PresetConfig, PresetId, ProtocolDescriptor, Session};

/// Header carrying the host init data
pub const INIT_DATA_HEADER: &str = "X-Telegram-Init-Data";

/// Any failure of a backend call
///
/// One error type for the whole API surface; `Display` is always a short
/// human-readable message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The backend answered with a non-2xx status
    #[error("{message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body text, or `HTTP <status>` when the body was empty
        message: String,
    },

    /// The request never produced a response
    #[error("{0}")]
    Transport(String),

    /// The response body was not the JSON we expected
    #[error("{0}")]
    Decode(String),
}

impl ApiError {
    /// Build a status error from a response body, synthesizing a message if it is empty
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body.to_string()
        };
        Self::Status { status, message }
    }

    /// HTTP status, if the backend answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Result alias for API calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Backend operations used by the cabinet
///
/// Each call is exactly one request; implementations never retry.
#[async_trait]
pub trait CabinetApi: Send + Sync {
    /// `GET /me`: the full session snapshot
    async fn fetch_me(&self) -> ApiResult<Session>;

    /// `GET /protocols`: the protocol catalog
    async fn fetch_protocols(&self) -> ApiResult<Vec<ProtocolDescriptor>>;

    /// `POST /me/protocol`
    async fn switch_protocol(&self, protocol: &str) -> ApiResult<()>;

    /// `POST /me/sni`
    async fn update_sni(&self, sni: &str) -> ApiResult<()>;

    /// `GET /presets`
    async fn list_presets(&self) -> ApiResult<Vec<Preset>>;

    /// `POST /presets`
    async fn create_preset(&self, preset: &NewPreset) -> ApiResult<Preset>;

    /// `DELETE /presets/{id}`
    async fn delete_preset(&self, id: PresetId) -> ApiResult<()>;

    /// `GET /presets/{id}/config`
    async fn get_preset_config(&self, id: PresetId) -> ApiResult<PresetConfig>;
}

#[async_trait]
impl<T: CabinetApi + ?Sized> CabinetApi for std::sync::Arc<T> {
    async fn fetch_me(&self) -> ApiResult<Session> {
        (**self).fetch_me().await
    }

    async fn fetch_protocols(&self) -> ApiResult<Vec<ProtocolDescriptor>> {
        (**self).fetch_protocols().await
    }

    async fn switch_protocol(&self, protocol: &str) -> ApiResult<()> {
        (**self).switch_protocol(protocol).await
    }

    async fn update_sni(&self, sni: &str) -> ApiResult<()> {
        (**self).update_sni(sni).await
    }

    async fn list_presets(&self) -> ApiResult<Vec<Preset>> {
        (**self).list_presets().await
    }

    async fn create_preset(&self, preset: &NewPreset) -> ApiResult<Preset> {
        (**self).create_preset(preset).await
    }

    async fn delete_preset(&self, id: PresetId) -> ApiResult<()> {
        (**self).delete_preset(id).await
    }

    async fn get_preset_config(&self, id: PresetId) -> ApiResult<PresetConfig> {
        (**self).get_preset_config(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = ApiError::from_status(404, "");
        assert_eq!(err.to_string(), "HTTP 404");
        assert_eq!(err.status(), Some(404));

        let err = ApiError::from_status(403, "{\"detail\":\"Invalid hash\"}");
        assert_eq!(err.to_string(), "{\"detail\":\"Invalid hash\"}");
    }

    #[test]
    fn test_decode_error_from_serde() {
        let err: ApiError = serde_json::from_str::<PresetConfig>("{}").unwrap_err().into();
        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(err.status(), None);
    }
}
