//! Auth Bridge
//!
//! Resolves the opaque init data sent as `X-Telegram-Init-Data` with every
//! request. Resolution order:
//!
//! 1. init data provided by the host bridge
//! 2. the launch URL's `tgWebAppData` or `initData` query parameter (local development)
//! 3. nothing (the request goes out unauthenticated and the backend decides)

use std::sync::Arc;

use reqwest::Url;

use crate::bridge::{DetachedHost, HostBridge};

/// Query parameters checked on the launch URL, in order
const LAUNCH_PARAMS: [&str; 2] = ["tgWebAppData", "initData"];

/// Source of the authentication token for outgoing requests
#[derive(Clone)]
pub struct AuthBridge {
    host: Arc<dyn HostBridge>,
    launch_url: Option<Url>,
}

impl AuthBridge {
    /// Create a bridge over a host with an optional launch URL
    ///
    /// An unparsable launch URL is treated as absent.
    pub fn new(host: Arc<dyn HostBridge>, launch_url: Option<&str>) -> Self {
        let launch_url = launch_url.and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring malformed launch URL");
                None
            }
        });
        Self { host, launch_url }
    }

    /// A bridge that never yields a token
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(Arc::new(DetachedHost), None)
    }

    /// Resolve the token; empty values count as absent
    #[must_use]
    pub fn token(&self) -> Option<String> {
        if let Some(data) = self.host.init_data().filter(|d| !d.is_empty()) {
            return Some(data);
        }

        let url = self.launch_url.as_ref()?;
        LAUNCH_PARAMS.iter().find_map(|param| {
            url.query_pairs()
                .find(|(key, value)| &**key == *param && !value.is_empty())
                .map(|(_, value)| value.into_owned())
        })
    }
}

impl std::fmt::Debug for AuthBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthBridge")
            .field("has_host_data", &self.host.init_data().is_some())
            .field("launch_url", &self.launch_url.as_ref().map(Url::path))
            .finish()
    }
}
