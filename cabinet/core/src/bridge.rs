//! Host Bridge
//!
//! The embedding environment (the Telegram WebApp) provides identity and
//! presentation hints. Every capability is best-effort: a query that is not
//! supported returns `None` and a host call that fails is simply skipped.
//! Nothing here can fail the app.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Color scheme requested by the host
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Light background
    Light,
    /// Dark background (used when the host says nothing)
    #[default]
    Dark,
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown color scheme: {other}")),
        }
    }
}

/// Capabilities of the embedding host
///
/// All methods are optional: implementations return `None` (or do nothing)
/// when the capability is missing instead of reporting an error.
pub trait HostBridge: Send + Sync {
    /// Tell the host the app has finished its first render
    fn ready(&self) -> Option<()>;

    /// Ask the host to expand the app to full height
    fn expand(&self) -> Option<()>;

    /// Host color scheme, if known
    fn color_scheme(&self) -> Option<ColorScheme>;

    /// Signed init data identifying the user, if the host provides it
    fn init_data(&self) -> Option<String>;
}

/// Running outside any host: every capability is missing
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedHost;

impl HostBridge for DetachedHost {
    fn ready(&self) -> Option<()> {
        None
    }

    fn expand(&self) -> Option<()> {
        None
    }

    fn color_scheme(&self) -> Option<ColorScheme> {
        None
    }

    fn init_data(&self) -> Option<String> {
        None
    }
}

/// A host with fixed values, e.g. taken from the command line
#[derive(Clone, Debug, Default)]
pub struct StaticHost {
    init_data: Option<String>,
    color_scheme: Option<ColorScheme>,
}

impl StaticHost {
    /// Create an empty static host
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide init data
    #[must_use]
    pub fn with_init_data(mut self, init_data: impl Into<String>) -> Self {
        self.init_data = Some(init_data.into());
        self
    }

    /// Provide a color scheme
    #[must_use]
    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = Some(scheme);
        self
    }
}

impl HostBridge for StaticHost {
    fn ready(&self) -> Option<()> {
        Some(())
    }

    fn expand(&self) -> Option<()> {
        Some(())
    }

    fn color_scheme(&self) -> Option<ColorScheme> {
        self.color_scheme
    }

    fn init_data(&self) -> Option<String> {
        self.init_data.clone()
    }
}

/// Run the host start-up handshake and resolve the color scheme
///
/// Calls `ready()` then `expand()`; unsupported calls are logged and ignored.
pub fn prepare_host(host: &dyn HostBridge) -> ColorScheme {
    if host.ready().is_none() {
        tracing::debug!("Host bridge does not support ready()");
    }
    if host.expand().is_none() {
        tracing::debug!("Host bridge does not support expand()");
    }
    host.color_scheme().unwrap_or_default()
}
