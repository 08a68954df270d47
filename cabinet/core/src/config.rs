//! Configuration
//!
//! Centralized configuration for the cabinet client, loaded from a TOML file
//! at `~/.config/vpn-cabinet/cabinet.toml`, environment variables and
//! command-line overrides.
//!
//! # Configuration Priority
//!
//! Values are applied with the following priority (highest first):
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "https://vpn.example.org/api"
//! request_timeout_secs = 30
//!
//! [host]
//! init_data = "query_id=...&user=...&hash=..."
//! color_scheme = "light"
//! ```
//!
//! # Environment Variables
//!
//! - `CABINET_API_BASE_URL`: backend base URL
//! - `CABINET_REQUEST_TIMEOUT_SECS`: per-request timeout (0 disables)
//! - `CABINET_INIT_DATA`: init data to authenticate with
//! - `CABINET_LAUNCH_URL`: launch URL carrying `tgWebAppData`/`initData`
//! - `CABINET_COLOR_SCHEME`: `light` or `dark`

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bridge::ColorScheme;

/// Backend used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the effective configuration last came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[api]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiToml {
    /// Backend base URL
    pub base_url: Option<String>,
    /// Per-request timeout in seconds (0 = none)
    pub request_timeout_secs: Option<u64>,
}

/// `[host]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostToml {
    /// Init data to authenticate with
    pub init_data: Option<String>,
    /// Launch URL to read init data from
    pub launch_url: Option<String>,
    /// Preferred color scheme
    pub color_scheme: Option<ColorScheme>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CabinetToml {
    /// API section
    pub api: ApiToml,
    /// Host section
    pub host: HostToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Effective cabinet client configuration
#[derive(Clone, Debug)]
pub struct CabinetConfig {
    /// Backend base URL
    pub base_url: String,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
    /// Init data provided by the host
    pub init_data: Option<String>,
    /// Launch URL used as the development fallback for init data
    pub launch_url: Option<String>,
    /// Color scheme provided by the host
    pub color_scheme: Option<ColorScheme>,
    /// Config file that was loaded, if any
    pub config_file_path: Option<PathBuf>,
    /// Highest-priority layer that contributed a value
    source: ConfigSource,
}

impl Default for CabinetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            init_data: None,
            launch_url: None,
            color_scheme: None,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl CabinetConfig {
    /// Where the configuration last came from
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Check that the base URL is an absolute http(s) URL
    ///
    /// # Errors
    ///
    /// [`ConfigError::ValidationError`] describing the bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            ConfigError::ValidationError(format!("base_url {:?}: {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        Ok(())
    }
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

// =============================================================================
// Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/vpn-cabinet/cabinet.toml` or
/// `~/.config/vpn-cabinet/cabinet.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vpn-cabinet").join("cabinet.toml"))
}

/// Load configuration from the default path and the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<CabinetConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path and the environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<CabinetConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with a custom environment lookup
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<CabinetConfig, ConfigError> {
    let mut config = CabinetConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: CabinetToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut CabinetConfig, toml: &CabinetToml) {
    if let Some(ref base_url) = toml.api.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(secs) = toml.api.request_timeout_secs {
        config.request_timeout = timeout_from_secs(secs);
    }
    if toml.host.init_data.is_some() {
        config.init_data = toml.host.init_data.clone();
    }
    if toml.host.launch_url.is_some() {
        config.launch_url = toml.host.launch_url.clone();
    }
    if toml.host.color_scheme.is_some() {
        config.color_scheme = toml.host.color_scheme;
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut CabinetConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(base_url) = env("CABINET_API_BASE_URL").filter(|v| !v.is_empty()) {
        config.base_url = base_url;
        config.source = ConfigSource::Env;
    }
    if let Some(timeout) = env("CABINET_REQUEST_TIMEOUT_SECS") {
        match timeout.parse::<u64>() {
            Ok(secs) => {
                config.request_timeout = timeout_from_secs(secs);
                config.source = ConfigSource::Env;
            }
            Err(_) => {
                tracing::warn!(value = %timeout, "Ignoring invalid CABINET_REQUEST_TIMEOUT_SECS");
            }
        }
    }
    if let Some(init_data) = env("CABINET_INIT_DATA").filter(|v| !v.is_empty()) {
        config.init_data = Some(init_data);
        config.source = ConfigSource::Env;
    }
    if let Some(launch_url) = env("CABINET_LAUNCH_URL").filter(|v| !v.is_empty()) {
        config.launch_url = Some(launch_url);
        config.source = ConfigSource::Env;
    }
    if let Some(scheme) = env("CABINET_COLOR_SCHEME") {
        match scheme.parse::<ColorScheme>() {
            Ok(scheme) => {
                config.color_scheme = Some(scheme);
                config.source = ConfigSource::Env;
            }
            Err(e) => tracing::warn!(error = %e, "Ignoring invalid CABINET_COLOR_SCHEME"),
        }
    }
}

// =============================================================================
// CLI Overrides
// =============================================================================

/// Values supplied on the command line, applied last
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    init_data: Option<String>,
    launch_url: Option<String>,
}

impl ConfigOverrides {
    /// Create an empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the backend base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Override the request timeout (0 disables)
    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Override the init data
    #[must_use]
    pub fn with_init_data(mut self, init_data: String) -> Self {
        self.init_data = Some(init_data);
        self
    }

    /// Override the launch URL
    #[must_use]
    pub fn with_launch_url(mut self, launch_url: String) -> Self {
        self.launch_url = Some(launch_url);
        self
    }

    /// Apply the overrides to a loaded configuration
    pub fn apply(&self, config: &mut CabinetConfig) {
        let mut applied = false;
        if let Some(ref base_url) = self.base_url {
            config.base_url = base_url.clone();
            applied = true;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout = timeout_from_secs(secs);
            applied = true;
        }
        if self.init_data.is_some() {
            config.init_data = self.init_data.clone();
            applied = true;
        }
        if self.launch_url.is_some() {
            config.launch_url = self.launch_url.clone();
            applied = true;
        }
        if applied {
            config.source = ConfigSource::Cli;
        }
    }
}
