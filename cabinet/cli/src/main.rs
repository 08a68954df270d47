//! Cabinet - VPN Cabinet Command Line
//!
//! A terminal surface over `cabinet-core`: it loads the user's cabinet from
//! the backend, runs at most one action and prints the result.
//!
//! # Usage
//!
//! ```bash
//! # Show the cabinet
//! cabinet --init-data "$TG_INIT_DATA" show
//!
//! # Switch protocol
//! cabinet protocol vless
//!
//! # Create a preset and print its config
//! cabinet preset create --name "Phone" --app clash
//! cabinet preset open 7 --copy-to /tmp/phone.txt
//!
//! # Machine-readable output
//! cabinet --json show
//!
//! # Verbose logging
//! RUST_LOG=debug cabinet show
//! ```

mod commands;
mod render;
mod theme;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use cabinet_core::{
    default_config_path, load_config_from_path, prepare_host, AuthBridge, CabinetConfig,
    ConfigOverrides, HttpApiClient, StaticHost,
};

use commands::{Command, Output};

/// Cabinet - manage your VPN profile and connection presets
#[derive(Parser, Debug)]
#[command(name = "cabinet")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "CABINET_CONFIG", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,

    /// Telegram init data used to authenticate
    #[arg(long, value_name = "DATA", global = true)]
    init_data: Option<String>,

    /// WebApp launch URL (init data is read from its query string)
    #[arg(long, value_name = "URL", global = true)]
    launch_url: Option<String>,

    /// Request timeout in seconds (0 disables)
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output (also off when stdout is not a terminal)
    #[arg(long, global = true)]
    no_color: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "CABINET_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    /// Command-line values that override the configuration
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(ref base_url) = self.base_url {
            overrides = overrides.with_base_url(base_url.clone());
        }
        if let Some(secs) = self.timeout {
            overrides = overrides.with_request_timeout_secs(secs);
        }
        if let Some(ref init_data) = self.init_data {
            overrides = overrides.with_init_data(init_data.clone());
        }
        if let Some(ref launch_url) = self.launch_url {
            overrides = overrides.with_launch_url(launch_url.clone());
        }
        overrides
    }
}

/// Initialize logging with the specified level
///
/// Logs go to stderr; stdout is reserved for command output.
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("cabinet={level},cabinet_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Load file and environment configuration, then apply CLI overrides
fn resolve_config(args: &Args) -> Result<CabinetConfig> {
    let path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(path).context("Failed to load configuration")?;
    args.overrides().apply(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    init_logging(&args.log_level);

    let config = resolve_config(&args)?;
    debug!(
        base_url = %config.base_url,
        source = %config.source(),
        "Configuration resolved"
    );

    let mut host = StaticHost::new();
    if let Some(ref init_data) = config.init_data {
        host = host.with_init_data(init_data.clone());
    }
    if let Some(scheme) = config.color_scheme {
        host = host.with_color_scheme(scheme);
    }
    let scheme = prepare_host(&host);

    let auth = AuthBridge::new(Arc::new(host), config.launch_url.as_deref());
    if auth.token().is_none() {
        warn!("No init data configured; the backend will likely reject requests");
    }

    let client = HttpApiClient::from_config(&config, auth).context("Failed to create API client")?;
    info!(base_url = client.base_url(), "Using cabinet backend");

    let output = Output::new(args.json, scheme, args.no_color, io::stdout().is_terminal());

    commands::run(args.command, client, &output).await
}
