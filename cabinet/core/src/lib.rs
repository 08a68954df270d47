//! Cabinet Core - Headless Session Core for the VPN Cabinet
//!
//! This crate holds everything the VPN cabinet client does apart from drawing
//! it: resolving the user's Telegram init data, talking to the cabinet REST
//! backend, and keeping one authoritative snapshot of the user's profile and
//! presets consistent across user actions. It can drive a CLI, a Telegram
//! WebApp front end, or run headless in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Surfaces                              │
//! │        CLI (cabinet)  ·  WebApp  ·  test harness             │
//! │                  │                    ▲                      │
//! │        operations│                    │ StoreView (watch)    │
//! └──────────────────┼────────────────────┼──────────────────────┘
//!                    ▼                    │
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     SessionStore                             │
//! │   phase · session · protocols · busy token · banners · preview│
//! │                          │                                   │
//! │                    CabinetApi (trait)                        │
//! │                          │                                   │
//! │   HttpApiClient ── AuthBridge ── HostBridge (Telegram)       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`SessionStore`]: the state machine owning the snapshot
//! - [`StoreView`]: what surfaces render, published after every change
//! - [`CabinetApi`] / [`HttpApiClient`]: backend access
//! - [`AuthBridge`] / [`HostBridge`]: identity and host capabilities
//! - [`BusyToken`]: the single-action gate
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use cabinet_core::{AuthBridge, HttpApiClient, SessionStore, StaticHost, load_config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let host = StaticHost::new().with_init_data("query_id=...&hash=...");
//!     let auth = AuthBridge::new(Arc::new(host), config.launch_url.as_deref());
//!     let store = SessionStore::new(HttpApiClient::from_config(&config, auth)?);
//!
//!     store.load().await;
//!     store.switch_protocol("vless").await;
//!     println!("{:?}", store.view().session);
//!     Ok(())
//! }
//! ```
//!
//! # No UI Dependencies
//!
//! Nothing here renders; surfaces are pure functions of [`StoreView`].

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod auth;
pub mod bridge;
pub mod busy;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod model;
pub mod store;

// Re-exports for convenience
pub use api::{ApiError, ApiResult, CabinetApi, HttpApiClient, INIT_DATA_HEADER};
pub use auth::AuthBridge;
pub use bridge::{prepare_host, ColorScheme, DetachedHost, HostBridge, StaticHost};
pub use busy::BusyToken;
pub use clipboard::{Clipboard, FileClipboard, MemoryClipboard};
pub use config::{
    default_config_path, load_config, load_config_from_path, CabinetConfig, ConfigError,
    ConfigOverrides, ConfigSource,
};
pub use error::{ActionKind, StoreError};
pub use model::{
    recommended_first, AppType, NewPreset, Preset, PresetConfig, PresetFormat, PresetId,
    PresetOptions, Profile, ProtocolDescriptor, Session, User,
};
pub use store::{ActionOutcome, IgnoreReason, Phase, PresetPreview, SessionStore, StoreView};
