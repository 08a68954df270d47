//! Cabinet Data Model
//!
//! Wire types shared by the API client and the session store. Everything here
//! is backend-sourced and read-only from the client's point of view: the store
//! replaces the [`Session`] wholesale after each write instead of patching it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a connection preset (backend primary key)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetId(pub i64);

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PresetId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// The Telegram user owning the cabinet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name
    pub full_name: String,
    /// Telegram handle without the leading `@`
    #[serde(default)]
    pub username: Option<String>,
}

/// The user's active VPN profile
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Whether the user has an active profile at all
    pub has_profile: bool,
    /// Active protocol name (matches a [`ProtocolDescriptor::name`])
    #[serde(default)]
    pub protocol: Option<String>,
    /// Free-form label attached to the profile
    #[serde(default)]
    pub label: Option<String>,
    /// Active SNI value
    #[serde(default)]
    pub sni: Option<String>,
    /// SNI values the active protocol accepts
    #[serde(default)]
    pub available_snis: Vec<String>,
}

impl Profile {
    /// Whether `protocol` is the active one
    #[must_use]
    pub fn is_active_protocol(&self, protocol: &str) -> bool {
        self.protocol.as_deref() == Some(protocol)
    }

    /// Whether `sni` is the active one
    #[must_use]
    pub fn is_active_sni(&self, sni: &str) -> bool {
        self.sni.as_deref() == Some(sni)
    }
}

/// One entry of the protocol catalog (`GET /protocols`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolDescriptor {
    /// Unique protocol name
    pub name: String,
    /// Human label, if the backend provides one
    #[serde(default)]
    pub label: Option<String>,
    /// Whether the backend recommends this protocol
    #[serde(default)]
    pub recommended: bool,
}

impl ProtocolDescriptor {
    /// Label shown to the user: the explicit label or the uppercased name
    #[must_use]
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.name.to_uppercase())
    }
}

/// Sort a catalog so recommended protocols come first, keeping catalog order otherwise
#[must_use]
pub fn recommended_first(protocols: &[ProtocolDescriptor]) -> Vec<&ProtocolDescriptor> {
    let mut sorted: Vec<&ProtocolDescriptor> = protocols.iter().collect();
    sorted.sort_by_key(|p| !p.recommended);
    sorted
}

/// Client application a preset targets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppType {
    /// V2RayNG / Nekobox
    #[default]
    V2ray,
    /// Clash / Hiddify
    Clash,
}

impl AppType {
    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2ray => "v2ray",
            Self::Clash => "clash",
        }
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format of a preset's configuration string
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetFormat {
    /// A `vless://` share URI
    #[default]
    VlessUri,
}

impl PresetFormat {
    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VlessUri => "vless_uri",
        }
    }
}

impl fmt::Display for PresetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque preset options, passed through untouched
pub type PresetOptions = serde_json::Map<String, serde_json::Value>;

/// A named connection preset
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Backend identifier
    pub id: PresetId,
    /// User-chosen name
    pub name: String,
    /// Target client application
    pub app_type: AppType,
    /// Configuration format
    pub format: PresetFormat,
    /// Opaque options (absent from `/me`)
    #[serde(default)]
    pub options: PresetOptions,
}

/// Body of `POST /presets`: a preset without its id
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewPreset {
    /// Preset name
    pub name: String,
    /// Target client application
    pub app_type: AppType,
    /// Configuration format
    pub format: PresetFormat,
    /// Opaque options
    #[serde(default)]
    pub options: PresetOptions,
}

impl Default for NewPreset {
    fn default() -> Self {
        Self {
            name: "My preset".to_string(),
            app_type: AppType::default(),
            format: PresetFormat::default(),
            options: PresetOptions::new(),
        }
    }
}

impl NewPreset {
    /// Create a draft with the given name and default app/format
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the target application
    #[must_use]
    pub fn with_app_type(mut self, app_type: AppType) -> Self {
        self.app_type = app_type;
        self
    }

    /// Set the output format
    #[must_use]
    pub fn with_format(mut self, format: PresetFormat) -> Self {
        self.format = format;
        self
    }

    /// Copy of this draft with the name trimmed, or `None` if nothing is left
    #[must_use]
    pub fn normalized(&self) -> Option<Self> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            ..self.clone()
        })
    }
}

/// Generated configuration string of a preset (`GET /presets/{id}/config`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetConfig {
    /// Shareable configuration (URI or document)
    pub value: String,
}

/// The authoritative snapshot returned by `GET /me`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Account owner
    pub user: User,
    /// Active VPN profile
    pub profile: Profile,
    /// Presets, in backend order
    #[serde(default)]
    pub presets: Vec<Preset>,
}

impl Session {
    /// Find a preset by id
    #[must_use]
    pub fn preset(&self, id: PresetId) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }
}
