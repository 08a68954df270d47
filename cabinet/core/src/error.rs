//! Store Errors
//!
//! What the session store reports to surfaces. Raw [`crate::api::ApiError`]
//! details are logged, never shown: every variant carries a short message
//! meant for the error banner.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The user action an error or outcome belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Initial load of profile and protocol catalog
    Load,
    /// Switch VPN protocol
    SwitchProtocol,
    /// Change SNI
    UpdateSni,
    /// Create a preset
    CreatePreset,
    /// Delete a preset
    DeletePreset,
    /// Fetch a preset's config into the preview
    OpenPreset,
    /// Copy the preview to the clipboard
    CopyPreview,
}

impl ActionKind {
    /// Banner text when the action itself failed
    #[must_use]
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Load => "Could not load data. Try reopening the app.",
            Self::SwitchProtocol => "Could not switch protocol.",
            Self::UpdateSni => "Could not update SNI.",
            Self::CreatePreset => "Could not create preset.",
            Self::DeletePreset => "Could not delete preset.",
            Self::OpenPreset => "Could not fetch the preset config.",
            Self::CopyPreview => "Could not copy to clipboard.",
        }
    }

    /// Banner text after success
    #[must_use]
    pub fn success_message(&self) -> Option<&'static str> {
        match self {
            Self::SwitchProtocol => Some("Protocol switched. Refresh the profile in your VPN app."),
            Self::UpdateSni => Some("SNI updated. Generate a new preset for your apps."),
            Self::CreatePreset => Some("Preset created. Open it to copy the config."),
            Self::DeletePreset => Some("Preset deleted."),
            Self::CopyPreview => Some("Link copied to clipboard."),
            Self::Load | Self::OpenPreset => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Load => "load",
            Self::SwitchProtocol => "switch-protocol",
            Self::UpdateSni => "update-sni",
            Self::CreatePreset => "create-preset",
            Self::DeletePreset => "delete-preset",
            Self::OpenPreset => "open-preset",
            Self::CopyPreview => "copy-preview",
        };
        f.write_str(name)
    }
}

/// Banner text when a write went through but the follow-up `/me` refetch failed
pub const REFRESH_FAILED_MESSAGE: &str =
    "The change was saved, but the profile could not be refreshed.";

/// Errors surfaced by the session store
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StoreError {
    /// The initial load failed; terminal for this session
    #[error("{message}")]
    Load {
        /// Banner text
        message: String,
    },

    /// A single action failed; the user may retry
    #[error("{message}")]
    Action {
        /// Which action failed
        action: ActionKind,
        /// Banner text
        message: String,
    },

    /// Copying to the clipboard failed; informational only
    #[error("{message}")]
    Clipboard {
        /// Banner text
        message: String,
    },
}

impl StoreError {
    /// The terminal load error
    #[must_use]
    pub fn load() -> Self {
        Self::Load {
            message: ActionKind::Load.failure_message().to_string(),
        }
    }

    /// The standard failure for an action
    #[must_use]
    pub fn action(action: ActionKind) -> Self {
        Self::Action {
            action,
            message: action.failure_message().to_string(),
        }
    }

    /// An action whose write succeeded but whose refetch did not
    #[must_use]
    pub fn refresh_failed(action: ActionKind) -> Self {
        Self::Action {
            action,
            message: REFRESH_FAILED_MESSAGE.to_string(),
        }
    }

    /// The clipboard failure
    #[must_use]
    pub fn clipboard() -> Self {
        Self::Clipboard {
            message: ActionKind::CopyPreview.failure_message().to_string(),
        }
    }

    /// Whether the session cannot continue after this error
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Load { .. })
    }
}
