//! Terminal Theme
//!
//! Palettes for the two host color schemes, plus a plain theme for
//! `--no-color` and output that is not a terminal.

use cabinet_core::ColorScheme;
use crossterm::style::{Color, Stylize};

// ============================================================================
// Dark Palette
// ============================================================================

/// Titles and active chips - sky blue
pub const DARK_ACCENT: Color = Color::Rgb { r: 120, g: 200, b: 255 };

/// Secondary text - mid grey
pub const DARK_MUTED: Color = Color::Rgb { r: 140, g: 140, b: 140 };

/// Error banner - soft red
pub const DARK_ERROR: Color = Color::Rgb { r: 255, g: 100, b: 100 };

/// Info banner - mint
pub const DARK_INFO: Color = Color::Rgb { r: 130, g: 220, b: 150 };

// ============================================================================
// Light Palette
// ============================================================================

/// Titles and active chips - deep blue
pub const LIGHT_ACCENT: Color = Color::Rgb { r: 0, g: 95, b: 175 };

/// Secondary text - dark grey
pub const LIGHT_MUTED: Color = Color::Rgb { r: 110, g: 110, b: 110 };

/// Error banner - crimson
pub const LIGHT_ERROR: Color = Color::Rgb { r: 190, g: 30, b: 45 };

/// Info banner - forest green
pub const LIGHT_INFO: Color = Color::Rgb { r: 20, g: 130, b: 60 };

/// Colors used by the renderer; `None` leaves text unstyled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    accent: Option<Color>,
    muted: Option<Color>,
    error: Option<Color>,
    info: Option<Color>,
}

impl Theme {
    /// Palette matching the host color scheme
    pub fn for_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Dark => Self {
                accent: Some(DARK_ACCENT),
                muted: Some(DARK_MUTED),
                error: Some(DARK_ERROR),
                info: Some(DARK_INFO),
            },
            ColorScheme::Light => Self {
                accent: Some(LIGHT_ACCENT),
                muted: Some(LIGHT_MUTED),
                error: Some(LIGHT_ERROR),
                info: Some(LIGHT_INFO),
            },
        }
    }

    /// No styling at all
    pub fn plain() -> Self {
        Self {
            accent: None,
            muted: None,
            error: None,
            info: None,
        }
    }

    pub fn accent(&self, text: &str) -> String {
        styled(self.accent, text)
    }

    pub fn muted(&self, text: &str) -> String {
        styled(self.muted, text)
    }

    pub fn error(&self, text: &str) -> String {
        styled(self.error, text)
    }

    pub fn info(&self, text: &str) -> String {
        styled(self.info, text)
    }
}

fn styled(color: Option<Color>, text: &str) -> String {
    match color {
        Some(color) => text.with(color).to_string(),
        None => text.to_string(),
    }
}
