//! Color theme applied through the `data-a11y-theme` attribute.
use crate::overlay_error::OverlayError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// The four supported color themes.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    IntoStaticStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    /// Host page colors.
    #[default]
    Default,
    /// High contrast.
    Contrast,
    /// Light text on a dark background.
    Dark,
    /// Warm low-glare palette.
    Sepia,
}

impl Theme {
    /// Strict parse used at the Action API boundary.
    ///
    /// Unknown names are rejected, never coerced.
    pub fn parse(name: &str) -> Result<Self, OverlayError> {
        Self::from_str(name.trim()).map_err(|_| OverlayError::InvalidTheme(name.to_string()))
    }

    /// Lenient parse used when repairing persisted state.
    pub fn parse_or_default(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    /// Theme matching the system light/dark signal.
    pub const fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Default }
    }

    /// Label used in the theme selector.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Contrast => "High contrast",
            Self::Dark => "Dark",
            Self::Sepia => "Sepia",
        }
    }
}
