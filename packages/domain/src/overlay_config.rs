//! Initialization options accepted by the overlay entry point.
use crate::{
    feature_tier::{FeatureSet, FeatureTier},
    language::Language,
    overlay_error::OverlayError,
    voice_name::VoiceName,
};
use serde::{Deserialize, Serialize};

/// Options recognized at initialization.
///
/// Unknown keys are ignored and omitted keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Accent color for the launcher and focus ring.
    pub accent: String,
    /// Distance of the launcher from the bottom edge (CSS length).
    #[serde(alias = "bottom")]
    pub bottom_offset: String,
    /// Distance of the launcher from the inline-end edge (CSS length).
    pub side_offset: String,
    /// Stacking order of the launcher and panel.
    pub z_index: i32,
    /// Preferred synthesis voice, matched by name.
    pub read_voice: Option<VoiceName>,
    /// Feature tier.
    pub tier: FeatureTier,
    /// Recognition language.
    pub language: Language,
    /// CSP nonce for the injected stylesheet.
    pub style_nonce: Option<String>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            accent: "#1e88e5".to_string(),
            bottom_offset: "24px".to_string(),
            side_offset: "24px".to_string(),
            z_index: 999_999,
            read_voice: None,
            tier: FeatureTier::default(),
            language: Language::default(),
            style_nonce: None,
        }
    }
}

impl OverlayConfig {
    /// Parse options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, OverlayError> {
        serde_json::from_str(json).map_err(|e| OverlayError::Config(e.to_string()))
    }

    /// Feature set selected by the tier.
    pub fn features(&self) -> FeatureSet {
        self.tier.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_and_unknown_options() {
        let config = OverlayConfig::from_json(r#"{"zIndex":10,"position":"left"}"#)
            .expect("valid options");
        assert_eq!(config.z_index, 10);
        assert_eq!(config.accent, "#1e88e5");
        assert_eq!(config.bottom_offset, "24px");
        assert_eq!(config.read_voice, None);
    }

    #[test]
    fn legacy_bottom_alias_and_voice() {
        let config =
            OverlayConfig::from_json(r#"{"bottom":"40px","readVoice":"Samantha","tier":"AAA"}"#)
                .expect("valid options");
        assert_eq!(config.bottom_offset, "40px");
        assert_eq!(config.read_voice, Some(VoiceName::new("Samantha")));
        assert_eq!(config.features(), FeatureSet::ALL);
    }

    #[test]
    fn malformed_options_are_a_config_error() {
        let err = OverlayConfig::from_json(r#"{"zIndex":"high"}"#).unwrap_err();
        assert!(matches!(err, OverlayError::Config(_)));
    }
}
