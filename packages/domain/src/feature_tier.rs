//! Conformance tiers and the optional feature set they select.
use crate::action::Action;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Widget tier, mirroring the A/AA/AAA builds of the overlay.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum FeatureTier {
    /// Text size, theme, dyslexia font, read page/selection.
    A,
    /// Adds read-aloud transport controls and voice commands.
    #[default]
    AA,
    /// Adds focus highlight, big cursor and the advanced voice vocabulary.
    AAA,
}

/// Optional features enabled on top of the core engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSet {
    pub read_controls: bool,
    pub voice_commands: bool,
    pub focus_highlight: bool,
    pub big_cursor: bool,
    pub advanced_voice: bool,
}

impl FeatureSet {
    /// Every optional feature enabled.
    pub const ALL: Self = Self {
        read_controls: true,
        voice_commands: true,
        focus_highlight: true,
        big_cursor: true,
        advanced_voice: true,
    };

    /// Whether `action` is available with this feature set.
    ///
    /// Returns the name of the missing feature otherwise.
    pub fn check(&self, action: &Action) -> Result<(), &'static str> {
        let missing = match action {
            Action::PauseResume | Action::StopRead if !self.read_controls => "read controls",
            Action::ToggleFocusHighlight(_) if !self.focus_highlight => "focus highlight",
            Action::ToggleBigCursor(_) if !self.big_cursor => "big cursor",
            _ => return Ok(()),
        };
        Err(missing)
    }
}

impl From<FeatureTier> for FeatureSet {
    fn from(tier: FeatureTier) -> Self {
        match tier {
            FeatureTier::A => Self {
                read_controls: false,
                voice_commands: false,
                focus_highlight: false,
                big_cursor: false,
                advanced_voice: false,
            },
            FeatureTier::AA => Self {
                read_controls: true,
                voice_commands: true,
                focus_highlight: false,
                big_cursor: false,
                advanced_voice: false,
            },
            FeatureTier::AAA => Self::ALL,
        }
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        FeatureTier::default().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_a_rejects_transport_controls() {
        let features = FeatureSet::from(FeatureTier::A);
        assert_eq!(features.check(&Action::PauseResume), Err("read controls"));
        assert_eq!(features.check(&Action::ReadPage), Ok(()));
    }

    #[test]
    fn tier_aaa_allows_everything() {
        let features = FeatureSet::from(FeatureTier::AAA);
        assert!(features.check(&Action::ToggleBigCursor(None)).is_ok());
        assert!(features.check(&Action::ToggleFocusHighlight(Some(true))).is_ok());
    }
}
