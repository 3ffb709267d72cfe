//! Panel layout shared by every front end.
//!
//! The browser bindings build their DOM from [`layout`], and clicks come back
//! as a [`Control`] looked up by element id, so the rows shown for a tier and
//! the operations they run are decided here rather than in the bindings.

use a11y_overlay_domain::{Action, FeatureSet, PreferenceRecord, Theme};

/// Ids of the nodes the widget creates.
pub mod ids {
    pub const LAUNCHER: &str = "a11y-launcher";
    pub const PANEL: &str = "a11y-panel";
    pub const LIVE_REGION: &str = "a11y-live";
    pub const SCALE_LABEL: &str = "a11y-scale";
    pub const VOICE_STATUS: &str = "a11y-voice-status";
    pub const THEME_SELECT: &str = "a11y-theme";
}

/// Event fired on `document` once the widget is mounted.
pub const READY_EVENT: &str = "A11yWidgetReady";

/// A button in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    FontMinus,
    FontPlus,
    FontReset,
    Dyslexia,
    FocusHighlight,
    BigCursor,
    ReadPage,
    ReadSelection,
    PauseResume,
    StopRead,
    VoiceToggle,
}

impl Control {
    pub const ALL: [Self; 11] = [
        Self::FontMinus,
        Self::FontPlus,
        Self::FontReset,
        Self::Dyslexia,
        Self::FocusHighlight,
        Self::BigCursor,
        Self::ReadPage,
        Self::ReadSelection,
        Self::PauseResume,
        Self::StopRead,
        Self::VoiceToggle,
    ];

    /// Element id of the button.
    pub const fn id(self) -> &'static str {
        match self {
            Self::FontMinus => "a11y-font-minus",
            Self::FontPlus => "a11y-font-plus",
            Self::FontReset => "a11y-font-reset",
            Self::Dyslexia => "a11y-dyslexia",
            Self::FocusHighlight => "a11y-focus-highlight",
            Self::BigCursor => "a11y-big-cursor",
            Self::ReadPage => "a11y-read-page",
            Self::ReadSelection => "a11y-read-selection",
            Self::PauseResume => "a11y-pause-resume",
            Self::StopRead => "a11y-stop",
            Self::VoiceToggle => "a11y-voice",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|control| control.id() == id)
    }

    /// Accessible name (`aria-label` and `title`).
    pub const fn label(self) -> &'static str {
        match self {
            Self::FontMinus => "Decrease text size",
            Self::FontPlus => "Increase text size",
            Self::FontReset => "Reset text size",
            Self::Dyslexia => "Toggle dyslexia-friendly font",
            Self::FocusHighlight => "Toggle focus highlight",
            Self::BigCursor => "Toggle big cursor",
            Self::ReadPage => "Read the page",
            Self::ReadSelection => "Read selected text",
            Self::PauseResume => "Pause or resume reading",
            Self::StopRead => "Stop reading",
            Self::VoiceToggle => "Start or stop voice recognition",
        }
    }

    /// Visible button text.
    pub const fn text(self) -> &'static str {
        match self {
            Self::FontMinus => "\u{2212}",
            Self::FontPlus => "+",
            Self::FontReset => "Reset",
            Self::Dyslexia | Self::FocusHighlight | Self::BigCursor => "Toggle",
            Self::ReadPage => "Read",
            Self::ReadSelection => "Read selection",
            Self::PauseResume => "Pause/Resume",
            Self::StopRead => "Stop",
            Self::VoiceToggle => "Start/Stop",
        }
    }

    /// The Action API operation behind the button.
    ///
    /// `None` for the voice toggle, which is not part of the Action API.
    pub const fn action(self) -> Option<Action> {
        Some(match self {
            Self::FontMinus => Action::FontMinus,
            Self::FontPlus => Action::FontPlus,
            Self::FontReset => Action::FontReset,
            Self::Dyslexia => Action::ToggleDyslexia(None),
            Self::FocusHighlight => Action::ToggleFocusHighlight(None),
            Self::BigCursor => Action::ToggleBigCursor(None),
            Self::ReadPage => Action::ReadPage,
            Self::ReadSelection => Action::ReadSelection,
            Self::PauseResume => Action::PauseResume,
            Self::StopRead => Action::StopRead,
            Self::VoiceToggle => return None,
        })
    }

    pub const fn is_toggle(self) -> bool {
        matches!(self, Self::Dyslexia | Self::FocusHighlight | Self::BigCursor)
    }

    /// `aria-pressed` for toggle buttons, `None` for plain buttons.
    pub const fn pressed(self, record: &PreferenceRecord) -> Option<bool> {
        match self {
            Self::Dyslexia => Some(record.dyslexia_font),
            Self::FocusHighlight => Some(record.focus_highlight),
            Self::BigCursor => Some(record.big_cursor),
            _ => None,
        }
    }
}

/// Status text shown at the end of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Font scale percentage pill.
    ScaleLabel,
    /// Voice status chip ("Idle", "Listening…").
    VoiceStatus,
}

impl Indicator {
    pub const fn id(self) -> &'static str {
        match self {
            Self::ScaleLabel => ids::SCALE_LABEL,
            Self::VoiceStatus => ids::VOICE_STATUS,
        }
    }
}

/// One labelled row of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub heading: &'static str,
    pub controls: Vec<Control>,
    /// The theme row holds the selector instead of buttons.
    pub theme_select: bool,
    pub indicator: Option<Indicator>,
}

impl Row {
    fn buttons(heading: &'static str, controls: Vec<Control>) -> Self {
        Self {
            heading,
            controls,
            theme_select: false,
            indicator: None,
        }
    }

    fn with_indicator(mut self, indicator: Indicator) -> Self {
        self.indicator = Some(indicator);
        self
    }
}

pub const PANEL_TITLE: &str = "Accessibility";
pub const LAUNCHER_LABEL: &str = "Open accessibility menu";
pub const PANEL_NOTE: &str =
    "Prefs saved to your browser. Voice features depend on device support.";

/// Options of the theme selector as `(value, label)`.
pub fn theme_options() -> [(&'static str, &'static str); 4] {
    [Theme::Default, Theme::Contrast, Theme::Dark, Theme::Sepia]
        .map(|theme| (theme.into(), theme.label()))
}

/// Rows in display order for a feature set.
pub fn layout(features: FeatureSet) -> Vec<Row> {
    let mut rows = vec![
        Row::buttons(
            "Text size",
            vec![Control::FontMinus, Control::FontPlus, Control::FontReset],
        )
        .with_indicator(Indicator::ScaleLabel),
        Row {
            heading: "Theme",
            controls: Vec::new(),
            theme_select: true,
            indicator: None,
        },
        Row::buttons("Dyslexia-friendly font", vec![Control::Dyslexia]),
    ];
    if features.focus_highlight {
        rows.push(Row::buttons("Focus highlight", vec![Control::FocusHighlight]));
    }
    if features.big_cursor {
        rows.push(Row::buttons("Big cursor", vec![Control::BigCursor]));
    }

    let mut read = vec![Control::ReadPage, Control::ReadSelection];
    if features.read_controls {
        read.extend([Control::PauseResume, Control::StopRead]);
    }
    rows.push(Row::buttons("Read aloud", read));

    if features.voice_commands {
        rows.push(
            Row::buttons("Voice commands (beta)", vec![Control::VoiceToggle])
                .with_indicator(Indicator::VoiceStatus),
        );
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use a11y_overlay_domain::FeatureTier;
    use std::collections::HashSet;

    fn controls(features: FeatureSet) -> Vec<Control> {
        layout(features).into_iter().flat_map(|row| row.controls).collect()
    }

    #[test]
    fn ids_are_unique_and_round_trip() {
        let mut seen = HashSet::new();
        for control in Control::ALL {
            assert!(seen.insert(control.id()), "duplicate id {}", control.id());
            assert_eq!(Control::from_id(control.id()), Some(control));
        }
        assert!(!seen.contains(ids::THEME_SELECT));
        assert_eq!(Control::from_id("a11y-panel"), None);
    }

    #[test]
    fn tier_a_has_no_transport_or_voice() {
        let shown = controls(FeatureTier::A.into());
        assert!(shown.contains(&Control::ReadPage));
        assert!(!shown.contains(&Control::PauseResume));
        assert!(!shown.contains(&Control::VoiceToggle));
        assert!(
            layout(FeatureTier::A.into())
                .iter()
                .all(|row| row.indicator != Some(Indicator::VoiceStatus))
        );
    }

    #[test]
    fn tier_aaa_shows_every_control() {
        let shown = controls(FeatureTier::AAA.into());
        for control in Control::ALL {
            assert!(shown.contains(&control), "{control:?} missing");
        }
        assert_eq!(layout(FeatureTier::AAA.into()).iter().filter(|r| r.theme_select).count(), 1);
    }

    #[test]
    fn every_shown_action_passes_the_feature_gate() {
        for tier in [FeatureTier::A, FeatureTier::AA, FeatureTier::AAA] {
            let features = FeatureSet::from(tier);
            for control in controls(features) {
                if let Some(action) = control.action() {
                    assert!(features.check(&action).is_ok(), "{tier}: {control:?}");
                }
            }
        }
    }

    #[test]
    fn theme_options_parse_back() {
        let options = theme_options();
        assert_eq!(options[1], ("contrast", "High contrast"));
        for (value, _) in options {
            assert!(Theme::parse(value).is_ok(), "{value}");
        }
    }

    #[test]
    fn only_toggles_report_pressed() {
        let record = PreferenceRecord {
            big_cursor: true,
            ..PreferenceRecord::default()
        };
        assert_eq!(Control::BigCursor.pressed(&record), Some(true));
        assert_eq!(Control::Dyslexia.pressed(&record), Some(false));
        assert_eq!(Control::FontPlus.pressed(&record), None);
        for control in Control::ALL {
            assert_eq!(control.is_toggle(), control.pressed(&record).is_some());
        }
    }
}
