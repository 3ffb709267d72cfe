//! The persisted preference record and its repair rules.

use crate::{font_scale::FontScale, theme::Theme};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User accessibility choices persisted across visits.
///
/// The record is plain data; the Action API is its only writer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRecord {
    /// Root font scale.
    pub font_scale: FontScale,
    /// Color theme.
    pub theme: Theme,
    /// Dyslexia-friendly typography.
    pub dyslexia_font: bool,
    /// Strong focus outline on every focusable element.
    pub focus_highlight: bool,
    /// Enlarged pointer.
    pub big_cursor: bool,
}

impl Default for PreferenceRecord {
    fn default() -> Self {
        Self::with_theme(Theme::Default)
    }
}

/// Wire shape of the stored record.
///
/// Every field is optional and untyped so one bad field never poisons the
/// others. Older widget builds stored `fontSize` as a percentage and used
/// `dyslexia`/`dyslexic` for the typography flag.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StoredPreferences {
    font_scale: Option<Value>,
    font_size: Option<Value>,
    theme: Option<Value>,
    #[serde(alias = "dyslexia", alias = "dyslexic")]
    dyslexia_font: Option<Value>,
    focus_highlight: Option<Value>,
    big_cursor: Option<Value>,
}

impl PreferenceRecord {
    /// Default record with an explicit theme.
    pub const fn with_theme(theme: Theme) -> Self {
        Self {
            font_scale: FontScale::DEFAULT,
            theme,
            dyslexia_font: false,
            focus_highlight: false,
            big_cursor: false,
        }
    }

    /// Serialize the full record.
    pub fn to_json(&self) -> String {
        // A struct of floats, bools and a unit enum always serializes.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }

    /// Parse and repair a stored record.
    ///
    /// Missing, malformed and out-of-range fields fall back to their
    /// defaults. `system_theme` is consulted only when no theme was stored;
    /// a stored but unknown theme repairs to [`Theme::Default`].
    pub fn repair(raw: Option<&str>, system_theme: impl FnOnce() -> Theme) -> Self {
        let stored = match raw.map(serde_json::from_str::<StoredPreferences>) {
            Some(Ok(stored)) => stored,
            Some(Err(e)) => {
                tracing::debug!("discarding malformed preferences: {}", e);
                StoredPreferences::default()
            }
            None => StoredPreferences::default(),
        };

        let font_scale = match (stored.font_scale.as_ref(), stored.font_size.as_ref()) {
            (Some(scale), _) => scale.as_f64().map(FontScale::new),
            (None, Some(percent)) => percent.as_f64().map(|p| FontScale::new(p / 100.0)),
            (None, None) => None,
        }
        .unwrap_or_default();

        let theme = match stored.theme {
            None | Some(Value::Null) => system_theme(),
            Some(Value::String(name)) => Theme::parse_or_default(&name),
            Some(other) => {
                tracing::debug!("repairing non-string theme {}", other);
                Theme::Default
            }
        };

        Self {
            font_scale,
            theme,
            dyslexia_font: flag(stored.dyslexia_font),
            focus_highlight: flag(stored.focus_highlight),
            big_cursor: flag(stored.big_cursor),
        }
    }
}

fn flag(value: Option<Value>) -> bool {
    value.and_then(|v| v.as_bool()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_record_yields_defaults_with_system_theme() {
        let record = PreferenceRecord::repair(None, || Theme::Dark);
        assert_eq!(record, PreferenceRecord::with_theme(Theme::Dark));
    }

    #[test]
    fn corrupt_record_yields_defaults() {
        for raw in ["{not json", "42", "[]", "\"dark\"", ""] {
            let record = PreferenceRecord::repair(Some(raw), || Theme::Default);
            assert_eq!(record, PreferenceRecord::default(), "input {raw:?}");
        }
    }

    #[test]
    fn out_of_range_and_mistyped_fields_are_repaired() {
        let raw = r#"{"fontScale":9,"theme":"neon","dyslexiaFont":"yes","bigCursor":true}"#;
        let record = PreferenceRecord::repair(Some(raw), || Theme::Dark);
        assert_eq!(record.font_scale.value(), 2.0);
        assert_eq!(record.theme, Theme::Default);
        assert!(!record.dyslexia_font);
        assert!(record.big_cursor);
    }

    #[test]
    fn system_theme_not_consulted_when_theme_stored() {
        let record = PreferenceRecord::repair(Some(r#"{"theme":"sepia"}"#), || {
            panic!("system theme queried")
        });
        assert_eq!(record.theme, Theme::Sepia);
    }

    #[test]
    fn legacy_keys_are_understood() {
        let raw = r#"{"fontSize":150,"dyslexic":true}"#;
        let record = PreferenceRecord::repair(Some(raw), || Theme::Default);
        assert_eq!(record.font_scale.value(), 1.5);
        assert!(record.dyslexia_font);
    }

    #[test]
    fn json_round_trip_is_exact() {
        let record = PreferenceRecord {
            font_scale: FontScale::new(1.3),
            theme: Theme::Contrast,
            dyslexia_font: true,
            focus_highlight: true,
            big_cursor: false,
        };
        let json = record.to_json();
        assert!(json.contains("\"fontScale\":1.3"));
        assert!(json.contains("\"theme\":\"contrast\""));
        assert_eq!(PreferenceRecord::repair(Some(&json), || Theme::Dark), record);
    }
}
