//! Root font scale multiplier.
//!
//! Every constructor clamps to [`FontScale::MIN`, `FontScale::MAX`] and rounds
//! to two decimals, so an out-of-range scale can never be observed.
use serde::{Deserialize, Deserializer, Serialize};

/// Font scale between 0.70 and 2.00 (1.00 = host page size).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct FontScale(f64);

impl FontScale {
    /// Smallest allowed scale.
    pub const MIN: f64 = 0.70;
    /// Largest allowed scale.
    pub const MAX: f64 = 2.00;
    /// Increment applied by one step.
    pub const STEP: f64 = 0.10;
    /// Scale at and above which the panel switches to its compact layout.
    pub const COMPACT_THRESHOLD: f64 = 1.75;
    /// Unscaled text.
    pub const DEFAULT: Self = Self(1.0);

    /// Create a scale, clamping and rounding the input.
    ///
    /// Non-finite values repair to the default.
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return Self::DEFAULT;
        }
        let clamped = value.clamp(Self::MIN, Self::MAX);
        Self((clamped * 100.0).round() / 100.0)
    }

    /// Get the scale value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// One step larger, saturating at the maximum.
    pub fn step_up(self) -> Self {
        Self::new(self.0 + Self::STEP)
    }

    /// One step smaller, saturating at the minimum.
    pub fn step_down(self) -> Self {
        Self::new(self.0 - Self::STEP)
    }

    /// Whole percentage, as shown in the panel label.
    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }

    /// Whether the derived compact layout applies.
    pub fn is_compact(self) -> bool {
        self.0 >= Self::COMPACT_THRESHOLD
    }

    /// CSS value for the font-scale custom property.
    pub fn css_value(self) -> String {
        let text = format!("{:.2}", self.0);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

impl Default for FontScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl<'de> Deserialize<'de> for FontScale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Self::new)
    }
}
