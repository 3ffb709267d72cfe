//! Named operations of the Action API.
use crate::theme::Theme;

/// One operation of the Action API.
///
/// Panel controls and voice commands both resolve to an `Action`, so the
/// two input paths can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    FontPlus,
    FontMinus,
    FontReset,
    SetTheme(Theme),
    /// Flip the dyslexia font, or force it on/off.
    ToggleDyslexia(Option<bool>),
    ToggleFocusHighlight(Option<bool>),
    ToggleBigCursor(Option<bool>),
    ReadPage,
    ReadSelection,
    PauseResume,
    StopRead,
    Open,
    Close,
}

impl Action {
    /// Stable operation name, used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FontPlus => "fontPlus",
            Self::FontMinus => "fontMinus",
            Self::FontReset => "fontReset",
            Self::SetTheme(_) => "setTheme",
            Self::ToggleDyslexia(_) => "toggleDyslexia",
            Self::ToggleFocusHighlight(_) => "toggleFocusHighlight",
            Self::ToggleBigCursor(_) => "toggleBigCursor",
            Self::ReadPage => "readPage",
            Self::ReadSelection => "readSelection",
            Self::PauseResume => "pauseResume",
            Self::StopRead => "stopRead",
            Self::Open => "open",
            Self::Close => "close",
        }
    }

    /// Whether the action writes the preference record.
    pub const fn mutates_preferences(&self) -> bool {
        matches!(
            self,
            Self::FontPlus
                | Self::FontMinus
                | Self::FontReset
                | Self::SetTheme(_)
                | Self::ToggleDyslexia(_)
                | Self::ToggleFocusHighlight(_)
                | Self::ToggleBigCursor(_)
        )
    }
}
