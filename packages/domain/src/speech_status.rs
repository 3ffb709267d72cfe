//! Transient state of the panel and the two speech resources.

/// Visibility of the overlay panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

/// Recognition session status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListeningStatus {
    #[default]
    Idle,
    Listening,
}

impl ListeningStatus {
    /// Indicator label shown next to the voice control.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Listening => "Listening…",
        }
    }
}

/// Synthesis status of the single audible utterance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UtteranceState {
    #[default]
    Idle,
    Speaking,
    Paused,
}

impl UtteranceState {
    /// Start a new utterance; any previous one has already been canceled.
    pub const fn begin(self) -> Self {
        Self::Speaking
    }

    /// Pause if speaking.
    pub const fn pause(self) -> Self {
        match self {
            Self::Speaking => Self::Paused,
            other => other,
        }
    }

    /// Resume if paused.
    pub const fn resume(self) -> Self {
        match self {
            Self::Paused => Self::Speaking,
            other => other,
        }
    }

    /// Utterance ended or was canceled.
    pub const fn finish(self) -> Self {
        Self::Idle
    }

    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }
}
