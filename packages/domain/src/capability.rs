//! Optional platform capabilities.
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Platform capability the overlay may use when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr)]
pub enum Capability {
    /// Text-to-speech output.
    #[strum(serialize = "speech synthesis")]
    SpeechSynthesis,
    /// Speech-to-text input.
    #[strum(serialize = "speech recognition")]
    SpeechRecognition,
}

impl Capability {
    /// Human-readable notice shown once at the point of use.
    pub const fn notice(self) -> &'static str {
        match self {
            Self::SpeechSynthesis => "Speech synthesis not supported in this browser.",
            Self::SpeechRecognition => "Voice recognition not supported on this device.",
        }
    }
}
