//! A11y Overlay – public crate root
//! ================================
//! Preference-driven presentation engine for an accessibility overlay.
//!
//! * The **projector** turns a [`PreferenceRecord`] into style hooks on the
//!   document root and restores the host's values on teardown.
//! * The **panel** owns open/close, focus trapping and focus restoration.
//! * The **reader** and **voice** modules wrap platform speech services and
//!   ignore events that belong to canceled utterances or stopped sessions.
//! * The **widget** module lays out the panel controls for a feature tier;
//!   the `web` feature's `init` builds them in the page.
//!
//! Everything platform-facing sits behind a trait so the engine runs headless;
//! the `web` feature provides the browser bindings.
#![deny(unsafe_code)]

/* ────────────────────────  sub-modules  ─────────────────────────────── */
pub mod announcer;
pub mod overlay;
pub mod page_text;
pub mod panel;
pub mod projector;
pub mod reader;
pub mod store;
pub mod styles;
pub mod voice;
pub mod widget;

#[cfg(feature = "web")]
#[allow(unsafe_code)] // `#[wasm_bindgen]` exports expand to unsafe glue
pub mod web;

/* ───────────────────────── re-exports ───────────────────────────────── */
pub use a11y_overlay_domain::{
    Action, Capability, FeatureSet, FeatureTier, FontScale, Language, ListeningStatus,
    OverlayConfig, OverlayError, PanelState, PreferenceRecord, Theme, UtteranceState, VoiceName,
};
pub use announcer::{Announcer, MemoryAnnouncer};
pub use overlay::{Overlay, OverlayBuilder, PlatformEvent};
pub use page_text::{NoText, READ_BUDGET_CHARS, StaticText, TextSource};
pub use panel::{FocusHost, Key, KeyInput, KeyOutcome, PanelController, PanelTransition};
pub use projector::{MemoryDocument, PresentationContext, Projector, RootSnapshot};
pub use reader::{SpeechReader, SpeechSynthesizer, UnsupportedSynthesizer, UtteranceId, VoiceInfo};
pub use store::{KeyValueStore, MemoryStore, PREFERENCES_KEY, PreferenceStore, UnavailableStore};
pub use styles::StyleSheet;
pub use voice::{
    CommandGrammar, RecognitionConfig, SessionId, SpeechRecognizer, UnsupportedRecognizer,
    VoiceCommandInterpreter,
};
pub use widget::{Control, Indicator, Row};

/// Result alias used across the public API.
pub type Result<T> = std::result::Result<T, OverlayError>;

/// Prelude module containing commonly used types.
pub mod prelude {
    pub use crate::{
        Action, Announcer, FocusHost, KeyInput, KeyValueStore, Overlay, OverlayBuilder,
        OverlayConfig, OverlayError, PresentationContext, PreferenceRecord, Result,
        SpeechRecognizer, SpeechSynthesizer, TextSource, Theme,
    };
}
