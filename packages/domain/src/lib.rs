//! # A11y Overlay Domain
//!
//! Shared domain objects and types for the a11y-overlay engine.
//!
//! This crate holds the plain data the engine passes between its
//! components: the persisted preference record, the Action API vocabulary,
//! feature tiers, initialization options and the error type. It has no
//! platform access.

pub mod action;
pub mod capability;
pub mod feature_tier;
pub mod font_scale;
pub mod language;
pub mod overlay_config;
pub mod overlay_error;
pub mod preference_record;
pub mod speech_status;
pub mod theme;
pub mod voice_name;

// Re-export core types
pub use action::Action;
pub use capability::Capability;
pub use feature_tier::{FeatureSet, FeatureTier};
pub use font_scale::FontScale;
pub use language::Language;
pub use overlay_config::OverlayConfig;
pub use overlay_error::OverlayError;
pub use preference_record::PreferenceRecord;
pub use speech_status::{ListeningStatus, PanelState, UtteranceState};
pub use theme::Theme;
pub use voice_name::VoiceName;

/// Prelude module containing commonly used types.
pub mod prelude {
    pub use crate::{
        Action, Capability, FeatureSet, FeatureTier, FontScale, Language, ListeningStatus,
        OverlayConfig, OverlayError, PanelState, PreferenceRecord, Theme, UtteranceState,
        VoiceName,
    };
}
