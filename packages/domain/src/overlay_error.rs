//! Unified error for every overlay operation.
use crate::capability::Capability;
use thiserror::Error;

/// Top-level error covering persistence, capability and validation failures.
///
/// None of these are fatal to the host page: the engine recovers from
/// every variant and keeps the overlay usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    /// Durable storage refused a read or write (quota, disabled storage).
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    /// A platform capability is absent on this device.
    #[error("{0} is not supported on this device")]
    Unsupported(Capability),
    /// A theme name that is not one of the four known themes.
    #[error("invalid theme: {0:?}")]
    InvalidTheme(String),
    /// The action belongs to a feature tier that is not enabled.
    #[error("feature disabled: {0}")]
    FeatureDisabled(&'static str),
    /// The document already carries a mounted overlay.
    #[error("overlay already mounted on this document")]
    AlreadyMounted,
    /// Initialization options could not be parsed.
    #[error("configuration: {0}")]
    Config(String),
    /// A platform call failed in a way the engine cannot classify.
    #[error("platform: {0}")]
    Platform(String),
}

impl OverlayError {
    /// Whether this error means a capability is missing rather than broken.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}
