//! Platform voice name requested for read-aloud.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceName(pub String);

impl VoiceName {
    /// Create a new voice name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the underlying name.
    pub fn name(&self) -> &str {
        &self.0
    }
}
