//! BCP-47 language tag used for recognition (e.g. "en-US").
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(pub Cow<'static, str>);

impl Language {
    /// Create a new language tag.
    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self(code.into())
    }

    /// Get the underlying language code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// English (US)
    pub const ENGLISH_US: Self = Self(Cow::Borrowed("en-US"));

    /// English (UK)
    pub const ENGLISH_UK: Self = Self(Cow::Borrowed("en-GB"));
}

impl Default for Language {
    fn default() -> Self {
        Self::ENGLISH_US
    }
}
