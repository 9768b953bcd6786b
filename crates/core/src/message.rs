//! Localized user-facing text.
//!
//! The marketplace serves an Arabic/English audience; every message the
//! domain surfaces carries both renderings. Which one is shown is the
//! presentation layer's concern.

use serde::{Deserialize, Serialize};

/// A localized message pair (English and Arabic).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub en: String,
    pub ar: String,
}

impl Message {
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    /// Fallback shown when a service reports a failure without a usable
    /// message of its own.
    pub fn generic_failure() -> Self {
        Self::new(
            "Something went wrong. Please try again.",
            "حدث خطأ ما. يرجى المحاولة مرة أخرى.",
        )
    }
}

impl core::fmt::Display for Message {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.en)
    }
}
