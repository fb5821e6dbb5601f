//! ID types for achievements and other catalog entries.

use serde::{Deserialize, Serialize};

/// Unique identifier for an achievement.
///
/// Achievement ids are stable string keys: they are declared once in the
/// catalog and appear verbatim inside persisted hero records, so they must
/// survive renames of the display title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementId(String);

impl AchievementId {
    /// Creates an achievement ID from a stable key.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AchievementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AchievementId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
