use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ConfigError;

/// Opaque identifier tying answers, mention results, the report, and cost
/// entries to one scan run. A re-scan always gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a run identifier supplied by a caller.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRunId`] for anything that is not a
    /// UUID — the one hard failure the pipeline surfaces below the profile.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| ConfigError::InvalidRunId(raw.to_string()))
    }

    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
