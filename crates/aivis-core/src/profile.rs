use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default business type applied when the upstream profile analysis could not
/// classify the site. Callers can rely on `business_type` being non-empty.
pub const UNKNOWN_BUSINESS_TYPE: &str = "Unknown business type";

const MAX_SERVICES: usize = 10;
const MAX_KEY_PHRASES: usize = 10;

/// A structured snapshot of the business under scan.
///
/// Produced by an upstream profile-analysis step (or loaded from a YAML file
/// for CLI runs) and treated as immutable input for the lifetime of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessProfile {
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub business_type: String,
    /// Ordered by importance; truncated to 10 on load.
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Additional service locations beyond the primary one.
    #[serde(default)]
    pub service_locations: Vec<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub industry: String,
    /// Ordered by importance; truncated to 10 on load.
    #[serde(default)]
    pub key_phrases: Vec<String>,
}

impl BusinessProfile {
    /// Apply the documented defaults: a blank business type becomes
    /// [`UNKNOWN_BUSINESS_TYPE`], blank list entries are dropped, and the
    /// services/key-phrase lists are truncated to their caps.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.business_type.trim().is_empty() {
            self.business_type = UNKNOWN_BUSINESS_TYPE.to_string();
        }
        self.services.retain(|s| !s.trim().is_empty());
        self.services.truncate(MAX_SERVICES);
        self.key_phrases.retain(|p| !p.trim().is_empty());
        self.key_phrases.truncate(MAX_KEY_PHRASES);
        self.service_locations.retain(|l| !l.trim().is_empty());
        if let Some(loc) = &self.location {
            if loc.trim().is_empty() {
                self.location = None;
            }
        }
        self
    }

    /// All configured locations: the primary location followed by any
    /// additional service locations, case-insensitively deduplicated in
    /// first-seen order.
    #[must_use]
    pub fn locations(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        let candidates = self
            .location
            .iter()
            .map(String::as_str)
            .chain(self.service_locations.iter().map(String::as_str));
        for loc in candidates {
            if !seen.iter().any(|s| s.eq_ignore_ascii_case(loc)) {
                seen.push(loc);
            }
        }
        seen
    }

    /// True when at least one location is configured.
    #[must_use]
    pub fn has_location(&self) -> bool {
        !self.locations().is_empty()
    }
}

/// Load a business profile from a YAML file and apply the documented defaults.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed. Missing
/// optional fields are not errors; the loader never fails on an incomplete
/// profile.
pub fn load_profile(path: &Path) -> Result<BusinessProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let profile: BusinessProfile =
        serde_yaml::from_str(&content).map_err(ConfigError::ProfileParse)?;

    Ok(profile.normalized())
}
