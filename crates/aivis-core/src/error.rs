use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read profile file '{path}': {source}")]
    ProfileIo {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse profile file: {0}")]
    ProfileParse(serde_yaml::Error),

    #[error("failed to read price table '{path}': {source}")]
    PricingIo {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse price table: {0}")]
    PricingParse(serde_yaml::Error),

    #[error("invalid run identifier: {0}")]
    InvalidRunId(String),
}
