use thiserror::Error;

/// Internal adapter errors. These never cross the [`crate::Provider`]
/// boundary — the adapter converts them into a [`crate::ProviderAnswer`]
/// with `error` set.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to deserialize response from {context}: {source}")]
    Deserialize {
        context: String,
        source: serde_json::Error,
    },

    #[error("empty answer after {attempts} attempts")]
    EmptyAnswer { attempts: u32 },

    #[error("search error: {0}")]
    Search(String),
}

impl ProviderError {
    /// True when the upstream rejected the native search/grounding feature —
    /// the trigger for the search-assisted fallback path.
    #[must_use]
    pub fn is_grounding_denied(&self) -> bool {
        match self {
            ProviderError::Api { status, message } => {
                *status == 403
                    || message.to_lowercase().contains("permission")
                    || message.to_lowercase().contains("grounding")
                    || message.to_lowercase().contains("tool")
            }
            _ => false,
        }
    }
}
