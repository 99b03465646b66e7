//! Web-search client backing the retrieval-assisted fallback path.
//!
//! Speaks the Brave Search REST shape: `GET /res/v1/web/search?q=...` with
//! an `X-Subscription-Token` header. Only the fields the fallback prompt
//! needs are deserialized.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use serde::Deserialize;

use crate::error::ProviderError;
use crate::retry::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "https://api.search.brave.com";

/// One web result used as retrieved context.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct WebResults {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    web: Option<WebResults>,
}

/// HTTP client for the web-search API.
///
/// Transient failures (429, 5xx, network errors) are retried with
/// exponential back-off and jitter; everything else surfaces immediately
/// as a [`ProviderError`] for the calling adapter to convert.
pub struct SearchClient {
    client: Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl SearchClient {
    /// Creates a client pointed at the production search API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("aivis/0.1 (visibility-scan)")
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            max_retries,
            backoff_base_ms,
        })
    }

    /// Point the client at a custom base URL (for testing with wiremock).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    /// Fetch the top `count` web results for a query.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Api`] on a non-2xx response after retries.
    /// - [`ProviderError::Http`] on network failure after retries.
    /// - [`ProviderError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn top_results(
        &self,
        query: &str,
        count: usize,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
        let url = format!(
            "{}/res/v1/web/search?q={encoded}&count={count}",
            self.base_url
        );

        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header("X-Subscription-Token", &self.api_key)
                    .header("Accept", "application/json")
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    let message = response.text().await.unwrap_or_default();
                    return Err(ProviderError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }
                Ok(response.text().await?)
            }
        })
        .await?;

        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
                context: format!("web search for '{query}'"),
                source: e,
            })?;

        let mut results = parsed.web.map_or_else(Vec::new, |w| w.results);
        results.truncate(count);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_expected_shape() {
        let json = r#"{
            "web": {
                "results": [
                    {"title": "Acme Plumbing", "url": "https://acme.example", "description": "Pipes"},
                    {"title": "DrainPro", "url": "https://drainpro.example"}
                ]
            }
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        let results = parsed.web.unwrap().results;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Acme Plumbing");
        assert_eq!(results[1].description, "");
    }

    #[test]
    fn response_without_web_section_is_empty() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.web.is_none());
    }
}
