//! Google Gemini adapter with `google_search` grounding and a
//! retrieval-assisted fallback.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use aivis_core::{CostSink, PriceTable};

use crate::error::ProviderError;
use crate::fallback::{build_fallback_prompt, fallback_sources};
use crate::retry::{complete_with_empty_retry, Completion};
use crate::search::SearchClient;
use crate::traits::Provider;
use crate::types::{record_cost, ProbeContext, ProviderAnswer, Source, TokenUsage};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const PLATFORM: &str = "gemini";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

#[derive(Deserialize)]
struct WebChunk {
    uri: String,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

/// Adapter for the Gemini `generateContent` API.
///
/// The native path grounds answers with the `google_search` tool; grounding
/// is a permissioned feature, so a denial switches the adapter to the
/// retrieval fallback when a search client is configured.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    empty_retry_delay: Duration,
    sink: Arc<dyn CostSink>,
    prices: Arc<PriceTable>,
    search: Option<Arc<SearchClient>>,
    search_count: usize,
}

impl GeminiProvider {
    /// Creates an adapter pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        empty_retry_delay_ms: u64,
        sink: Arc<dyn CostSink>,
        prices: Arc<PriceTable>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            empty_retry_delay: Duration::from_millis(empty_retry_delay_ms),
            sink,
            prices,
            search: None,
            search_count: 5,
        })
    }

    /// Point the adapter at a custom base URL (for testing with wiremock).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    /// Enable the search-assisted fallback path.
    #[must_use]
    pub fn with_search_fallback(mut self, search: Arc<SearchClient>, count: usize) -> Self {
        self.search = Some(search);
        self.search_count = count;
        self
    }

    async fn complete(
        &self,
        prompt: &str,
        ctx: &ProbeContext,
        with_grounding: bool,
    ) -> Result<Completion, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let mut body = json!({
            "contents": [{"parts": [{"text": prompt}]}],
        });
        if with_grounding {
            body["tools"] = json!([{"google_search": {}}]);
        }

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: raw,
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&raw).map_err(|e| ProviderError::Deserialize {
                context: "gemini generateContent response".to_string(),
                source: e,
            })?;

        let usage = parsed.usage_metadata.map(|u| TokenUsage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        });
        record_cost(self.sink.as_ref(), &self.prices, ctx, &self.model, usage).await;

        let candidate = parsed.candidates.into_iter().next();
        let (text, sources) = match candidate {
            Some(c) => {
                let text = c
                    .content
                    .map(|content| {
                        content
                            .parts
                            .iter()
                            .filter_map(|p| p.text.as_deref())
                            .collect::<Vec<_>>()
                            .join("\n")
                    })
                    .unwrap_or_default();
                let sources = c
                    .grounding_metadata
                    .map(|g| {
                        g.grounding_chunks
                            .into_iter()
                            .filter_map(|chunk| chunk.web)
                            .map(|web| Source {
                                url: web.uri,
                                title: web.title,
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                (text, sources)
            }
            None => (String::new(), Vec::new()),
        };

        Ok(Completion {
            text,
            sources,
            usage,
        })
    }

    /// One full attempt: grounded path first, retrieval fallback on a
    /// grounding denial.
    async fn attempt(&self, prompt: &str, ctx: &ProbeContext) -> Result<Completion, ProviderError> {
        match self.complete(prompt, ctx, true).await {
            Ok(completion) => Ok(completion),
            Err(e) if e.is_grounding_denied() => {
                let Some(search) = &self.search else {
                    return Err(e);
                };
                tracing::warn!(
                    platform = PLATFORM,
                    error = %e,
                    "grounding denied — using retrieval fallback"
                );
                let results = search
                    .top_results(prompt, self.search_count)
                    .await
                    .map_err(|err| ProviderError::Search(err.to_string()))?;
                let fallback_prompt = build_fallback_prompt(prompt, &results);
                let mut completion = self.complete(&fallback_prompt, ctx, false).await?;
                completion.sources = fallback_sources(&results);
                Ok(completion)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn platform(&self) -> &str {
        PLATFORM
    }

    async fn answer(&self, prompt: &str, ctx: &ProbeContext) -> ProviderAnswer {
        let started = Instant::now();
        let outcome =
            complete_with_empty_retry(self.empty_retry_delay, || self.attempt(prompt, ctx)).await;

        match outcome {
            Ok(completion) => ProviderAnswer::ok(
                PLATFORM,
                completion.text,
                completion.sources,
                completion.usage,
                started.elapsed(),
            ),
            Err(e) => {
                tracing::warn!(platform = PLATFORM, error = %e, "provider call failed");
                ProviderAnswer::errored(PLATFORM, e.to_string(), started.elapsed())
            }
        }
    }
}
