//! Anthropic messages-API adapter with native web search and a
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
use crate::types::{record_cost, ProbeContext, ProviderAnswer, TokenUsage};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const PLATFORM: &str = "anthropic";

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

/// Adapter for the Anthropic messages API.
///
/// The native path asks with the web-search tool attached; when the tool is
/// denied (a permissions failure, not a transport error) and a search
/// client is configured, the adapter falls back to retrieved-context
/// answering through the same answer contract.
pub struct AnthropicProvider {
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

impl AnthropicProvider {
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
        with_search_tool: bool,
    ) -> Result<Completion, ProviderError> {
        let url = format!("{}/v1/messages", self.base_url);
        let mut body = json!({
            "model": self.model,
            "max_tokens": 1024,
            "messages": [{"role": "user", "content": prompt}],
        });
        if with_search_tool {
            body["tools"] = json!([{
                "type": "web_search_20250305",
                "name": "web_search",
                "max_uses": 3,
            }]);
        }

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: raw,
            });
        }

        let parsed: MessagesResponse =
            serde_json::from_str(&raw).map_err(|e| ProviderError::Deserialize {
                context: "anthropic messages response".to_string(),
                source: e,
            })?;

        let usage = parsed.usage.map(|u| TokenUsage {
            input_tokens: u.input_tokens,
            output_tokens: u.output_tokens,
        });
        record_cost(self.sink.as_ref(), &self.prices, ctx, &self.model, usage).await;

        let text = parsed
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Completion {
            text,
            sources: Vec::new(),
            usage,
        })
    }

    /// One full attempt: native search-tool path, then the retrieval
    /// fallback when the tool is denied and search is configured.
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
                    "web search tool denied — using retrieval fallback"
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
impl Provider for AnthropicProvider {
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
