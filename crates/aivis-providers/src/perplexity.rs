//! Perplexity adapter. Search is native to the platform, so there is no
//! fallback path; citations come back as sources.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use aivis_core::{CostSink, PriceTable};

use crate::error::ProviderError;
use crate::retry::{complete_with_empty_retry, Completion};
use crate::traits::Provider;
use crate::types::{record_cost, ProbeContext, ProviderAnswer, Source, TokenUsage};

const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";
const PLATFORM: &str = "perplexity";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Vec<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Adapter for the Perplexity chat API (OpenAI-compatible shape plus a
/// top-level `citations` array).
pub struct PerplexityProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    empty_retry_delay: Duration,
    sink: Arc<dyn CostSink>,
    prices: Arc<PriceTable>,
}

impl PerplexityProvider {
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
        })
    }

    /// Point the adapter at a custom base URL (for testing with wiremock).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    async fn complete(
        &self,
        prompt: &str,
        ctx: &ProbeContext,
    ) -> Result<Completion, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
                context: "perplexity chat completion".to_string(),
                source: e,
            })?;

        let usage = parsed.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });
        record_cost(self.sink.as_ref(), &self.prices, ctx, &self.model, usage).await;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        let sources = parsed
            .citations
            .into_iter()
            .map(|url| Source { url, title: None })
            .collect();

        Ok(Completion {
            text,
            sources,
            usage,
        })
    }
}

#[async_trait]
impl Provider for PerplexityProvider {
    fn platform(&self) -> &str {
        PLATFORM
    }

    async fn answer(&self, prompt: &str, ctx: &ProbeContext) -> ProviderAnswer {
        let started = Instant::now();
        let outcome =
            complete_with_empty_retry(self.empty_retry_delay, || self.complete(prompt, ctx)).await;

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
