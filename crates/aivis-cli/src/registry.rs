//! Provider registry construction from configured API keys.

use std::sync::Arc;

use aivis_core::{AppConfig, CostSink, PriceTable};
use aivis_providers::{
    AnthropicProvider, GeminiProvider, OpenAiProvider, PerplexityProvider, Provider,
    ProviderRegistry, SearchClient,
};

/// Build the registry from whichever provider keys are configured, plus the
/// generator model used for LLM question generation.
///
/// Platforms with no key are simply absent — a scan over a partial registry
/// is a normal, smaller scan. The generator is the first registered
/// provider, preferring OpenAI when available.
///
/// # Errors
///
/// Returns an error only if an HTTP client cannot be constructed.
pub(crate) fn build_registry(
    config: &AppConfig,
    sink: Arc<dyn CostSink>,
    prices: Arc<PriceTable>,
) -> anyhow::Result<(ProviderRegistry, Option<Arc<dyn Provider>>)> {
    let search = match &config.search_api_key {
        Some(key) => Some(Arc::new(
            SearchClient::new(
                key,
                config.provider_timeout_secs,
                config.search_max_retries,
                config.search_backoff_base_ms,
            )
            .map_err(|e| anyhow::anyhow!("search client: {e}"))?,
        )),
        None => None,
    };

    let mut registry = ProviderRegistry::new();
    let mut generator: Option<Arc<dyn Provider>> = None;

    if let Some(key) = &config.openai_api_key {
        let provider: Arc<dyn Provider> = Arc::new(
            OpenAiProvider::new(
                key,
                &config.openai_model,
                config.provider_timeout_secs,
                config.empty_retry_delay_ms,
                Arc::clone(&sink),
                Arc::clone(&prices),
            )
            .map_err(|e| anyhow::anyhow!("openai adapter: {e}"))?,
        );
        generator = Some(Arc::clone(&provider));
        registry = registry.register(provider);
    }

    if let Some(key) = &config.anthropic_api_key {
        let mut provider = AnthropicProvider::new(
            key,
            &config.anthropic_model,
            config.provider_timeout_secs,
            config.empty_retry_delay_ms,
            Arc::clone(&sink),
            Arc::clone(&prices),
        )
        .map_err(|e| anyhow::anyhow!("anthropic adapter: {e}"))?;
        if let Some(search) = &search {
            provider = provider.with_search_fallback(Arc::clone(search), config.search_max_results);
        }
        let provider: Arc<dyn Provider> = Arc::new(provider);
        generator.get_or_insert_with(|| Arc::clone(&provider));
        registry = registry.register(provider);
    }

    if let Some(key) = &config.gemini_api_key {
        let mut provider = GeminiProvider::new(
            key,
            &config.gemini_model,
            config.provider_timeout_secs,
            config.empty_retry_delay_ms,
            Arc::clone(&sink),
            Arc::clone(&prices),
        )
        .map_err(|e| anyhow::anyhow!("gemini adapter: {e}"))?;
        if let Some(search) = &search {
            provider = provider.with_search_fallback(Arc::clone(search), config.search_max_results);
        }
        let provider: Arc<dyn Provider> = Arc::new(provider);
        generator.get_or_insert_with(|| Arc::clone(&provider));
        registry = registry.register(provider);
    }

    if let Some(key) = &config.perplexity_api_key {
        let provider: Arc<dyn Provider> = Arc::new(
            PerplexityProvider::new(
                key,
                &config.perplexity_model,
                config.provider_timeout_secs,
                config.empty_retry_delay_ms,
                Arc::clone(&sink),
                Arc::clone(&prices),
            )
            .map_err(|e| anyhow::anyhow!("perplexity adapter: {e}"))?,
        );
        generator.get_or_insert_with(|| Arc::clone(&provider));
        registry = registry.register(provider);
    }

    Ok((registry, generator))
}
