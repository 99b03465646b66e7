//! Swappable competitor-extraction strategies.
//!
//! The regex heuristics in `aivis-analysis` are the default. The LLM-backed
//! strategy asks a provider to list competitor names instead; it is
//! narrower by contract (capped at 5 names) and costs a model call per
//! answer, so it is opt-in.

use std::sync::Arc;

use async_trait::async_trait;

use aivis_analysis::{
    context_snippet, extract_competitors, normalize_domain, CompetitorMention, AI_COMPETITOR_CAP,
};
use aivis_providers::{ProbeContext, Provider};

/// Strategy seam for competitor extraction. Implementations must never
/// fail — an extraction problem yields an empty list, not an error.
#[async_trait]
pub trait CompetitorExtractor: Send + Sync {
    async fn extract(
        &self,
        text: &str,
        target_domain: &str,
        ctx: &ProbeContext,
    ) -> Vec<CompetitorMention>;
}

/// Default strategy: the pure regex heuristics, cap 10.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexCompetitorExtractor;

#[async_trait]
impl CompetitorExtractor for RegexCompetitorExtractor {
    async fn extract(
        &self,
        text: &str,
        target_domain: &str,
        _ctx: &ProbeContext,
    ) -> Vec<CompetitorMention> {
        extract_competitors(text, target_domain)
    }
}

/// LLM-backed strategy: asks a provider to list competitor company names
/// found in the answer text, capped at [`AI_COMPETITOR_CAP`].
pub struct LlmCompetitorExtractor {
    provider: Arc<dyn Provider>,
}

impl LlmCompetitorExtractor {
    #[must_use]
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl CompetitorExtractor for LlmCompetitorExtractor {
    async fn extract(
        &self,
        text: &str,
        target_domain: &str,
        ctx: &ProbeContext,
    ) -> Vec<CompetitorMention> {
        let prompt = format!(
            "List the company or business names mentioned in the following text, excluding \
             {target_domain}. Respond with only a JSON array of name strings, at most \
             {AI_COMPETITOR_CAP}.\n\nText:\n{text}"
        );
        let answer = self.provider.answer(&prompt, ctx).await;
        if !answer.is_usable() {
            tracing::warn!(
                platform = answer.platform.as_str(),
                error = ?answer.error,
                "LLM competitor extraction unusable — returning no competitors"
            );
            return Vec::new();
        }

        let names = match parse_name_array(&answer.text) {
            Some(names) => names,
            None => {
                tracing::warn!(
                    platform = answer.platform.as_str(),
                    "LLM competitor extraction unparsable — returning no competitors"
                );
                return Vec::new();
            }
        };

        let base_token = normalize_domain(target_domain).name;
        let mut seen: Vec<String> = Vec::new();
        let mut mentions = Vec::new();
        for name in names {
            if mentions.len() >= AI_COMPETITOR_CAP {
                break;
            }
            let trimmed = name.trim();
            if trimmed.len() < 2 {
                continue;
            }
            let key = trimmed.to_lowercase();
            if key.contains(&base_token) || seen.contains(&key) {
                continue;
            }
            seen.push(key);
            mentions.push(CompetitorMention {
                name: trimmed.to_string(),
                context: context_snippet(text, trimmed).unwrap_or_default(),
            });
        }
        mentions
    }
}

fn parse_name_array(raw: &str) -> Option<Vec<String>> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end < start {
        return None;
    }
    serde_json::from_str::<Vec<String>>(&raw[start..=end]).ok()
}
