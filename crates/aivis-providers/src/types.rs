use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use aivis_core::{CostEntry, CostSink, PriceTable, RunId};

/// A source cited by a provider answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Token usage reported by the upstream API for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Per-call attribution handed down by the dispatcher: which run this call
/// belongs to, which pipeline step issued it, and the target domain.
#[derive(Debug, Clone)]
pub struct ProbeContext {
    pub run_id: RunId,
    pub step: String,
    pub domain: String,
}

impl ProbeContext {
    #[must_use]
    pub fn new(run_id: RunId, step: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            run_id,
            step: step.into(),
            domain: domain.into(),
        }
    }
}

/// The uniform result of asking one platform one question.
///
/// Created once per (question, platform) dispatch, including fallback
/// attempts, and immutable afterwards. A present `error` means "no usable
/// signal" — callers must not treat it as fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderAnswer {
    pub platform: String,
    /// Index into the run's question set; assigned by the dispatcher.
    pub question_index: usize,
    pub text: String,
    pub sources: Vec<Source>,
    pub latency: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl ProviderAnswer {
    #[must_use]
    pub fn ok(
        platform: impl Into<String>,
        text: String,
        sources: Vec<Source>,
        usage: Option<TokenUsage>,
        latency: Duration,
    ) -> Self {
        Self {
            platform: platform.into(),
            question_index: 0,
            text,
            sources,
            latency,
            error: None,
            usage,
        }
    }

    #[must_use]
    pub fn errored(platform: impl Into<String>, error: String, latency: Duration) -> Self {
        Self {
            platform: platform.into(),
            question_index: 0,
            text: String::new(),
            sources: Vec::new(),
            latency,
            error: Some(error),
            usage: None,
        }
    }

    #[must_use]
    pub fn with_question_index(mut self, index: usize) -> Self {
        self.question_index = index;
        self
    }

    /// True when the answer carries usable text.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.error.is_none() && !self.text.trim().is_empty()
    }
}

/// Best-effort cost recording for one upstream call. A sink failure is
/// logged and swallowed — it must never fail the call that produced the
/// usage numbers.
pub(crate) async fn record_cost(
    sink: &dyn CostSink,
    prices: &PriceTable,
    ctx: &ProbeContext,
    model: &str,
    usage: Option<TokenUsage>,
) {
    let (input_tokens, output_tokens) =
        usage.map_or((0, 0), |u| (u.input_tokens, u.output_tokens));
    let entry = CostEntry {
        run_id: ctx.run_id,
        step: ctx.step.clone(),
        model: model.to_string(),
        input_tokens,
        output_tokens,
        estimated_cost_usd: prices.estimate(model, input_tokens, output_tokens),
        recorded_at: Utc::now(),
    };
    if let Err(e) = sink.record(&entry).await {
        tracing::warn!(model, error = %e, "failed to record cost entry; continuing");
    }
}
