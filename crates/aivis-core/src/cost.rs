use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::run::RunId;

/// One append-only record of an external model call's token usage and spend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEntry {
    pub run_id: RunId,
    /// Pipeline step label, e.g. `"probe"`, `"question_generation"`.
    pub step: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub estimated_cost_usd: f64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum CostSinkError {
    #[error("cost sink backend error: {0}")]
    Backend(String),
}

/// Append target for [`CostEntry`] rows.
///
/// Writes are best-effort by contract: callers log a sink failure and
/// continue — a cost-tracking problem must never fail the analysis call
/// that produced it. Implementations must tolerate concurrent writers,
/// since all adapters for one question run in parallel.
#[async_trait]
pub trait CostSink: Send + Sync {
    /// Append one entry.
    ///
    /// # Errors
    ///
    /// Returns [`CostSinkError`] if the backend rejects the write. Callers
    /// treat this as a warning, not a failure.
    async fn record(&self, entry: &CostEntry) -> Result<(), CostSinkError>;
}

/// A sink that drops every entry. Used to disable cost tracking in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCostSink;

#[async_trait]
impl CostSink for NoopCostSink {
    async fn record(&self, _entry: &CostEntry) -> Result<(), CostSinkError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_sink_accepts_entries() {
        let sink = NoopCostSink;
        let entry = CostEntry {
            run_id: RunId::new(),
            step: "probe".to_string(),
            model: "gpt-4o-mini".to_string(),
            input_tokens: 120,
            output_tokens: 480,
            estimated_cost_usd: 0.0003,
            recorded_at: Utc::now(),
        };
        assert!(sink.record(&entry).await.is_ok());
    }
}
