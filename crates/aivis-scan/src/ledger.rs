//! In-memory cost ledger and sink composition.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use aivis_core::{CostEntry, CostSink, CostSinkError, RunId};

/// Append-only in-memory ledger. Every scan run records into one of these
/// so the run's entries can be returned in the outcome; a database sink can
/// be composed alongside it with [`FanoutCostSink`].
///
/// Safe under concurrent writers — all adapters for one question append in
/// parallel.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: Mutex<Vec<CostEntry>>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries recorded so far, in append order.
    #[must_use]
    pub fn entries(&self) -> Vec<CostEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Entries attributed to one run.
    #[must_use]
    pub fn entries_for_run(&self, run_id: RunId) -> Vec<CostEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.run_id == run_id)
            .collect()
    }
}

#[async_trait]
impl CostSink for MemoryLedger {
    async fn record(&self, entry: &CostEntry) -> Result<(), CostSinkError> {
        self.entries
            .lock()
            .map_err(|e| CostSinkError::Backend(e.to_string()))?
            .push(entry.clone());
        Ok(())
    }
}

/// Writes each entry to every composed sink. Individual sink failures are
/// logged and do not stop the others; the overall write only fails when
/// every sink failed.
pub struct FanoutCostSink {
    sinks: Vec<Arc<dyn CostSink>>,
}

impl FanoutCostSink {
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn CostSink>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl CostSink for FanoutCostSink {
    async fn record(&self, entry: &CostEntry) -> Result<(), CostSinkError> {
        let mut failures = 0usize;
        for sink in &self.sinks {
            if let Err(e) = sink.record(entry).await {
                tracing::warn!(error = %e, "cost sink in fan-out failed");
                failures += 1;
            }
        }
        if !self.sinks.is_empty() && failures == self.sinks.len() {
            return Err(CostSinkError::Backend(
                "all fan-out cost sinks failed".to_string(),
            ));
        }
        Ok(())
    }
}
