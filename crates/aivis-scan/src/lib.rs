//! The AIVIS scan pipeline: probe dispatch, score aggregation, cost
//! ledgering, and the end-to-end scan runners.
//!
//! Concurrency shape: all providers for one question are invoked as a
//! parallel join and every call settles (success or converted error)
//! before the next question starts; a pacing delay separates questions.
//! The analyzer and aggregator are synchronous and pure — the only
//! suspension points are provider calls and cost-ledger writes.

pub mod aggregate;
pub mod dispatcher;
pub mod error;
pub mod extract;
pub mod ledger;
pub mod runner;

pub use aggregate::build_report;
pub use dispatcher::{dispatch_probes, DispatchOptions, DispatchOutcome, ProgressFn};
pub use error::ScanError;
pub use extract::{CompetitorExtractor, LlmCompetitorExtractor, RegexCompetitorExtractor};
pub use ledger::{FanoutCostSink, MemoryLedger};
pub use runner::{
    run_awareness_scan, run_employer_scan, run_visibility_scan, ScanOutcome, ScanParams,
};
