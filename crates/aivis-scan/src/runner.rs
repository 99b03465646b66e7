//! End-to-end scan runners.
//!
//! A run owns one profile snapshot, one question set, every answer and
//! mention result, one report, and the cost entries it generated. Runs are
//! immutable once the report is built; a re-scan is a new run with a fresh
//! id.

use std::sync::Arc;

use serde::Serialize;

use aivis_analysis::MentionResult;
use aivis_core::{BusinessProfile, CostEntry, ProbeQuestion, RunId, VisibilityReport};
use aivis_providers::{ProbeContext, Provider, ProviderAnswer, ProviderRegistry};
use aivis_questions::{awareness_questions, fallback_questions, generate_employer_questions};

use crate::aggregate::build_report;
use crate::dispatcher::{dispatch_probes, DispatchOptions};
use crate::error::ScanError;
use crate::extract::{CompetitorExtractor, RegexCompetitorExtractor};
use crate::ledger::MemoryLedger;

/// The full output of one run.
#[derive(Debug, Serialize)]
pub struct ScanOutcome {
    pub run_id: RunId,
    pub questions: Vec<ProbeQuestion>,
    pub answers: Vec<ProviderAnswer>,
    pub results: Vec<MentionResult>,
    pub report: VisibilityReport,
    pub cost_entries: Vec<CostEntry>,
}

/// Everything a scan needs, injected by the caller.
pub struct ScanParams<'a> {
    pub registry: &'a ProviderRegistry,
    /// Generator model for the LLM question path; `None` goes straight to
    /// the deterministic templates.
    pub generator: Option<&'a dyn Provider>,
    pub profile: &'a BusinessProfile,
    pub domain: &'a str,
    pub competitor: Option<&'a str>,
    pub run_id: RunId,
    /// The run's in-memory ledger; its entries for this run are returned in
    /// the outcome. Adapters must have been built with a sink that includes
    /// this ledger.
    pub ledger: Option<Arc<MemoryLedger>>,
    /// Extraction strategy override; defaults to the regex heuristics.
    pub extractor: Option<Arc<dyn CompetitorExtractor>>,
    pub options: DispatchOptions,
}

impl<'a> ScanParams<'a> {
    fn extractor(&self) -> Arc<dyn CompetitorExtractor> {
        self.extractor
            .as_ref()
            .map_or_else(|| Arc::new(RegexCompetitorExtractor) as Arc<dyn CompetitorExtractor>, Arc::clone)
    }

    fn cost_entries(&self) -> Vec<CostEntry> {
        self.ledger
            .as_ref()
            .map_or_else(Vec::new, |ledger| ledger.entries_for_run(self.run_id))
    }
}

/// Run a core visibility scan: generate the probe set (LLM path with
/// template fallback), dispatch it across every registered provider, and
/// aggregate the results.
///
/// # Errors
///
/// Returns [`ScanError::NoProviders`] when the registry is empty. All
/// downstream failures degrade into partial or zeroed results.
pub async fn run_visibility_scan(params: ScanParams<'_>) -> Result<ScanOutcome, ScanError> {
    if params.registry.is_empty() {
        return Err(ScanError::NoProviders);
    }

    let questions = match params.generator {
        Some(generator) => {
            let ctx = ProbeContext::new(params.run_id, "question_generation", params.domain);
            aivis_questions::generate_probe_questions(
                generator,
                params.profile,
                params.competitor,
                &ctx,
            )
            .await
        }
        None => fallback_questions(params.profile),
    };

    dispatch_and_aggregate(params, questions).await
}

/// Run a brand-awareness scan: one brand-recall question, service checks
/// for the top services, and a competitor comparison when one is known.
///
/// # Errors
///
/// Returns [`ScanError::NoProviders`] when the registry is empty.
pub async fn run_awareness_scan(params: ScanParams<'_>) -> Result<ScanOutcome, ScanError> {
    if params.registry.is_empty() {
        return Err(ScanError::NoProviders);
    }

    let questions = awareness_questions(params.profile, params.domain, params.competitor);
    dispatch_and_aggregate(params, questions).await
}

/// Run an employer-research scan: every provider proposes role-insight
/// candidates for the given job families, the deduplicated set is
/// dispatched like any other probe set.
///
/// # Errors
///
/// Returns [`ScanError::NoProviders`] when the registry is empty.
pub async fn run_employer_scan(
    params: ScanParams<'_>,
    job_families: &[String],
    question_limit: usize,
) -> Result<ScanOutcome, ScanError> {
    if params.registry.is_empty() {
        return Err(ScanError::NoProviders);
    }

    let ctx = ProbeContext::new(params.run_id, "employer_questions", params.domain);
    let questions = generate_employer_questions(
        params.registry,
        params.profile,
        job_families,
        question_limit,
        &ctx,
    )
    .await;

    dispatch_and_aggregate(params, questions).await
}

async fn dispatch_and_aggregate(
    params: ScanParams<'_>,
    questions: Vec<ProbeQuestion>,
) -> Result<ScanOutcome, ScanError> {
    tracing::info!(
        run_id = %params.run_id,
        domain = params.domain,
        question_count = questions.len(),
        provider_count = params.registry.len(),
        "dispatching probes"
    );

    let extractor = params.extractor();
    let outcome = dispatch_probes(
        params.registry,
        &questions,
        params.profile,
        params.domain,
        params.competitor,
        params.run_id,
        extractor.as_ref(),
        &params.options,
    )
    .await;

    let report = build_report(&outcome.answers, &outcome.results, &questions);

    tracing::info!(
        run_id = %params.run_id,
        overall_score = report.overall_score,
        total_probes = report.total_probes,
        total_mentions = report.total_mentions,
        "scan complete"
    );

    Ok(ScanOutcome {
        run_id: params.run_id,
        cost_entries: params.cost_entries(),
        questions,
        answers: outcome.answers,
        results: outcome.results,
        report,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use aivis_core::QuestionCategory;

    use super::*;

    struct StubProvider {
        platform: &'static str,
        reply: Option<&'static str>,
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn platform(&self) -> &str {
            self.platform
        }

        async fn answer(&self, _prompt: &str, _ctx: &ProbeContext) -> ProviderAnswer {
            match self.reply {
                Some(text) => ProviderAnswer::ok(
                    self.platform,
                    text.to_string(),
                    vec![],
                    None,
                    Duration::ZERO,
                ),
                None => {
                    ProviderAnswer::errored(self.platform, "down".to_string(), Duration::ZERO)
                }
            }
        }
    }

    fn profile() -> BusinessProfile {
        BusinessProfile {
            business_name: Some("Acme Plumbing".to_string()),
            business_type: "plumbing services".to_string(),
            services: vec!["pipe repair".to_string(), "drain cleaning".to_string()],
            location: Some("Sydney, Australia".to_string()),
            service_locations: vec![],
            target_audience: None,
            industry: "home services".to_string(),
            key_phrases: vec![],
        }
        .normalized()
    }

    fn params<'a>(registry: &'a ProviderRegistry, profile: &'a BusinessProfile) -> ScanParams<'a> {
        ScanParams {
            registry,
            generator: None,
            profile,
            domain: "acme.com.au",
            competitor: None,
            run_id: RunId::new(),
            ledger: None,
            extractor: None,
            options: DispatchOptions {
                question_delay: Duration::ZERO,
                cancel: None,
                on_progress: None,
            },
        }
    }

    #[tokio::test]
    async fn empty_registry_is_a_config_error() {
        let registry = ProviderRegistry::new();
        let profile = profile();
        let result = run_visibility_scan(params(&registry, &profile)).await;
        assert!(matches!(result, Err(ScanError::NoProviders)));
    }

    #[tokio::test]
    async fn template_scan_produces_full_outcome() {
        let registry = ProviderRegistry::new()
            .register(Arc::new(StubProvider {
                platform: "openai",
                reply: Some("Acme.com.au comes up often for plumbing in Sydney."),
            }))
            .register(Arc::new(StubProvider {
                platform: "gemini",
                reply: Some("Plenty of plumbers serve Sydney."),
            }));
        let profile = profile();

        let outcome = run_visibility_scan(params(&registry, &profile)).await.unwrap();
        assert_eq!(outcome.questions.len(), 10);
        assert_eq!(outcome.answers.len(), 20);
        assert_eq!(outcome.results.len(), 20);
        // openai always mentions, gemini never: 100 and 0, overall 50.
        assert_eq!(outcome.report.overall_score, 50);
        let openai = outcome
            .report
            .platforms
            .iter()
            .find(|p| p.platform == "openai")
            .unwrap();
        assert_eq!(openai.score, 100);
    }

    #[tokio::test]
    async fn awareness_scan_reports_knowledge_gaps() {
        // The platform recognizes Acme and confirms pipe repair but never
        // mentions drain cleaning.
        let registry = ProviderRegistry::new().register(Arc::new(StubProvider {
            platform: "openai",
            reply: Some("Acme Plumbing is known for pipe repair across Sydney."),
        }));
        let profile = profile();

        let outcome = run_awareness_scan(params(&registry, &profile)).await.unwrap();
        assert!(outcome
            .questions
            .iter()
            .any(|q| q.category == QuestionCategory::BrandRecall));
        assert_eq!(outcome.report.knowledge_gaps, vec!["drain cleaning"]);
    }

    #[tokio::test]
    async fn total_exhaustion_yields_zeroed_report_not_error() {
        let registry = ProviderRegistry::new().register(Arc::new(StubProvider {
            platform: "openai",
            reply: None,
        }));
        let profile = profile();

        let outcome = run_visibility_scan(params(&registry, &profile)).await.unwrap();
        assert_eq!(outcome.report.overall_score, 0);
        assert_eq!(outcome.report.total_probes, 10);
        assert!(outcome.report.competitors.is_empty());
        assert!(outcome.results.is_empty());
    }
}
