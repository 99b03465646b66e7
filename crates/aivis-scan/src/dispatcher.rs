//! Probe dispatch: the question → providers fan-out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use aivis_analysis::{analyze_answer, MentionResult};
use aivis_core::{BusinessProfile, ProbeQuestion, RunId};
use aivis_providers::{ProbeContext, ProviderAnswer, ProviderRegistry};

use crate::extract::CompetitorExtractor;

/// Progress callback: `(completed, total)` where
/// `total = questions × providers`. Invoked after each question's providers
/// have all settled; `completed` is monotonically increasing.
pub type ProgressFn = dyn Fn(usize, usize) + Send + Sync;

/// Dispatch knobs. The pacing delay between questions is a deliberate
/// rate-limit posture; the cancellation flag is only consulted between
/// question iterations, never mid-question.
pub struct DispatchOptions {
    pub question_delay: Duration,
    pub cancel: Option<Arc<AtomicBool>>,
    pub on_progress: Option<Arc<ProgressFn>>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            question_delay: Duration::from_millis(400),
            cancel: None,
            on_progress: None,
        }
    }
}

/// Everything a dispatch produced: every answer attempted (errored ones
/// included) and a mention result per usable answer.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub answers: Vec<ProviderAnswer>,
    pub results: Vec<MentionResult>,
}

/// Run every question past every registered provider.
///
/// Per question: one parallel join across all providers, waiting for every
/// call to settle — a single provider's failure never blocks or fails the
/// question, and nothing short-circuits on first success. Questions run
/// sequentially with the configured pacing delay in between. Total
/// exhaustion (every provider errored on every question) is a valid
/// outcome with zero mention results, not an error.
#[allow(clippy::too_many_arguments)]
pub async fn dispatch_probes(
    registry: &ProviderRegistry,
    questions: &[ProbeQuestion],
    profile: &BusinessProfile,
    domain: &str,
    competitor: Option<&str>,
    run_id: RunId,
    extractor: &dyn CompetitorExtractor,
    options: &DispatchOptions,
) -> DispatchOutcome {
    let providers = registry.providers();
    let total = questions.len() * providers.len();
    let mut completed = 0usize;

    let mut answers: Vec<ProviderAnswer> = Vec::with_capacity(total);
    let mut results: Vec<MentionResult> = Vec::new();

    let ctx = ProbeContext::new(run_id, "probe", domain);

    for (index, question) in questions.iter().enumerate() {
        if let Some(cancel) = &options.cancel {
            if cancel.load(Ordering::Relaxed) {
                tracing::info!(
                    completed,
                    total,
                    "cancellation observed between questions — stopping dispatch"
                );
                break;
            }
        }

        if index > 0 && !options.question_delay.is_zero() {
            tokio::time::sleep(options.question_delay).await;
        }

        let settled = join_all(
            providers
                .iter()
                .map(|provider| provider.answer(&question.text, &ctx)),
        )
        .await;

        for answer in settled {
            let answer = answer.with_question_index(index);
            if answer.is_usable() {
                let mut result = analyze_answer(
                    &answer.platform,
                    index,
                    &answer.text,
                    question,
                    domain,
                    profile.business_name.as_deref(),
                    competitor,
                );
                result.competitors = extractor.extract(&answer.text, domain, &ctx).await;
                results.push(result);
            } else {
                tracing::debug!(
                    platform = answer.platform.as_str(),
                    question_index = index,
                    error = ?answer.error,
                    "unusable answer — no mention result"
                );
            }
            answers.push(answer);
        }

        completed += providers.len();
        if let Some(on_progress) = &options.on_progress {
            on_progress(completed, total);
        }
    }

    DispatchOutcome { answers, results }
}
