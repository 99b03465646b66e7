//! Employer-research question generation.
//!
//! Every registered provider proposes candidate questions per job family;
//! the candidates are then merged through the deduplicator, so agreement
//! between providers ranks a question higher. Providers that error or
//! return unparsable output simply contribute nothing.

use futures::future::join_all;

use aivis_core::{BusinessProfile, ProbeQuestion, QuestionCategory};
use aivis_providers::{ProbeContext, ProviderRegistry};

use crate::dedup::{dedupe_candidates, CandidateQuestion};
use crate::parse::parse_generated_questions;

const QUESTIONS_PER_PROVIDER: usize = 6;

/// Generate a deduplicated employer-research question set.
///
/// Fans out one candidate-generation call per registered provider, parses
/// each answer leniently (a failed provider is logged and skipped), and
/// reduces the pooled candidates with [`dedupe_candidates`].
pub async fn generate_employer_questions(
    registry: &ProviderRegistry,
    profile: &BusinessProfile,
    job_families: &[String],
    limit: usize,
    ctx: &ProbeContext,
) -> Vec<ProbeQuestion> {
    let prompt = employer_prompt(profile, job_families);

    let answers = join_all(
        registry
            .providers()
            .iter()
            .map(|provider| provider.answer(&prompt, ctx)),
    )
    .await;

    let mut candidates: Vec<CandidateQuestion> = Vec::new();
    for answer in answers {
        if !answer.is_usable() {
            tracing::warn!(
                platform = answer.platform.as_str(),
                error = ?answer.error,
                "employer candidate generation unusable — skipping provider"
            );
            continue;
        }
        match parse_generated_questions(&answer.text) {
            Ok(generated) => {
                candidates.extend(generated.into_iter().map(|q| CandidateQuestion {
                    text: q.text,
                    category: QuestionCategory::RoleInsight,
                    provider: answer.platform.clone(),
                    job_family: q.job_family,
                }));
            }
            Err(failure) => {
                tracing::warn!(
                    platform = answer.platform.as_str(),
                    reason = %failure,
                    "employer candidates unparsable — skipping provider"
                );
            }
        }
    }

    dedupe_candidates(candidates, limit)
}

fn employer_prompt(profile: &BusinessProfile, job_families: &[String]) -> String {
    let company = profile
        .business_name
        .as_deref()
        .unwrap_or(&profile.business_type);
    let mut prompt = format!(
        "Propose {QUESTIONS_PER_PROVIDER} questions a job candidate might ask an AI assistant \
         about working at {company}"
    );
    if !profile.industry.trim().is_empty() {
        prompt.push_str(&format!(" ({} industry)", profile.industry));
    }
    if job_families.is_empty() {
        prompt.push('.');
    } else {
        prompt.push_str(&format!(
            ", covering these job families: {}.",
            job_families.join(", ")
        ));
    }
    prompt.push_str(
        " Respond with only a JSON array of objects, each with \"text\" and \"job_family\".",
    );
    prompt
}
