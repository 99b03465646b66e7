//! LLM-driven probe-question generation with deterministic fallback.

use aivis_core::{BusinessProfile, ProbeQuestion};
use aivis_providers::{ProbeContext, Provider};

use crate::parse::{map_category, parse_generated_questions};
use crate::templates::{fallback_questions, interpolate_location};

const GENERATED_QUESTION_TARGET: usize = 12;
const MIN_QUESTIONS_PER_LOCATION: usize = 2;

/// Generate the probe-question set for a core visibility scan.
///
/// Asks the generator model for a question set covering discovery, service,
/// comparison, recommendation, and problem-solving intents, interpolating
/// every configured location. Unusable generator output (an errored answer
/// or unparsable text) falls back to [`fallback_questions`] — logged, never
/// surfaced to the caller as an error.
///
/// Post-processing enforces two guarantees regardless of what the model
/// produced: every general/service/comparison/recommendation question
/// contains a configured location string when the profile has one, and
/// with multiple service locations each location appears in at least two
/// questions.
pub async fn generate_probe_questions(
    generator: &dyn Provider,
    profile: &BusinessProfile,
    competitor: Option<&str>,
    ctx: &ProbeContext,
) -> Vec<ProbeQuestion> {
    let prompt = generation_prompt(profile, competitor);
    let answer = generator.answer(&prompt, ctx).await;

    let mut questions = if answer.is_usable() {
        match parse_generated_questions(&answer.text) {
            Ok(generated) => generated
                .into_iter()
                .map(|q| ProbeQuestion::new(q.text, map_category(q.category.as_deref())))
                .collect(),
            Err(failure) => {
                tracing::warn!(
                    platform = answer.platform.as_str(),
                    reason = %failure,
                    "generator output unparsable — using fallback templates"
                );
                fallback_questions(profile)
            }
        }
    } else {
        tracing::warn!(
            platform = answer.platform.as_str(),
            error = ?answer.error,
            "generator call unusable — using fallback templates"
        );
        fallback_questions(profile)
    };

    repair_location_invariant(&mut questions, profile);
    ensure_location_coverage(&mut questions, profile);
    questions
}

fn generation_prompt(profile: &BusinessProfile, competitor: Option<&str>) -> String {
    let locations = profile.locations();
    let mut prompt = format!(
        "Generate {GENERATED_QUESTION_TARGET} questions a potential customer might ask an AI \
         assistant when looking for a {business_type} business",
        business_type = profile.business_type,
    );
    if !locations.is_empty() {
        prompt.push_str(&format!(" in {}", locations.join(" or ")));
    }
    prompt.push_str(
        ". Cover discovery, specific services, comparisons, recommendations, and \
         problem-solving situations.",
    );
    if !profile.services.is_empty() {
        prompt.push_str(&format!(
            " Relevant services: {}.",
            profile.services.join(", ")
        ));
    }
    if !locations.is_empty() {
        prompt.push_str(&format!(
            " Every question must name one of these locations: {}. \
             Include at least {MIN_QUESTIONS_PER_LOCATION} questions per location.",
            locations.join(", ")
        ));
    }
    if let Some(competitor) = competitor {
        if let Some(name) = &profile.business_name {
            prompt.push_str(&format!(
                " Include one question comparing {name} with {competitor}."
            ));
        }
    }
    prompt.push_str(
        " Respond with only a JSON array of objects, each with \"text\" and \"category\" \
         (one of: general, location, service, comparison, recommendation).",
    );
    prompt
}

/// Append a configured location to any discovery-category question that
/// lacks one. The generator is asked to do this itself; repairing keeps the
/// invariant independent of model compliance.
fn repair_location_invariant(questions: &mut [ProbeQuestion], profile: &BusinessProfile) {
    let locations = profile.locations();
    let Some(primary) = locations.first() else {
        return;
    };

    for question in questions.iter_mut() {
        if !question.category.requires_location() {
            continue;
        }
        let lowered = question.text.to_lowercase();
        let has_location = locations
            .iter()
            .any(|loc| lowered.contains(&loc.to_lowercase()));
        if !has_location {
            question.text = interpolate_location(&question.text, primary);
        }
    }
}

/// With multiple service locations, make sure each one appears in at least
/// [`MIN_QUESTIONS_PER_LOCATION`] questions, topping up from the template
/// set where the generator under-covered a location.
fn ensure_location_coverage(questions: &mut Vec<ProbeQuestion>, profile: &BusinessProfile) {
    let locations = profile.locations();
    if locations.len() < 2 {
        return;
    }

    for location in locations {
        let lowered = location.to_lowercase();
        let count = questions
            .iter()
            .filter(|q| q.text.to_lowercase().contains(&lowered))
            .count();
        if count >= MIN_QUESTIONS_PER_LOCATION {
            continue;
        }

        let business_type = &profile.business_type;
        let service = profile
            .services
            .first()
            .map_or(business_type.as_str(), String::as_str);
        let top_ups = [
            ProbeQuestion::new(
                format!("What are the best {business_type} providers in {location}?"),
                aivis_core::QuestionCategory::General,
            ),
            ProbeQuestion::new(
                format!("Who offers {service} in {location}?"),
                aivis_core::QuestionCategory::Service,
            ),
        ];
        questions.extend(top_ups.into_iter().take(MIN_QUESTIONS_PER_LOCATION - count));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use aivis_core::{QuestionCategory, RunId};
    use aivis_providers::ProviderAnswer;

    use super::*;

    struct StubGenerator {
        reply: Option<String>,
    }

    #[async_trait]
    impl Provider for StubGenerator {
        fn platform(&self) -> &str {
            "stub"
        }

        async fn answer(&self, _prompt: &str, _ctx: &ProbeContext) -> ProviderAnswer {
            match &self.reply {
                Some(text) => {
                    ProviderAnswer::ok("stub", text.clone(), vec![], None, Duration::ZERO)
                }
                None => ProviderAnswer::errored("stub", "down".to_string(), Duration::ZERO),
            }
        }
    }

    fn profile() -> BusinessProfile {
        BusinessProfile {
            business_name: Some("Acme Plumbing".to_string()),
            business_type: "plumbing services".to_string(),
            services: vec!["pipe repair".to_string()],
            location: Some("Sydney, Australia".to_string()),
            service_locations: vec![],
            target_audience: None,
            industry: "home services".to_string(),
            key_phrases: vec![],
        }
        .normalized()
    }

    fn ctx() -> ProbeContext {
        ProbeContext::new(RunId::new(), "question_generation", "acme.com.au")
    }

    #[tokio::test]
    async fn parsed_generator_output_is_used() {
        let generator = StubGenerator {
            reply: Some(
                r#"[{"text": "Who offers pipe repair in Sydney, Australia?", "category": "service"}]"#
                    .to_string(),
            ),
        };
        let questions = generate_probe_questions(&generator, &profile(), None, &ctx()).await;
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].category, QuestionCategory::Service);
    }

    #[tokio::test]
    async fn errored_generator_falls_back_to_templates() {
        let generator = StubGenerator { reply: None };
        let questions = generate_probe_questions(&generator, &profile(), None, &ctx()).await;
        assert_eq!(questions.len(), 10);
        assert!(questions
            .iter()
            .all(|q| q.text.contains("Sydney, Australia")));
    }

    #[tokio::test]
    async fn unparsable_generator_falls_back_to_templates() {
        let generator = StubGenerator {
            reply: Some("I'd be happy to help with plumbing questions!".to_string()),
        };
        let questions = generate_probe_questions(&generator, &profile(), None, &ctx()).await;
        assert_eq!(questions.len(), 10);
    }

    #[tokio::test]
    async fn missing_location_is_repaired() {
        let generator = StubGenerator {
            reply: Some(
                r#"[{"text": "Who offers pipe repair?", "category": "service"},
                    {"text": "What do you know about plumbing?", "category": "general"}]"#
                    .to_string(),
            ),
        };
        let questions = generate_probe_questions(&generator, &profile(), None, &ctx()).await;
        for q in &questions {
            assert!(
                q.text.contains("Sydney, Australia"),
                "location not repaired: {}",
                q.text
            );
        }
    }

    #[tokio::test]
    async fn under_covered_location_is_topped_up() {
        let mut p = profile();
        p.service_locations = vec!["Melbourne, Australia".to_string()];
        let generator = StubGenerator {
            reply: Some(
                r#"[{"text": "Who offers pipe repair in Sydney, Australia?", "category": "service"},
                    {"text": "Best plumbers in Sydney, Australia?", "category": "general"}]"#
                    .to_string(),
            ),
        };
        let questions = generate_probe_questions(&generator, &p, None, &ctx()).await;
        let melbourne = questions
            .iter()
            .filter(|q| q.text.contains("Melbourne, Australia"))
            .count();
        assert!(melbourne >= 2, "Melbourne appears {melbourne} times");
    }
}
