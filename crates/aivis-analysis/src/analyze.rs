//! Composition of the individual heuristics into one [`MentionResult`].

use aivis_core::{ProbeQuestion, QuestionCategory};

use crate::competitors::extract_competitors;
use crate::mention::{find_domain_mention, normalize_domain};
use crate::positioning::classify_positioning;
use crate::recognition::{confidence_score, entity_recognized};
use crate::types::{AwarenessSignals, MentionResult, Positioning};

/// Analyze one answer's text into a [`MentionResult`].
///
/// Callers are expected to skip errored answers entirely — an answer with
/// no usable text produces no mention result, not a zeroed one.
///
/// Brand-awareness questions (brand recall, service check, competitor
/// compare) additionally populate [`AwarenessSignals`]; the tested entity
/// defaults to the business name and finally the domain's bare name when
/// the question carries no explicit metadata.
#[must_use]
pub fn analyze_answer(
    platform: &str,
    question_index: usize,
    text: &str,
    question: &ProbeQuestion,
    domain: &str,
    business_name: Option<&str>,
    competitor: Option<&str>,
) -> MentionResult {
    let base = match find_domain_mention(text, domain) {
        Some((_, third)) => MentionResult::mentioned(platform, question_index, third),
        None => MentionResult::not_mentioned(platform, question_index),
    };

    let result = base.with_competitors(extract_competitors(text, domain));

    if !is_awareness_category(question.category) {
        return result;
    }

    let bare_name = normalize_domain(domain).name;
    let entity = question
        .tested_entity
        .as_deref()
        .or(business_name)
        .unwrap_or(&bare_name);

    let recognized = entity_recognized(text, entity, domain);
    let attribute = question.tested_attribute.as_deref();
    let attribute_mentioned = attribute.is_some_and(|attr| {
        !attr.trim().is_empty() && text.to_lowercase().contains(&attr.trim().to_lowercase())
    });
    let confidence = confidence_score(text, recognized, attribute);
    let positioning = competitor.map_or(Positioning::NotCompared, |c| {
        classify_positioning(text, entity, c)
    });

    result.with_awareness(AwarenessSignals {
        entity_recognized: recognized,
        attribute_mentioned,
        confidence,
        positioning,
    })
}

fn is_awareness_category(category: QuestionCategory) -> bool {
    matches!(
        category,
        QuestionCategory::BrandRecall
            | QuestionCategory::ServiceCheck
            | QuestionCategory::CompetitorCompare
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discovery_question() -> ProbeQuestion {
        ProbeQuestion::new(
            "What plumbers do you recommend in Sydney?",
            QuestionCategory::Recommendation,
        )
    }

    fn recall_question() -> ProbeQuestion {
        ProbeQuestion::new(
            "What do you know about Acme at acme.com.au?",
            QuestionCategory::BrandRecall,
        )
        .with_tested_entity("Acme")
    }

    #[test]
    fn discovery_answer_without_mention() {
        let result = analyze_answer(
            "openai",
            0,
            "There are several plumbers in Sydney worth a call.",
            &discovery_question(),
            "acme.com.au",
            Some("Acme"),
            None,
        );
        assert!(!result.mentioned);
        assert!(result.position.is_none());
        assert!(result.awareness.is_none());
    }

    #[test]
    fn discovery_answer_with_mention_sets_position() {
        let result = analyze_answer(
            "openai",
            0,
            "Acme.com.au is a common suggestion for pipe repair in Sydney.",
            &discovery_question(),
            "acme.com.au",
            Some("Acme"),
            None,
        );
        assert!(result.mentioned);
        assert!(result.position.is_some());
    }

    #[test]
    fn recall_question_populates_awareness() {
        let result = analyze_answer(
            "gemini",
            1,
            "Acme is known for pipe repair across Sydney.",
            &recall_question(),
            "acme.com.au",
            Some("Acme"),
            None,
        );
        let awareness = result.awareness.expect("awareness should be populated");
        assert!(awareness.entity_recognized);
        assert!(awareness.confidence >= 50);
        assert_eq!(awareness.positioning, Positioning::NotCompared);
    }

    #[test]
    fn deflecting_recall_answer_scores_zero_confidence() {
        let result = analyze_answer(
            "gemini",
            1,
            "I don't have specific information about Acme.",
            &recall_question(),
            "acme.com.au",
            Some("Acme"),
            None,
        );
        let awareness = result.awareness.expect("awareness should be populated");
        assert!(!awareness.entity_recognized);
        assert_eq!(awareness.confidence, 0);
    }

    #[test]
    fn service_check_tracks_attribute() {
        let question = ProbeQuestion::new(
            "Does Acme at acme.com.au offer pipe repair?",
            QuestionCategory::ServiceCheck,
        )
        .with_tested_entity("Acme")
        .with_tested_attribute("pipe repair");

        let result = analyze_answer(
            "perplexity",
            2,
            "Yes — Acme offers pipe repair and drain cleaning.",
            &question,
            "acme.com.au",
            Some("Acme"),
            None,
        );
        let awareness = result.awareness.expect("awareness should be populated");
        assert!(awareness.attribute_mentioned);
        assert_eq!(awareness.confidence, 75);
    }

    #[test]
    fn competitor_compare_classifies_positioning() {
        let question = ProbeQuestion::new(
            "How does Acme compare to Rival?",
            QuestionCategory::CompetitorCompare,
        )
        .with_tested_entity("Acme");

        let result = analyze_answer(
            "anthropic",
            3,
            "Acme is better at emergency work, while both serve Sydney.",
            &question,
            "acme.com.au",
            Some("Acme"),
            Some("Rival"),
        );
        let awareness = result.awareness.expect("awareness should be populated");
        assert_eq!(awareness.positioning, Positioning::Stronger);
    }
}
