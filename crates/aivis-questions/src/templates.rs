//! Deterministic fallback question templates.
//!
//! Used whenever generator output cannot be parsed. Pure substitution over
//! `business_type`/`service`/`location` — no external call, always exactly
//! ten questions, and every question carries a location string when the
//! profile has one.

use aivis_core::{BusinessProfile, ProbeQuestion, QuestionCategory};

/// Number of questions the fallback generator always produces.
pub const FALLBACK_QUESTION_COUNT: usize = 10;

/// Build the fixed fallback set for a profile.
///
/// With multiple configured locations the templates cycle through them, so
/// every location appears at least twice for up to five locations.
#[must_use]
pub fn fallback_questions(profile: &BusinessProfile) -> Vec<ProbeQuestion> {
    let business_type = profile.business_type.as_str();
    let service = profile
        .services
        .first()
        .map_or(business_type, String::as_str);
    let locations = profile.locations();

    let templates: [(String, QuestionCategory); FALLBACK_QUESTION_COUNT] = [
        (
            format!("What are the best {business_type} providers"),
            QuestionCategory::General,
        ),
        (
            format!("Who offers {service}"),
            QuestionCategory::Service,
        ),
        (
            format!("Can you recommend a reliable {business_type} company"),
            QuestionCategory::Recommendation,
        ),
        (
            format!("How do I choose between {business_type} companies"),
            QuestionCategory::Comparison,
        ),
        (
            format!("I need {service} urgently. Who should I contact"),
            QuestionCategory::General,
        ),
        (
            format!("Which companies provide {service}"),
            QuestionCategory::Service,
        ),
        (
            format!("What does {service} typically cost"),
            QuestionCategory::General,
        ),
        (
            format!("Who are the most trusted {business_type} providers"),
            QuestionCategory::Recommendation,
        ),
        (
            format!("How do {business_type} companies compare on price and quality"),
            QuestionCategory::Comparison,
        ),
        (
            format!("Where can I find reviews of {business_type} companies"),
            QuestionCategory::General,
        ),
    ];

    templates
        .into_iter()
        .enumerate()
        .map(|(i, (stem, category))| {
            let text = if locations.is_empty() {
                format!("{stem}?")
            } else {
                let location = locations[i % locations.len()];
                format!("{stem} in {location}?")
            };
            ProbeQuestion::new(text, category)
        })
        .collect()
}

/// Append a location to a question, keeping the trailing question mark in
/// place. Used by the generator to repair questions that dropped the
/// required location.
#[must_use]
pub fn interpolate_location(text: &str, location: &str) -> String {
    let trimmed = text.trim_end();
    trimmed.strip_suffix('?').map_or_else(
        || format!("{trimmed} in {location}"),
        |stem| format!("{} in {location}?", stem.trim_end()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(location: Option<&str>, extra_locations: &[&str]) -> BusinessProfile {
        BusinessProfile {
            business_name: None,
            business_type: "plumbing services".to_string(),
            services: vec!["pipe repair".to_string()],
            location: location.map(String::from),
            service_locations: extra_locations.iter().map(|s| (*s).to_string()).collect(),
            target_audience: None,
            industry: "home services".to_string(),
            key_phrases: vec![],
        }
        .normalized()
    }

    #[test]
    fn produces_exactly_ten_questions_with_location() {
        let questions = fallback_questions(&profile(Some("Sydney, Australia"), &[]));
        assert_eq!(questions.len(), FALLBACK_QUESTION_COUNT);
        for q in &questions {
            assert!(
                q.text.contains("Sydney, Australia"),
                "question missing location: {}",
                q.text
            );
        }
    }

    #[test]
    fn produces_exactly_ten_questions_without_location() {
        let questions = fallback_questions(&profile(None, &[]));
        assert_eq!(questions.len(), FALLBACK_QUESTION_COUNT);
        assert!(questions.iter().all(|q| !q.text.contains(" in ")));
    }

    #[test]
    fn multiple_locations_each_appear_at_least_twice() {
        let questions = fallback_questions(&profile(
            Some("Sydney, Australia"),
            &["Melbourne, Australia"],
        ));
        let sydney = questions
            .iter()
            .filter(|q| q.text.contains("Sydney, Australia"))
            .count();
        let melbourne = questions
            .iter()
            .filter(|q| q.text.contains("Melbourne, Australia"))
            .count();
        assert!(sydney >= 2, "Sydney appears {sydney} times");
        assert!(melbourne >= 2, "Melbourne appears {melbourne} times");
    }

    #[test]
    fn templates_substitute_business_type_and_service() {
        let questions = fallback_questions(&profile(Some("Sydney, Australia"), &[]));
        assert!(questions.iter().any(|q| q.text.contains("plumbing services")));
        assert!(questions.iter().any(|q| q.text.contains("pipe repair")));
    }

    #[test]
    fn covers_discovery_categories() {
        let questions = fallback_questions(&profile(Some("Sydney, Australia"), &[]));
        for category in [
            QuestionCategory::General,
            QuestionCategory::Service,
            QuestionCategory::Comparison,
            QuestionCategory::Recommendation,
        ] {
            assert!(
                questions.iter().any(|q| q.category == category),
                "missing category {category}"
            );
        }
    }

    #[test]
    fn interpolate_keeps_question_mark() {
        assert_eq!(
            interpolate_location("Who offers pipe repair?", "Sydney"),
            "Who offers pipe repair in Sydney?"
        );
        assert_eq!(
            interpolate_location("Find me a plumber", "Sydney"),
            "Find me a plumber in Sydney"
        );
    }
}
