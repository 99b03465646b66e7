//! Brand-awareness question set.

use aivis_core::{BusinessProfile, ProbeQuestion, QuestionCategory};

const MAX_SERVICE_CHECKS: usize = 3;

/// Build the brand-awareness probe set: exactly one brand-recall question
/// embedding both name and domain (recognition redundancy — either form
/// counts as a hit), up to three service-check questions for the top
/// services, and one competitor-compare question when a top competitor is
/// known.
#[must_use]
pub fn awareness_questions(
    profile: &BusinessProfile,
    domain: &str,
    competitor: Option<&str>,
) -> Vec<ProbeQuestion> {
    let name = display_name(profile, domain);
    let mut questions = Vec::with_capacity(2 + MAX_SERVICE_CHECKS);

    questions.push(
        ProbeQuestion::new(
            format!("What do you know about {name} at {domain}?"),
            QuestionCategory::BrandRecall,
        )
        .with_tested_entity(name.clone()),
    );

    for service in profile.services.iter().take(MAX_SERVICE_CHECKS) {
        questions.push(
            ProbeQuestion::new(
                format!("Does {name} ({domain}) offer {service}?"),
                QuestionCategory::ServiceCheck,
            )
            .with_tested_entity(name.clone())
            .with_tested_attribute(service.clone()),
        );
    }

    if let Some(competitor) = competitor {
        questions.push(
            ProbeQuestion::new(
                format!("How does {name} compare to {competitor}?"),
                QuestionCategory::CompetitorCompare,
            )
            .with_tested_entity(name),
        );
    }

    questions
}

/// The name used in awareness questions: the profile's business name when
/// known, otherwise the domain itself.
fn display_name(profile: &BusinessProfile, domain: &str) -> String {
    profile
        .business_name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| domain.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(services: &[&str]) -> BusinessProfile {
        BusinessProfile {
            business_name: Some("Acme Plumbing".to_string()),
            business_type: "plumbing services".to_string(),
            services: services.iter().map(|s| (*s).to_string()).collect(),
            location: Some("Sydney, Australia".to_string()),
            service_locations: vec![],
            target_audience: None,
            industry: "home services".to_string(),
            key_phrases: vec![],
        }
        .normalized()
    }

    #[test]
    fn exactly_one_brand_recall_with_name_and_domain() {
        let questions = awareness_questions(&profile(&[]), "acme.com.au", None);
        let recalls: Vec<_> = questions
            .iter()
            .filter(|q| q.category == QuestionCategory::BrandRecall)
            .collect();
        assert_eq!(recalls.len(), 1);
        assert!(recalls[0].text.contains("Acme Plumbing"));
        assert!(recalls[0].text.contains("acme.com.au"));
    }

    #[test]
    fn service_checks_cap_at_three() {
        let questions = awareness_questions(
            &profile(&["pipe repair", "drain cleaning", "hot water", "gas fitting"]),
            "acme.com.au",
            None,
        );
        let checks: Vec<_> = questions
            .iter()
            .filter(|q| q.category == QuestionCategory::ServiceCheck)
            .collect();
        assert_eq!(checks.len(), 3);
        assert_eq!(checks[0].tested_attribute.as_deref(), Some("pipe repair"));
        assert!(checks
            .iter()
            .all(|q| q.tested_entity.as_deref() == Some("Acme Plumbing")));
    }

    #[test]
    fn competitor_compare_only_when_known() {
        let without = awareness_questions(&profile(&["pipe repair"]), "acme.com.au", None);
        assert!(!without
            .iter()
            .any(|q| q.category == QuestionCategory::CompetitorCompare));

        let with = awareness_questions(&profile(&["pipe repair"]), "acme.com.au", Some("Rival"));
        let compares: Vec<_> = with
            .iter()
            .filter(|q| q.category == QuestionCategory::CompetitorCompare)
            .collect();
        assert_eq!(compares.len(), 1);
        assert!(compares[0].text.contains("Rival"));
    }

    #[test]
    fn nameless_profile_uses_domain_as_entity() {
        let mut p = profile(&[]);
        p.business_name = None;
        let questions = awareness_questions(&p, "acme.com.au", None);
        assert_eq!(questions[0].tested_entity.as_deref(), Some("acme.com.au"));
    }
}
