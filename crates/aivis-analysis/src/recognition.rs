//! Entity recognition and confidence scoring for brand-awareness probes.

use crate::mention::normalize_domain;
use crate::phrases::{CONFIDENT_PHRASES, DISQUALIFYING_PHRASES};

/// Whether the response demonstrates actual knowledge of the entity.
///
/// Two conditions, both necessary: the text contains the entity name or its
/// domain, AND none of the disqualifying "I don't know" phrases appear.
/// A name match alone is not sufficient — assistants frequently echo the
/// name while deflecting ("I don't have specific information about Foo").
#[must_use]
pub fn entity_recognized(text: &str, entity_name: &str, domain: &str) -> bool {
    let haystack = text.to_lowercase();
    let normalized = normalize_domain(domain);

    let name_present = !entity_name.trim().is_empty()
        && haystack.contains(&entity_name.trim().to_lowercase());
    let domain_present = !normalized.full.is_empty() && haystack.contains(&normalized.full);

    if !name_present && !domain_present {
        return false;
    }

    !DISQUALIFYING_PHRASES
        .iter()
        .any(|phrase| haystack.contains(phrase))
}

/// Confidence score in [0, 100] for a brand-awareness answer.
///
/// 0 when the entity was not recognized. Otherwise: base 50, +25 when the
/// tested attribute appears, +10 for responses over 500 chars and +10 more
/// over 1000 chars, +5 per confident-language phrase found, clamped to 100.
#[must_use]
pub fn confidence_score(text: &str, recognized: bool, attribute: Option<&str>) -> u8 {
    if !recognized {
        return 0;
    }

    let haystack = text.to_lowercase();
    let mut score: u32 = 50;

    if let Some(attr) = attribute {
        if !attr.trim().is_empty() && haystack.contains(&attr.trim().to_lowercase()) {
            score += 25;
        }
    }

    if text.len() > 500 {
        score += 10;
    }
    if text.len() > 1000 {
        score += 10;
    }

    for phrase in CONFIDENT_PHRASES {
        if haystack.contains(phrase) {
            score += 5;
        }
    }

    u8::try_from(score.min(100)).unwrap_or(100)
}
