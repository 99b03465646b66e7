//! Competitor-name extraction from answer text.
//!
//! Regex-based heuristics scanning for recommendation verbs followed by a
//! capitalized name, "Name is/offers/provides" statements, and
//! "companies like X, Y" lists. Inherently approximate — capitalized
//! common nouns will occasionally slip through; the stop-word list in
//! [`crate::phrases`] catches the common ones.

use regex::Regex;

use crate::mention::normalize_domain;
use crate::phrases::COMPETITOR_STOPWORDS;
use crate::types::CompetitorMention;

/// Cap on competitors extracted from one answer by the regex path.
pub const REGEX_COMPETITOR_CAP: usize = 10;

/// Cap applied when the narrower AI-based extraction pathway is used instead.
pub const AI_COMPETITOR_CAP: usize = 5;

const SNIPPET_RADIUS: usize = 30;
const SCAN_WINDOW: usize = 120;

/// Extract competitor names from an answer, excluding anything that matches
/// the target domain's base token. Case-insensitively deduplicated in
/// first-seen order, capped at [`REGEX_COMPETITOR_CAP`].
#[must_use]
pub fn extract_competitors(text: &str, target_domain: &str) -> Vec<CompetitorMention> {
    if text.is_empty() {
        return Vec::new();
    }

    let name_re = Regex::new(r"[A-Z][A-Za-z0-9&'-]*(?:\s+[A-Z][A-Za-z0-9&'-]*){0,2}")
        .expect("valid name regex");
    let verb_re = Regex::new(r"(?i)\b(?:recommend|suggest|try|check\s+out)\b")
        .expect("valid recommendation verb regex");
    let statement_re = Regex::new(
        r"\b([A-Z][A-Za-z0-9&'-]*(?:\s+[A-Z][A-Za-z0-9&'-]*){0,2})\s+(?:is|offers|provides)\b",
    )
    .expect("valid statement regex");
    let list_re = Regex::new(
        r"(?i)\b(?:companies|businesses|providers|services|alternatives|options)\s+(?:like|such as|including)\b",
    )
    .expect("valid list regex");

    let base_token = normalize_domain(target_domain).name;

    // (candidate, first-occurrence byte offset), in discovery order.
    let mut candidates: Vec<(String, usize)> = Vec::new();

    for m in verb_re.find_iter(text) {
        collect_names_in_window(text, m.end(), &name_re, &mut candidates);
    }

    for caps in statement_re.captures_iter(text) {
        if let Some(name) = caps.get(1) {
            candidates.push((name.as_str().to_string(), name.start()));
        }
    }

    for m in list_re.find_iter(text) {
        collect_names_in_window(text, m.end(), &name_re, &mut candidates);
    }

    let mut seen: Vec<String> = Vec::new();
    let mut mentions: Vec<CompetitorMention> = Vec::new();

    for (name, offset) in candidates {
        if mentions.len() >= REGEX_COMPETITOR_CAP {
            break;
        }
        if !is_plausible_name(&name, &base_token) {
            continue;
        }
        let key = name.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        let context = snippet_around(text, offset, offset + name.len());
        mentions.push(CompetitorMention { name, context });
    }

    mentions
}

/// Collect capitalized names between `start` and the end of the sentence
/// (or [`SCAN_WINDOW`] bytes, whichever comes first).
fn collect_names_in_window(
    text: &str,
    start: usize,
    name_re: &Regex,
    out: &mut Vec<(String, usize)>,
) {
    let window_end = text[start..]
        .find(['.', '!', '?', '\n'])
        .map_or_else(|| text.len(), |i| start + i);
    let window_end = ceil_char_boundary(text, window_end.min(start + SCAN_WINDOW));
    let window = &text[start..window_end];

    for m in name_re.find_iter(window) {
        out.push((m.as_str().to_string(), start + m.start()));
    }
}

/// A candidate survives when it is not led by a generic stop-word and does
/// not contain the target domain's base token.
fn is_plausible_name(name: &str, base_token: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.len() < 2 {
        return false;
    }

    let mut words = trimmed.split_whitespace();
    let Some(first) = words.next() else {
        return false;
    };
    if COMPETITOR_STOPWORDS.contains(&first) {
        return false;
    }

    if !base_token.is_empty() {
        let lowered = trimmed.to_lowercase();
        let spaced_base = base_token.replace('-', " ");
        if lowered.contains(base_token) || lowered.contains(&spaced_base) {
            return false;
        }
    }

    true
}

/// Context for a name known to (probably) appear in the text: the
/// ±[`SNIPPET_RADIUS`]-character window around its first case-insensitive
/// occurrence. Used by extraction strategies that obtain names out of band.
#[must_use]
pub fn context_snippet(text: &str, name: &str) -> Option<String> {
    let index = text.to_lowercase().find(&name.to_lowercase())?;
    Some(snippet_around(text, index, index + name.len()))
}

/// ±[`SNIPPET_RADIUS`] characters of context around a match, snapped to
/// char boundaries.
fn snippet_around(text: &str, start: usize, end: usize) -> String {
    let from = floor_char_boundary(text, start.saturating_sub(SNIPPET_RADIUS));
    let to = ceil_char_boundary(text, (end + SNIPPET_RADIUS).min(text.len()));
    text[from..to].trim().to_string()
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_extracts_names_and_filters_target() {
        let mentions = extract_competitors(
            "We recommend Acme Corp and Example Co for this.",
            "example.com",
        );
        let names: Vec<&str> = mentions.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Acme Corp"]);
    }

    #[test]
    fn statement_pattern_extracts_subject() {
        let mentions = extract_competitors(
            "Rival Plumbing offers same-day service across the metro area.",
            "example.com",
        );
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].name, "Rival Plumbing");
    }

    #[test]
    fn list_pattern_extracts_multiple_names() {
        let mentions = extract_competitors(
            "There are companies like FlowFix, DrainPro and Pipeworks Ltd operating there.",
            "example.com",
        );
        let names: Vec<&str> = mentions.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["FlowFix", "DrainPro", "Pipeworks Ltd"]);
    }

    #[test]
    fn stopwords_are_rejected() {
        let mentions = extract_competitors(
            "However is not a company. We suggest This and That.",
            "example.com",
        );
        assert!(mentions.is_empty(), "got: {mentions:?}");
    }

    #[test]
    fn dedup_is_case_insensitive() {
        let mentions = extract_competitors(
            "Try FlowFix today. FLOWFIX is the market leader. I'd also suggest FlowFix.",
            "example.com",
        );
        assert_eq!(mentions.len(), 1);
    }

    #[test]
    fn cap_at_ten_names() {
        let text = "We recommend Aaa, Bbb, Ccc, Ddd, Eee, Fff, Ggg, Hhh, Iii, Jjj, Kkk, Lll now.";
        let mentions = extract_competitors(text, "example.com");
        assert_eq!(mentions.len(), REGEX_COMPETITOR_CAP);
    }

    #[test]
    fn context_snippet_surrounds_first_occurrence() {
        let mentions = extract_competitors(
            "For urgent work in the inner west, we recommend Acme Corp without reservation.",
            "example.com",
        );
        assert_eq!(mentions.len(), 1);
        assert!(mentions[0].context.contains("Acme Corp"));
        assert!(mentions[0].context.contains("recommend"));
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(extract_competitors("", "example.com").is_empty());
    }

    #[test]
    fn hyphenated_target_base_token_is_filtered() {
        let mentions = extract_competitors(
            "We suggest Acme Plumbing for this job.",
            "acme-plumbing.com",
        );
        assert!(mentions.is_empty(), "got: {mentions:?}");
    }
}
