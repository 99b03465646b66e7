//! Cross-provider question deduplication.
//!
//! When several providers independently propose candidate questions, near
//! duplicates are common. Candidates are grouped by token-Jaccard
//! similarity, each group is reduced to one representative, groups are
//! ranked by how many distinct providers agreed on them, and category
//! diversity is enforced before backfilling remaining slots.

use std::collections::HashSet;

use aivis_core::{ProbeQuestion, QuestionCategory};

/// Jaccard similarity at or above which two questions are the same question.
const SIMILARITY_THRESHOLD: f64 = 0.5;

/// Preferred representative length bounds, in characters.
const REPRESENTATIVE_MIN_LEN: usize = 30;
const REPRESENTATIVE_MAX_LEN: usize = 80;

/// A question proposed by one provider, before deduplication.
#[derive(Debug, Clone)]
pub struct CandidateQuestion {
    pub text: String,
    pub category: QuestionCategory,
    /// Platform id of the provider that proposed it.
    pub provider: String,
    pub job_family: Option<String>,
}

/// Deduplicate candidates into at most `limit` probe questions.
///
/// Grouping: pairwise token-Jaccard over words longer than 2 characters,
/// threshold 0.5 against each group's first member. Representative: the
/// first group member whose length falls in [30, 80] characters, else the
/// first member. Ranking: groups proposed by more distinct providers come
/// first (stable for ties). Selection: each category is capped at
/// `ceil(limit / 3)` before remaining slots are backfilled from the ranked
/// list.
#[must_use]
pub fn dedupe_candidates(candidates: Vec<CandidateQuestion>, limit: usize) -> Vec<ProbeQuestion> {
    if candidates.is_empty() || limit == 0 {
        return Vec::new();
    }

    let token_sets: Vec<HashSet<String>> =
        candidates.iter().map(|c| tokens(&c.text)).collect();

    // Group indices by similarity to each group's first member.
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for i in 0..candidates.len() {
        let group = groups
            .iter_mut()
            .find(|g| jaccard(&token_sets[i], &token_sets[g[0]]) >= SIMILARITY_THRESHOLD);
        match group {
            Some(g) => g.push(i),
            None => groups.push(vec![i]),
        }
    }

    // More provider agreement ranks higher; sort_by is stable so ties keep
    // discovery order.
    groups.sort_by(|a, b| distinct_providers(b, &candidates).cmp(&distinct_providers(a, &candidates)));

    let representatives: Vec<&CandidateQuestion> = groups
        .iter()
        .map(|g| {
            let preferred = g.iter().find(|&&i| {
                let len = candidates[i].text.len();
                (REPRESENTATIVE_MIN_LEN..=REPRESENTATIVE_MAX_LEN).contains(&len)
            });
            &candidates[*preferred.unwrap_or(&g[0])]
        })
        .collect();

    let category_cap = limit.div_ceil(3);
    let mut selected: Vec<usize> = Vec::new();
    let mut category_counts: Vec<(QuestionCategory, usize)> = Vec::new();

    // First pass: honor the per-category cap.
    for (idx, rep) in representatives.iter().enumerate() {
        if selected.len() >= limit {
            break;
        }
        let count = category_counts
            .iter()
            .find(|(c, _)| *c == rep.category)
            .map_or(0, |(_, n)| *n);
        if count < category_cap {
            selected.push(idx);
            match category_counts.iter_mut().find(|(c, _)| *c == rep.category) {
                Some((_, n)) => *n += 1,
                None => category_counts.push((rep.category, 1)),
            }
        }
    }

    // Backfill remaining slots from the ranked list, cap no longer applies.
    for idx in 0..representatives.len() {
        if selected.len() >= limit {
            break;
        }
        if !selected.contains(&idx) {
            selected.push(idx);
        }
    }
    selected.sort_unstable();

    selected
        .into_iter()
        .map(|idx| {
            let rep = representatives[idx];
            let mut question = ProbeQuestion::new(rep.text.clone(), rep.category);
            if let Some(job_family) = &rep.job_family {
                question = question.with_job_family(job_family.clone());
            }
            question
        })
        .collect()
}

/// Lowercased words longer than 2 characters, punctuation stripped.
fn tokens(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| w.len() > 2)
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    #[allow(clippy::cast_precision_loss)]
    {
        intersection as f64 / union as f64
    }
}

fn distinct_providers(group: &[usize], candidates: &[CandidateQuestion]) -> usize {
    let mut providers: Vec<&str> = group.iter().map(|&i| candidates[i].provider.as_str()).collect();
    providers.sort_unstable();
    providers.dedup();
    providers.len()
}
