//! Domain mention detection.

use crate::types::ResponseThird;

/// A target domain broken into the forms we search for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDomain {
    /// Lowercased, `www.`-stripped domain, e.g. `example.com.au`.
    pub full: String,
    /// The bare name before the first dot, e.g. `example`.
    pub name: String,
}

/// Normalize a domain for matching: lowercase, strip any scheme and path,
/// strip a leading `www.`, and split off the bare name before the TLD.
#[must_use]
pub fn normalize_domain(domain: &str) -> NormalizedDomain {
    let lowered = domain.trim().to_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    let host = without_scheme.split('/').next().unwrap_or(without_scheme);
    let full = host.strip_prefix("www.").unwrap_or(host).to_string();
    let name = full.split('.').next().unwrap_or(&full).to_string();
    NormalizedDomain { full, name }
}

/// Case-insensitive search for the domain (full form or bare name) in the
/// answer text. Returns the byte index of the first occurrence and the
/// response third it falls in, or `None` when the business is not mentioned.
#[must_use]
pub fn find_domain_mention(text: &str, domain: &str) -> Option<(usize, ResponseThird)> {
    if text.is_empty() {
        return None;
    }
    let normalized = normalize_domain(domain);
    let haystack = text.to_lowercase();

    let index = match haystack.find(&normalized.full) {
        Some(idx) => Some(idx),
        None if normalized.name.len() >= 2 => haystack.find(&normalized.name),
        None => None,
    }?;

    Some((index, ResponseThird::from_index(index, haystack.len())))
}
