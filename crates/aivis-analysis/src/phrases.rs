//! Phrase and pattern lists used by the analyzer.
//!
//! These are heuristic configuration data, not algorithmic truth: they
//! reproduce observed deflection/confidence language in assistant answers
//! and will misclassify the occasional response. Keep entries lowercase;
//! all matching is done against lowercased text.

/// Phrases that disqualify an answer from counting as entity recognition,
/// even when the entity name itself appears in the text.
pub const DISQUALIFYING_PHRASES: &[&str] = &[
    "i don't have specific information",
    "i do not have specific information",
    "i don't have information",
    "i don't have any information",
    "i'm not familiar",
    "i am not familiar",
    "i don't know",
    "i do not know",
    "no information available",
    "i couldn't find",
    "i could not find",
    "i'm unable to find",
    "i am unable to find",
    "i don't have any details",
    "not aware of",
    "i have no knowledge",
    "i cannot provide specific",
    "i can't provide specific",
    "unable to locate",
    "no specific information",
    "doesn't appear in my",
    "does not appear in my",
];

/// Confident-language phrases; each occurrence adds to the confidence score.
pub const CONFIDENT_PHRASES: &[&str] = &[
    "is known for",
    "specializes in",
    "specialises in",
    "well-known",
    "well known",
    "is recognized",
    "is recognised",
    "has a reputation",
    "is a leading",
    "is an established",
    "offers a range of",
    "is one of the",
];

/// Generic capitalized words that must never be treated as company names.
pub const COMPETITOR_STOPWORDS: &[&str] = &[
    "The", "This", "That", "These", "Those", "They", "There", "Their", "Them", "Some", "Many",
    "Most", "Several", "Other", "Another", "Others", "However", "Also", "Additionally", "While",
    "When", "Where", "Which", "What", "Who", "Why", "How", "You", "Your", "Our", "We", "It",
    "Its", "If", "For", "In", "On", "At", "A", "An", "And", "Or", "But", "I", "Here", "Consider",
    "Alternatively", "Finally", "First", "Second", "Third", "Generally", "Typically",
    "Unfortunately", "Yes", "No", "Please", "Based", "Overall", "Both", "Each", "Any",
];

/// Comparative templates indicating the entity is positioned as stronger.
/// `{e}` is replaced with the entity name, `{c}` with the competitor name.
/// Enumeration order is the tie-break priority and must be preserved.
pub const STRONGER_TEMPLATES: &[&str] = &[
    "{e} is better",
    "{e} is best",
    "{e} is superior",
    "{e} is stronger",
    "{e} outperforms",
    "{e} has more",
    "{e} offers more",
    "better than {c}",
    "more than {c}",
    "recommend {e} over",
    "prefer {e} over",
];

/// Comparative templates indicating the entity is positioned as weaker.
/// Same substitution and ordering rules as [`STRONGER_TEMPLATES`].
pub const WEAKER_TEMPLATES: &[&str] = &[
    "{c} is better",
    "{c} is best",
    "{c} is superior",
    "{c} is stronger",
    "{c} outperforms",
    "{c} has more",
    "{c} offers more",
    "better than {e}",
    "more than {e}",
    "recommend {c} over",
    "prefer {c} over",
];
