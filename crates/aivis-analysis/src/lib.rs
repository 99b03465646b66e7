//! Entity and mention analysis for AIVIS.
//!
//! Pure text heuristics over provider answers: domain/brand mention
//! detection, entity recognition with disqualifying phrases, confidence
//! scoring, competitive positioning, and competitor-name extraction.
//! No network access and no suspension points — every function here is
//! synchronous and deterministic.

pub mod analyze;
pub mod competitors;
pub mod mention;
pub mod phrases;
pub mod positioning;
pub mod recognition;
pub mod types;

pub use analyze::analyze_answer;
pub use competitors::{
    context_snippet, extract_competitors, AI_COMPETITOR_CAP, REGEX_COMPETITOR_CAP,
};
pub use mention::{find_domain_mention, normalize_domain, NormalizedDomain};
pub use positioning::classify_positioning;
pub use recognition::{confidence_score, entity_recognized};
pub use types::{
    AwarenessSignals, CompetitorMention, MentionResult, Positioning, ResponseThird,
};
