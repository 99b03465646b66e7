//! Competitive positioning classification.

use crate::phrases::{STRONGER_TEMPLATES, WEAKER_TEMPLATES};
use crate::types::Positioning;

/// Classify how the answer positions the entity against a named competitor.
///
/// Template families are checked in a fixed order — stronger first, then
/// weaker — and within each family in enumeration order; the first match
/// wins, so list order encodes the tie-break priority. When neither family
/// matches but both names co-occur, the answer is treated as an even
/// comparison; when the names never co-occur it was not a comparison at all.
#[must_use]
pub fn classify_positioning(text: &str, entity: &str, competitor: &str) -> Positioning {
    let haystack = text.to_lowercase();
    let entity = entity.trim().to_lowercase();
    let competitor = competitor.trim().to_lowercase();

    if entity.is_empty() || competitor.is_empty() {
        return Positioning::NotCompared;
    }

    let expand = |template: &str| {
        template
            .replace("{e}", &entity)
            .replace("{c}", &competitor)
    };

    for template in STRONGER_TEMPLATES {
        if haystack.contains(&expand(template)) {
            return Positioning::Stronger;
        }
    }
    for template in WEAKER_TEMPLATES {
        if haystack.contains(&expand(template)) {
            return Positioning::Weaker;
        }
    }

    if haystack.contains(&entity) && haystack.contains(&competitor) {
        Positioning::Equal
    } else {
        Positioning::NotCompared
    }
}
