use serde::{Deserialize, Serialize};

/// Which third of a response the first mention fell in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseThird {
    First,
    Second,
    Third,
}

impl ResponseThird {
    #[must_use]
    pub fn from_index(index: usize, len: usize) -> Self {
        if len == 0 {
            return ResponseThird::First;
        }
        // ceil((index + 1) / len × 3), clamped to [1, 3]
        let third = ((index + 1) * 3).div_ceil(len).clamp(1, 3);
        match third {
            1 => ResponseThird::First,
            2 => ResponseThird::Second,
            _ => ResponseThird::Third,
        }
    }
}

/// How a platform positioned the business against a named competitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Positioning {
    Stronger,
    Weaker,
    Equal,
    NotCompared,
}

/// A competitor name surfaced in an answer, with surrounding context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorMention {
    pub name: String,
    /// ±30 characters around the first occurrence.
    pub context: String,
}

/// Brand-awareness signals, populated only for brand-awareness questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwarenessSignals {
    pub entity_recognized: bool,
    pub attribute_mentioned: bool,
    /// 0–100; always 0 when `entity_recognized` is false.
    pub confidence: u8,
    pub positioning: Positioning,
}

/// The analyzed outcome of one provider answer.
///
/// Invariants (enforced by the constructors):
/// `mentioned == false` implies `position == None`, and
/// `awareness.entity_recognized == false` implies `awareness.confidence == 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionResult {
    pub platform: String,
    pub question_index: usize,
    pub mentioned: bool,
    pub position: Option<ResponseThird>,
    pub competitors: Vec<CompetitorMention>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awareness: Option<AwarenessSignals>,
}

impl MentionResult {
    /// A result for an answer in which the business was found.
    #[must_use]
    pub fn mentioned(platform: impl Into<String>, question_index: usize, position: ResponseThird) -> Self {
        Self {
            platform: platform.into(),
            question_index,
            mentioned: true,
            position: Some(position),
            competitors: Vec::new(),
            awareness: None,
        }
    }

    /// A result for an answer in which the business did not appear.
    /// The position is forced to `None`.
    #[must_use]
    pub fn not_mentioned(platform: impl Into<String>, question_index: usize) -> Self {
        Self {
            platform: platform.into(),
            question_index,
            mentioned: false,
            position: None,
            competitors: Vec::new(),
            awareness: None,
        }
    }

    #[must_use]
    pub fn with_competitors(mut self, competitors: Vec<CompetitorMention>) -> Self {
        self.competitors = competitors;
        self
    }

    #[must_use]
    pub fn with_awareness(mut self, awareness: AwarenessSignals) -> Self {
        self.awareness = Some(awareness);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_mentioned_has_no_position() {
        let result = MentionResult::not_mentioned("openai", 0);
        assert!(!result.mentioned);
        assert!(result.position.is_none());
    }

    #[test]
    fn third_boundaries() {
        // 300-char response: index 0 lands in the first third,
        // index 150 in the second, index 299 in the third.
        assert_eq!(ResponseThird::from_index(0, 300), ResponseThird::First);
        assert_eq!(ResponseThird::from_index(99, 300), ResponseThird::First);
        assert_eq!(ResponseThird::from_index(100, 300), ResponseThird::Second);
        assert_eq!(ResponseThird::from_index(199, 300), ResponseThird::Second);
        assert_eq!(ResponseThird::from_index(200, 300), ResponseThird::Third);
        assert_eq!(ResponseThird::from_index(299, 300), ResponseThird::Third);
    }

    #[test]
    fn third_clamps_on_degenerate_input() {
        assert_eq!(ResponseThird::from_index(0, 0), ResponseThird::First);
        assert_eq!(ResponseThird::from_index(5, 1), ResponseThird::Third);
    }
}
