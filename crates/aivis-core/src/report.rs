use serde::{Deserialize, Serialize};

/// Visibility score for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformScore {
    pub platform: String,
    /// `round(100 × mentions / probes)`; 0 when the platform had no probes.
    pub score: u8,
    pub probes: usize,
    pub mentions: usize,
}

/// One competitor's row in the ranked competitor table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorRank {
    pub name: String,
    pub mentions: usize,
}

/// The aggregated output of a scan run.
///
/// Always rebuilt from the full mention-result set; never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityReport {
    /// `round(100 × total_mentions / total_probes)`; 0 when no probes ran.
    pub overall_score: u8,
    /// First-seen platform order.
    pub platforms: Vec<PlatformScore>,
    pub total_probes: usize,
    pub total_mentions: usize,
    /// Descending by mention count, ties broken by first-seen order, top 10.
    pub competitors: Vec<CompetitorRank>,
    /// Services no platform could confirm (brand-awareness runs only).
    pub knowledge_gaps: Vec<String>,
}

impl VisibilityReport {
    /// An all-zero report: the valid terminal state when every provider
    /// failed for every question.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            overall_score: 0,
            platforms: Vec::new(),
            total_probes: 0,
            total_mentions: 0,
            competitors: Vec::new(),
            knowledge_gaps: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_all_zero() {
        let report = VisibilityReport::empty();
        assert_eq!(report.overall_score, 0);
        assert_eq!(report.total_probes, 0);
        assert!(report.platforms.is_empty());
        assert!(report.competitors.is_empty());
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = VisibilityReport {
            overall_score: 67,
            platforms: vec![PlatformScore {
                platform: "openai".to_string(),
                score: 100,
                probes: 1,
                mentions: 1,
            }],
            total_probes: 3,
            total_mentions: 2,
            competitors: vec![CompetitorRank {
                name: "Acme Corp".to_string(),
                mentions: 2,
            }],
            knowledge_gaps: vec!["pipe repair".to_string()],
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: VisibilityReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.overall_score, 67);
        assert_eq!(back.platforms.len(), 1);
        assert_eq!(back.competitors[0].name, "Acme Corp");
    }
}
