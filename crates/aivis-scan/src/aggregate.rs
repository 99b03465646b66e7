//! Score aggregation: the full mention-result set reduced to one report.

use aivis_analysis::MentionResult;
use aivis_core::{
    CompetitorRank, PlatformScore, ProbeQuestion, QuestionCategory, VisibilityReport,
};
use aivis_providers::ProviderAnswer;

const COMPETITOR_TABLE_LIMIT: usize = 10;

/// Build a visibility report from one run's answers and mention results.
///
/// Probes are counted from the answers (errored answers are probes that
/// found nothing); mentions come from the results. Platform order is
/// first-seen across the answers, competitor ranking is descending by
/// count with first-seen tie-breaks, and knowledge gaps are the
/// service-check services no platform could confirm. Pure and
/// deterministic — aggregating the same inputs twice yields an identical
/// report.
#[must_use]
pub fn build_report(
    answers: &[ProviderAnswer],
    results: &[MentionResult],
    questions: &[ProbeQuestion],
) -> VisibilityReport {
    let total_probes = answers.len();
    let total_mentions = results.iter().filter(|r| r.mentioned).count();

    // Per-platform tallies in first-seen order.
    let mut platforms: Vec<PlatformScore> = Vec::new();
    for answer in answers {
        if !platforms.iter().any(|p| p.platform == answer.platform) {
            platforms.push(PlatformScore {
                platform: answer.platform.clone(),
                score: 0,
                probes: 0,
                mentions: 0,
            });
        }
        if let Some(entry) = platforms.iter_mut().find(|p| p.platform == answer.platform) {
            entry.probes += 1;
        }
    }
    for result in results.iter().filter(|r| r.mentioned) {
        if let Some(entry) = platforms.iter_mut().find(|p| p.platform == result.platform) {
            entry.mentions += 1;
        }
    }
    for entry in &mut platforms {
        entry.score = percentage(entry.mentions, entry.probes);
    }

    VisibilityReport {
        overall_score: percentage(total_mentions, total_probes),
        platforms,
        total_probes,
        total_mentions,
        competitors: rank_competitors(results),
        knowledge_gaps: knowledge_gaps(results, questions),
    }
}

/// `round(100 × mentions / probes)`; 0 for zero probes, never a division
/// error.
fn percentage(mentions: usize, probes: usize) -> u8 {
    if probes == 0 {
        return 0;
    }
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (100.0 * mentions as f64 / probes as f64).round() as u8
    }
}

/// Competitor mention counts across all results, descending, ties broken by
/// first-seen order, truncated to the top 10. Names are counted
/// case-insensitively; the first-seen casing is displayed.
fn rank_competitors(results: &[MentionResult]) -> Vec<CompetitorRank> {
    let mut ranks: Vec<CompetitorRank> = Vec::new();
    for result in results {
        for competitor in &result.competitors {
            let existing = ranks
                .iter_mut()
                .find(|r| r.name.eq_ignore_ascii_case(&competitor.name));
            match existing {
                Some(rank) => rank.mentions += 1,
                None => ranks.push(CompetitorRank {
                    name: competitor.name.clone(),
                    mentions: 1,
                }),
            }
        }
    }
    // sort_by is stable: equal counts keep first-seen order.
    ranks.sort_by(|a, b| b.mentions.cmp(&a.mentions));
    ranks.truncate(COMPETITOR_TABLE_LIMIT);
    ranks
}

/// Services whose service-check probes were never confirmed: no platform
/// reported `attribute_mentioned` for any probe of that service, across
/// every question testing it. Services whose probes all errored count as
/// gaps too — nothing confirmed them.
fn knowledge_gaps(results: &[MentionResult], questions: &[ProbeQuestion]) -> Vec<String> {
    let mut services: Vec<&str> = Vec::new();
    for question in questions {
        if question.category != QuestionCategory::ServiceCheck {
            continue;
        }
        let Some(service) = question.tested_attribute.as_deref() else {
            continue;
        };
        if !services.iter().any(|s| s.eq_ignore_ascii_case(service)) {
            services.push(service);
        }
    }

    services
        .into_iter()
        .filter(|service| {
            let confirmed = questions.iter().enumerate().any(|(index, question)| {
                question.category == QuestionCategory::ServiceCheck
                    && question
                        .tested_attribute
                        .as_deref()
                        .is_some_and(|attr| attr.eq_ignore_ascii_case(service))
                    && results.iter().any(|r| {
                        r.question_index == index
                            && r.awareness.as_ref().is_some_and(|a| a.attribute_mentioned)
                    })
            });
            !confirmed
        })
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use aivis_analysis::{AwarenessSignals, CompetitorMention, Positioning, ResponseThird};

    use super::*;

    fn answer(platform: &str, question_index: usize, errored: bool) -> ProviderAnswer {
        let answer = if errored {
            ProviderAnswer::errored(platform, "down".to_string(), Duration::ZERO)
        } else {
            ProviderAnswer::ok(platform, "text".to_string(), vec![], None, Duration::ZERO)
        };
        answer.with_question_index(question_index)
    }

    fn mentioned(platform: &str, question_index: usize) -> MentionResult {
        MentionResult::mentioned(platform, question_index, ResponseThird::First)
    }

    fn not_mentioned(platform: &str, question_index: usize) -> MentionResult {
        MentionResult::not_mentioned(platform, question_index)
    }

    #[test]
    fn empty_run_is_all_zero() {
        let report = build_report(&[], &[], &[]);
        assert_eq!(report.overall_score, 0);
        assert_eq!(report.total_probes, 0);
        assert!(report.platforms.is_empty());
        assert!(report.competitors.is_empty());
    }

    #[test]
    fn three_platforms_score_independently_and_overall_rounds() {
        // One question, three providers: mentioned, not mentioned, mentioned.
        let answers = vec![
            answer("openai", 0, false),
            answer("gemini", 0, false),
            answer("perplexity", 0, false),
        ];
        let results = vec![
            mentioned("openai", 0),
            not_mentioned("gemini", 0),
            mentioned("perplexity", 0),
        ];
        let report = build_report(&answers, &results, &[]);

        let scores: Vec<u8> = report.platforms.iter().map(|p| p.score).collect();
        assert_eq!(scores, vec![100, 0, 100]);
        // round(100 × 2/3) = 67
        assert_eq!(report.overall_score, 67);
        assert_eq!(report.total_probes, 3);
        assert_eq!(report.total_mentions, 2);
    }

    #[test]
    fn errored_answers_count_as_probes_without_mentions() {
        let answers = vec![answer("openai", 0, false), answer("gemini", 0, true)];
        let results = vec![mentioned("openai", 0)];
        let report = build_report(&answers, &results, &[]);

        let gemini = report
            .platforms
            .iter()
            .find(|p| p.platform == "gemini")
            .unwrap();
        assert_eq!(gemini.probes, 1);
        assert_eq!(gemini.mentions, 0);
        assert_eq!(gemini.score, 0);
        assert_eq!(report.overall_score, 50);
    }

    #[test]
    fn total_exhaustion_yields_all_zero_scores() {
        let answers = vec![
            answer("openai", 0, true),
            answer("gemini", 0, true),
            answer("openai", 1, true),
            answer("gemini", 1, true),
        ];
        let report = build_report(&answers, &[], &[]);
        assert_eq!(report.overall_score, 0);
        assert!(report.platforms.iter().all(|p| p.score == 0));
        assert!(report.competitors.is_empty());
    }

    #[test]
    fn competitor_ranking_sorts_desc_with_first_seen_ties() {
        let mut r1 = not_mentioned("openai", 0);
        r1.competitors = vec![
            CompetitorMention {
                name: "DrainPro".to_string(),
                context: String::new(),
            },
            CompetitorMention {
                name: "FlowFix".to_string(),
                context: String::new(),
            },
        ];
        let mut r2 = not_mentioned("gemini", 0);
        r2.competitors = vec![CompetitorMention {
            name: "flowfix".to_string(),
            context: String::new(),
        }];
        let mut r3 = not_mentioned("perplexity", 0);
        r3.competitors = vec![CompetitorMention {
            name: "Pipeworks".to_string(),
            context: String::new(),
        }];

        let report = build_report(&[], &[r1, r2, r3], &[]);
        let names: Vec<&str> = report.competitors.iter().map(|c| c.name.as_str()).collect();
        // FlowFix counted twice (case-insensitive); DrainPro and Pipeworks
        // tie at one and keep first-seen order.
        assert_eq!(names, vec!["FlowFix", "DrainPro", "Pipeworks"]);
        assert_eq!(report.competitors[0].mentions, 2);
    }

    #[test]
    fn ranking_is_deterministic_across_runs() {
        let mut r1 = not_mentioned("openai", 0);
        r1.competitors = (0..15)
            .map(|i| CompetitorMention {
                name: format!("Competitor {i}"),
                context: String::new(),
            })
            .collect();

        let first = build_report(&[], &[r1.clone()], &[]);
        let second = build_report(&[], &[r1], &[]);
        assert_eq!(first.competitors, second.competitors);
        assert_eq!(first.competitors.len(), 10, "table truncates to top 10");
    }

    #[test]
    fn knowledge_gaps_track_unconfirmed_services() {
        let questions = vec![
            ProbeQuestion::new("Does Acme offer pipe repair?", QuestionCategory::ServiceCheck)
                .with_tested_entity("Acme")
                .with_tested_attribute("pipe repair"),
            ProbeQuestion::new(
                "Does Acme offer drain cleaning?",
                QuestionCategory::ServiceCheck,
            )
            .with_tested_entity("Acme")
            .with_tested_attribute("drain cleaning"),
        ];

        let confirmed = MentionResult::not_mentioned("openai", 0).with_awareness(AwarenessSignals {
            entity_recognized: true,
            attribute_mentioned: true,
            confidence: 75,
            positioning: Positioning::NotCompared,
        });
        let unconfirmed =
            MentionResult::not_mentioned("openai", 1).with_awareness(AwarenessSignals {
                entity_recognized: true,
                attribute_mentioned: false,
                confidence: 50,
                positioning: Positioning::NotCompared,
            });

        let answers = vec![answer("openai", 0, false), answer("openai", 1, false)];
        let report = build_report(&answers, &[confirmed, unconfirmed], &questions);
        assert_eq!(report.knowledge_gaps, vec!["drain cleaning"]);
    }

    #[test]
    fn one_confirmation_anywhere_clears_the_service() {
        // Two probes test the same service; only one platform confirms it.
        // The service is not a gap.
        let questions = vec![
            ProbeQuestion::new("Does Acme offer pipe repair?", QuestionCategory::ServiceCheck)
                .with_tested_entity("Acme")
                .with_tested_attribute("pipe repair"),
            ProbeQuestion::new(
                "Can Acme handle pipe repair jobs?",
                QuestionCategory::ServiceCheck,
            )
            .with_tested_entity("Acme")
            .with_tested_attribute("pipe repair"),
        ];

        let confirmed = MentionResult::not_mentioned("openai", 0).with_awareness(AwarenessSignals {
            entity_recognized: true,
            attribute_mentioned: true,
            confidence: 75,
            positioning: Positioning::NotCompared,
        });
        let unconfirmed =
            MentionResult::not_mentioned("gemini", 1).with_awareness(AwarenessSignals {
                entity_recognized: false,
                attribute_mentioned: false,
                confidence: 0,
                positioning: Positioning::NotCompared,
            });

        let answers = vec![answer("openai", 0, false), answer("gemini", 1, false)];
        let report = build_report(&answers, &[confirmed, unconfirmed], &questions);
        assert!(report.knowledge_gaps.is_empty());
    }

    #[test]
    fn all_errored_service_check_is_a_gap() {
        let questions = vec![ProbeQuestion::new(
            "Does Acme offer pipe repair?",
            QuestionCategory::ServiceCheck,
        )
        .with_tested_entity("Acme")
        .with_tested_attribute("pipe repair")];

        let answers = vec![answer("openai", 0, true)];
        let report = build_report(&answers, &[], &questions);
        assert_eq!(report.knowledge_gaps, vec!["pipe repair"]);
    }
}
