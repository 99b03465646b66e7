//! Text rendering of scan outcomes.

use aivis_scan::ScanOutcome;

/// Print a human-readable report to stdout.
pub(crate) fn print_report(domain: &str, outcome: &ScanOutcome) {
    let report = &outcome.report;

    println!();
    println!("visibility report for {domain} (run {})", outcome.run_id);
    println!(
        "overall score: {}% ({} mentions across {} probes)",
        report.overall_score, report.total_mentions, report.total_probes
    );

    if !report.platforms.is_empty() {
        println!();
        println!("per-platform:");
        for platform in &report.platforms {
            println!(
                "  {:<12} {:>3}%  ({}/{} probes mentioned)",
                platform.platform, platform.score, platform.mentions, platform.probes
            );
        }
    }

    if report.competitors.is_empty() {
        println!();
        println!("no competitors surfaced in the answers");
    } else {
        println!();
        println!("competitors surfaced:");
        for competitor in &report.competitors {
            println!("  {:<24} {} mentions", competitor.name, competitor.mentions);
        }
    }

    if !report.knowledge_gaps.is_empty() {
        println!();
        println!("knowledge gaps (services no platform could confirm):");
        for gap in &report.knowledge_gaps {
            println!("  - {gap}");
        }
    }

    let total_cost: f64 = outcome
        .cost_entries
        .iter()
        .map(|e| e.estimated_cost_usd)
        .sum();
    if !outcome.cost_entries.is_empty() {
        println!();
        println!(
            "estimated spend: ${total_cost:.4} across {} calls",
            outcome.cost_entries.len()
        );
    }
}
