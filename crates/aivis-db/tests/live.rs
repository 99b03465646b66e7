//! Live integration tests for aivis-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/aivis-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use chrono::Utc;

use aivis_core::{
    CompetitorRank, CostEntry, CostSink, PlatformScore, RunId, VisibilityReport,
};
use aivis_db::{
    complete_scan_run, create_scan_run, fail_scan_run, get_report, get_scan_run,
    insert_cost_entry, insert_report, list_cost_entries_for_run, list_scan_runs, start_scan_run,
    PgCostSink,
};

fn sample_entry(run_id: RunId) -> CostEntry {
    CostEntry {
        run_id,
        step: "probe".to_string(),
        model: "gpt-4o-mini".to_string(),
        input_tokens: 120,
        output_tokens: 480,
        estimated_cost_usd: 0.000_306,
        recorded_at: Utc::now(),
    }
}

fn sample_report() -> VisibilityReport {
    VisibilityReport {
        overall_score: 67,
        platforms: vec![PlatformScore {
            platform: "openai".to_string(),
            score: 100,
            probes: 10,
            mentions: 10,
        }],
        total_probes: 30,
        total_mentions: 20,
        competitors: vec![CompetitorRank {
            name: "DrainPro".to_string(),
            mentions: 4,
        }],
        knowledge_gaps: vec!["drain cleaning".to_string()],
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn scan_run_lifecycle(pool: sqlx::PgPool) {
    let run_id = RunId::new();
    let run = create_scan_run(&pool, run_id.as_uuid(), "visibility", "cli", "acme.com.au")
        .await
        .expect("create should succeed");
    assert_eq!(run.status, "pending");
    assert_eq!(run.scan_kind, "visibility");

    start_scan_run(&pool, run.id).await.expect("start");
    complete_scan_run(&pool, run.id, 40, 18).await.expect("complete");

    let reloaded = get_scan_run(&pool, run.id).await.expect("get");
    assert_eq!(reloaded.status, "completed");
    assert_eq!(reloaded.probes_total, 40);
    assert_eq!(reloaded.mentions_total, 18);
    assert!(reloaded.started_at.is_some());
    assert!(reloaded.completed_at.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn starting_a_non_pending_run_is_not_found(pool: sqlx::PgPool) {
    let run = create_scan_run(&pool, RunId::new().as_uuid(), "awareness", "cli", "acme.com.au")
        .await
        .unwrap();
    start_scan_run(&pool, run.id).await.unwrap();
    let second = start_scan_run(&pool, run.id).await;
    assert!(second.is_err(), "a running run must not restart");
}

#[sqlx::test(migrations = "../../migrations")]
async fn failed_runs_record_the_error(pool: sqlx::PgPool) {
    let run = create_scan_run(&pool, RunId::new().as_uuid(), "visibility", "cli", "acme.com.au")
        .await
        .unwrap();
    fail_scan_run(&pool, run.id, "profile file unreadable").await.unwrap();

    let reloaded = get_scan_run(&pool, run.id).await.unwrap();
    assert_eq!(reloaded.status, "failed");
    assert_eq!(
        reloaded.error_message.as_deref(),
        Some("profile file unreadable")
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_scan_runs_newest_first(pool: sqlx::PgPool) {
    for kind in ["visibility", "awareness", "employer"] {
        create_scan_run(&pool, RunId::new().as_uuid(), kind, "cli", "acme.com.au")
            .await
            .unwrap();
    }
    let runs = list_scan_runs(&pool, 2).await.unwrap();
    assert_eq!(runs.len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn cost_entries_append_and_list(pool: sqlx::PgPool) {
    let run_id = RunId::new();
    insert_cost_entry(&pool, &sample_entry(run_id)).await.unwrap();
    insert_cost_entry(&pool, &sample_entry(run_id)).await.unwrap();
    insert_cost_entry(&pool, &sample_entry(RunId::new())).await.unwrap();

    let entries = list_cost_entries_for_run(&pool, run_id.as_uuid()).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].model, "gpt-4o-mini");
    assert_eq!(entries[0].input_tokens, 120);
}

#[sqlx::test(migrations = "../../migrations")]
async fn pg_cost_sink_implements_the_contract(pool: sqlx::PgPool) {
    let run_id = RunId::new();
    let sink = PgCostSink::new(pool.clone());
    sink.record(&sample_entry(run_id)).await.expect("record");

    let entries = list_cost_entries_for_run(&pool, run_id.as_uuid()).await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn report_round_trips_through_json_column(pool: sqlx::PgPool) {
    let run_id = RunId::new();
    insert_report(&pool, run_id.as_uuid(), &sample_report()).await.unwrap();

    let row = get_report(&pool, run_id.as_uuid()).await.unwrap();
    assert_eq!(row.overall_score, 67);
    let report: VisibilityReport = serde_json::from_value(row.report).unwrap();
    assert_eq!(report.competitors[0].name, "DrainPro");
    assert_eq!(report.knowledge_gaps, vec!["drain cleaning"]);
}
