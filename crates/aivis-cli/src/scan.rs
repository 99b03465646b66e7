//! Scan command handlers.

use std::path::Path;
use std::sync::Arc;

use aivis_core::{load_app_config, load_profile, CostSink, PriceTable, RunId};
use aivis_questions::{awareness_questions, fallback_questions};
use aivis_scan::{
    run_awareness_scan, run_employer_scan, run_visibility_scan, DispatchOptions, FanoutCostSink,
    MemoryLedger, ScanParams,
};

use crate::registry::build_registry;
use crate::render::print_report;

#[derive(Debug)]
pub(crate) enum ScanKind {
    Visibility,
    Awareness,
    Employer {
        job_families: Vec<String>,
        limit: usize,
    },
}

impl ScanKind {
    fn label(&self) -> &'static str {
        match self {
            ScanKind::Visibility => "visibility",
            ScanKind::Awareness => "awareness",
            ScanKind::Employer { .. } => "employer",
        }
    }
}

/// Mark a run row as failed, logging rather than failing if even that
/// write does not succeed.
async fn fail_run_best_effort(pool: &sqlx::PgPool, run_db_id: i64, message: String) {
    if let Err(e) = aivis_db::fail_scan_run(pool, run_db_id, &message).await {
        tracing::warn!(run_db_id, error = %e, "failed to mark scan run as failed");
    }
}

/// Run one scan end to end: load config and profile, build the registry,
/// dispatch, aggregate, persist (when a database is configured), render.
pub(crate) async fn run_scan(
    domain: &str,
    profile_path: &Path,
    competitor: Option<&str>,
    kind: ScanKind,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_app_config()?;
    let profile = load_profile(profile_path)?;

    if dry_run {
        let questions = fallback_questions(&profile);
        println!(
            "dry-run: would dispatch {} questions for {domain}:",
            questions.len()
        );
        for question in &questions {
            println!("  [{}] {}", question.category, question.text);
        }
        return Ok(());
    }

    let prices = match PriceTable::load(&config.pricing_path) {
        Ok(table) => Arc::new(table),
        Err(e) => {
            tracing::warn!(error = %e, "price table unavailable; all costs will be zero");
            Arc::new(PriceTable::default())
        }
    };

    let ledger = Arc::new(MemoryLedger::new());

    // Optional database: run lifecycle rows and a persistent cost sink.
    let pool = match &config.database_url {
        Some(url) => Some(aivis_db::connect_pool(url, aivis_db::PoolConfig::from_env()).await?),
        None => None,
    };

    let sink: Arc<dyn CostSink> = match &pool {
        Some(pool) => Arc::new(FanoutCostSink::new(vec![
            Arc::clone(&ledger) as Arc<dyn CostSink>,
            Arc::new(aivis_db::PgCostSink::new(pool.clone())) as Arc<dyn CostSink>,
        ])),
        None => Arc::clone(&ledger) as Arc<dyn CostSink>,
    };

    let (registry, generator) = build_registry(&config, sink, Arc::clone(&prices))?;
    if registry.is_empty() {
        anyhow::bail!(
            "no providers configured; set at least one of OPENAI_API_KEY, ANTHROPIC_API_KEY, \
             GEMINI_API_KEY, PERPLEXITY_API_KEY"
        );
    }

    let run_id = RunId::new();
    let run_row = match &pool {
        Some(pool) => Some(
            aivis_db::create_scan_run(pool, run_id.as_uuid(), kind.label(), "cli", domain).await?,
        ),
        None => None,
    };
    if let (Some(pool), Some(row)) = (&pool, &run_row) {
        if let Err(e) = aivis_db::start_scan_run(pool, row.id).await {
            fail_run_best_effort(pool, row.id, format!("{e:#}")).await;
            return Err(e.into());
        }
    }

    let params = ScanParams {
        registry: &registry,
        generator: generator.as_deref(),
        profile: &profile,
        domain,
        competitor,
        run_id,
        ledger: Some(Arc::clone(&ledger)),
        extractor: None,
        options: DispatchOptions {
            question_delay: std::time::Duration::from_millis(config.probe_question_delay_ms),
            cancel: None,
            on_progress: Some(Arc::new(|completed, total| {
                println!("progress: {completed}/{total} probes settled");
            })),
        },
    };

    let outcome = match &kind {
        ScanKind::Visibility => run_visibility_scan(params).await,
        ScanKind::Awareness => run_awareness_scan(params).await,
        ScanKind::Employer { job_families, limit } => {
            run_employer_scan(params, job_families, *limit).await
        }
    };

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            if let (Some(pool), Some(row)) = (&pool, &run_row) {
                fail_run_best_effort(pool, row.id, format!("{e:#}")).await;
            }
            return Err(e.into());
        }
    };

    if let (Some(pool), Some(row)) = (&pool, &run_row) {
        let probes = i32::try_from(outcome.report.total_probes).unwrap_or(i32::MAX);
        let mentions = i32::try_from(outcome.report.total_mentions).unwrap_or(i32::MAX);
        if let Err(e) = aivis_db::complete_scan_run(pool, row.id, probes, mentions).await {
            tracing::warn!(run_db_id = row.id, error = %e, "failed to mark scan run complete");
        }
        if let Err(e) = aivis_db::insert_report(pool, run_id.as_uuid(), &outcome.report).await {
            tracing::warn!(run_db_id = row.id, error = %e, "failed to persist report");
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_report(domain, &outcome);
    }

    Ok(())
}

/// Print the deterministic question sets without dispatching anything.
pub(crate) fn preview_questions(
    domain: &str,
    profile_path: &Path,
    competitor: Option<&str>,
) -> anyhow::Result<()> {
    let profile = load_profile(profile_path)?;

    println!("fallback probe set:");
    for question in fallback_questions(&profile) {
        println!("  [{}] {}", question.category, question.text);
    }

    println!();
    println!("brand-awareness set:");
    for question in awareness_questions(&profile, domain, competitor) {
        println!("  [{}] {}", question.category, question.text);
    }

    Ok(())
}

/// List recent scan runs from the database.
pub(crate) async fn list_runs(limit: i64) -> anyhow::Result<()> {
    let pool = aivis_db::connect_pool_from_env().await?;
    let runs = aivis_db::list_scan_runs(&pool, limit).await?;

    if runs.is_empty() {
        println!("no scan runs recorded");
        return Ok(());
    }

    for run in runs {
        println!(
            "{}  {:<10} {:<10} {:<28} {:>4} probes  {:>4} mentions  {}",
            run.created_at.format("%Y-%m-%d %H:%M"),
            run.scan_kind,
            run.status,
            run.domain,
            run.probes_total,
            run.mentions_total,
            run.public_id
        );
    }

    Ok(())
}
