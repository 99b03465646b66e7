//! Database operations for the `visibility_reports` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use aivis_core::VisibilityReport;

use crate::DbError;

/// A row from the `visibility_reports` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportRow {
    pub id: i64,
    pub run_id: Uuid,
    pub overall_score: i16,
    pub report: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Persist one run's report as JSON.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure or if the report fails to
/// serialize (which indicates a bug, not bad input).
pub async fn insert_report(
    pool: &PgPool,
    run_id: Uuid,
    report: &VisibilityReport,
) -> Result<(), DbError> {
    let json = serde_json::to_value(report)
        .map_err(|e| DbError::Sqlx(sqlx::Error::Encode(Box::new(e))))?;
    sqlx::query(
        "INSERT INTO visibility_reports (run_id, overall_score, report) VALUES ($1, $2, $3)",
    )
    .bind(run_id)
    .bind(i16::from(report.overall_score))
    .bind(json)
    .execute(pool)
    .await?;
    Ok(())
}

/// Fetch the persisted report for a run.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no report exists for the run.
pub async fn get_report(pool: &PgPool, run_id: Uuid) -> Result<ReportRow, DbError> {
    sqlx::query_as::<_, ReportRow>(
        "SELECT id, run_id, overall_score, report, created_at \
         FROM visibility_reports WHERE run_id = $1",
    )
    .bind(run_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}
