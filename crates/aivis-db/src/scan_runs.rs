//! Database operations for the `scan_runs` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `scan_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScanRunRow {
    pub id: i64,
    pub public_id: Uuid,
    /// `visibility`, `awareness`, or `employer`.
    pub scan_kind: String,
    pub trigger_source: String,
    pub status: String,
    pub domain: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub probes_total: i32,
    pub mentions_total: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

const SELECT_COLUMNS: &str = "id, public_id, scan_kind, trigger_source, status, domain, \
     started_at, completed_at, probes_total, mentions_total, error_message, created_at";

/// Create a pending scan run.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn create_scan_run(
    pool: &PgPool,
    public_id: Uuid,
    scan_kind: &str,
    trigger_source: &str,
    domain: &str,
) -> Result<ScanRunRow, DbError> {
    Ok(sqlx::query_as::<_, ScanRunRow>(&format!(
        "INSERT INTO scan_runs (public_id, scan_kind, trigger_source, domain) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {SELECT_COLUMNS}"
    ))
    .bind(public_id)
    .bind(scan_kind)
    .bind(trigger_source)
    .bind(domain)
    .fetch_one(pool)
    .await?)
}

/// Mark a run as running and stamp `started_at`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no pending run matches.
pub async fn start_scan_run(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE scan_runs SET status = 'running', started_at = now() \
         WHERE id = $1 AND status = 'pending'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Mark a run as completed with its final tallies.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no running run matches.
pub async fn complete_scan_run(
    pool: &PgPool,
    id: i64,
    probes_total: i32,
    mentions_total: i32,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE scan_runs \
         SET status = 'completed', completed_at = now(), probes_total = $2, mentions_total = $3 \
         WHERE id = $1 AND status = 'running'",
    )
    .bind(id)
    .bind(probes_total)
    .bind(mentions_total)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Mark a run as failed with an error message.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn fail_scan_run(pool: &PgPool, id: i64, error_message: &str) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE scan_runs SET status = 'failed', completed_at = now(), error_message = $2 \
         WHERE id = $1",
    )
    .bind(id)
    .bind(error_message)
    .execute(pool)
    .await?;
    Ok(())
}

/// Fetch one run by internal id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the run does not exist.
pub async fn get_scan_run(pool: &PgPool, id: i64) -> Result<ScanRunRow, DbError> {
    sqlx::query_as::<_, ScanRunRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM scan_runs WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// List the most recent runs, newest first.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_scan_runs(pool: &PgPool, limit: i64) -> Result<Vec<ScanRunRow>, DbError> {
    Ok(sqlx::query_as::<_, ScanRunRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM scan_runs ORDER BY created_at DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?)
}
