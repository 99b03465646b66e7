//! Database operations for the append-only `cost_entries` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use aivis_core::{CostEntry, CostSink, CostSinkError};

use crate::DbError;

/// A row from the `cost_entries` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CostEntryRow {
    pub id: i64,
    pub run_id: Uuid,
    pub step: String,
    pub model: String,
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub estimated_cost_usd: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Append one cost entry.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn insert_cost_entry(pool: &PgPool, entry: &CostEntry) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO cost_entries \
         (run_id, step, model, input_tokens, output_tokens, estimated_cost_usd, recorded_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(entry.run_id.as_uuid())
    .bind(&entry.step)
    .bind(&entry.model)
    .bind(i32::try_from(entry.input_tokens).unwrap_or(i32::MAX))
    .bind(i32::try_from(entry.output_tokens).unwrap_or(i32::MAX))
    .bind(entry.estimated_cost_usd)
    .bind(entry.recorded_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// All entries for one run, in recording order.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_cost_entries_for_run(
    pool: &PgPool,
    run_id: Uuid,
) -> Result<Vec<CostEntryRow>, DbError> {
    Ok(sqlx::query_as::<_, CostEntryRow>(
        "SELECT id, run_id, step, model, input_tokens, output_tokens, estimated_cost_usd, \
                recorded_at \
         FROM cost_entries WHERE run_id = $1 ORDER BY id",
    )
    .bind(run_id)
    .fetch_all(pool)
    .await?)
}

/// Postgres-backed cost sink. Safe under concurrent writers; callers treat
/// failures as warnings per the cost-ledger contract.
pub struct PgCostSink {
    pool: PgPool,
}

impl PgCostSink {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CostSink for PgCostSink {
    async fn record(&self, entry: &CostEntry) -> Result<(), CostSinkError> {
        insert_cost_entry(&self.pool, entry)
            .await
            .map_err(|e| CostSinkError::Backend(e.to_string()))
    }
}
