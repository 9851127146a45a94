//! Append-only persistence of normalized activities.

use async_trait::async_trait;
use babylog_parser::NormalizedActivity;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};

use crate::db::DbPool;
use crate::error::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LogRowId(pub i64);

#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    /// Appends one row. Either the row is committed or nothing is.
    async fn insert(&self, activity: &NormalizedActivity) -> Result<LogRowId, StorageError>;
}

#[derive(Clone)]
pub struct PostgresActivityLog {
    pool: DbPool,
}

impl PostgresActivityLog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl ActivityLogRepository for PostgresActivityLog {
    async fn insert(&self, activity: &NormalizedActivity) -> Result<LogRowId, StorageError> {
        let mut tx = self.pool.begin().await?;
        let result = insert_row(&mut tx, activity, Utc::now()).await;
        let id = settle(tx, result).await?;
        info!(id = id.0, activity_type = %activity.activity_type(), "activity logged");
        Ok(id)
    }
}

/// Commits `tx` when `result` succeeded and rolls it back otherwise.
async fn settle<T>(
    tx: Transaction<'_, Postgres>,
    result: Result<T, sqlx::Error>,
) -> Result<T, StorageError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("failed to roll back activity insert: {rollback_err}");
            }
            Err(err.into())
        }
    }
}

async fn insert_row(
    tx: &mut Transaction<'_, Postgres>,
    activity: &NormalizedActivity,
    created_at: DateTime<Utc>,
) -> Result<LogRowId, sqlx::Error> {
    let fields = activity.fields();

    let id: i64 = sqlx::query_scalar(
        r#"
            INSERT INTO activity_logs (
                activity_type,
                milk_type,
                volume_ml,
                diaper_type,
                hardness,
                diaper_amount,
                sleep_state,
                recorded_at,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
        "#,
    )
    .bind(fields.activity_type.as_str())
    .bind(fields.milk_type)
    .bind(i64::from(fields.volume_ml))
    .bind(fields.diaper_type)
    .bind(fields.hardness)
    .bind(fields.diaper_amount)
    .bind(fields.sleep_state)
    .bind(fields.timestamp)
    .bind(created_at)
    .fetch_one(&mut **tx)
    .await?;

    Ok(LogRowId(id))
}
