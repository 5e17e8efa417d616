//! PostgreSQL implementation of the persistence layer.
//!
//! Each record is stored whole as JSONB next to the columns used for
//! filtering and ordering. A `seq` column breaks timestamp ties so that
//! retention and newest-first reads are deterministic.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{MonitoringStore, RetentionPolicy};
use crate::domain::{CompetitorId, DetectedChange, Snapshot, UpdateEvent};
use crate::error::WatchError;

/// PostgreSQL-backed [`MonitoringStore`] using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    retention: RetentionPolicy,
}

fn limit(cap: usize) -> i64 {
    i64::try_from(cap).unwrap_or(i64::MAX)
}

fn encode<T: Serialize>(record: &T) -> Result<serde_json::Value, WatchError> {
    Ok(serde_json::to_value(record)?)
}

fn decode<T: DeserializeOwned>(rows: Vec<serde_json::Value>) -> Result<Vec<T>, WatchError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(WatchError::from))
        .collect()
}

impl PostgresStore {
    /// Creates a store on an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool, retention: RetentionPolicy) -> Self {
        Self { pool, retention }
    }

    /// Connects to `database_url` and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`WatchError::PersistenceError`] if the connection or a
    /// migration fails.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        retention: RetentionPolicy,
    ) -> Result<Self, WatchError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let store = Self::new(pool, retention);
        store.migrate().await?;
        Ok(store)
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`WatchError::PersistenceError`] on migration failure.
    pub async fn migrate(&self) -> Result<(), WatchError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| WatchError::PersistenceError(e.to_string()))
    }
}

#[async_trait]
impl MonitoringStore for PostgresStore {
    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), WatchError> {
        let body = encode(snapshot)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO snapshots (id, competitor_id, url, created_at, body) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(snapshot.id.as_uuid())
        .bind(snapshot.competitor_id.as_str())
        .bind(&snapshot.url)
        .bind(snapshot.created_at)
        .bind(&body)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM snapshots WHERE competitor_id = $1 AND seq NOT IN ( \
               SELECT seq FROM snapshots WHERE competitor_id = $1 \
               ORDER BY created_at DESC, seq DESC LIMIT $2)",
        )
        .bind(snapshot.competitor_id.as_str())
        .bind(limit(self.retention.snapshots_per_competitor))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(
            competitor_id = %snapshot.competitor_id,
            snapshot_id = %snapshot.id,
            "snapshot saved"
        );
        Ok(())
    }

    async fn latest_snapshot(
        &self,
        competitor_id: &CompetitorId,
        url: &str,
    ) -> Result<Option<Snapshot>, WatchError> {
        let row = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT body FROM snapshots WHERE competitor_id = $1 AND url = $2 \
             ORDER BY created_at DESC, seq DESC LIMIT 1",
        )
        .bind(competitor_id.as_str())
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(serde_json::from_value).transpose()?)
    }

    async fn snapshots_for_competitor(
        &self,
        competitor_id: &CompetitorId,
    ) -> Result<Vec<Snapshot>, WatchError> {
        let rows = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT body FROM snapshots WHERE competitor_id = $1 \
             ORDER BY created_at DESC, seq DESC",
        )
        .bind(competitor_id.as_str())
        .fetch_all(&self.pool)
        .await?;
        decode(rows)
    }

    async fn save_change(&self, change: &DetectedChange) -> Result<(), WatchError> {
        let body = encode(change)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO changes (id, competitor_id, detected_at, body) VALUES ($1, $2, $3, $4)",
        )
        .bind(change.id.as_uuid())
        .bind(change.competitor_id.as_str())
        .bind(change.detected_at)
        .bind(&body)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM changes WHERE seq NOT IN ( \
               SELECT seq FROM changes ORDER BY detected_at DESC, seq DESC LIMIT $1)",
        )
        .bind(limit(self.retention.changes))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(change_id = %change.id, "change saved");
        Ok(())
    }

    async fn changes_for_competitor(
        &self,
        competitor_id: &CompetitorId,
    ) -> Result<Vec<DetectedChange>, WatchError> {
        let rows = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT body FROM changes WHERE competitor_id = $1 \
             ORDER BY detected_at DESC, seq DESC",
        )
        .bind(competitor_id.as_str())
        .fetch_all(&self.pool)
        .await?;
        decode(rows)
    }

    async fn save_update_events(&self, events: &[UpdateEvent]) -> Result<(), WatchError> {
        if events.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;

        for event in events {
            sqlx::query(
                "INSERT INTO update_events (id, competitor_id, event_type, created_at, body) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(event.id.as_uuid())
            .bind(event.competitor_id.as_str())
            .bind(event.event_type.as_str())
            .bind(event.created_at)
            .bind(encode(event)?)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "DELETE FROM update_events WHERE seq NOT IN ( \
               SELECT seq FROM update_events ORDER BY created_at DESC, seq DESC LIMIT $1)",
        )
        .bind(limit(self.retention.events))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(saved = events.len(), "update events saved");
        Ok(())
    }

    async fn all_update_events(&self) -> Result<Vec<UpdateEvent>, WatchError> {
        let rows = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT body FROM update_events ORDER BY created_at DESC, seq DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        decode(rows)
    }

    async fn update_events_for_competitor(
        &self,
        competitor_id: &CompetitorId,
    ) -> Result<Vec<UpdateEvent>, WatchError> {
        let rows = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT body FROM update_events WHERE competitor_id = $1 \
             ORDER BY created_at DESC, seq DESC",
        )
        .bind(competitor_id.as_str())
        .fetch_all(&self.pool)
        .await?;
        decode(rows)
    }

    async fn clear_all(&self) -> Result<(), WatchError> {
        sqlx::query("TRUNCATE snapshots, changes, update_events")
            .execute(&self.pool)
            .await?;
        tracing::info!("monitoring data cleared");
        Ok(())
    }
}
