//! Persistence layer: snapshots, detected changes, and update events.
//!
//! [`MonitoringStore`] is the append-only storage contract used by the
//! monitor service. Every write enforces its own retention cap, evicting
//! the oldest records first. Reads return newest-first.
//!
//! Two implementations are provided: [`MemoryStore`] (volatile, the
//! default) and [`PostgresStore`] on `sqlx::PgPool`.

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{CompetitorId, DetectedChange, Snapshot, UpdateEvent};
use crate::error::WatchError;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Maximum snapshots kept per competitor.
pub const DEFAULT_SNAPSHOT_RETENTION: usize = 100;
/// Maximum detected changes kept in total.
pub const DEFAULT_CHANGE_RETENTION: usize = 200;
/// Maximum update events kept in total.
pub const DEFAULT_EVENT_RETENTION: usize = 500;

/// Retention caps applied on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Snapshots kept per competitor.
    pub snapshots_per_competitor: usize,
    /// Changes kept across all competitors.
    pub changes: usize,
    /// Update events kept across all competitors.
    pub events: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            snapshots_per_competitor: DEFAULT_SNAPSHOT_RETENTION,
            changes: DEFAULT_CHANGE_RETENTION,
            events: DEFAULT_EVENT_RETENTION,
        }
    }
}

/// Append-only monitoring storage with bounded retention.
#[async_trait]
pub trait MonitoringStore: Send + Sync + fmt::Debug {
    /// Appends a snapshot and trims the competitor's history.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PersistenceError`] on storage failure.
    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), WatchError>;

    /// Most recent snapshot of `url` for `competitor_id`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PersistenceError`] on storage failure.
    async fn latest_snapshot(
        &self,
        competitor_id: &CompetitorId,
        url: &str,
    ) -> Result<Option<Snapshot>, WatchError>;

    /// Most recent snapshot of `url`, only if it carries menu items.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PersistenceError`] on storage failure.
    async fn latest_snapshot_with_menu(
        &self,
        competitor_id: &CompetitorId,
        url: &str,
    ) -> Result<Option<Snapshot>, WatchError> {
        Ok(self
            .latest_snapshot(competitor_id, url)
            .await?
            .filter(Snapshot::has_menu))
    }

    /// Snapshots of a competitor, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PersistenceError`] on storage failure.
    async fn snapshots_for_competitor(
        &self,
        competitor_id: &CompetitorId,
    ) -> Result<Vec<Snapshot>, WatchError>;

    /// Appends a detected change and trims the change log.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PersistenceError`] on storage failure.
    async fn save_change(&self, change: &DetectedChange) -> Result<(), WatchError>;

    /// Changes of a competitor, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PersistenceError`] on storage failure.
    async fn changes_for_competitor(
        &self,
        competitor_id: &CompetitorId,
    ) -> Result<Vec<DetectedChange>, WatchError>;

    /// Appends update events and trims the event log.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PersistenceError`] on storage failure.
    async fn save_update_events(&self, events: &[UpdateEvent]) -> Result<(), WatchError>;

    /// All update events, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PersistenceError`] on storage failure.
    async fn all_update_events(&self) -> Result<Vec<UpdateEvent>, WatchError>;

    /// Update events of a competitor, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PersistenceError`] on storage failure.
    async fn update_events_for_competitor(
        &self,
        competitor_id: &CompetitorId,
    ) -> Result<Vec<UpdateEvent>, WatchError>;

    /// Deletes every snapshot, change, and update event.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PersistenceError`] on storage failure.
    async fn clear_all(&self) -> Result<(), WatchError>;
}
