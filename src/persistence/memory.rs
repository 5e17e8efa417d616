//! Volatile in-process store.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{MonitoringStore, RetentionPolicy};
use crate::domain::{CompetitorId, DetectedChange, Snapshot, UpdateEvent};
use crate::error::WatchError;

#[derive(Debug, Default)]
struct Tables {
    snapshots: HashMap<CompetitorId, VecDeque<Snapshot>>,
    changes: VecDeque<DetectedChange>,
    events: VecDeque<UpdateEvent>,
}

/// [`MonitoringStore`] backed by in-memory queues.
///
/// Records are kept in insertion order; eviction pops from the front.
/// Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    retention: RetentionPolicy,
}

impl MemoryStore {
    /// Creates an empty store with the default retention caps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with custom retention caps.
    #[must_use]
    pub fn with_retention(retention: RetentionPolicy) -> Self {
        Self {
            tables: RwLock::default(),
            retention,
        }
    }
}

fn trim_front<T>(queue: &mut VecDeque<T>, cap: usize) {
    while queue.len() > cap {
        queue.pop_front();
    }
}

/// Newest first: reverse insertion order, then a stable sort on the
/// record timestamp so records saved out of order still line up.
fn newest_first<'a, T, K, I>(records: I, key: K) -> Vec<T>
where
    T: Clone + 'a,
    I: DoubleEndedIterator<Item = &'a T>,
    K: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    let mut out: Vec<T> = records.rev().cloned().collect();
    out.sort_by(|a, b| key(b).cmp(&key(a)));
    out
}

#[async_trait]
impl MonitoringStore for MemoryStore {
    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), WatchError> {
        let mut tables = self.tables.write().await;
        let history = tables
            .snapshots
            .entry(snapshot.competitor_id.clone())
            .or_default();
        history.push_back(snapshot.clone());
        trim_front(history, self.retention.snapshots_per_competitor);
        tracing::debug!(
            competitor_id = %snapshot.competitor_id,
            snapshot_id = %snapshot.id,
            retained = history.len(),
            "snapshot saved"
        );
        Ok(())
    }

    async fn latest_snapshot(
        &self,
        competitor_id: &CompetitorId,
        url: &str,
    ) -> Result<Option<Snapshot>, WatchError> {
        let tables = self.tables.read().await;
        Ok(tables.snapshots.get(competitor_id).and_then(|history| {
            // `max_by_key` keeps the last maximum: the newest insert on ties.
            history
                .iter()
                .filter(|s| s.url == url)
                .max_by_key(|s| s.created_at)
                .cloned()
        }))
    }

    async fn snapshots_for_competitor(
        &self,
        competitor_id: &CompetitorId,
    ) -> Result<Vec<Snapshot>, WatchError> {
        let tables = self.tables.read().await;
        Ok(tables
            .snapshots
            .get(competitor_id)
            .map(|history| newest_first(history.iter(), |s| s.created_at))
            .unwrap_or_default())
    }

    async fn save_change(&self, change: &DetectedChange) -> Result<(), WatchError> {
        let mut tables = self.tables.write().await;
        tables.changes.push_back(change.clone());
        trim_front(&mut tables.changes, self.retention.changes);
        tracing::debug!(change_id = %change.id, "change saved");
        Ok(())
    }

    async fn changes_for_competitor(
        &self,
        competitor_id: &CompetitorId,
    ) -> Result<Vec<DetectedChange>, WatchError> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .changes
                .iter()
                .filter(|c| &c.competitor_id == competitor_id),
            |c| c.detected_at,
        ))
    }

    async fn save_update_events(&self, events: &[UpdateEvent]) -> Result<(), WatchError> {
        let mut tables = self.tables.write().await;
        tables.events.extend(events.iter().cloned());
        trim_front(&mut tables.events, self.retention.events);
        tracing::debug!(saved = events.len(), total = tables.events.len(), "update events saved");
        Ok(())
    }

    async fn all_update_events(&self) -> Result<Vec<UpdateEvent>, WatchError> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.events.iter(), |e| e.created_at))
    }

    async fn update_events_for_competitor(
        &self,
        competitor_id: &CompetitorId,
    ) -> Result<Vec<UpdateEvent>, WatchError> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .events
                .iter()
                .filter(|e| &e.competitor_id == competitor_id),
            |e| e.created_at,
        ))
    }

    async fn clear_all(&self) -> Result<(), WatchError> {
        let mut tables = self.tables.write().await;
        *tables = Tables::default();
        tracing::info!("monitoring data cleared");
        Ok(())
    }
}
