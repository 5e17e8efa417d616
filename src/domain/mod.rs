//! Domain layer: core records, identifiers, and the event system.
//!
//! This module contains the monitoring data model (snapshots, menu items,
//! detected changes, update events), typed identifiers, the event bus
//! for broadcasting persisted results, and the per-page check locks.

pub mod change;
pub mod check_locks;
pub mod competitor;
pub mod event_bus;
pub mod ids;
pub mod snapshot;
pub mod update_event;
pub mod watch_event;

pub use change::{ChangeType, Classification, DetectedChange, Severity};
pub use check_locks::{CheckGuard, CheckLocks};
pub use competitor::Competitor;
pub use event_bus::EventBus;
pub use ids::{ChangeId, CompetitorId, EventId, SnapshotId};
pub use snapshot::{MenuItem, Snapshot};
pub use update_event::{
    EventSource, UpdateEvent, UpdateEventType, UpdatePayload, filter_events_by_type,
};
pub use watch_event::WatchEvent;
