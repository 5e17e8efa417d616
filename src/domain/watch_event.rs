//! Notifications published after every persisted monitoring result.
//!
//! Every saved snapshot, change, or update event emits a [`WatchEvent`]
//! through the [`super::EventBus`]. Events are broadcast to WebSocket
//! subscribers filtered by competitor.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{CompetitorId, DetectedChange, SnapshotId, UpdateEvent};

/// Domain notification emitted after a monitoring result is persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum WatchEvent {
    /// A new snapshot was stored.
    SnapshotCreated {
        /// Competitor identifier.
        competitor_id: CompetitorId,
        /// Stored snapshot.
        snapshot_id: SnapshotId,
        /// Page URL.
        url: String,
        /// Hash of the normalised text.
        content_hash: String,
        /// Storage timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A coarse page change was stored.
    ChangeDetected {
        /// Competitor identifier.
        competitor_id: CompetitorId,
        /// Stored change.
        change: Box<DetectedChange>,
    },

    /// A menu update event was stored.
    MenuUpdated {
        /// Competitor identifier.
        competitor_id: CompetitorId,
        /// Stored event.
        update: Box<UpdateEvent>,
    },
}

impl WatchEvent {
    /// Returns the competitor this event concerns.
    #[must_use]
    pub const fn competitor_id(&self) -> &CompetitorId {
        match self {
            Self::SnapshotCreated { competitor_id, .. }
            | Self::ChangeDetected { competitor_id, .. }
            | Self::MenuUpdated { competitor_id, .. } => competitor_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::SnapshotCreated { .. } => "snapshot_created",
            Self::ChangeDetected { .. } => "change_detected",
            Self::MenuUpdated { .. } => "menu_updated",
        }
    }
}

impl From<&DetectedChange> for WatchEvent {
    fn from(change: &DetectedChange) -> Self {
        Self::ChangeDetected {
            competitor_id: change.competitor_id.clone(),
            change: Box::new(change.clone()),
        }
    }
}

impl From<&UpdateEvent> for WatchEvent {
    fn from(update: &UpdateEvent) -> Self {
        Self::MenuUpdated {
            competitor_id: update.competitor_id.clone(),
            update: Box::new(update.clone()),
        }
    }
}
