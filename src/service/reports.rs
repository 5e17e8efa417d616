//! Results returned by [`super::MonitorService`] operations.

use chrono::{DateTime, Utc};

use crate::domain::{
    ChangeType, Competitor, DetectedChange, Snapshot, UpdateEvent, UpdateEventType,
    filter_events_by_type,
};

/// Message for a check that had nothing to compare against.
pub const FIRST_SNAPSHOT: &str = "First snapshot created";
/// Message for a check that found no significant difference.
pub const NO_CHANGES: &str = "No changes detected";
/// Message for a check that stored a [`DetectedChange`].
pub const CHANGE_DETECTED: &str = "Change detected";

/// Outcome of a coarse whole-page check.
#[derive(Debug, Clone)]
pub struct ChangeCheck {
    /// Stored change, if the page changed significantly.
    pub change: Option<DetectedChange>,
    /// Snapshot taken by this check.
    pub snapshot: Snapshot,
    /// Human-readable outcome.
    pub message: &'static str,
    /// Similarity to the previous snapshot when no change was stored.
    pub similarity: Option<f64>,
}

/// Outcome of a menu check for one competitor.
#[derive(Debug, Clone)]
pub enum CompetitorCheck {
    /// The page was fetched and compared.
    Checked {
        /// Competitor that was checked.
        competitor: Competitor,
        /// Update events produced by the diff.
        events: Vec<UpdateEvent>,
        /// Human-readable outcome.
        message: String,
    },
    /// The check failed; other competitors in the batch are unaffected.
    Failed {
        /// Competitor that was checked.
        competitor: Competitor,
        /// Failure reason.
        error: String,
    },
}

impl CompetitorCheck {
    /// Number of events produced (zero for failures).
    #[must_use]
    pub fn event_count(&self) -> usize {
        match self {
            Self::Checked { events, .. } => events.len(),
            Self::Failed { .. } => 0,
        }
    }
}

/// Outcome of a batch menu check.
#[derive(Debug, Clone)]
pub struct MenuCheckReport {
    /// When the batch finished.
    pub checked_at: DateTime<Utc>,
    /// Per-competitor results, in request order.
    pub results: Vec<CompetitorCheck>,
}

impl MenuCheckReport {
    /// Total events across all competitors.
    #[must_use]
    pub fn total_events(&self) -> usize {
        self.results.iter().map(CompetitorCheck::event_count).sum()
    }
}

/// Changes of one competitor partitioned by type, newest first.
#[derive(Debug, Clone, Default)]
pub struct ChangesByType {
    /// Every change.
    pub all: Vec<DetectedChange>,
    /// Product changes.
    pub product: Vec<DetectedChange>,
    /// Pricing changes.
    pub pricing: Vec<DetectedChange>,
    /// Other changes.
    pub other: Vec<DetectedChange>,
}

impl ChangesByType {
    /// Partitions `changes`, preserving order within each group.
    #[must_use]
    pub fn new(changes: Vec<DetectedChange>) -> Self {
        let pick = |ty: ChangeType| -> Vec<DetectedChange> {
            changes
                .iter()
                .filter(|c| c.change_type == ty)
                .cloned()
                .collect()
        };
        Self {
            product: pick(ChangeType::Product),
            pricing: pick(ChangeType::Pricing),
            other: pick(ChangeType::Other),
            all: changes,
        }
    }
}

/// Monitoring summary for one competitor.
#[derive(Debug, Clone)]
pub struct CompetitorOverview {
    /// Changes grouped by type.
    pub changes: ChangesByType,
    /// Most recent snapshots, newest first.
    pub recent_snapshots: Vec<Snapshot>,
    /// Newest snapshot, if any.
    pub last_snapshot: Option<Snapshot>,
}

/// Update events with their type partitions, newest first.
#[derive(Debug, Clone, Default)]
pub struct UpdateFeed {
    /// Every event.
    pub events: Vec<UpdateEvent>,
    /// `PRODUCT_ADDED` events.
    pub product_updates: Vec<UpdateEvent>,
    /// `PRICE_CHANGED` events.
    pub price_updates: Vec<UpdateEvent>,
}

impl UpdateFeed {
    /// Partitions `events` by type.
    #[must_use]
    pub fn new(events: Vec<UpdateEvent>) -> Self {
        Self {
            product_updates: filter_events_by_type(&events, UpdateEventType::ProductAdded),
            price_updates: filter_events_by_type(&events, UpdateEventType::PriceChanged),
            events,
        }
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    /// All stored update events.
    pub total_threats: usize,
    /// Price changes plus product additions.
    pub high_severity: usize,
    /// Distinct competitors with events, at least one.
    pub monitored_orgs: usize,
    /// Events in the last 24 hours.
    pub recent_changes: usize,
    /// Change of the last 24 hours against the 24 hours before, in percent.
    pub trend_percent: i64,
}

impl DashboardStats {
    /// Computes the stats for `events` as of `now`.
    #[must_use]
    pub fn compute(events: &[UpdateEvent], now: DateTime<Utc>) -> Self {
        let day_ago = now - chrono::Duration::hours(24);
        let two_days_ago = now - chrono::Duration::hours(48);

        let high_severity = events
            .iter()
            .filter(|e| {
                matches!(
                    e.event_type,
                    UpdateEventType::PriceChanged | UpdateEventType::ProductAdded
                )
            })
            .count();

        let monitored_orgs = events
            .iter()
            .map(|e| &e.competitor_id)
            .collect::<std::collections::HashSet<_>>()
            .len()
            .max(1);

        let recent = events.iter().filter(|e| e.created_at > day_ago).count();
        let previous = events
            .iter()
            .filter(|e| e.created_at > two_days_ago && e.created_at <= day_ago)
            .count();

        Self {
            total_threats: events.len(),
            high_severity,
            monitored_orgs,
            recent_changes: recent,
            trend_percent: trend(recent, previous),
        }
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn trend(recent: usize, previous: usize) -> i64 {
    if previous > 0 {
        let delta = recent as f64 - previous as f64;
        (delta / previous as f64 * 100.0).round() as i64
    } else if recent > 0 {
        100
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::{CompetitorId, EventSource, MenuItem};

    fn event(competitor: &str, age_hours: i64, now: DateTime<Utc>) -> UpdateEvent {
        let id = CompetitorId(competitor.to_string());
        let mut e = UpdateEvent::product_added(
            EventSource {
                competitor_id: &id,
                competitor_name: competitor,
                url: "http://localhost/pizza-website",
            },
            &MenuItem {
                key: "k".to_string(),
                name: "Pie".to_string(),
                price: 10.0,
                description: None,
                product_id: None,
            },
        );
        e.created_at = now - Duration::hours(age_hours);
        e
    }

    #[test]
    fn empty_stats_count_one_org() {
        let stats = DashboardStats::compute(&[], Utc::now());
        assert_eq!(stats.total_threats, 0);
        assert_eq!(stats.monitored_orgs, 1);
        assert_eq!(stats.trend_percent, 0);
    }

    #[test]
    fn trend_compares_consecutive_days() {
        let now = Utc::now();
        let events = [
            event("a", 1, now),
            event("a", 2, now),
            event("a", 3, now),
            event("b", 30, now),
            event("b", 30, now),
            event("b", 72, now),
        ];
        let stats = DashboardStats::compute(&events, now);
        assert_eq!(stats.total_threats, 6);
        assert_eq!(stats.high_severity, 6);
        assert_eq!(stats.monitored_orgs, 2);
        assert_eq!(stats.recent_changes, 3);
        assert_eq!(stats.trend_percent, 50);
    }

    #[test]
    fn trend_without_history_is_hundred() {
        assert_eq!(trend(4, 0), 100);
        assert_eq!(trend(0, 4), -100);
    }
}
