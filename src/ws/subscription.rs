//! Per-connection subscription manager.
//!
//! Tracks which competitors a WebSocket client follows and provides
//! server-side event filtering.

use std::collections::HashSet;

use crate::domain::CompetitorId;

/// Manages the set of competitor subscriptions for a single connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Followed competitors. Ignored while `subscribe_all` is set.
    competitor_ids: HashSet<CompetitorId>,
    /// Whether the client follows every competitor (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds competitors to the subscription set.
    pub fn subscribe(&mut self, ids: &[CompetitorId], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.competitor_ids.extend(ids.iter().cloned());
    }

    /// Removes competitors from the subscription set.
    pub fn unsubscribe(&mut self, ids: &[CompetitorId], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for id in ids {
            self.competitor_ids.remove(id);
        }
    }

    /// Returns `true` if events of `competitor_id` should be forwarded.
    #[must_use]
    pub fn matches(&self, competitor_id: &CompetitorId) -> bool {
        self.subscribe_all || self.competitor_ids.contains(competitor_id)
    }

    /// Returns the number of explicitly followed competitors.
    #[must_use]
    pub fn count(&self) -> usize {
        self.competitor_ids.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub const fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> CompetitorId {
        CompetitorId(raw.to_string())
    }

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(&id("acme")));
    }

    #[test]
    fn subscribe_specific_competitor() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[id("acme")], false);
        assert!(mgr.matches(&id("acme")));
        assert!(!mgr.matches(&id("globex")));
        assert_eq!(mgr.count(), 1);
    }

    #[test]
    fn wildcard_matches_everything_until_cleared() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[], true);
        assert!(mgr.matches(&id("acme")));
        assert!(mgr.is_subscribed_all());

        mgr.unsubscribe(&[], true);
        assert!(!mgr.matches(&id("acme")));
    }

    #[test]
    fn unsubscribe_removes_competitor() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[id("acme"), id("globex")], false);
        mgr.unsubscribe(&[id("acme")], false);
        assert!(!mgr.matches(&id("acme")));
        assert!(mgr.matches(&id("globex")));
    }
}
