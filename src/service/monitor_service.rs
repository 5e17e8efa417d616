//! Monitor service: runs checks end to end and emits events.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;

use super::reports::{
    CHANGE_DETECTED, ChangeCheck, ChangesByType, CompetitorCheck, CompetitorOverview,
    DashboardStats, FIRST_SNAPSHOT, MenuCheckReport, NO_CHANGES, UpdateFeed,
};
use crate::detection::{ChangeDetector, diff_menus, similarity};
use crate::domain::{
    CheckLocks, Competitor, CompetitorId, EventBus, EventSource, Snapshot, UpdateEvent, WatchEvent,
};
use crate::enrichment::{Enricher, enrich};
use crate::error::WatchError;
use crate::persistence::MonitoringStore;
use crate::snapshot::SnapshotBuilder;

/// Snapshots returned in a competitor overview.
pub const OVERVIEW_SNAPSHOTS: usize = 10;

/// Orchestration layer for all monitoring operations.
///
/// Every check follows the same linear pipeline: lock the page, read the
/// previous snapshot, fetch a new one, compare, optionally enrich, then
/// persist and publish. Nothing is written until the results are
/// complete, and the new snapshot is written after the change records,
/// so a check abandoned mid-write is detected again on the next run.
#[derive(Debug)]
pub struct MonitorService {
    builder: SnapshotBuilder,
    detector: ChangeDetector,
    enricher: Arc<dyn Enricher>,
    store: Arc<dyn MonitoringStore>,
    event_bus: EventBus,
    locks: CheckLocks,
    default_competitor: Competitor,
}

/// Pipeline stages of a [`MonitorService`].
#[derive(Debug)]
pub struct MonitorParts {
    /// Page snapshotting.
    pub builder: SnapshotBuilder,
    /// Whole-page comparison.
    pub detector: ChangeDetector,
    /// Optional classification upgrade.
    pub enricher: Arc<dyn Enricher>,
    /// Record storage.
    pub store: Arc<dyn MonitoringStore>,
}

impl MonitorService {
    /// Creates a new `MonitorService`.
    #[must_use]
    pub fn new(parts: MonitorParts, event_bus: EventBus, default_competitor: Competitor) -> Self {
        Self {
            builder: parts.builder,
            detector: parts.detector,
            enricher: parts.enricher,
            store: parts.store,
            event_bus,
            locks: CheckLocks::new(),
            default_competitor,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub const fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns the competitor checked when a request names none.
    #[must_use]
    pub const fn default_competitor(&self) -> &Competitor {
        &self.default_competitor
    }

    fn publish_snapshot(&self, snapshot: &Snapshot) {
        let _ = self.event_bus.publish(WatchEvent::SnapshotCreated {
            competitor_id: snapshot.competitor_id.clone(),
            snapshot_id: snapshot.id,
            url: snapshot.url.clone(),
            content_hash: snapshot.content_hash.clone(),
            timestamp: snapshot.created_at,
        });
    }

    async fn persist_snapshot(&self, snapshot: &Snapshot) -> Result<(), WatchError> {
        self.store.save_snapshot(snapshot).await?;
        self.publish_snapshot(snapshot);
        Ok(())
    }

    /// Fetches and stores a snapshot of `url`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Fetch`] if the page cannot be retrieved, or a
    /// persistence error.
    pub async fn create_snapshot(
        &self,
        competitor_id: &CompetitorId,
        url: &str,
    ) -> Result<Snapshot, WatchError> {
        let snapshot = self.builder.create_snapshot(competitor_id, url).await?;
        self.persist_snapshot(&snapshot).await?;
        tracing::info!(%competitor_id, url, snapshot_id = %snapshot.id, "snapshot created");
        Ok(snapshot)
    }

    /// Returns the latest stored snapshot of `url`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::SnapshotNotFound`] if there is none.
    pub async fn latest_snapshot(
        &self,
        competitor_id: &CompetitorId,
        url: &str,
    ) -> Result<Snapshot, WatchError> {
        self.store
            .latest_snapshot(competitor_id, url)
            .await?
            .ok_or_else(|| WatchError::SnapshotNotFound {
                competitor_id: competitor_id.to_string(),
                url: url.to_string(),
            })
    }

    /// Compares a fresh snapshot of `url` with the previous one.
    ///
    /// Significant changes are enriched (best effort) and stored.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Fetch`] if the page cannot be retrieved, or a
    /// persistence error.
    pub async fn check_changes(
        &self,
        competitor_id: &CompetitorId,
        url: &str,
    ) -> Result<ChangeCheck, WatchError> {
        let _guard = self.locks.acquire(competitor_id, url).await;

        let previous = self.store.latest_snapshot(competitor_id, url).await?;
        let snapshot = self.builder.create_snapshot(competitor_id, url).await?;

        let Some(previous) = previous else {
            self.persist_snapshot(&snapshot).await?;
            tracing::info!(%competitor_id, url, "first snapshot created");
            return Ok(ChangeCheck {
                change: None,
                snapshot,
                message: FIRST_SNAPSHOT,
                similarity: None,
            });
        };

        let Some(change) = self.detector.detect(&previous, &snapshot) else {
            self.persist_snapshot(&snapshot).await?;
            let score = similarity(&previous.normalized_text, &snapshot.normalized_text);
            tracing::info!(%competitor_id, url, similarity = score, "no changes detected");
            return Ok(ChangeCheck {
                change: None,
                snapshot,
                message: NO_CHANGES,
                similarity: Some(score),
            });
        };

        let change = enrich(self.enricher.as_ref(), change).await;

        // Snapshot last: once stored it is the baseline of the next check.
        self.store.save_change(&change).await?;
        self.persist_snapshot(&snapshot).await?;
        let _ = self.event_bus.publish(WatchEvent::from(&change));

        tracing::info!(
            %competitor_id,
            url,
            change_type = %change.change_type,
            severity = %change.severity,
            "change stored"
        );
        Ok(ChangeCheck {
            change: Some(change),
            snapshot,
            message: CHANGE_DETECTED,
            similarity: None,
        })
    }

    /// Runs a menu check for each competitor.
    ///
    /// `competitors` defaults to the configured default competitor; when
    /// `only` is set the list is filtered to that id. Competitors are
    /// checked concurrently and a failure of one does not affect the
    /// others.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidRequest`] if no competitor is left to
    /// check.
    pub async fn check_menus(
        &self,
        competitors: Option<Vec<Competitor>>,
        only: Option<&CompetitorId>,
    ) -> Result<MenuCheckReport, WatchError> {
        let mut competitors =
            competitors.unwrap_or_else(|| vec![self.default_competitor.clone()]);
        if let Some(id) = only {
            competitors.retain(|c| &c.id == id);
        }
        if competitors.is_empty() {
            return Err(WatchError::InvalidRequest(
                "No competitors found to check".to_string(),
            ));
        }

        tracing::info!(count = competitors.len(), "checking competitor menus");
        let results = join_all(competitors.into_iter().map(|c| self.check_menu(c))).await;

        let report = MenuCheckReport {
            checked_at: Utc::now(),
            results,
        };
        tracing::info!(total_events = report.total_events(), "menu check complete");
        Ok(report)
    }

    async fn check_menu(&self, competitor: Competitor) -> CompetitorCheck {
        match self.diff_competitor_menu(&competitor).await {
            Ok((events, message)) => CompetitorCheck::Checked {
                competitor,
                events,
                message,
            },
            Err(e) => {
                tracing::warn!(competitor_id = %competitor.id, error = %e, "menu check failed");
                CompetitorCheck::Failed {
                    competitor,
                    error: e.to_string(),
                }
            }
        }
    }

    async fn diff_competitor_menu(
        &self,
        competitor: &Competitor,
    ) -> Result<(Vec<UpdateEvent>, String), WatchError> {
        let url = competitor.url();
        let _guard = self.locks.acquire(&competitor.id, &url).await;

        let previous = self
            .store
            .latest_snapshot_with_menu(&competitor.id, &url)
            .await?;
        let snapshot = self.builder.create_snapshot(&competitor.id, &url).await?;

        let (Some(old_items), Some(new_items)) = (
            previous.and_then(|s| s.menu_items),
            snapshot.menu_items.as_deref(),
        ) else {
            self.persist_snapshot(&snapshot).await?;
            tracing::info!(competitor_id = %competitor.id, "first menu snapshot created");
            return Ok((Vec::new(), FIRST_SNAPSHOT.to_string()));
        };

        let events = diff_menus(
            &old_items,
            new_items,
            EventSource {
                competitor_id: &competitor.id,
                competitor_name: &competitor.name,
                url: &url,
            },
        );

        if !events.is_empty() {
            self.store.save_update_events(&events).await?;
        }
        self.persist_snapshot(&snapshot).await?;
        for event in &events {
            let _ = self.event_bus.publish(WatchEvent::from(event));
        }

        tracing::info!(competitor_id = %competitor.id, events = events.len(), "menu checked");
        let message = if events.is_empty() {
            NO_CHANGES.to_string()
        } else {
            format!("Found {} update(s)", events.len())
        };
        Ok((events, message))
    }

    /// Returns the changes and recent snapshots of a competitor.
    ///
    /// # Errors
    ///
    /// Returns a persistence error.
    pub async fn competitor_overview(
        &self,
        competitor_id: &CompetitorId,
    ) -> Result<CompetitorOverview, WatchError> {
        let changes = self.store.changes_for_competitor(competitor_id).await?;
        let mut snapshots = self.store.snapshots_for_competitor(competitor_id).await?;
        snapshots.truncate(OVERVIEW_SNAPSHOTS);

        Ok(CompetitorOverview {
            changes: ChangesByType::new(changes),
            last_snapshot: snapshots.first().cloned(),
            recent_snapshots: snapshots,
        })
    }

    /// Returns stored update events, optionally for one competitor.
    ///
    /// # Errors
    ///
    /// Returns a persistence error.
    pub async fn update_feed(
        &self,
        competitor_id: Option<&CompetitorId>,
    ) -> Result<UpdateFeed, WatchError> {
        let events = match competitor_id {
            Some(id) => self.store.update_events_for_competitor(id).await?,
            None => self.store.all_update_events().await?,
        };
        Ok(UpdateFeed::new(events))
    }

    /// Computes dashboard numbers as of `now`.
    ///
    /// # Errors
    ///
    /// Returns a persistence error.
    pub async fn dashboard_stats(&self, now: DateTime<Utc>) -> Result<DashboardStats, WatchError> {
        let events = self.store.all_update_events().await?;
        Ok(DashboardStats::compute(&events, now))
    }

    /// Deletes all stored monitoring data.
    ///
    /// # Errors
    ///
    /// Returns a persistence error.
    pub async fn clear_all(&self) -> Result<(), WatchError> {
        self.store.clear_all().await?;
        tracing::info!("all monitoring data cleared");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::RwLock;

    use super::*;
    use crate::domain::{ChangeType, Classification, DetectedChange, Severity, UpdateEventType};
    use crate::enrichment::{DisabledEnricher, EnrichmentRequest};
    use crate::error::{EnrichmentError, FetchError};
    use crate::persistence::MemoryStore;
    use crate::snapshot::{PageFetcher, SnapshotOptions};

    const MENU_URL: &str = "http://fixture.test/pizza-website";
    const PRICING_URL: &str = "http://fixture.test/pricing";

    #[derive(Debug, Default)]
    struct FakeSite {
        pages: RwLock<HashMap<String, String>>,
    }

    impl FakeSite {
        async fn set(&self, url: &str, body: &str) {
            self.pages.write().await.insert(url.to_string(), body.to_string());
        }
    }

    #[async_trait]
    impl PageFetcher for FakeSite {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.pages
                .read()
                .await
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    #[derive(Debug)]
    struct CannedEnricher;

    #[async_trait]
    impl Enricher for CannedEnricher {
        async fn classify(
            &self,
            _request: &EnrichmentRequest,
        ) -> Result<Classification, EnrichmentError> {
            Ok(Classification {
                change_type: ChangeType::Pricing,
                severity: Severity::Medium,
                rationale: "Enterprise tier repriced".to_string(),
                recommended_actions: vec!["Review enterprise pricing".to_string()],
            })
        }
    }

    fn menu_html(items: &[(u32, &str, &str)]) -> String {
        let products: String = items
            .iter()
            .map(|(id, name, price)| {
                format!(
                    r#"<div class="product"><div class="product-info">
<h3 class="product-name">{name}</h3>
<span class="product-price" data-product-id="{id}">{price}</span>
<p class="product-description">{name} description</p>
</div></div>"#
                )
            })
            .collect();
        format!("<html><head><title>Slice</title></head><body>{products}</body></html>")
    }

    /// Memory store whose change and event writes can be made to hang or fail.
    #[derive(Debug, Default)]
    struct FlakyStore {
        inner: MemoryStore,
        stall_changes: AtomicBool,
        fail_events: AtomicBool,
    }

    #[async_trait]
    impl MonitoringStore for FlakyStore {
        async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), WatchError> {
            self.inner.save_snapshot(snapshot).await
        }

        async fn latest_snapshot(
            &self,
            competitor_id: &CompetitorId,
            url: &str,
        ) -> Result<Option<Snapshot>, WatchError> {
            self.inner.latest_snapshot(competitor_id, url).await
        }

        async fn snapshots_for_competitor(
            &self,
            competitor_id: &CompetitorId,
        ) -> Result<Vec<Snapshot>, WatchError> {
            self.inner.snapshots_for_competitor(competitor_id).await
        }

        async fn save_change(&self, change: &DetectedChange) -> Result<(), WatchError> {
            if self.stall_changes.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            self.inner.save_change(change).await
        }

        async fn changes_for_competitor(
            &self,
            competitor_id: &CompetitorId,
        ) -> Result<Vec<DetectedChange>, WatchError> {
            self.inner.changes_for_competitor(competitor_id).await
        }

        async fn save_update_events(&self, events: &[UpdateEvent]) -> Result<(), WatchError> {
            if self.fail_events.load(Ordering::SeqCst) {
                return Err(WatchError::PersistenceError("disk full".to_string()));
            }
            self.inner.save_update_events(events).await
        }

        async fn all_update_events(&self) -> Result<Vec<UpdateEvent>, WatchError> {
            self.inner.all_update_events().await
        }

        async fn update_events_for_competitor(
            &self,
            competitor_id: &CompetitorId,
        ) -> Result<Vec<UpdateEvent>, WatchError> {
            self.inner.update_events_for_competitor(competitor_id).await
        }

        async fn clear_all(&self) -> Result<(), WatchError> {
            self.inner.clear_all().await
        }
    }

    fn service(site: Arc<FakeSite>, enricher: Arc<dyn Enricher>) -> MonitorService {
        service_with_store(site, enricher, Arc::new(MemoryStore::new()))
    }

    fn service_with_store(
        site: Arc<FakeSite>,
        enricher: Arc<dyn Enricher>,
        store: Arc<dyn MonitoringStore>,
    ) -> MonitorService {
        MonitorService::new(
            MonitorParts {
                builder: SnapshotBuilder::new(site, SnapshotOptions::default()),
                detector: ChangeDetector::default(),
                enricher,
                store,
            },
            EventBus::new(64),
            Competitor::new("pizza-demo", "Slice & Wood Pizzeria", MENU_URL),
        )
    }

    fn acme() -> CompetitorId {
        CompetitorId("acme".to_string())
    }

    #[tokio::test]
    async fn check_changes_lifecycle() {
        let site = Arc::new(FakeSite::default());
        let svc = service(Arc::clone(&site), Arc::new(DisabledEnricher));
        site.set(PRICING_URL, "<p>Enterprise plan $5,000 / month</p>").await;

        let Ok(first) = svc.check_changes(&acme(), PRICING_URL).await else {
            panic!("first check failed");
        };
        assert_eq!(first.message, FIRST_SNAPSHOT);
        assert!(first.change.is_none());

        let Ok(same) = svc.check_changes(&acme(), PRICING_URL).await else {
            panic!("second check failed");
        };
        assert_eq!(same.message, NO_CHANGES);
        assert_eq!(same.similarity, Some(1.0));

        site.set(PRICING_URL, "<p>Enterprise plan $4,250 / month</p>").await;
        let Ok(changed) = svc.check_changes(&acme(), PRICING_URL).await else {
            panic!("third check failed");
        };
        assert_eq!(changed.message, CHANGE_DETECTED);
        let Some(change) = changed.change else {
            panic!("expected a change");
        };
        assert_eq!(change.change_type, ChangeType::Pricing);
        assert_eq!(change.severity, Severity::High);
        assert!(change.rationale.is_none());

        let Ok(overview) = svc.competitor_overview(&acme()).await else {
            panic!("overview failed");
        };
        assert_eq!(overview.changes.all.len(), 1);
        assert_eq!(overview.changes.pricing.len(), 1);
        assert_eq!(overview.recent_snapshots.len(), 3);
        assert_eq!(
            overview.last_snapshot.map(|s| s.id),
            Some(changed.snapshot.id)
        );
    }

    #[tokio::test]
    async fn enrichment_overrides_and_is_published() {
        let site = Arc::new(FakeSite::default());
        let svc = service(Arc::clone(&site), Arc::new(CannedEnricher));
        let mut rx = svc.event_bus().subscribe();

        site.set(PRICING_URL, "<p>Enterprise plan $5,000 / month</p>").await;
        assert!(svc.check_changes(&acme(), PRICING_URL).await.is_ok());
        site.set(PRICING_URL, "<p>Enterprise plan $4,250 / month</p>").await;
        let Ok(check) = svc.check_changes(&acme(), PRICING_URL).await else {
            panic!("check failed");
        };
        let Some(change) = check.change else {
            panic!("expected a change");
        };
        assert_eq!(change.severity, Severity::Medium);
        assert_eq!(change.rationale.as_deref(), Some("Enterprise tier repriced"));

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push(event.event_type_str());
        }
        assert_eq!(kinds, vec!["snapshot_created", "snapshot_created", "change_detected"]);
    }

    #[tokio::test]
    async fn fetch_failure_stores_nothing() {
        let site = Arc::new(FakeSite::default());
        let svc = service(site, Arc::new(DisabledEnricher));
        let result = svc.check_changes(&acme(), PRICING_URL).await;
        assert!(matches!(result, Err(WatchError::Fetch(FetchError::Status { status: 404, .. }))));
        assert!(matches!(
            svc.latest_snapshot(&acme(), PRICING_URL).await,
            Err(WatchError::SnapshotNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn abandoned_change_write_is_detected_again() {
        let site = Arc::new(FakeSite::default());
        let store = Arc::new(FlakyStore::default());
        let svc = service_with_store(
            Arc::clone(&site),
            Arc::new(DisabledEnricher),
            Arc::clone(&store) as Arc<dyn MonitoringStore>,
        );
        site.set(PRICING_URL, "<p>Enterprise plan $5,000 / month</p>").await;
        assert!(svc.check_changes(&acme(), PRICING_URL).await.is_ok());

        site.set(PRICING_URL, "<p>Enterprise plan $4,250 / month</p>").await;
        store.stall_changes.store(true, Ordering::SeqCst);
        let abandoned = tokio::time::timeout(
            Duration::from_millis(100),
            svc.check_changes(&acme(), PRICING_URL),
        )
        .await;
        assert!(abandoned.is_err());

        store.stall_changes.store(false, Ordering::SeqCst);
        let Ok(retry) = svc.check_changes(&acme(), PRICING_URL).await else {
            panic!("retry failed");
        };
        assert_eq!(retry.message, CHANGE_DETECTED);
        let Ok(overview) = svc.competitor_overview(&acme()).await else {
            panic!("overview failed");
        };
        assert_eq!(overview.changes.all.len(), 1);
    }

    #[tokio::test]
    async fn failed_event_write_keeps_previous_menu() {
        let site = Arc::new(FakeSite::default());
        let store = Arc::new(FlakyStore::default());
        let svc = service_with_store(
            Arc::clone(&site),
            Arc::new(DisabledEnricher),
            Arc::clone(&store) as Arc<dyn MonitoringStore>,
        );
        site.set(MENU_URL, &menu_html(&[(1, "Margherita", "$14")])).await;
        assert!(svc.check_menus(None, None).await.is_ok());

        site.set(MENU_URL, &menu_html(&[(1, "Margherita", "$16")])).await;
        store.fail_events.store(true, Ordering::SeqCst);
        let Ok(failed) = svc.check_menus(None, None).await else {
            panic!("batch failed");
        };
        assert!(matches!(
            failed.results.first(),
            Some(CompetitorCheck::Failed { error, .. }) if error.contains("disk full")
        ));

        store.fail_events.store(false, Ordering::SeqCst);
        let Ok(retry) = svc.check_menus(None, None).await else {
            panic!("retry failed");
        };
        assert_eq!(retry.total_events(), 1);
    }

    #[tokio::test]
    async fn menu_check_emits_additions_and_price_changes() {
        let site = Arc::new(FakeSite::default());
        let svc = service(Arc::clone(&site), Arc::new(DisabledEnricher));
        site.set(MENU_URL, &menu_html(&[(1, "Margherita", "$14"), (2, "Pepperoni", "$15.40")]))
            .await;

        let Ok(first) = svc.check_menus(None, None).await else {
            panic!("first check failed");
        };
        assert_eq!(first.total_events(), 0);
        assert!(matches!(
            first.results.first(),
            Some(CompetitorCheck::Checked { message, .. }) if message == FIRST_SNAPSHOT
        ));

        site.set(
            MENU_URL,
            &menu_html(&[
                (1, "Margherita", "$16"),
                (2, "Pepperoni", "$15.40"),
                (3, "Quattro Formaggi", "$17"),
            ]),
        )
        .await;
        let Ok(second) = svc.check_menus(None, None).await else {
            panic!("second check failed");
        };
        assert_eq!(second.total_events(), 2);
        let Some(CompetitorCheck::Checked { events, message, .. }) = second.results.first() else {
            panic!("expected a checked result");
        };
        assert_eq!(message, "Found 2 update(s)");
        let types: Vec<UpdateEventType> = events.iter().map(|e| e.event_type).collect();
        assert_eq!(types, vec![UpdateEventType::ProductAdded, UpdateEventType::PriceChanged]);

        let Ok(feed) = svc.update_feed(None).await else {
            panic!("feed failed");
        };
        assert_eq!(feed.events.len(), 2);
        assert_eq!(feed.product_updates.len(), 1);
        assert_eq!(feed.price_updates.len(), 1);

        let Ok(stats) = svc.dashboard_stats(Utc::now()).await else {
            panic!("stats failed");
        };
        assert_eq!(stats.total_threats, 2);
        assert_eq!(stats.recent_changes, 2);
    }

    #[tokio::test]
    async fn menu_batch_reports_partial_failures() {
        let site = Arc::new(FakeSite::default());
        let svc = service(Arc::clone(&site), Arc::new(DisabledEnricher));
        site.set(MENU_URL, &menu_html(&[(1, "Margherita", "$14")])).await;

        let competitors = vec![
            Competitor::new("pizza-demo", "Slice & Wood", MENU_URL),
            Competitor::new("gone", "Gone Pizza", "http://fixture.test/missing/pizza-website"),
        ];
        let Ok(report) = svc.check_menus(Some(competitors), None).await else {
            panic!("batch failed");
        };
        assert!(matches!(report.results.first(), Some(CompetitorCheck::Checked { .. })));
        assert!(matches!(
            report.results.get(1),
            Some(CompetitorCheck::Failed { error, .. }) if error.contains("404")
        ));
    }

    #[tokio::test]
    async fn menu_check_with_unknown_filter_is_rejected() {
        let site = Arc::new(FakeSite::default());
        let svc = service(site, Arc::new(DisabledEnricher));
        let result = svc.check_menus(None, Some(&acme())).await;
        assert!(matches!(result, Err(WatchError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn clear_all_resets_feed() {
        let site = Arc::new(FakeSite::default());
        let svc = service(Arc::clone(&site), Arc::new(DisabledEnricher));
        site.set(MENU_URL, &menu_html(&[(1, "Margherita", "$14")])).await;
        assert!(svc.check_menus(None, None).await.is_ok());
        assert!(svc.clear_all().await.is_ok());
        assert!(matches!(svc.update_feed(None).await, Ok(feed) if feed.events.is_empty()));
        assert!(
            svc.latest_snapshot(&CompetitorId("pizza-demo".to_string()), MENU_URL)
                .await
                .is_err()
        );
    }
}
