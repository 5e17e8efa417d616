//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::{PersistenceBackend, WatchConfig};
use crate::detection::{ChangeDetector, KeywordClassifier};
use crate::domain::EventBus;
use crate::enrichment::{DisabledEnricher, Enricher, OpenAiEnricher};
use crate::persistence::{MemoryStore, MonitoringStore, PostgresStore, RetentionPolicy};
use crate::service::{MonitorParts, MonitorService};
use crate::snapshot::{HttpFetcher, SnapshotBuilder, SnapshotOptions};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Monitor service for all business logic.
    pub monitor_service: Arc<MonitorService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Wraps an existing service.
    #[must_use]
    pub fn new(monitor_service: Arc<MonitorService>) -> Self {
        let event_bus = monitor_service.event_bus().clone();
        Self {
            monitor_service,
            event_bus,
        }
    }

    /// Builds the full pipeline described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP clients cannot be constructed or the
    /// PostgreSQL backend cannot be reached or migrated.
    pub async fn from_config(config: &WatchConfig) -> anyhow::Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch_timeout, &config.user_agent)?;
        let builder = SnapshotBuilder::new(
            Arc::new(fetcher),
            SnapshotOptions {
                max_text_chars: config.max_text_chars,
                menu_url_marker: config.menu_url_marker.clone(),
            },
        );
        let detector = ChangeDetector::new(
            config.similarity_threshold,
            Arc::new(KeywordClassifier::default()),
        );

        let retention = RetentionPolicy {
            snapshots_per_competitor: config.snapshot_retention,
            changes: config.change_retention,
            events: config.event_retention,
        };
        let store: Arc<dyn MonitoringStore> = match config.persistence_backend {
            PersistenceBackend::Memory => Arc::new(MemoryStore::with_retention(retention)),
            PersistenceBackend::Postgres => Arc::new(
                PostgresStore::connect(
                    &config.database_url,
                    config.database_max_connections,
                    retention,
                )
                .await?,
            ),
        };
        tracing::info!(backend = ?config.persistence_backend, "store ready");

        let enricher: Arc<dyn Enricher> = match (&config.openai_api_key, config.enrichment_enabled)
        {
            (Some(key), true) => Arc::new(OpenAiEnricher::new(
                key,
                &config.openai_base_url,
                &config.openai_model,
                config.enrichment_timeout,
            )?),
            _ => {
                tracing::info!("classification enrichment disabled");
                Arc::new(DisabledEnricher)
            }
        };

        let service = MonitorService::new(
            MonitorParts {
                builder,
                detector,
                enricher,
                store,
            },
            EventBus::new(config.event_bus_capacity),
            config.default_competitor.clone(),
        );
        Ok(Self::new(Arc::new(service)))
    }
}
