//! # rival-watch
//!
//! Competitor website monitoring service.
//!
//! The crate snapshots competitor pages, normalises their text, decides
//! whether a meaningful change happened, classifies it, and keeps a
//! bounded log of coarse page changes and fine-grained menu update
//! events. A REST API and a WebSocket feed expose the results.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── MonitorService (service/)
//!     ├── EventBus + CheckLocks (domain/)
//!     │
//!     ├── SnapshotBuilder (snapshot/) ── PageFetcher (reqwest)
//!     ├── ChangeDetector / diff_menus (detection/)
//!     ├── Enricher (enrichment/) ── OpenAI-compatible endpoint
//!     │
//!     └── MonitoringStore (persistence/): memory or PostgreSQL
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod detection;
pub mod domain;
pub mod enrichment;
pub mod error;
pub mod persistence;
pub mod service;
pub mod snapshot;
pub mod ws;
