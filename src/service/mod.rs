//! Service layer: business logic orchestration.
//!
//! [`MonitorService`] runs snapshot, comparison, enrichment, and
//! persistence in order, and emits events through the
//! [`super::domain::EventBus`].

pub mod monitor_service;
pub mod reports;

pub use monitor_service::{MonitorParts, MonitorService};
pub use reports::{
    ChangeCheck, ChangesByType, CompetitorCheck, CompetitorOverview, DashboardStats,
    MenuCheckReport, UpdateFeed,
};
