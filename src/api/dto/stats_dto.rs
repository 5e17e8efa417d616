//! Dashboard statistics DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::service::DashboardStats;

/// Trend strings shown next to each headline number.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendsDto {
    /// Trend of all events.
    pub total_threats: String,
    /// Trend of high-severity events.
    pub high_severity: String,
    /// Trend of monitored competitors.
    pub monitored_orgs: String,
    /// Trend of the last 24 hours.
    pub recent_changes: String,
}

/// Response body for `GET /dashboard/stats`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsResponse {
    /// All stored update events.
    pub total_threats: usize,
    /// Price changes plus product additions.
    pub high_severity: usize,
    /// Distinct competitors with events, at least one.
    pub monitored_orgs: usize,
    /// Events in the last 24 hours.
    pub recent_changes: usize,
    /// Percent trends, formatted as `"N%"`.
    pub trends: TrendsDto,
}

impl From<DashboardStats> for DashboardStatsResponse {
    fn from(stats: DashboardStats) -> Self {
        let trend = format!("{}%", stats.trend_percent);
        Self {
            total_threats: stats.total_threats,
            high_severity: stats.high_severity,
            monitored_orgs: stats.monitored_orgs,
            recent_changes: stats.recent_changes,
            trends: TrendsDto {
                total_threats: trend.clone(),
                high_severity: "0%".to_string(),
                monitored_orgs: "0%".to_string(),
                recent_changes: trend,
            },
        }
    }
}
