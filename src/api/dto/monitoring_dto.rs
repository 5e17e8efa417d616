//! Monitoring DTOs: snapshots, checks, competitor summaries, update feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::CompetitorDto;
use crate::domain::{Competitor, CompetitorId, DetectedChange, Snapshot, UpdateEvent};
use crate::error::WatchError;
use crate::service::{
    ChangeCheck, ChangesByType, CompetitorCheck, CompetitorOverview, MenuCheckReport, UpdateFeed,
};

/// Competitor and page addressed by snapshot and check requests.
///
/// Used both as a JSON body and as query parameters; fields are optional
/// on the wire so that a missing field yields a 400 with a clear message.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageTarget {
    /// Competitor slug.
    #[serde(default)]
    pub competitor_id: Option<String>,
    /// Page URL.
    #[serde(default)]
    pub url: Option<String>,
}

impl PageTarget {
    /// Validates that both fields are present and non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidRequest`] if either field is missing.
    pub fn validate(self) -> Result<(CompetitorId, String), WatchError> {
        let missing =
            || WatchError::InvalidRequest("competitorId and url are required".to_string());
        let url = self
            .url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(missing)?;
        let competitor_id = self
            .competitor_id
            .and_then(|raw| CompetitorId::parse(raw).ok())
            .ok_or_else(missing)?;
        Ok((competitor_id, url))
    }
}

/// Response body for snapshot endpoints.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
    /// The snapshot.
    pub snapshot: Snapshot,
    /// Present when the snapshot was just created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response body for `POST /monitoring/check-changes`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckChangesResponse {
    /// Stored change, or `null` when nothing significant changed.
    pub change: Option<DetectedChange>,
    /// Snapshot taken by this check.
    pub snapshot: Snapshot,
    /// Human-readable outcome.
    pub message: String,
    /// Similarity to the previous snapshot when unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

impl From<ChangeCheck> for CheckChangesResponse {
    fn from(check: ChangeCheck) -> Self {
        Self {
            change: check.change,
            snapshot: check.snapshot,
            message: check.message.to_string(),
            similarity: check.similarity,
        }
    }
}

/// Request body for `POST /monitoring/menu/check-now`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuCheckRequest {
    /// Only check this competitor.
    #[serde(default)]
    pub competitor_id: Option<String>,
    /// Competitors to check; the configured default when absent.
    #[serde(default)]
    pub competitors: Option<Vec<CompetitorDto>>,
}

impl MenuCheckRequest {
    /// Converts the request into service arguments.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidRequest`] if a listed competitor has a
    /// blank id.
    pub fn into_parts(self) -> Result<(Option<Vec<Competitor>>, Option<CompetitorId>), WatchError> {
        let competitors = self
            .competitors
            .map(|list| {
                list.into_iter()
                    .map(Competitor::try_from)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        let only = self
            .competitor_id
            .and_then(|raw| CompetitorId::parse(raw).ok());
        Ok((competitors, only))
    }
}

/// Per-competitor entry of a menu check response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorCheckDto {
    /// Competitor slug.
    pub competitor_id: CompetitorId,
    /// Display name.
    pub competitor_name: String,
    /// Update events produced (absent on failure).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<UpdateEvent>>,
    /// Outcome message (absent on failure).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<CompetitorCheck> for CompetitorCheckDto {
    fn from(check: CompetitorCheck) -> Self {
        match check {
            CompetitorCheck::Checked {
                competitor,
                events,
                message,
            } => Self {
                competitor_id: competitor.id,
                competitor_name: competitor.name,
                events: Some(events),
                message: Some(message),
                error: None,
            },
            CompetitorCheck::Failed { competitor, error } => Self {
                competitor_id: competitor.id,
                competitor_name: competitor.name,
                events: None,
                message: None,
                error: Some(error),
            },
        }
    }
}

/// Response body for `POST /monitoring/menu/check-now`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuCheckResponse {
    /// Always `true`; per-competitor failures are reported in `results`.
    pub success: bool,
    /// When the batch finished.
    pub checked_at: DateTime<Utc>,
    /// Total events across all competitors.
    pub total_events: usize,
    /// Per-competitor outcomes, in request order.
    pub results: Vec<CompetitorCheckDto>,
}

impl From<MenuCheckReport> for MenuCheckResponse {
    fn from(report: MenuCheckReport) -> Self {
        Self {
            success: true,
            checked_at: report.checked_at,
            total_events: report.total_events(),
            results: report.results.into_iter().map(Into::into).collect(),
        }
    }
}

/// Changes grouped by type.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChangesDto {
    /// Every change, newest first.
    pub all: Vec<DetectedChange>,
    /// Product changes.
    pub product: Vec<DetectedChange>,
    /// Pricing changes.
    pub pricing: Vec<DetectedChange>,
    /// Other changes.
    pub other: Vec<DetectedChange>,
}

/// Change counts of a competitor.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorStatsDto {
    /// All changes.
    pub total_changes: usize,
    /// Product changes.
    pub product_changes: usize,
    /// Pricing changes.
    pub pricing_changes: usize,
    /// Other changes.
    pub other_changes: usize,
    /// Newest snapshot, or `null`.
    pub last_snapshot: Option<Snapshot>,
}

/// Response body for `GET /monitoring/competitor/{id}`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorSummaryResponse {
    /// Changes grouped by type.
    pub changes: ChangesDto,
    /// Up to ten most recent snapshots.
    pub snapshots: Vec<Snapshot>,
    /// Counts.
    pub stats: CompetitorStatsDto,
}

impl From<CompetitorOverview> for CompetitorSummaryResponse {
    fn from(overview: CompetitorOverview) -> Self {
        let ChangesByType {
            all,
            product,
            pricing,
            other,
        } = overview.changes;
        let stats = CompetitorStatsDto {
            total_changes: all.len(),
            product_changes: product.len(),
            pricing_changes: pricing.len(),
            other_changes: other.len(),
            last_snapshot: overview.last_snapshot,
        };
        Self {
            changes: ChangesDto {
                all,
                product,
                pricing,
                other,
            },
            snapshots: overview.recent_snapshots,
            stats,
        }
    }
}

/// Response body for `GET /monitoring/updates`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatesResponse {
    /// Every event, newest first.
    pub events: Vec<UpdateEvent>,
    /// `PRODUCT_ADDED` events.
    pub product_updates: Vec<UpdateEvent>,
    /// `PRICE_CHANGED` events.
    pub price_updates: Vec<UpdateEvent>,
    /// Number of events.
    pub total: usize,
}

impl From<UpdateFeed> for UpdatesResponse {
    fn from(feed: UpdateFeed) -> Self {
        Self {
            total: feed.events.len(),
            events: feed.events,
            product_updates: feed.product_updates,
            price_updates: feed.price_updates,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn page_target_requires_both_fields() {
        let missing_url = PageTarget {
            competitor_id: Some("acme".to_string()),
            url: None,
        };
        assert!(matches!(missing_url.validate(), Err(WatchError::InvalidRequest(_))));

        let blank_id = PageTarget {
            competitor_id: Some("  ".to_string()),
            url: Some("https://acme.test".to_string()),
        };
        assert!(matches!(blank_id.validate(), Err(WatchError::InvalidRequest(_))));
    }

    #[test]
    fn page_target_trims_url() {
        let target = PageTarget {
            competitor_id: Some("acme".to_string()),
            url: Some(" https://acme.test/pricing ".to_string()),
        };
        let Ok((id, url)) = target.validate() else {
            panic!("valid target rejected");
        };
        assert_eq!(id.as_str(), "acme");
        assert_eq!(url, "https://acme.test/pricing");
    }

    #[test]
    fn menu_check_request_parses_camel_case() {
        let body = r#"{"competitorId":"acme","competitors":[{"id":"acme","name":"Acme","domain":"acme.com"}]}"#;
        let Ok(req) = serde_json::from_str::<MenuCheckRequest>(body) else {
            panic!("request did not parse");
        };
        let Ok((Some(list), Some(only))) = req.into_parts() else {
            panic!("expected competitors and filter");
        };
        assert_eq!(list.len(), 1);
        assert_eq!(only.as_str(), "acme");
    }

    #[test]
    fn failed_check_serializes_error_only() {
        let dto = CompetitorCheckDto::from(CompetitorCheck::Failed {
            competitor: Competitor::new("acme", "Acme", "acme.com"),
            error: "failed to fetch https://acme.com: HTTP 404".to_string(),
        });
        let json = serde_json::to_value(&dto).unwrap_or_default();
        assert_eq!(json.get("competitorId").and_then(|v| v.as_str()), Some("acme"));
        assert!(json.get("events").is_none());
        assert!(
            json.get("error")
                .and_then(|v| v.as_str())
                .is_some_and(|e| e.contains("404"))
        );
    }
}
