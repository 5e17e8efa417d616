//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

use crate::api::dto::{
    ChangesDto, CheckChangesResponse, CompetitorCheckDto, CompetitorDto, CompetitorStatsDto,
    CompetitorSummaryResponse, DashboardStatsResponse, MenuCheckRequest, MenuCheckResponse,
    MessageResponse, PageTarget, SnapshotResponse, TrendsDto, UpdatesResponse,
};
use crate::api::handlers::{dashboard, monitoring, system};
use crate::domain::{
    ChangeType, CompetitorId, DetectedChange, MenuItem, Severity, Snapshot, UpdateEvent,
    UpdateEventType, UpdatePayload,
};
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI description of the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "rival-watch",
        description = "Competitor website monitoring: snapshots, change detection and menu diffing"
    ),
    paths(
        system::health_handler,
        monitoring::create_snapshot,
        monitoring::latest_snapshot,
        monitoring::check_changes,
        monitoring::check_menus,
        monitoring::competitor_summary,
        monitoring::updates,
        monitoring::clear_all,
        dashboard::stats,
    ),
    components(schemas(
        system::HealthResponse,
        ErrorResponse,
        ErrorBody,
        CompetitorId,
        Snapshot,
        MenuItem,
        DetectedChange,
        ChangeType,
        Severity,
        UpdateEvent,
        UpdateEventType,
        UpdatePayload,
        PageTarget,
        CompetitorDto,
        SnapshotResponse,
        CheckChangesResponse,
        MenuCheckRequest,
        MenuCheckResponse,
        CompetitorCheckDto,
        ChangesDto,
        CompetitorStatsDto,
        CompetitorSummaryResponse,
        UpdatesResponse,
        MessageResponse,
        DashboardStatsResponse,
        TrendsDto,
    )),
    tags(
        (name = "System", description = "Service health"),
        (name = "Monitoring", description = "Snapshots, change checks and menu diffs"),
        (name = "Dashboard", description = "Aggregated statistics"),
    )
)]
pub struct ApiDoc;
