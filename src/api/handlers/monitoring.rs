//! Monitoring handlers: snapshots, checks, competitor summaries, feed.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CheckChangesResponse, CompetitorFilter, CompetitorSummaryResponse, MenuCheckRequest,
    MenuCheckResponse, MessageResponse, PageTarget, SnapshotResponse, UpdatesResponse,
};
use crate::app_state::AppState;
use crate::domain::CompetitorId;
use crate::error::{ErrorResponse, WatchError};

/// `POST /monitoring/snapshot` — Fetch and store a snapshot.
///
/// # Errors
///
/// Returns [`WatchError::InvalidRequest`] on missing fields or
/// [`WatchError::Fetch`] if the page cannot be retrieved.
#[utoipa::path(
    post,
    path = "/api/v1/monitoring/snapshot",
    tag = "Monitoring",
    summary = "Create a snapshot",
    description = "Fetches the page at `url`, normalises its text, parses menu items for structured-menu pages, and stores the result.",
    request_body = PageTarget,
    responses(
        (status = 200, description = "Snapshot stored", body = SnapshotResponse),
        (status = 400, description = "Missing competitorId or url", body = ErrorResponse),
        (status = 502, description = "Page could not be fetched", body = ErrorResponse),
    )
)]
pub async fn create_snapshot(
    State(state): State<AppState>,
    Json(target): Json<PageTarget>,
) -> Result<impl IntoResponse, WatchError> {
    let (competitor_id, url) = target.validate()?;
    let snapshot = state
        .monitor_service
        .create_snapshot(&competitor_id, &url)
        .await?;
    Ok(Json(SnapshotResponse {
        snapshot,
        message: Some("Snapshot created successfully".to_string()),
    }))
}

/// `GET /monitoring/snapshot` — Latest snapshot of a page.
///
/// # Errors
///
/// Returns [`WatchError::SnapshotNotFound`] if none is stored.
#[utoipa::path(
    get,
    path = "/api/v1/monitoring/snapshot",
    tag = "Monitoring",
    summary = "Get the latest snapshot",
    params(PageTarget),
    responses(
        (status = 200, description = "Latest snapshot", body = SnapshotResponse),
        (status = 400, description = "Missing competitorId or url", body = ErrorResponse),
        (status = 404, description = "No snapshot stored", body = ErrorResponse),
    )
)]
pub async fn latest_snapshot(
    State(state): State<AppState>,
    Query(target): Query<PageTarget>,
) -> Result<impl IntoResponse, WatchError> {
    let (competitor_id, url) = target.validate()?;
    let snapshot = state
        .monitor_service
        .latest_snapshot(&competitor_id, &url)
        .await?;
    Ok(Json(SnapshotResponse {
        snapshot,
        message: None,
    }))
}

/// `POST /monitoring/check-changes` — Compare a page with its last snapshot.
///
/// # Errors
///
/// Returns [`WatchError::InvalidRequest`] on missing fields or
/// [`WatchError::Fetch`] if the page cannot be retrieved.
#[utoipa::path(
    post,
    path = "/api/v1/monitoring/check-changes",
    tag = "Monitoring",
    summary = "Check a page for changes",
    description = "Takes a new snapshot and compares it with the previous one. Significant changes are classified, optionally enriched, and stored.",
    request_body = PageTarget,
    responses(
        (status = 200, description = "Check outcome", body = CheckChangesResponse),
        (status = 400, description = "Missing competitorId or url", body = ErrorResponse),
        (status = 502, description = "Page could not be fetched", body = ErrorResponse),
    )
)]
pub async fn check_changes(
    State(state): State<AppState>,
    Json(target): Json<PageTarget>,
) -> Result<impl IntoResponse, WatchError> {
    let (competitor_id, url) = target.validate()?;
    let check = state
        .monitor_service
        .check_changes(&competitor_id, &url)
        .await?;
    Ok(Json(CheckChangesResponse::from(check)))
}

/// `POST /monitoring/menu/check-now` — Diff competitor menus.
///
/// An empty body checks the configured default competitor.
///
/// # Errors
///
/// Returns [`WatchError::InvalidRequest`] on a malformed body or when no
/// competitor is left to check.
#[utoipa::path(
    post,
    path = "/api/v1/monitoring/menu/check-now",
    tag = "Monitoring",
    summary = "Check competitor menus now",
    description = "Snapshots each competitor's menu page and emits PRODUCT_ADDED and PRICE_CHANGED events against the previous menu. Failures are reported per competitor.",
    request_body(
        content = MenuCheckRequest,
        description = "Optional; defaults to the configured competitor"
    ),
    responses(
        (status = 200, description = "Batch outcome", body = MenuCheckResponse),
        (status = 400, description = "No competitors found to check", body = ErrorResponse),
    )
)]
pub async fn check_menus(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, WatchError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        MenuCheckRequest::default()
    } else {
        serde_json::from_slice::<MenuCheckRequest>(&body)
            .map_err(|e| WatchError::InvalidRequest(format!("malformed body: {e}")))?
    };
    let (competitors, only) = request.into_parts()?;
    let report = state
        .monitor_service
        .check_menus(competitors, only.as_ref())
        .await?;
    Ok(Json(MenuCheckResponse::from(report)))
}

/// `GET /monitoring/competitor/{id}` — Monitoring summary of a competitor.
///
/// # Errors
///
/// Returns a persistence error.
#[utoipa::path(
    get,
    path = "/api/v1/monitoring/competitor/{id}",
    tag = "Monitoring",
    summary = "Get competitor monitoring data",
    params(
        ("id" = String, Path, description = "Competitor slug"),
    ),
    responses(
        (
            status = 200,
            description = "Changes, snapshots and counts",
            body = CompetitorSummaryResponse
        ),
        (status = 400, description = "Blank competitor id", body = ErrorResponse),
    )
)]
pub async fn competitor_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, WatchError> {
    let competitor_id = CompetitorId::parse(id)?;
    let overview = state
        .monitor_service
        .competitor_overview(&competitor_id)
        .await?;
    Ok(Json(CompetitorSummaryResponse::from(overview)))
}

/// `GET /monitoring/updates` — Stored menu update events.
///
/// # Errors
///
/// Returns a persistence error.
#[utoipa::path(
    get,
    path = "/api/v1/monitoring/updates",
    tag = "Monitoring",
    summary = "List update events",
    params(CompetitorFilter),
    responses(
        (status = 200, description = "Update feed", body = UpdatesResponse),
    )
)]
pub async fn updates(
    State(state): State<AppState>,
    Query(filter): Query<CompetitorFilter>,
) -> Result<impl IntoResponse, WatchError> {
    let competitor_id = filter.parse();
    let feed = state
        .monitor_service
        .update_feed(competitor_id.as_ref())
        .await?;
    Ok(Json(UpdatesResponse::from(feed)))
}

/// `POST /monitoring/clear-all` — Delete all monitoring data.
///
/// # Errors
///
/// Returns a persistence error.
#[utoipa::path(
    post,
    path = "/api/v1/monitoring/clear-all",
    tag = "Monitoring",
    summary = "Clear all monitoring data",
    responses(
        (status = 200, description = "Store emptied", body = MessageResponse),
    )
)]
pub async fn clear_all(State(state): State<AppState>) -> Result<impl IntoResponse, WatchError> {
    state.monitor_service.clear_all().await?;
    Ok(Json(MessageResponse::ok("All monitoring data cleared")))
}

/// Monitoring routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/monitoring/snapshot",
            post(create_snapshot).get(latest_snapshot),
        )
        .route("/monitoring/check-changes", post(check_changes))
        .route("/monitoring/menu/check-now", post(check_menus))
        .route("/monitoring/competitor/{id}", get(competitor_summary))
        .route("/monitoring/updates", get(updates))
        .route("/monitoring/clear-all", post(clear_all))
}
