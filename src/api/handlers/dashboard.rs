//! Dashboard handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::DashboardStatsResponse;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, WatchError};

/// `GET /dashboard/stats` — Headline numbers over stored update events.
///
/// # Errors
///
/// Returns a persistence error.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    tag = "Dashboard",
    summary = "Dashboard statistics",
    description = "Counts stored update events and compares the last 24 hours with the 24 hours before.",
    responses(
        (status = 200, description = "Statistics", body = DashboardStatsResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse),
    )
)]
pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse, WatchError> {
    let stats = state.monitor_service.dashboard_stats(Utc::now()).await?;
    Ok(Json(DashboardStatsResponse::from(stats)))
}

/// Dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/stats", get(stats))
}
