//! Hotelier dashboard.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::HotelierStats;
use domain::Capability;

/// Create analytics routes
pub fn analytics_routes() -> Router<AppState> {
    Router::new().route(
        "/hotelier",
        get(hotelier_stats).route_layer(guard!(Capability::ViewOwnAnalytics)),
    )
}

/// Booking and revenue figures across the current hotelier's hotels
#[utoipa::path(
    get,
    path = "/api/analytics/hotelier",
    tag = "Analytics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard figures", body = HotelierStats),
        (status = 403, description = "Not a hotelier")
    )
)]
pub async fn hotelier_stats(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<HotelierStats>> {
    let stats = state
        .analytics_service
        .hotelier_stats(current_user.id)
        .await?;
    Ok(Json(stats))
}
