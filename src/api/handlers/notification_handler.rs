//! Notification inbox handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, put},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{CountResponse, NoContent};
use domain::Notification;

/// Inbox filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InboxQuery {
    /// Only return unread notifications
    #[serde(default)]
    pub unread_only: bool,
}

/// Create notification routes
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/read-all", put(mark_all_read))
        .route("/:id/read", put(mark_read))
        .route("/:id", delete(delete_notification))
}

/// The current user's notifications
#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    params(InboxQuery),
    responses(
        (status = 200, description = "Notifications, newest first", body = [Notification]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<InboxQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = state
        .notification_service
        .list_for_user(current_user.id, query.unread_only)
        .await?;
    Ok(Json(notifications))
}

/// Number of unread notifications
#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unread count", body = CountResponse)
    )
)]
pub async fn unread_count(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<CountResponse>> {
    let count = state
        .notification_service
        .unread_count(current_user.id)
        .await?;
    Ok(Json(CountResponse::new(count)))
}

/// Mark every notification as read
#[utoipa::path(
    put,
    path = "/api/notifications/read-all",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Number of notifications that changed", body = CountResponse)
    )
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<CountResponse>> {
    let changed = state
        .notification_service
        .mark_all_read(current_user.id)
        .await?;
    Ok(Json(CountResponse::new(changed)))
}

/// Mark one notification as read
#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification", body = Notification),
        (status = 403, description = "Not the recipient"),
        (status = 404, description = "Notification not found")
    )
)]
pub async fn mark_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Notification>> {
    let notification = state
        .notification_service
        .mark_read(current_user.actor(), id)
        .await?;
    Ok(Json(notification))
}

/// Delete a notification
#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 403, description = "Not the recipient"),
        (status = 404, description = "Notification not found")
    )
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .notification_service
        .delete(current_user.actor(), id)
        .await?;
    Ok(NoContent)
}
