//! Platform moderation handlers.
//!
//! Every route here requires [`Capability::ModeratePlatform`].

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::handlers::hotel_handler::HotelQuery;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::{AppError, AppResult};
use crate::services::PlatformStats;
use crate::types::{CountResponse, NoContent, Paginated, PaginationParams};
use domain::{
    Booking, Capability, Hotel, HotelStatus, NotificationDraft, NotificationKind,
    NotificationTarget, Role, UserResponse, UserStatus,
};

/// Account listing filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    pub role: Option<Role>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl UserQuery {
    fn params(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams::new(
            self.page.unwrap_or(defaults.page),
            self.per_page.unwrap_or(defaults.per_page),
        )
    }
}

/// Account standing change
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserStatusRequest {
    /// `active` or `suspended`
    #[schema(example = "suspended")]
    pub status: String,
}

/// Hotel moderation decision
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct HotelStatusRequest {
    /// `pending`, `active`, `rejected` or `suspended`
    #[schema(example = "active")]
    pub status: String,
}

/// Broadcast or direct notification
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendNotificationRequest {
    /// `all`, `role` or `user`
    #[schema(example = "role")]
    pub target: String,
    /// Required when `target` is `role`
    pub role: Option<Role>,
    /// Required when `target` is `user`
    pub user_id: Option<Uuid>,
    #[validate(length(max = 255, message = "Title is too long"))]
    #[schema(example = "Scheduled maintenance")]
    pub title: String,
    #[schema(example = "Bookings are paused tonight from 01:00 to 02:00")]
    pub message: String,
    #[serde(default)]
    pub kind: NotificationKind,
}

impl SendNotificationRequest {
    fn target(&self) -> AppResult<NotificationTarget> {
        match self.target.as_str() {
            "all" => Ok(NotificationTarget::All),
            "role" => self
                .role
                .map(NotificationTarget::Role)
                .ok_or_else(|| AppError::validation("role is required for a role target")),
            "user" => self
                .user_id
                .map(NotificationTarget::User)
                .ok_or_else(|| AppError::validation("user_id is required for a user target")),
            other => Err(AppError::validation(format!(
                "Unknown notification target: {}",
                other
            ))),
        }
    }
}

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id/status", put(set_user_status))
        .route("/hotels", get(list_hotels))
        .route("/hotels/:id/status", put(set_hotel_status))
        .route("/bookings", get(list_bookings))
        .route("/reviews/:id", delete(delete_review))
        .route(
            "/notifications",
            post(send_notification).route_layer(guard!(Capability::BroadcastNotifications)),
        )
        .route("/stats", get(platform_stats))
        .route_layer(guard!(Capability::ModeratePlatform))
}

/// Accounts on the platform
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(UserQuery),
    responses(
        (status = 200, description = "One page of accounts", body = PaginatedUsers),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    let params = query.params();
    let users = state.user_service.list_users(query.role, params).await?;
    Ok(Json(users))
}

/// Suspend or reactivate an account
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/status",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UserStatusRequest,
    responses(
        (status = 200, description = "Account updated", body = UserResponse),
        (status = 400, description = "Unknown status or self-suspension"),
        (status = 404, description = "User not found")
    )
)]
pub async fn set_user_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UserStatusRequest>,
) -> AppResult<Json<UserResponse>> {
    let status: UserStatus = payload.status.parse()?;
    let user = state
        .user_service
        .set_status(current_user.actor(), id, status)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

/// Hotels in any status
#[utoipa::path(
    get,
    path = "/api/admin/hotels",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(HotelQuery),
    responses(
        (status = 200, description = "One page of hotels", body = PaginatedHotels),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn list_hotels(
    State(state): State<AppState>,
    Query(query): Query<HotelQuery>,
) -> AppResult<Json<Paginated<Hotel>>> {
    let (search, params) = query.into_search()?;
    let hotels = state.hotel_service.list_all_hotels(search, params).await?;
    Ok(Json(hotels))
}

/// Approve, reject or suspend a hotel
#[utoipa::path(
    put,
    path = "/api/admin/hotels/{id}/status",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Hotel ID")),
    request_body = HotelStatusRequest,
    responses(
        (status = 200, description = "Hotel updated and owner notified", body = Hotel),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Hotel not found")
    )
)]
pub async fn set_hotel_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<HotelStatusRequest>,
) -> AppResult<Json<Hotel>> {
    let status: HotelStatus = payload.status.parse()?;
    let hotel = state.hotel_service.set_hotel_status(id, status).await?;
    Ok(Json(hotel))
}

/// Every booking on the platform
#[utoipa::path(
    get,
    path = "/api/admin/bookings",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of bookings", body = PaginatedBookings),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Booking>>> {
    let bookings = state.booking_service.list_all(params).await?;
    Ok(Json(bookings))
}

/// Remove a review
#[utoipa::path(
    delete,
    path = "/api/admin/reviews/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 204, description = "Review deleted and hotel rating refreshed"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.review_service.delete_review(id).await?;
    Ok(NoContent)
}

/// Send a notification to everyone, a role, or one user
#[utoipa::path(
    post,
    path = "/api/admin/notifications",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = SendNotificationRequest,
    responses(
        (status = 200, description = "Number of recipients", body = CountResponse),
        (status = 400, description = "Invalid target or empty message"),
        (status = 404, description = "Target user not found")
    )
)]
pub async fn send_notification(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SendNotificationRequest>,
) -> AppResult<Json<CountResponse>> {
    let target = payload.target()?;
    let draft = NotificationDraft::new(payload.kind, payload.title, payload.message);
    let sent = state.notification_service.send(target, draft).await?;
    Ok(Json(CountResponse::new(sent)))
}

/// Platform-wide counts
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Counts by role, status and booking stage", body = PlatformStats),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn platform_stats(State(state): State<AppState>) -> AppResult<Json<PlatformStats>> {
    let stats = state.analytics_service.platform_stats().await?;
    Ok(Json(stats))
}
