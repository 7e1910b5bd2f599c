//! Booking handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::BookingRequest;
use crate::types::Created;
use domain::{Booking, BookingStatus, Capability, PaymentMethod};

/// Reservation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub room_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2026-12-01")]
    pub check_in: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2026-12-03")]
    pub check_out: NaiveDate,
    #[validate(range(min = 1, message = "At least one guest is required"))]
    #[schema(example = 2)]
    pub guests: i32,
    #[validate(length(max = 1000, message = "Special requests are too long"))]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl From<CreateBookingRequest> for BookingRequest {
    fn from(req: CreateBookingRequest) -> Self {
        BookingRequest {
            room_id: req.room_id,
            check_in: req.check_in,
            check_out: req.check_out,
            guests: req.guests,
            special_requests: req.special_requests,
            payment_method: req.payment_method,
        }
    }
}

/// Status change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    /// `checked_in` or `completed`
    #[schema(example = "checked_in")]
    pub status: String,
}

/// Hotelier booking filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
}

/// Create booking routes
pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(create_booking).route_layer(guard!(Capability::BookRooms)),
        )
        .route("/my-bookings", get(my_bookings))
        .route(
            "/hotelier-bookings",
            get(hotelier_bookings).route_layer(guard!(Capability::ManageOwnBookings)),
        )
        .route("/:id", get(get_booking))
        .route("/:id/status", put(update_status))
        .route("/:id/cancel", put(cancel_booking))
}

/// Reserve a room
#[utoipa::path(
    post,
    path = "/api/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Invalid dates or guest count"),
        (status = 404, description = "Room not found"),
        (status = 409, description = "Room unavailable or hotel not accepting bookings")
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateBookingRequest>,
) -> AppResult<Created<Booking>> {
    let booking = state
        .booking_service
        .create_booking(current_user.id, payload.into())
        .await?;
    Ok(Created(booking))
}

/// The current guest's bookings
#[utoipa::path(
    get,
    path = "/api/bookings/my-bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bookings, newest first", body = [Booking]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_bookings(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state.booking_service.list_for_guest(current_user.id).await?;
    Ok(Json(bookings))
}

/// Bookings at the current hotelier's hotels
#[utoipa::path(
    get,
    path = "/api/bookings/hotelier-bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(BookingFilter),
    responses(
        (status = 200, description = "Bookings, newest first", body = [Booking]),
        (status = 403, description = "Not a hotelier")
    )
)]
pub async fn hotelier_bookings(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<BookingFilter>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state
        .booking_service
        .list_for_hotelier(current_user.id, filter.status)
        .await?;
    Ok(Json(bookings))
}

/// Booking details (guest, owning hotelier or admin)
#[utoipa::path(
    get,
    path = "/api/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking", body = Booking),
        (status = 403, description = "Not a party to this booking"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .booking_service
        .get_booking(current_user.actor(), id)
        .await?;
    Ok(Json(booking))
}

/// Check a guest in or out
#[utoipa::path(
    put,
    path = "/api/bookings/{id}/status",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Booking),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Not the owning hotelier"),
        (status = 409, description = "Invalid transition or status changed concurrently")
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> AppResult<Json<Booking>> {
    let status: BookingStatus = payload.status.parse()?;
    let booking = state
        .booking_service
        .update_status(current_user.actor(), id, status)
        .await?;
    Ok(Json(booking))
}

/// Cancel an upcoming booking
#[utoipa::path(
    put,
    path = "/api/bookings/{id}/cancel",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = Booking),
        (status = 403, description = "Not the guest who booked"),
        (status = 409, description = "Booking is no longer upcoming")
    )
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .booking_service
        .cancel_booking(current_user.actor(), id)
        .await?;
    Ok(Json(booking))
}
