//! Review handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::ReviewRequest;
use crate::types::Created;
use domain::{Capability, Review};

/// Review submission
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    pub hotel_id: Uuid,
    /// Completed booking being reviewed; any completed stay qualifies when omitted
    pub booking_id: Option<Uuid>,
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: i32,
    #[validate(length(max = 2000, message = "Comment is too long"))]
    #[schema(example = "Lovely staff and a quiet room")]
    pub comment: String,
}

/// Hotelier reply to a review
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReplyRequest {
    #[validate(length(max = 2000, message = "Reply is too long"))]
    #[schema(example = "Thank you for staying with us")]
    pub reply: String,
}

/// Create review routes
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(create_review).route_layer(guard!(Capability::WriteReviews)),
        )
        .route("/hotel/:id", get(list_hotel_reviews))
        .route(
            "/:id/reply",
            put(reply_to_review).route_layer(guard!(Capability::ReplyToReviews)),
        )
}

/// Review a hotel after a completed stay
#[utoipa::path(
    post,
    path = "/api/reviews",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid rating or no completed stay"),
        (status = 404, description = "Hotel or booking not found"),
        (status = 409, description = "Booking already reviewed")
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateReviewRequest>,
) -> AppResult<Created<Review>> {
    let review = state
        .review_service
        .create_review(
            current_user.id,
            ReviewRequest {
                hotel_id: payload.hotel_id,
                booking_id: payload.booking_id,
                rating: payload.rating,
                comment: payload.comment,
            },
        )
        .await?;
    Ok(Created(review))
}

/// Reviews of a hotel
#[utoipa::path(
    get,
    path = "/api/reviews/hotel/{id}",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Hotel ID")),
    responses(
        (status = 200, description = "Reviews, newest first", body = [Review]),
        (status = 404, description = "Hotel not found")
    )
)]
pub async fn list_hotel_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Review>>> {
    let reviews = state.review_service.list_for_hotel(id).await?;
    Ok(Json(reviews))
}

/// Reply to a review of an owned hotel
#[utoipa::path(
    put,
    path = "/api/reviews/{id}/reply",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = ReplyRequest,
    responses(
        (status = 200, description = "Reply stored", body = Review),
        (status = 403, description = "Not the hotel owner"),
        (status = 409, description = "Review already has a reply")
    )
)]
pub async fn reply_to_review(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ReplyRequest>,
) -> AppResult<Json<Review>> {
    let review = state
        .review_service
        .reply_to_review(current_user.actor(), id, payload.reply)
        .await?;
    Ok(Json(review))
}
