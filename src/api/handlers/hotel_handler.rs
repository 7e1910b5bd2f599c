//! Hotel and room handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::{AppError, AppResult};
use crate::types::{Created, NoContent, Paginated, PaginationParams};
use domain::{
    Capability, Hotel, HotelSearch, HotelStatus, HotelUpdate, NewHotel, NewRoom, Room, RoomUpdate,
};

/// Hotel listing filters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HotelQuery {
    /// Case-insensitive part of the city or address
    pub location: Option<String>,
    /// Some room must cost at least this much per night
    pub min_price: Option<f64>,
    /// Some room must cost at most this much per night
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    /// Comma-separated amenities that must all be present, e.g. `wifi,pool`
    pub amenities: Option<String>,
    /// Moderation status (admin listing only)
    pub status: Option<HotelStatus>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl HotelQuery {
    pub fn into_search(self) -> AppResult<(HotelSearch, PaginationParams)> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(AppError::validation(
                    "min_price cannot be greater than max_price",
                ));
            }
        }

        let defaults = PaginationParams::default();
        let params = PaginationParams::new(
            self.page.unwrap_or(defaults.page),
            self.per_page.unwrap_or(defaults.per_page),
        );
        let search = HotelSearch {
            location: self.location,
            min_price: self.min_price,
            max_price: self.max_price,
            min_rating: self.min_rating,
            amenities: self
                .amenities
                .map(|a| a.split(',').map(str::to_string).collect())
                .unwrap_or_default(),
            status: self.status,
        };
        Ok((search, params))
    }
}

/// New hotel listing
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateHotelRequest {
    #[validate(length(min = 1, max = 255, message = "Hotel name is required"))]
    #[schema(example = "Hotel Himalaya")]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "City is required"))]
    #[schema(example = "Kathmandu")]
    pub city: String,
    #[validate(length(min = 1, max = 255, message = "Address is required"))]
    #[schema(example = "Kupondole, Lalitpur")]
    pub address: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[schema(example = json!(["wifi", "parking"]))]
    pub amenities: Vec<String>,
    /// Image paths, in display order
    #[serde(default)]
    pub images: Vec<String>,
}

impl From<CreateHotelRequest> for NewHotel {
    fn from(req: CreateHotelRequest) -> Self {
        NewHotel {
            name: req.name,
            city: req.city,
            address: req.address,
            description: req.description,
            amenities: req.amenities,
            images: req.images,
        }
    }
}

/// Hotel changes; absent fields stay as they are
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateHotelRequest {
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    pub description: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

impl From<UpdateHotelRequest> for HotelUpdate {
    fn from(req: UpdateHotelRequest) -> Self {
        HotelUpdate {
            name: req.name,
            city: req.city,
            address: req.address,
            description: req.description,
            amenities: req.amenities,
            images: req.images,
        }
    }
}

/// New room type
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 100, message = "Room name is required"))]
    #[schema(example = "Deluxe Double")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(example = 1000.0)]
    pub price_per_night: f64,
    #[schema(example = 2)]
    pub capacity: i32,
    /// Units of this type available per night
    #[serde(default = "default_total_rooms")]
    #[schema(example = 1)]
    pub total_rooms: i32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

fn default_total_rooms() -> i32 {
    1
}

impl From<CreateRoomRequest> for NewRoom {
    fn from(req: CreateRoomRequest) -> Self {
        NewRoom {
            name: req.name,
            description: req.description,
            price_per_night: req.price_per_night,
            capacity: req.capacity,
            total_rooms: req.total_rooms,
            amenities: req.amenities,
            images: req.images,
        }
    }
}

/// Room changes; absent fields stay as they are
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoomRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_per_night: Option<f64>,
    pub capacity: Option<i32>,
    pub total_rooms: Option<i32>,
    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

impl From<UpdateRoomRequest> for RoomUpdate {
    fn from(req: UpdateRoomRequest) -> Self {
        RoomUpdate {
            name: req.name,
            description: req.description,
            price_per_night: req.price_per_night,
            capacity: req.capacity,
            total_rooms: req.total_rooms,
            amenities: req.amenities,
            images: req.images,
        }
    }
}

/// Create hotel routes
pub fn hotel_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_hotels).merge(
                axum::routing::post(create_hotel).route_layer(guard!(Capability::ManageListings)),
            ),
        )
        .route(
            "/mine",
            get(list_my_hotels).route_layer(guard!(Capability::ManageListings)),
        )
        .route(
            "/:id",
            get(get_hotel).delete(delete_hotel).merge(
                axum::routing::put(update_hotel).route_layer(guard!(Capability::ManageListings)),
            ),
        )
        .route(
            "/:id/rooms",
            get(list_rooms).merge(
                axum::routing::post(create_room).route_layer(guard!(Capability::ManageListings)),
            ),
        )
}

/// Create room routes
pub fn room_routes() -> Router<AppState> {
    Router::new().route(
        "/:id",
        get(get_room).merge(
            axum::routing::put(update_room)
                .delete(delete_room)
                .route_layer(guard!(Capability::ManageListings)),
        ),
    )
}

/// Browse active hotels
#[utoipa::path(
    get,
    path = "/api/hotels",
    tag = "Hotels",
    params(HotelQuery),
    responses(
        (status = 200, description = "One page of active hotels", body = PaginatedHotels),
        (status = 400, description = "Invalid filters")
    )
)]
pub async fn list_hotels(
    State(state): State<AppState>,
    Query(query): Query<HotelQuery>,
) -> AppResult<Json<Paginated<Hotel>>> {
    let (search, params) = query.into_search()?;
    let page = state.hotel_service.list_hotels(search, params).await?;
    Ok(Json(page))
}

/// Submit a hotel for moderation
#[utoipa::path(
    post,
    path = "/api/hotels",
    tag = "Hotels",
    security(("bearer_auth" = [])),
    request_body = CreateHotelRequest,
    responses(
        (status = 201, description = "Hotel created as pending", body = Hotel),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not a hotelier")
    )
)]
pub async fn create_hotel(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateHotelRequest>,
) -> AppResult<Created<Hotel>> {
    let hotel = state
        .hotel_service
        .create_hotel(current_user.id, payload.into())
        .await?;
    Ok(Created(hotel))
}

/// Hotels owned by the current hotelier
#[utoipa::path(
    get,
    path = "/api/hotels/mine",
    tag = "Hotels",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own hotels in any status", body = [Hotel]),
        (status = 403, description = "Not a hotelier")
    )
)]
pub async fn list_my_hotels(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Hotel>>> {
    let hotels = state.hotel_service.list_own_hotels(current_user.id).await?;
    Ok(Json(hotels))
}

/// Hotel details
#[utoipa::path(
    get,
    path = "/api/hotels/{id}",
    tag = "Hotels",
    params(("id" = Uuid, Path, description = "Hotel ID")),
    responses(
        (status = 200, description = "Hotel", body = Hotel),
        (status = 404, description = "Hotel not found or not visible")
    )
)]
pub async fn get_hotel(
    State(state): State<AppState>,
    current_user: Option<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Hotel>> {
    let viewer = current_user.map(|u| u.actor());
    let hotel = state.hotel_service.get_hotel(viewer, id).await?;
    Ok(Json(hotel))
}

/// Edit an owned hotel
#[utoipa::path(
    put,
    path = "/api/hotels/{id}",
    tag = "Hotels",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Hotel ID")),
    request_body = UpdateHotelRequest,
    responses(
        (status = 200, description = "Hotel updated", body = Hotel),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Hotel not found")
    )
)]
pub async fn update_hotel(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateHotelRequest>,
) -> AppResult<Json<Hotel>> {
    let hotel = state
        .hotel_service
        .update_hotel(current_user.actor(), id, payload.into())
        .await?;
    Ok(Json(hotel))
}

/// Delete a hotel without bookings (owner or admin)
#[utoipa::path(
    delete,
    path = "/api/hotels/{id}",
    tag = "Hotels",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Hotel ID")),
    responses(
        (status = 204, description = "Hotel deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Hotel not found"),
        (status = 409, description = "Hotel has bookings")
    )
)]
pub async fn delete_hotel(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .hotel_service
        .delete_hotel(current_user.actor(), id)
        .await?;
    Ok(NoContent)
}

/// Room types of a hotel
#[utoipa::path(
    get,
    path = "/api/hotels/{id}/rooms",
    tag = "Rooms",
    params(("id" = Uuid, Path, description = "Hotel ID")),
    responses(
        (status = 200, description = "Rooms, cheapest first", body = [Room]),
        (status = 404, description = "Hotel not found or not visible")
    )
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    current_user: Option<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Room>>> {
    let viewer = current_user.map(|u| u.actor());
    let rooms = state.hotel_service.list_rooms(viewer, id).await?;
    Ok(Json(rooms))
}

/// Add a room type to an owned hotel
#[utoipa::path(
    post,
    path = "/api/hotels/{id}/rooms",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Hotel ID")),
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = Room),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not the owner")
    )
)]
pub async fn create_room(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateRoomRequest>,
) -> AppResult<Created<Room>> {
    let room = state
        .hotel_service
        .create_room(current_user.actor(), id, payload.into())
        .await?;
    Ok(Created(room))
}

/// Room details
#[utoipa::path(
    get,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    params(("id" = Uuid, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room", body = Room),
        (status = 404, description = "Room not found or its hotel not visible")
    )
)]
pub async fn get_room(
    State(state): State<AppState>,
    current_user: Option<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Room>> {
    let viewer = current_user.map(|u| u.actor());
    let room = state.hotel_service.get_room(viewer, id).await?;
    Ok(Json(room))
}

/// Edit a room type of an owned hotel
#[utoipa::path(
    put,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Room ID")),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Room updated", body = Room),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn update_room(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateRoomRequest>,
) -> AppResult<Json<Room>> {
    let room = state
        .hotel_service
        .update_room(current_user.actor(), id, payload.into())
        .await?;
    Ok(Json(room))
}

/// Delete a room type without bookings
#[utoipa::path(
    delete,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Room ID")),
    responses(
        (status = 204, description = "Room deleted"),
        (status = 403, description = "Not the owner"),
        (status = 409, description = "Room has bookings")
    )
)]
pub async fn delete_room(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .hotel_service
        .delete_room(current_user.actor(), id)
        .await?;
    Ok(NoContent)
}
