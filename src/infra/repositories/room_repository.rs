//! Room repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::json_list;
use super::entities::room::{self, ActiveModel, Entity as RoomEntity};
use crate::errors::{AppError, AppResult, OptionExt};
use domain::{NewRoom, Room, RoomUpdate};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Room repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Find room by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>>;

    /// Add a room type to a hotel
    async fn create(&self, hotel_id: Uuid, room: NewRoom) -> AppResult<Room>;

    /// Apply room changes
    async fn update(&self, id: Uuid, update: RoomUpdate) -> AppResult<Room>;

    /// Remove a room type
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Room types of a hotel, cheapest first
    async fn list_by_hotel(&self, hotel_id: Uuid) -> AppResult<Vec<Room>>;

    /// Count room types across hotels
    async fn count_for_hotels(&self, hotel_ids: &[Uuid]) -> AppResult<u64>;
}

/// Concrete implementation of RoomRepository
pub struct RoomStore {
    db: DatabaseConnection,
}

impl RoomStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Load a room and hold its row lock until the transaction ends.
///
/// SQLite has no row locks; its writers are already serialized.
pub(crate) async fn find_for_update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> AppResult<Option<Room>> {
    let mut query = RoomEntity::find_by_id(id);
    if db.get_database_backend() == DatabaseBackend::Postgres {
        query = query.lock_exclusive();
    }

    query.one(db).await?.map(Room::try_from).transpose()
}

async fn find_model<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<room::Model> {
    RoomEntity::find_by_id(id).one(db).await?.ok_or_not_found("Room")
}

#[async_trait]
impl RoomRepository for RoomStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>> {
        RoomEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Room::try_from)
            .transpose()
    }

    async fn create(&self, hotel_id: Uuid, new_room: NewRoom) -> AppResult<Room> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            hotel_id: Set(hotel_id),
            name: Set(new_room.name),
            description: Set(new_room.description),
            price_per_night: Set(new_room.price_per_night),
            capacity: Set(new_room.capacity),
            total_rooms: Set(new_room.total_rooms),
            amenities: Set(json_list(&new_room.amenities)),
            images: Set(json_list(&new_room.images)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Room::try_from(active_model.insert(&self.db).await?)
    }

    async fn update(&self, id: Uuid, update: RoomUpdate) -> AppResult<Room> {
        let mut active: ActiveModel = find_model(&self.db, id).await?.into();

        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(price) = update.price_per_night {
            active.price_per_night = Set(price);
        }
        if let Some(capacity) = update.capacity {
            active.capacity = Set(capacity);
        }
        if let Some(total_rooms) = update.total_rooms {
            active.total_rooms = Set(total_rooms);
        }
        if let Some(amenities) = update.amenities {
            active.amenities = Set(json_list(&amenities));
        }
        if let Some(images) = update.images {
            active.images = Set(json_list(&images));
        }
        active.updated_at = Set(Utc::now());

        Room::try_from(active.update(&self.db).await?)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = RoomEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Room"));
        }
        Ok(())
    }

    async fn list_by_hotel(&self, hotel_id: Uuid) -> AppResult<Vec<Room>> {
        RoomEntity::find()
            .filter(room::Column::HotelId.eq(hotel_id))
            .order_by_asc(room::Column::PricePerNight)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Room::try_from)
            .collect()
    }

    async fn count_for_hotels(&self, hotel_ids: &[Uuid]) -> AppResult<u64> {
        if hotel_ids.is_empty() {
            return Ok(0);
        }

        RoomEntity::find()
            .filter(room::Column::HotelId.is_in(hotel_ids.iter().copied()))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
