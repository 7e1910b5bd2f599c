//! Hotel service - Listings, moderation and room inventory.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::Actor;
use crate::config::NOTIFY_TITLE_HOTEL_STATUS;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};
use domain::validation::normalize_amenities;
use domain::{
    Hotel, HotelSearch, HotelStatus, HotelUpdate, NewHotel, NewRoom, NotificationDraft,
    NotificationKind, Room, RoomUpdate,
};

/// Hotel service trait for dependency injection.
#[async_trait]
pub trait HotelService: Send + Sync {
    /// Submit a new hotel for moderation
    async fn create_hotel(&self, owner_id: Uuid, hotel: NewHotel) -> AppResult<Hotel>;

    /// Edit a hotel owned by the actor
    async fn update_hotel(&self, actor: Actor, id: Uuid, update: HotelUpdate) -> AppResult<Hotel>;

    /// Fetch a hotel; non-active hotels are only visible to their owner and admins
    async fn get_hotel(&self, viewer: Option<Actor>, id: Uuid) -> AppResult<Hotel>;

    /// Public listing of active hotels
    async fn list_hotels(
        &self,
        search: HotelSearch,
        params: PaginationParams,
    ) -> AppResult<Paginated<Hotel>>;

    /// Listing across every status, for moderation
    async fn list_all_hotels(
        &self,
        search: HotelSearch,
        params: PaginationParams,
    ) -> AppResult<Paginated<Hotel>>;

    /// Hotels owned by a hotelier
    async fn list_own_hotels(&self, owner_id: Uuid) -> AppResult<Vec<Hotel>>;

    /// Moderate a hotel and tell its owner
    async fn set_hotel_status(&self, id: Uuid, status: HotelStatus) -> AppResult<Hotel>;

    /// Remove a hotel that has never been booked
    async fn delete_hotel(&self, actor: Actor, id: Uuid) -> AppResult<()>;

    /// Add a room type to an owned hotel
    async fn create_room(&self, actor: Actor, hotel_id: Uuid, room: NewRoom) -> AppResult<Room>;

    /// Edit a room type of an owned hotel
    async fn update_room(&self, actor: Actor, room_id: Uuid, update: RoomUpdate)
        -> AppResult<Room>;

    /// Remove a room type that has never been booked
    async fn delete_room(&self, actor: Actor, room_id: Uuid) -> AppResult<()>;

    /// Room types of a hotel, cheapest first
    /// Room types of a hotel the viewer may see
    async fn list_rooms(&self, viewer: Option<Actor>, hotel_id: Uuid) -> AppResult<Vec<Room>>;

    /// Fetch a room type of a hotel the viewer may see
    async fn get_room(&self, viewer: Option<Actor>, room_id: Uuid) -> AppResult<Room>;
}

/// Concrete implementation of HotelService using Unit of Work.
pub struct HotelManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> HotelManager<U> {
    /// Create new hotel service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find_hotel(&self, id: Uuid) -> AppResult<Hotel> {
        self.uow
            .hotels()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Hotel")
    }

    /// Load a hotel the actor owns
    async fn owned_hotel(&self, actor: Actor, id: Uuid) -> AppResult<Hotel> {
        let hotel = self.find_hotel(id).await?;
        if !hotel.is_owned_by(actor.id) {
            tracing::warn!(hotel_id = %id, user_id = %actor.id, "Hotel access by non-owner");
            return Err(AppError::NotOwner);
        }
        Ok(hotel)
    }

    async fn find_room(&self, room_id: Uuid) -> AppResult<Room> {
        self.uow
            .rooms()
            .find_by_id(room_id)
            .await?
            .ok_or_not_found("Room")
    }

    /// Load a room whose hotel the actor owns
    async fn owned_room(&self, actor: Actor, room_id: Uuid) -> AppResult<Room> {
        let room = self.find_room(room_id).await?;
        self.owned_hotel(actor, room.hotel_id).await?;
        Ok(room)
    }

    async fn search(
        &self,
        mut search: HotelSearch,
        params: PaginationParams,
    ) -> AppResult<Paginated<Hotel>> {
        search.amenities = normalize_amenities(&search.amenities);
        let hotels = self.uow.hotels().search(&search).await?;
        Ok(Paginated::from_items(hotels, &params))
    }
}

#[async_trait]
impl<U: UnitOfWork> HotelService for HotelManager<U> {
    async fn create_hotel(&self, owner_id: Uuid, hotel: NewHotel) -> AppResult<Hotel> {
        let hotel = self.uow.hotels().create(owner_id, hotel.validated()?).await?;
        tracing::info!(hotel_id = %hotel.id, owner_id = %owner_id, "Hotel submitted");
        Ok(hotel)
    }

    async fn update_hotel(&self, actor: Actor, id: Uuid, update: HotelUpdate) -> AppResult<Hotel> {
        let update = update.validated()?;
        self.owned_hotel(actor, id).await?;
        self.uow.hotels().update(id, update).await
    }

    async fn get_hotel(&self, viewer: Option<Actor>, id: Uuid) -> AppResult<Hotel> {
        let hotel = self.find_hotel(id).await?;
        let privileged =
            viewer.is_some_and(|v| v.is_admin() || hotel.is_owned_by(v.id));

        if hotel.status.is_bookable() || privileged {
            Ok(hotel)
        } else {
            Err(AppError::NotFound("Hotel"))
        }
    }

    async fn list_hotels(
        &self,
        search: HotelSearch,
        params: PaginationParams,
    ) -> AppResult<Paginated<Hotel>> {
        let search = HotelSearch {
            status: Some(HotelStatus::Active),
            ..search
        };
        self.search(search, params).await
    }

    async fn list_all_hotels(
        &self,
        search: HotelSearch,
        params: PaginationParams,
    ) -> AppResult<Paginated<Hotel>> {
        self.search(search, params).await
    }

    async fn list_own_hotels(&self, owner_id: Uuid) -> AppResult<Vec<Hotel>> {
        self.uow.hotels().list_by_owner(owner_id).await
    }

    async fn set_hotel_status(&self, id: Uuid, status: HotelStatus) -> AppResult<Hotel> {
        let hotel = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let hotel = ctx.hotels().set_status(id, status).await?;
                    let draft = NotificationDraft::new(
                        NotificationKind::Approval,
                        NOTIFY_TITLE_HOTEL_STATUS,
                        format!("Your hotel \"{}\" is now {}", hotel.name, status),
                    );
                    ctx.notifications().create(hotel.owner_id, &draft).await?;
                    Ok(hotel)
                })
            })
            .await?;

        tracing::info!(hotel_id = %id, status = %status, "Hotel status changed");
        Ok(hotel)
    }

    async fn delete_hotel(&self, actor: Actor, id: Uuid) -> AppResult<()> {
        if !actor.is_admin() {
            self.owned_hotel(actor, id).await?;
        }

        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if ctx.bookings().count_for_hotel(id).await? > 0 {
                        return Err(AppError::conflict(
                            "Hotel has bookings and cannot be deleted",
                        ));
                    }
                    ctx.hotels().delete(id).await
                })
            })
            .await?;

        tracing::info!(hotel_id = %id, by = %actor.id, "Hotel deleted");
        Ok(())
    }

    async fn create_room(&self, actor: Actor, hotel_id: Uuid, room: NewRoom) -> AppResult<Room> {
        let room = room.validated()?;
        self.owned_hotel(actor, hotel_id).await?;
        self.uow.rooms().create(hotel_id, room).await
    }

    async fn update_room(
        &self,
        actor: Actor,
        room_id: Uuid,
        update: RoomUpdate,
    ) -> AppResult<Room> {
        let update = update.validated()?;
        self.owned_room(actor, room_id).await?;
        self.uow.rooms().update(room_id, update).await
    }

    async fn delete_room(&self, actor: Actor, room_id: Uuid) -> AppResult<()> {
        self.owned_room(actor, room_id).await?;

        if self.uow.bookings().count_for_room(room_id).await? > 0 {
            return Err(AppError::conflict("Room has bookings and cannot be deleted"));
        }
        self.uow.rooms().delete(room_id).await
    }

    async fn list_rooms(&self, viewer: Option<Actor>, hotel_id: Uuid) -> AppResult<Vec<Room>> {
        self.get_hotel(viewer, hotel_id).await?;
        self.uow.rooms().list_by_hotel(hotel_id).await
    }

    async fn get_room(&self, viewer: Option<Actor>, room_id: Uuid) -> AppResult<Room> {
        let room = self.find_room(room_id).await?;
        // Rooms of hidden hotels are hidden too
        match self.get_hotel(viewer, room.hotel_id).await {
            Ok(_) => Ok(room),
            Err(AppError::NotFound(_)) => Err(AppError::NotFound("Room")),
            Err(e) => Err(e),
        }
    }
}
