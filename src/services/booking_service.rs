//! Booking service - Reservations and the booking lifecycle.
//!
//! Availability is decided inside a serializable transaction that locks the
//! room row, so two guests racing for the last unit cannot both get it.
//! Status changes are compare-and-set updates committed together with the
//! notification they trigger.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::Actor;
use crate::config::{
    NOTIFY_TITLE_BOOKING_CANCELLED, NOTIFY_TITLE_BOOKING_STATUS, NOTIFY_TITLE_NEW_BOOKING,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};
use domain::{
    Booking, BookingStatus, Capability, Hotel, NewBooking, NotificationDraft, NotificationKind,
    PaymentMethod, PriceQuote, StayPeriod,
};

/// What a guest asks for when booking
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub room_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub special_requests: Option<String>,
    pub payment_method: PaymentMethod,
}

/// Booking service trait for dependency injection.
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Reserve a room for a guest
    async fn create_booking(&self, guest_id: Uuid, request: BookingRequest) -> AppResult<Booking>;

    /// Move a booking one step forward (owning hotelier or admin)
    async fn update_status(
        &self,
        actor: Actor,
        id: Uuid,
        status: BookingStatus,
    ) -> AppResult<Booking>;

    /// Cancel an upcoming booking (the guest who made it)
    async fn cancel_booking(&self, actor: Actor, id: Uuid) -> AppResult<Booking>;

    /// Fetch a booking visible to the actor
    async fn get_booking(&self, actor: Actor, id: Uuid) -> AppResult<Booking>;

    /// A guest's own bookings
    async fn list_for_guest(&self, guest_id: Uuid) -> AppResult<Vec<Booking>>;

    /// Bookings at a hotelier's hotels
    async fn list_for_hotelier(
        &self,
        owner_id: Uuid,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>>;

    /// Every booking on the platform
    async fn list_all(&self, params: PaginationParams) -> AppResult<Paginated<Booking>>;
}

/// Concrete implementation of BookingService using Unit of Work.
pub struct BookingManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BookingManager<U> {
    /// Create new booking service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find_booking(&self, id: Uuid) -> AppResult<Booking> {
        self.uow
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Booking")
    }

    async fn find_hotel(&self, id: Uuid) -> AppResult<Hotel> {
        self.uow
            .hotels()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Hotel")
    }

    /// Apply `next` if the booking still has the status it was read with,
    /// then notify `recipient`.
    async fn apply_status(
        &self,
        booking: &Booking,
        next: BookingStatus,
        recipient: Uuid,
        draft: NotificationDraft,
    ) -> AppResult<Booking> {
        let id = booking.id;
        let expected = booking.status;

        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if !ctx.bookings().update_status_if(id, expected, next).await? {
                        return Err(AppError::conflict(
                            "Booking status was changed by another request",
                        ));
                    }
                    ctx.notifications().create(recipient, &draft).await?;
                    ctx.bookings()
                        .find_by_id(id)
                        .await?
                        .ok_or_not_found("Booking")
                })
            })
            .await
    }
}

fn clean_requests(requests: Option<String>) -> Option<String> {
    requests
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}

#[async_trait]
impl<U: UnitOfWork> BookingService for BookingManager<U> {
    async fn create_booking(&self, guest_id: Uuid, request: BookingRequest) -> AppResult<Booking> {
        let today = Utc::now().date_naive();
        let period = StayPeriod::new(request.check_in, request.check_out, today)?;

        let room = self
            .uow
            .rooms()
            .find_by_id(request.room_id)
            .await?
            .ok_or_not_found("Room")?;

        if request.guests < 1 || request.guests > room.capacity {
            return Err(AppError::validation(format!(
                "Guests must be between 1 and {}",
                room.capacity
            )));
        }

        let hotel = self.find_hotel(room.hotel_id).await?;
        if !hotel.status.is_bookable() {
            return Err(AppError::conflict("Hotel is not accepting bookings"));
        }

        let room_id = room.id;
        let hotel_id = hotel.id;
        let owner_id = hotel.owner_id;
        let draft = NotificationDraft::new(
            NotificationKind::Booking,
            NOTIFY_TITLE_NEW_BOOKING,
            format!(
                "New booking at \"{}\" from {} to {}",
                hotel.name,
                period.check_in(),
                period.check_out()
            ),
        );
        let guests = request.guests;
        let payment_method = request.payment_method;
        let special_requests = clean_requests(request.special_requests);

        let booking = self
            .uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    let room = ctx
                        .rooms()
                        .find_for_update(room_id)
                        .await?
                        .ok_or_not_found("Room")?;

                    let taken = ctx
                        .bookings()
                        .count_overlapping(room_id, period)
                        .await?;
                    if taken >= u64::try_from(room.total_rooms).unwrap_or(0) {
                        return Err(AppError::RoomUnavailable);
                    }

                    let booking = ctx
                        .bookings()
                        .create(NewBooking {
                            guest_id,
                            room_id,
                            hotel_id,
                            period,
                            guests,
                            quote: PriceQuote::for_stay(room.price_per_night, period.nights()),
                            payment_method,
                            special_requests,
                        })
                        .await?;

                    ctx.notifications().create(owner_id, &draft).await?;
                    Ok(booking)
                })
            })
            .await?;

        tracing::info!(
            booking_id = %booking.id,
            room_id = %booking.room_id,
            guest_id = %guest_id,
            total = booking.total_amount,
            "Booking created"
        );
        Ok(booking)
    }

    async fn update_status(
        &self,
        actor: Actor,
        id: Uuid,
        status: BookingStatus,
    ) -> AppResult<Booking> {
        let booking = self.find_booking(id).await?;

        if !actor.role.can(Capability::ManageAnyBooking) {
            let hotel = self.find_hotel(booking.hotel_id).await?;
            if !(actor.role.can(Capability::ManageOwnBookings) && hotel.is_owned_by(actor.id)) {
                tracing::warn!(booking_id = %id, user_id = %actor.id, "Booking status change refused");
                return Err(AppError::Forbidden);
            }
        }

        let next = booking.status.transition_to(status)?;
        let draft = NotificationDraft::new(
            NotificationKind::Booking,
            NOTIFY_TITLE_BOOKING_STATUS,
            format!("Your booking from {} is now {}", booking.check_in, next),
        );
        let updated = self
            .apply_status(&booking, next, booking.guest_id, draft)
            .await?;

        tracing::info!(booking_id = %id, from = %booking.status, to = %next, "Booking status changed");
        Ok(updated)
    }

    async fn cancel_booking(&self, actor: Actor, id: Uuid) -> AppResult<Booking> {
        let booking = self.find_booking(id).await?;
        if booking.guest_id != actor.id {
            return Err(AppError::NotOwner);
        }

        let next = booking.status.cancel()?;
        let hotel = self.find_hotel(booking.hotel_id).await?;
        let draft = NotificationDraft::new(
            NotificationKind::Booking,
            NOTIFY_TITLE_BOOKING_CANCELLED,
            format!(
                "A booking at \"{}\" from {} to {} was cancelled",
                hotel.name, booking.check_in, booking.check_out
            ),
        );
        let cancelled = self
            .apply_status(&booking, next, hotel.owner_id, draft)
            .await?;

        tracing::info!(booking_id = %id, "Booking cancelled");
        Ok(cancelled)
    }

    async fn get_booking(&self, actor: Actor, id: Uuid) -> AppResult<Booking> {
        let booking = self.find_booking(id).await?;
        if booking.guest_id == actor.id || actor.role.can(Capability::ManageAnyBooking) {
            return Ok(booking);
        }

        let hotel = self.find_hotel(booking.hotel_id).await?;
        if hotel.is_owned_by(actor.id) {
            Ok(booking)
        } else {
            Err(AppError::Forbidden)
        }
    }

    async fn list_for_guest(&self, guest_id: Uuid) -> AppResult<Vec<Booking>> {
        self.uow.bookings().list_for_guest(guest_id).await
    }

    async fn list_for_hotelier(
        &self,
        owner_id: Uuid,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        self.uow.bookings().list_for_owner(owner_id, status).await
    }

    async fn list_all(&self, params: PaginationParams) -> AppResult<Paginated<Booking>> {
        let (bookings, total) = self.uow.bookings().list_all(params).await?;
        Ok(Paginated::new(bookings, &params, total))
    }
}
