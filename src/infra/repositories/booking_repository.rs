//! Booking repository implementation.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use uuid::Uuid;

use super::entities::booking::{self, ActiveModel, Entity as BookingEntity};
use super::entities::hotel;
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;
use domain::{Booking, BookingStatus, BookingSummary, NewBooking, StayPeriod};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Booking repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Find booking by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>>;

    /// A guest's bookings, newest first
    async fn list_for_guest(&self, guest_id: Uuid) -> AppResult<Vec<Booking>>;

    /// Bookings at hotels owned by a hotelier
    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>>;

    /// Every booking on the platform, one page at a time
    async fn list_all(&self, params: PaginationParams) -> AppResult<(Vec<Booking>, u64)>;

    /// Bookings ever made for a room type
    async fn count_for_room(&self, room_id: Uuid) -> AppResult<u64>;

    /// Bookings ever made at a hotel
    async fn count_for_hotel(&self, hotel_id: Uuid) -> AppResult<u64>;

    /// Whether the guest has finished a stay at the hotel
    async fn has_completed_stay(&self, guest_id: Uuid, hotel_id: Uuid) -> AppResult<bool>;

    /// Counts and revenue, for one hotelier or the whole platform
    async fn summary(&self, owner_id: Option<Uuid>) -> AppResult<BookingSummary>;
}

/// Concrete implementation of BookingRepository
pub struct BookingStore {
    db: DatabaseConnection,
}

impl BookingStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_bookings(models: Vec<booking::Model>) -> AppResult<Vec<Booking>> {
    models.into_iter().map(Booking::try_from).collect()
}

fn owned_by(owner_id: Uuid) -> Select<BookingEntity> {
    BookingEntity::find()
        .join(JoinType::InnerJoin, booking::Relation::Hotel.def())
        .filter(hotel::Column::OwnerId.eq(owner_id))
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> AppResult<Option<Booking>> {
    BookingEntity::find_by_id(id)
        .one(db)
        .await?
        .map(Booking::try_from)
        .transpose()
}

/// Non-cancelled bookings of a room whose stay intersects `[check_in, check_out)`
/// Stays on a room type that still hold inventory during `period`
pub(crate) async fn count_overlapping<C: ConnectionTrait>(
    db: &C,
    room_id: Uuid,
    period: StayPeriod,
) -> AppResult<u64> {
    // Only stays that end after our check-in can collide
    let stays: Vec<(String, NaiveDate, NaiveDate)> = BookingEntity::find()
        .select_only()
        .column(booking::Column::Status)
        .column(booking::Column::CheckIn)
        .column(booking::Column::CheckOut)
        .filter(booking::Column::RoomId.eq(room_id))
        .filter(booking::Column::CheckOut.gt(period.check_in()))
        .into_tuple()
        .all(db)
        .await?;

    let mut taken = 0;
    for (status, check_in, check_out) in stays {
        let status: BookingStatus = status.parse()?;
        if status.occupies_room() && period.overlaps(check_in, check_out) {
            taken += 1;
        }
    }
    Ok(taken)
}

pub(crate) async fn create<C: ConnectionTrait>(db: &C, new_booking: NewBooking) -> AppResult<Booking> {
    let nights = i32::try_from(new_booking.period.nights())
        .map_err(|_| AppError::internal("Stay length out of range"))?;
    let now = Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        guest_id: Set(new_booking.guest_id),
        room_id: Set(new_booking.room_id),
        hotel_id: Set(new_booking.hotel_id),
        check_in: Set(new_booking.period.check_in()),
        check_out: Set(new_booking.period.check_out()),
        guests: Set(new_booking.guests),
        nights: Set(nights),
        subtotal: Set(new_booking.quote.subtotal),
        tax_amount: Set(new_booking.quote.tax_amount),
        total_amount: Set(new_booking.quote.total_amount),
        status: Set(BookingStatus::Upcoming.as_str().to_string()),
        payment_method: Set(new_booking.payment_method.as_str().to_string()),
        special_requests: Set(new_booking.special_requests),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Booking::try_from(active_model.insert(db).await?)
}

/// Compare-and-set the status; `false` when another writer moved it first.
pub(crate) async fn update_status_if<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    expected: BookingStatus,
    next: BookingStatus,
) -> AppResult<bool> {
    let result = BookingEntity::update_many()
        .col_expr(booking::Column::Status, Expr::value(next.as_str()))
        .col_expr(booking::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(booking::Column::Id.eq(id))
        .filter(booking::Column::Status.eq(expected.as_str()))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

pub(crate) async fn count_for_hotel<C: ConnectionTrait>(db: &C, hotel_id: Uuid) -> AppResult<u64> {
    BookingEntity::find()
        .filter(booking::Column::HotelId.eq(hotel_id))
        .count(db)
        .await
        .map_err(AppError::from)
}

#[async_trait]
impl BookingRepository for BookingStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        find_by_id(&self.db, id).await
    }

    async fn list_for_guest(&self, guest_id: Uuid) -> AppResult<Vec<Booking>> {
        let models = BookingEntity::find()
            .filter(booking::Column::GuestId.eq(guest_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await?;

        to_bookings(models)
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        let mut query = owned_by(owner_id).order_by_desc(booking::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(booking::Column::Status.eq(status.as_str()));
        }

        to_bookings(query.all(&self.db).await?)
    }

    async fn list_all(&self, params: PaginationParams) -> AppResult<(Vec<Booking>, u64)> {
        let paginator = BookingEntity::find()
            .order_by_desc(booking::Column::CreatedAt)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let bookings = to_bookings(paginator.fetch_page(params.page_index()).await?)?;

        Ok((bookings, total))
    }

    async fn count_for_room(&self, room_id: Uuid) -> AppResult<u64> {
        BookingEntity::find()
            .filter(booking::Column::RoomId.eq(room_id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn count_for_hotel(&self, hotel_id: Uuid) -> AppResult<u64> {
        count_for_hotel(&self.db, hotel_id).await
    }

    async fn has_completed_stay(&self, guest_id: Uuid, hotel_id: Uuid) -> AppResult<bool> {
        let completed = BookingEntity::find()
            .filter(booking::Column::GuestId.eq(guest_id))
            .filter(booking::Column::HotelId.eq(hotel_id))
            .filter(booking::Column::Status.eq(BookingStatus::Completed.as_str()))
            .count(&self.db)
            .await?;

        Ok(completed > 0)
    }

    async fn summary(&self, owner_id: Option<Uuid>) -> AppResult<BookingSummary> {
        let query = match owner_id {
            Some(owner_id) => owned_by(owner_id),
            None => BookingEntity::find(),
        };
        let bookings = to_bookings(query.all(&self.db).await?)?;

        Ok(BookingSummary::from_bookings(&bookings))
    }
}
