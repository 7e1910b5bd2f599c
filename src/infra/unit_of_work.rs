//! Unit of Work pattern implementation.
//!
//! Centralizes access to all repositories and manages the transaction
//! lifecycle, so multi-table workflows (booking a room, moderating a hotel,
//! posting a review) commit or roll back as one.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::{
    booking_repository, hotel_repository, notification_repository, review_repository,
    room_repository, BookingRepository, BookingStore, HotelRepository, HotelStore,
    NotificationRepository, NotificationStore, ReviewRepository, ReviewStore, RoomRepository,
    RoomStore, UserRepository, UserStore,
};
use crate::errors::{AppError, AppResult};
use domain::{
    Booking, BookingStatus, Hotel, HotelStatus, NewBooking, NewReview, Notification,
    NotificationDraft, NotificationTarget, RatingAggregate, Review, Room, StayPeriod,
};

/// Boxed future returned by transaction closures
pub type TxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, use [`StubPersistence`] with repository mocks or integration tests.
#[async_trait]
pub trait UnitOfWork: Send + Sync + 'static {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn hotels(&self) -> Arc<dyn HotelRepository>;

    fn rooms(&self) -> Arc<dyn RoomRepository>;

    fn bookings(&self) -> Arc<dyn BookingRepository>;

    fn reviews(&self) -> Arc<dyn ReviewRepository>;

    fn notifications(&self) -> Arc<dyn NotificationRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    /// Uses ReadCommitted isolation.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;

    /// Execute a closure within a serializable transaction.
    ///
    /// Used where a read decides a write, such as the availability check
    /// before inserting a booking.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn hotels(&self) -> TxHotelRepository<'_> {
        TxHotelRepository { txn: self.txn }
    }

    pub fn rooms(&self) -> TxRoomRepository<'_> {
        TxRoomRepository { txn: self.txn }
    }

    pub fn bookings(&self) -> TxBookingRepository<'_> {
        TxBookingRepository { txn: self.txn }
    }

    pub fn reviews(&self) -> TxReviewRepository<'_> {
        TxReviewRepository { txn: self.txn }
    }

    pub fn notifications(&self) -> TxNotificationRepository<'_> {
        TxNotificationRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    hotel_repo: Arc<HotelStore>,
    room_repo: Arc<RoomStore>,
    booking_repo: Arc<BookingStore>,
    review_repo: Arc<ReviewStore>,
    notification_repo: Arc<NotificationStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            hotel_repo: Arc::new(HotelStore::new(db.clone())),
            room_repo: Arc::new(RoomStore::new(db.clone())),
            booking_repo: Arc::new(BookingStore::new(db.clone())),
            review_repo: Arc::new(ReviewStore::new(db.clone())),
            notification_repo: Arc::new(NotificationStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn hotels(&self) -> Arc<dyn HotelRepository> {
        self.hotel_repo.clone()
    }

    fn rooms(&self) -> Arc<dyn RoomRepository> {
        self.room_repo.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingRepository> {
        self.booking_repo.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.review_repo.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationRepository> {
        self.notification_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f).await
    }
}

/// Transaction-bound hotel operations
pub struct TxHotelRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxHotelRepository<'a> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Hotel>> {
        hotel_repository::find_by_id(self.txn, id).await
    }

    pub async fn set_status(&self, id: Uuid, status: HotelStatus) -> AppResult<Hotel> {
        hotel_repository::set_status(self.txn, id, status).await
    }

    pub async fn set_rating(&self, id: Uuid, rating: RatingAggregate) -> AppResult<()> {
        hotel_repository::set_rating(self.txn, id, rating).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        hotel_repository::delete(self.txn, id).await
    }
}

/// Transaction-bound room operations
pub struct TxRoomRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxRoomRepository<'a> {
    /// Load the room and lock it against concurrent bookings
    pub async fn find_for_update(&self, id: Uuid) -> AppResult<Option<Room>> {
        room_repository::find_for_update(self.txn, id).await
    }
}

/// Transaction-bound booking operations
pub struct TxBookingRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxBookingRepository<'a> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        booking_repository::find_by_id(self.txn, id).await
    }

    pub async fn count_overlapping(&self, room_id: Uuid, period: StayPeriod) -> AppResult<u64> {
        booking_repository::count_overlapping(self.txn, room_id, period).await
    }

    pub async fn create(&self, booking: NewBooking) -> AppResult<Booking> {
        booking_repository::create(self.txn, booking).await
    }

    pub async fn update_status_if(
        &self,
        id: Uuid,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> AppResult<bool> {
        booking_repository::update_status_if(self.txn, id, expected, next).await
    }

    pub async fn count_for_hotel(&self, hotel_id: Uuid) -> AppResult<u64> {
        booking_repository::count_for_hotel(self.txn, hotel_id).await
    }
}

/// Transaction-bound review operations
pub struct TxReviewRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxReviewRepository<'a> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>> {
        review_repository::find_by_id(self.txn, id).await
    }

    pub async fn create(&self, review: NewReview) -> AppResult<Review> {
        review_repository::create(self.txn, review).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        review_repository::delete(self.txn, id).await
    }

    /// Recompute the hotel's rating aggregate from its stored reviews
    pub async fn aggregate_for_hotel(&self, hotel_id: Uuid) -> AppResult<RatingAggregate> {
        let ratings = review_repository::ratings_for_hotel(self.txn, hotel_id).await?;
        Ok(RatingAggregate::from_ratings(ratings))
    }
}

/// Transaction-bound notification operations
pub struct TxNotificationRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxNotificationRepository<'a> {
    pub async fn create(
        &self,
        user_id: Uuid,
        draft: &NotificationDraft,
    ) -> AppResult<Notification> {
        notification_repository::create(self.txn, user_id, draft).await
    }

    pub async fn fan_out(
        &self,
        target: NotificationTarget,
        draft: &NotificationDraft,
    ) -> AppResult<u64> {
        notification_repository::fan_out(self.txn, target, draft).await
    }
}

/// Unit of Work over repository mocks, for service unit tests.
///
/// Transactions are not available and fail with an internal error, so tests
/// exercise everything a service checks before opening one.
#[cfg(any(test, feature = "test-utils"))]
pub struct StubPersistence {
    pub users: Arc<dyn UserRepository>,
    pub hotels: Arc<dyn HotelRepository>,
    pub rooms: Arc<dyn RoomRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for StubPersistence {
    fn default() -> Self {
        use super::repositories::{
            MockBookingRepository, MockHotelRepository, MockNotificationRepository,
            MockReviewRepository, MockRoomRepository, MockUserRepository,
        };

        Self {
            users: Arc::new(MockUserRepository::new()),
            hotels: Arc::new(MockHotelRepository::new()),
            rooms: Arc::new(MockRoomRepository::new()),
            bookings: Arc::new(MockBookingRepository::new()),
            reviews: Arc::new(MockReviewRepository::new()),
            notifications: Arc::new(MockNotificationRepository::new()),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl UnitOfWork for StubPersistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn hotels(&self) -> Arc<dyn HotelRepository> {
        self.hotels.clone()
    }

    fn rooms(&self) -> Arc<dyn RoomRepository> {
        self.rooms.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingRepository> {
        self.bookings.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.reviews.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationRepository> {
        self.notifications.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("transactions are not available in stubs"))
    }

    async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("transactions are not available in stubs"))
    }
}
