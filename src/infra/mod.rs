//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Redis (rate limiting)
//! - Unit of Work for transaction management

pub mod cache;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use repositories::{
    BookingRepository, BookingStore, HotelRepository, HotelStore, NotificationRepository,
    NotificationStore, ReviewRepository, ReviewStore, RoomRepository, RoomStore, UserRepository,
    UserStore,
};
pub use unit_of_work::{Persistence, TransactionContext, TxFuture, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockBookingRepository, MockHotelRepository, MockNotificationRepository, MockReviewRepository,
    MockRoomRepository, MockUserRepository,
};
#[cfg(any(test, feature = "test-utils"))]
pub use unit_of_work::StubPersistence;
