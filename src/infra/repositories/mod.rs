//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.
//! Query functions generic over `ConnectionTrait` are shared between the
//! `*Store` implementations and the transaction-bound repositories.

pub(crate) mod booking_repository;
pub(crate) mod entities;
pub(crate) mod hotel_repository;
pub(crate) mod notification_repository;
pub(crate) mod review_repository;
pub(crate) mod room_repository;
mod user_repository;

pub use booking_repository::{BookingRepository, BookingStore};
pub use hotel_repository::{HotelRepository, HotelStore};
pub use notification_repository::{NotificationRepository, NotificationStore};
pub use review_repository::{ReviewRepository, ReviewStore};
pub use room_repository::{RoomRepository, RoomStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use booking_repository::MockBookingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use hotel_repository::MockHotelRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_repository::MockNotificationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use review_repository::MockReviewRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use room_repository::MockRoomRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
