//! Domain layer - Core business entities and rules of the hotel marketplace.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! roles and capabilities, the booking lifecycle, stay pricing, listing and
//! review rules. Persistence and HTTP concerns live in the application crate.

pub mod booking;
pub mod constants;
pub mod error;
pub mod hotel;
pub mod notification;
pub mod password;
pub mod review;
pub mod role;
pub mod user;
pub mod validation;

pub use booking::{
    Booking, BookingStatus, BookingSummary, NewBooking, PaymentMethod, PriceQuote, StayPeriod,
};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use hotel::{
    Hotel, HotelSearch, HotelStatus, HotelUpdate, NewHotel, NewRoom, Room, RoomUpdate,
};
pub use notification::{Notification, NotificationDraft, NotificationKind, NotificationTarget};
pub use password::Password;
pub use review::{NewReview, Rating, RatingAggregate, Review};
pub use role::{Capability, Role};
pub use user::{NewUser, ProfileUpdate, User, UserResponse, UserStatus};
