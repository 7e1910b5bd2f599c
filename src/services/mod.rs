//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain rules and infrastructure to fulfill
//! application use cases. They depend on the `UnitOfWork` abstraction for
//! repository access and transactions, and are exposed to the HTTP layer as
//! trait objects.

mod actor;
mod analytics_service;
mod auth_service;
mod booking_service;
pub mod container;
mod hotel_service;
mod notification_service;
mod review_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use actor::Actor;
pub use analytics_service::{
    AnalyticsManager, AnalyticsService, HotelierStats, HotelsByStatus, PlatformStats, UsersByRole,
};
pub use auth_service::{
    decode_token, AuthResponse, AuthService, Authenticator, Claims, Registration, TokenResponse,
};
pub use booking_service::{BookingManager, BookingRequest, BookingService};
pub use hotel_service::{HotelManager, HotelService};
pub use notification_service::{NotificationManager, NotificationService};
pub use review_service::{ReviewManager, ReviewRequest, ReviewService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
