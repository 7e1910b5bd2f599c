//! HTTP request handlers.

pub mod admin_handler;
pub mod analytics_handler;
pub mod auth_handler;
pub mod booking_handler;
pub mod hotel_handler;
pub mod notification_handler;
pub mod review_handler;

pub use admin_handler::admin_routes;
pub use analytics_handler::analytics_routes;
pub use auth_handler::auth_routes;
pub use booking_handler::booking_routes;
pub use hotel_handler::{hotel_routes, room_routes};
pub use notification_handler::notification_routes;
pub use review_handler::review_routes;
