//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_handler, analytics_handler, auth_handler, booking_handler, hotel_handler,
    notification_handler, review_handler,
};
use crate::services::{
    AuthResponse, HotelierStats, HotelsByStatus, PlatformStats, TokenResponse, UsersByRole,
};
use crate::types::{
    CountResponse, MessageResponse, PaginatedBookings, PaginatedHotels, PaginatedUsers,
    PaginationMeta,
};
use domain::{
    Booking, BookingStatus, BookingSummary, Hotel, HotelStatus, Notification, NotificationKind,
    PaymentMethod, Review, Role, Room, UserResponse, UserStatus,
};

/// OpenAPI documentation for the hotel booking API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hotel Booking API",
        version = "0.1.0",
        description = "Hotel marketplace: listings, reservations, reviews and moderation"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::me,
        auth_handler::update_profile,
        auth_handler::change_password,
        // Hotel and room endpoints
        hotel_handler::list_hotels,
        hotel_handler::create_hotel,
        hotel_handler::list_my_hotels,
        hotel_handler::get_hotel,
        hotel_handler::update_hotel,
        hotel_handler::delete_hotel,
        hotel_handler::list_rooms,
        hotel_handler::create_room,
        hotel_handler::get_room,
        hotel_handler::update_room,
        hotel_handler::delete_room,
        // Booking endpoints
        booking_handler::create_booking,
        booking_handler::my_bookings,
        booking_handler::hotelier_bookings,
        booking_handler::get_booking,
        booking_handler::update_status,
        booking_handler::cancel_booking,
        // Review endpoints
        review_handler::create_review,
        review_handler::list_hotel_reviews,
        review_handler::reply_to_review,
        // Notification endpoints
        notification_handler::list_notifications,
        notification_handler::unread_count,
        notification_handler::mark_all_read,
        notification_handler::mark_read,
        notification_handler::delete_notification,
        // Dashboards
        analytics_handler::hotelier_stats,
        // Moderation endpoints
        admin_handler::list_users,
        admin_handler::set_user_status,
        admin_handler::list_hotels,
        admin_handler::set_hotel_status,
        admin_handler::list_bookings,
        admin_handler::delete_review,
        admin_handler::send_notification,
        admin_handler::platform_stats,
    ),
    components(
        schemas(
            // Domain types
            Role,
            UserStatus,
            UserResponse,
            HotelStatus,
            Hotel,
            Room,
            BookingStatus,
            PaymentMethod,
            Booking,
            BookingSummary,
            Review,
            NotificationKind,
            Notification,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::UpdateProfileRequest,
            auth_handler::ChangePasswordRequest,
            TokenResponse,
            AuthResponse,
            // Listing types
            hotel_handler::CreateHotelRequest,
            hotel_handler::UpdateHotelRequest,
            hotel_handler::CreateRoomRequest,
            hotel_handler::UpdateRoomRequest,
            // Booking and review types
            booking_handler::CreateBookingRequest,
            booking_handler::UpdateStatusRequest,
            review_handler::CreateReviewRequest,
            review_handler::ReplyRequest,
            // Moderation types
            admin_handler::UserStatusRequest,
            admin_handler::HotelStatusRequest,
            admin_handler::SendNotificationRequest,
            // Dashboards
            HotelierStats,
            PlatformStats,
            UsersByRole,
            HotelsByStatus,
            // Shared response types
            MessageResponse,
            CountResponse,
            PaginationMeta,
            PaginatedHotels,
            PaginatedBookings,
            PaginatedUsers,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and profile"),
        (name = "Hotels", description = "Hotel listings"),
        (name = "Rooms", description = "Room types and inventory"),
        (name = "Bookings", description = "Reservations and stay lifecycle"),
        (name = "Reviews", description = "Guest reviews and hotelier replies"),
        (name = "Notifications", description = "In-app inbox"),
        (name = "Analytics", description = "Hotelier dashboard"),
        (name = "Admin", description = "Platform moderation")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
