//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to guests who book rooms
pub const ROLE_USER: &str = "user";

/// Hotel owner role
pub const ROLE_HOTELIER: &str = "hotelier";

/// Administrator role with moderation privileges
pub const ROLE_ADMIN: &str = "admin";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_HOTELIER, ROLE_ADMIN];

/// Check if a role value is valid
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (argon2 input bound)
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Minimum name length requirement
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum name length
pub const MAX_NAME_LENGTH: usize = 50;

/// Lowest accepted review rating
pub const MIN_RATING: i32 = 1;

/// Highest accepted review rating
pub const MAX_RATING: i32 = 5;

// =============================================================================
// Bookings
// =============================================================================

/// Tax applied on top of the room subtotal (13% VAT)
pub const TAX_RATE: f64 = 0.13;

/// Longest stay accepted in a single booking
pub const MAX_STAY_NIGHTS: i64 = 30;

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
