//! Roles and the capabilities they grant.
//!
//! Every access decision goes through [`Role::can`], so route guards and
//! services never compare role strings directly.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::{ROLE_ADMIN, ROLE_HOTELIER, ROLE_USER};
use crate::error::DomainError;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Guest who browses and books rooms
    User,
    /// Hotel owner managing listings and their bookings
    Hotelier,
    /// Platform moderator
    Admin,
}

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    BookRooms,
    WriteReviews,
    ManageListings,
    ManageOwnBookings,
    ReplyToReviews,
    ViewOwnAnalytics,
    ModeratePlatform,
    BroadcastNotifications,
    ManageAnyBooking,
}

impl Role {
    /// Check whether this role grants a capability
    pub fn can(self, capability: Capability) -> bool {
        use Capability::*;

        match self {
            Role::User => matches!(capability, BookRooms | WriteReviews),
            Role::Hotelier => matches!(
                capability,
                ManageListings | ManageOwnBookings | ReplyToReviews | ViewOwnAnalytics
            ),
            Role::Admin => matches!(
                capability,
                ModeratePlatform | BroadcastNotifications | ManageAnyBooking
            ),
        }
    }

    /// Check if this role has admin privileges
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Whether this role may be chosen at self-registration
    pub fn is_self_registrable(self) -> bool {
        !self.is_admin()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => ROLE_USER,
            Role::Hotelier => ROLE_HOTELIER,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// All roles, in display order
    pub fn all() -> [Role; 3] {
        [Role::User, Role::Hotelier, Role::Admin]
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_USER => Ok(Role::User),
            ROLE_HOTELIER => Ok(Role::Hotelier),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(DomainError::unknown("role", other)),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
