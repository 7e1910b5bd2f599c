//! Hotel and room listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::validation::{normalize_amenities, require_text};

/// Moderation state of a hotel listing. Only `Active` hotels are publicly listed
/// and bookable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HotelStatus {
    Pending,
    Active,
    Rejected,
    Suspended,
}

impl HotelStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HotelStatus::Pending => "pending",
            HotelStatus::Active => "active",
            HotelStatus::Rejected => "rejected",
            HotelStatus::Suspended => "suspended",
        }
    }

    pub fn all() -> [HotelStatus; 4] {
        [
            HotelStatus::Pending,
            HotelStatus::Active,
            HotelStatus::Rejected,
            HotelStatus::Suspended,
        ]
    }

    pub fn is_bookable(self) -> bool {
        self == HotelStatus::Active
    }
}

impl FromStr for HotelStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(HotelStatus::Pending),
            "active" => Ok(HotelStatus::Active),
            "rejected" => Ok(HotelStatus::Rejected),
            "suspended" => Ok(HotelStatus::Suspended),
            other => Err(DomainError::unknown("hotel status", other)),
        }
    }
}

impl std::fmt::Display for HotelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hotel domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Hotel {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub city: String,
    pub address: String,
    pub description: String,
    /// Amenity set, lowercase and sorted
    pub amenities: Vec<String>,
    /// Image references in display order
    pub images: Vec<String>,
    pub status: HotelStatus,
    pub average_rating: f64,
    pub review_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hotel {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Whether every requested amenity is offered
    pub fn has_amenities(&self, wanted: &[String]) -> bool {
        wanted.iter().all(|a| self.amenities.contains(a))
    }
}

/// Fields for a new hotel listing
#[derive(Debug, Clone, PartialEq)]
pub struct NewHotel {
    pub name: String,
    pub city: String,
    pub address: String,
    pub description: String,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
}

impl NewHotel {
    /// Check required fields and normalize the amenity set
    pub fn validated(mut self) -> DomainResult<Self> {
        require_text("Hotel name", &self.name)?;
        require_text("City", &self.city)?;
        require_text("Address", &self.address)?;
        self.amenities = normalize_amenities(&self.amenities);
        Ok(self)
    }
}

/// Partial hotel update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelUpdate {
    pub name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

impl HotelUpdate {
    pub fn validated(mut self) -> DomainResult<Self> {
        if let Some(name) = &self.name {
            require_text("Hotel name", name)?;
        }
        if let Some(city) = &self.city {
            require_text("City", city)?;
        }
        if let Some(address) = &self.address {
            require_text("Address", address)?;
        }
        self.amenities = self.amenities.map(|a| normalize_amenities(&a));
        Ok(self)
    }
}

/// Public hotel search filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelSearch {
    /// Case-insensitive substring of city or address
    pub location: Option<String>,
    /// Some room costs at least this much per night
    pub min_price: Option<f64>,
    /// Some room costs at most this much per night
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    /// Every listed amenity must be offered
    pub amenities: Vec<String>,
    /// Restrict to one status; `None` means any
    pub status: Option<HotelStatus>,
}

/// Room type offered by a hotel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Room {
    pub id: Uuid,
    pub hotel_id: Uuid,
    /// Room type, e.g. "Deluxe Double"
    pub name: String,
    pub description: String,
    pub price_per_night: f64,
    /// Maximum guests per booking
    pub capacity: i32,
    /// Inventory of this room type
    pub total_rooms: i32,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new room type
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoom {
    pub name: String,
    pub description: String,
    pub price_per_night: f64,
    pub capacity: i32,
    pub total_rooms: i32,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
}

impl NewRoom {
    pub fn validated(mut self) -> DomainResult<Self> {
        require_text("Room name", &self.name)?;
        check_room_numbers(
            Some(self.price_per_night),
            Some(self.capacity),
            Some(self.total_rooms),
        )?;
        self.amenities = normalize_amenities(&self.amenities);
        Ok(self)
    }
}

/// Partial room update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_per_night: Option<f64>,
    pub capacity: Option<i32>,
    pub total_rooms: Option<i32>,
    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

impl RoomUpdate {
    pub fn validated(mut self) -> DomainResult<Self> {
        if let Some(name) = &self.name {
            require_text("Room name", name)?;
        }
        check_room_numbers(self.price_per_night, self.capacity, self.total_rooms)?;
        self.amenities = self.amenities.map(|a| normalize_amenities(&a));
        Ok(self)
    }
}

fn check_room_numbers(
    price: Option<f64>,
    capacity: Option<i32>,
    total_rooms: Option<i32>,
) -> DomainResult<()> {
    if let Some(price) = price {
        if !price.is_finite() || price <= 0.0 {
            return Err(DomainError::validation("Price per night must be positive"));
        }
    }
    if capacity.is_some_and(|c| c <= 0) {
        return Err(DomainError::validation("Capacity must be positive"));
    }
    if total_rooms.is_some_and(|n| n <= 0) {
        return Err(DomainError::validation("Total rooms must be positive"));
    }
    Ok(())
}
