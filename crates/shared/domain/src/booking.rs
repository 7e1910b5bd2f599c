//! Booking lifecycle, stay periods and pricing.
//!
//! Status moves forward only: `upcoming -> checked_in -> completed`, with
//! `cancelled` reachable from `upcoming` through [`BookingStatus::cancel`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::constants::{MAX_STAY_NIGHTS, TAX_RATE};
use crate::error::{DomainError, DomainResult};

/// Lifecycle stage of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Upcoming,
    CheckedIn,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Upcoming => "upcoming",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn all() -> [BookingStatus; 4] {
        [
            BookingStatus::Upcoming,
            BookingStatus::CheckedIn,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ]
    }

    /// Next status along the stay, if any
    pub fn next(self) -> Option<BookingStatus> {
        match self {
            BookingStatus::Upcoming => Some(BookingStatus::CheckedIn),
            BookingStatus::CheckedIn => Some(BookingStatus::Completed),
            BookingStatus::Completed | BookingStatus::Cancelled => None,
        }
    }

    /// Validate a staff-driven status change (check-in, check-out).
    pub fn transition_to(self, target: BookingStatus) -> DomainResult<BookingStatus> {
        if self.next() == Some(target) {
            Ok(target)
        } else {
            Err(self.invalid(target))
        }
    }

    /// Validate a guest cancellation.
    pub fn cancel(self) -> DomainResult<BookingStatus> {
        match self {
            BookingStatus::Upcoming => Ok(BookingStatus::Cancelled),
            other => Err(other.invalid(BookingStatus::Cancelled)),
        }
    }

    /// Whether the booking still holds inventory
    pub fn occupies_room(self) -> bool {
        self != BookingStatus::Cancelled
    }

    fn invalid(self, target: BookingStatus) -> DomainError {
        DomainError::InvalidTransition {
            from: self.as_str().to_string(),
            to: target.as_str().to_string(),
        }
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(BookingStatus::Upcoming),
            "checked_in" | "checked-in" => Ok(BookingStatus::CheckedIn),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(DomainError::unknown("booking status", other)),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the guest intends to pay. Recorded only; no provider integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    PayAtHotel,
    Esewa,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::PayAtHotel => "pay_at_hotel",
            PaymentMethod::Esewa => "esewa",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pay_at_hotel" => Ok(PaymentMethod::PayAtHotel),
            "esewa" => Ok(PaymentMethod::Esewa),
            other => Err(DomainError::unknown("payment method", other)),
        }
    }
}

/// A validated check-in/check-out pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayPeriod {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayPeriod {
    /// Build a stay period.
    ///
    /// # Errors
    /// `InvalidDateRange` when check-out is not after check-in, check-in lies
    /// before `today`, or the stay is longer than the maximum.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate, today: NaiveDate) -> DomainResult<Self> {
        if check_out <= check_in {
            return Err(DomainError::date_range(
                "Check-out date must be after check-in date",
            ));
        }
        if check_in < today {
            return Err(DomainError::date_range("Check-in date cannot be in the past"));
        }
        let period = Self {
            check_in,
            check_out,
        };
        if period.nights() > MAX_STAY_NIGHTS {
            return Err(DomainError::date_range(format!(
                "A stay cannot exceed {} nights",
                MAX_STAY_NIGHTS
            )));
        }
        Ok(period)
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Calendar nights between check-in and check-out
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Half-open interval overlap: back-to-back stays do not collide.
    pub fn overlaps(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        self.check_in < check_out && self.check_out > check_in
    }
}

/// Price breakdown for a stay
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceQuote {
    pub nights: i64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
}

impl PriceQuote {
    /// Quote a stay: subtotal plus tax, rounded to cents.
    pub fn for_stay(price_per_night: f64, nights: i64) -> Self {
        let subtotal = round_currency(price_per_night * nights as f64);
        let tax_amount = round_currency(subtotal * TAX_RATE);
        Self {
            nights,
            subtotal,
            tax_amount,
            total_amount: round_currency(subtotal + tax_amount),
        }
    }
}

fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Booking domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Booking {
    pub id: Uuid,
    pub guest_id: Uuid,
    pub room_id: Uuid,
    pub hotel_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub nights: i32,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    pub status: BookingStatus,
    pub payment_method: PaymentMethod,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a booking after availability and pricing are settled
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub guest_id: Uuid,
    pub room_id: Uuid,
    pub hotel_id: Uuid,
    pub period: StayPeriod,
    pub guests: i32,
    pub quote: PriceQuote,
    pub payment_method: PaymentMethod,
    pub special_requests: Option<String>,
}

/// Booking counts and revenue over a set of bookings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingSummary {
    pub total: u64,
    pub upcoming: u64,
    pub checked_in: u64,
    pub completed: u64,
    pub cancelled: u64,
    /// Sum of totals over bookings that are not cancelled
    pub booked_revenue: f64,
    /// Sum of totals over completed stays
    pub realized_revenue: f64,
}

impl BookingSummary {
    pub fn from_bookings<'a, I>(bookings: I) -> Self
    where
        I: IntoIterator<Item = &'a Booking>,
    {
        let mut summary = BookingSummary::default();
        for booking in bookings {
            summary.total += 1;
            match booking.status {
                BookingStatus::Upcoming => summary.upcoming += 1,
                BookingStatus::CheckedIn => summary.checked_in += 1,
                BookingStatus::Completed => {
                    summary.completed += 1;
                    summary.realized_revenue += booking.total_amount;
                }
                BookingStatus::Cancelled => summary.cancelled += 1,
            }
            if booking.status.occupies_room() {
                summary.booked_revenue += booking.total_amount;
            }
        }
        summary.booked_revenue = round_currency(summary.booked_revenue);
        summary.realized_revenue = round_currency(summary.realized_revenue);
        summary
    }
}
