//! Guest reviews and hotelier replies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_RATING, MIN_RATING};
use crate::error::{DomainError, DomainResult};
use crate::validation::require_text;

/// Star rating bounded to 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(i32);

impl Rating {
    pub fn new(value: i32) -> DomainResult<Self> {
        if (MIN_RATING..=MAX_RATING).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::validation(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )))
        }
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

/// Review domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub hotel_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub rating: i32,
    pub comment: String,
    pub reply: Option<String>,
    pub replied_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn has_reply(&self) -> bool {
        self.reply.is_some()
    }
}

/// Validated review submission
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub user_id: Uuid,
    pub hotel_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub rating: Rating,
    pub comment: String,
}

impl NewReview {
    pub fn new(
        user_id: Uuid,
        hotel_id: Uuid,
        booking_id: Option<Uuid>,
        rating: i32,
        comment: String,
    ) -> DomainResult<Self> {
        let rating = Rating::new(rating)?;
        require_text("Comment", &comment)?;
        Ok(Self {
            user_id,
            hotel_id,
            booking_id,
            rating,
            comment: comment.trim().to_string(),
        })
    }
}

/// Running average kept on the hotel row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingAggregate {
    pub average: f64,
    pub count: i32,
}

impl RatingAggregate {
    pub fn from_ratings<I: IntoIterator<Item = i32>>(ratings: I) -> Self {
        let (sum, count) = ratings
            .into_iter()
            .fold((0i64, 0i32), |(sum, count), r| (sum + r as i64, count + 1));
        let average = if count == 0 {
            0.0
        } else {
            ((sum as f64 / count as f64) * 10.0).round() / 10.0
        };
        Self { average, count }
    }
}
