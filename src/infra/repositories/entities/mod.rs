//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Status and role columns hold the lowercase names of the domain enums;
//! amenity and image lists are JSON arrays of strings.

pub mod booking;
pub mod hotel;
pub mod notification;
pub mod review;
pub mod room;
pub mod user;

use sea_orm::prelude::Json;

use crate::errors::{AppError, AppResult};

/// Decode a JSON string array column
pub(crate) fn string_list(value: Json, column: &str) -> AppResult<Vec<String>> {
    serde_json::from_value(value)
        .map_err(|e| AppError::internal(format!("Invalid {} column: {}", column, e)))
}

/// Encode a string list for a JSON column
pub(crate) fn json_list(items: &[String]) -> Json {
    serde_json::Value::Array(items.iter().cloned().map(serde_json::Value::String).collect())
}

/// Parse a stored enum column, treating bad values as corrupt data
pub(crate) fn parse_column<T>(value: &str, column: &str) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| AppError::internal(format!("Invalid {} column: {}", column, e)))
}
