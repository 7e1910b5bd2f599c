//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("{0}")]
    Validation(String),

    /// Password-related errors
    #[error("Password error: {0}")]
    Password(String),

    /// Stay dates are not a usable range
    #[error("{0}")]
    InvalidDateRange(String),

    /// Booking status change that the lifecycle does not allow
    #[error("Cannot change booking status from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Unknown value for a closed set (role, status, ...)
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create a password error
    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }

    /// Create a date range error
    pub fn date_range(msg: impl Into<String>) -> Self {
        DomainError::InvalidDateRange(msg.into())
    }

    /// Create an unknown-variant error
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        DomainError::UnknownVariant {
            kind,
            value: value.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
