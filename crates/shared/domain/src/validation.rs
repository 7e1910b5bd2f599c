//! Field-level validation rules shared by services.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::constants::{MAX_NAME_LENGTH, MIN_NAME_LENGTH};
use crate::error::{DomainError, DomainResult};

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}][\p{L} .'\-]*$").expect("name pattern is valid")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("phone pattern is valid"));

/// Validate a person's display name: letters, spaces, dots, apostrophes and hyphens.
pub fn validate_person_name(name: &str) -> DomainResult<()> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();

    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&len) {
        return Err(DomainError::validation(format!(
            "Name must be between {} and {} characters",
            MIN_NAME_LENGTH, MAX_NAME_LENGTH
        )));
    }
    if !NAME_RE.is_match(trimmed) {
        return Err(DomainError::validation(
            "Name may only contain letters, spaces, dots, apostrophes and hyphens",
        ));
    }
    Ok(())
}

/// Validate a phone number: optional leading `+`, then 7 to 15 digits.
pub fn validate_phone(phone: &str) -> DomainResult<()> {
    if PHONE_RE.is_match(phone.trim()) {
        Ok(())
    } else {
        Err(DomainError::validation("Phone number must be 7 to 15 digits"))
    }
}

/// Reject blank required text fields.
pub fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        Err(DomainError::validation(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

/// Normalize an amenity list into a set: trimmed, lowercase, deduplicated, sorted.
pub fn normalize_amenities<I, S>(amenities: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    amenities
        .into_iter()
        .map(|a| a.as_ref().trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_names() {
        assert!(validate_person_name("Ram Bahadur").is_ok());
        assert!(validate_person_name("Anne-Marie O'Neil").is_ok());
        assert!(validate_person_name("J").is_err());
        assert!(validate_person_name("R2D2").is_err());
        assert!(validate_person_name("   ").is_err());
    }

    #[test]
    fn test_phone_numbers() {
        assert!(validate_phone("9812345678").is_ok());
        assert!(validate_phone("+9779812345678").is_ok());
        assert!(validate_phone("98-123").is_err());
        assert!(validate_phone("12345").is_err());
    }

    #[test]
    fn test_amenities_become_a_sorted_set() {
        let amenities = normalize_amenities(["WiFi", " pool ", "wifi", "", "Parking"]);
        assert_eq!(amenities, vec!["parking", "pool", "wifi"]);
    }
}
