//! Password value object.
//!
//! Encapsulates Argon2 hashing and verification together with the
//! complexity rules a new password has to satisfy.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::error::{DomainError, DomainResult};

/// Password value object that handles hashing and verification.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// # Errors
    /// Returns a password error if the plain text fails the complexity rules.
    pub fn new(plain_text: &str) -> DomainResult<Self> {
        check_strength(plain_text)?;
        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn hash(plain_text: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> DomainResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| DomainError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

/// Check a plain text password against the complexity rules.
///
/// Requires at least one lowercase letter, one uppercase letter, one digit
/// and one symbol.
pub fn check_strength(plain_text: &str) -> DomainResult<()> {
    let len = plain_text.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(DomainError::password(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(DomainError::password(format!(
            "Password must be at most {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }

    let has_lower = plain_text.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = plain_text.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = plain_text.chars().any(|c| c.is_ascii_digit());
    let has_symbol = plain_text
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if !(has_lower && has_upper && has_digit && has_symbol) {
        return Err(DomainError::password(
            "Password must contain uppercase, lowercase, a digit and a symbol",
        ));
    }

    Ok(())
}
