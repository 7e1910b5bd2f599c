//! Authentication service - Registration, login and account self-service.
//!
//! Passwords are hashed and verified through the domain `Password` value
//! object; tokens are HS256 JWTs carrying the user id, email and role.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use domain::validation::{validate_person_name, validate_phone};
use domain::{NewUser, Password, ProfileUpdate, Role, User, UserResponse};

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

/// Token issued after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Login result: the token together with the profile it was issued for
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: TokenResponse,
    pub user: UserResponse,
}

/// Fields of a new account
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Role,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a guest or hotelier account
    async fn register(&self, registration: Registration) -> AppResult<User>;

    /// Check credentials and issue a token.
    ///
    /// With `expected_role`, an account holding another role is treated as
    /// unknown.
    async fn login(
        &self,
        email: String,
        password: String,
        expected_role: Option<Role>,
    ) -> AppResult<AuthResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Current profile of a user
    async fn me(&self, user_id: Uuid) -> AppResult<User>;

    /// Update name, phone or address
    async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> AppResult<User>;

    /// Replace the password after checking the current one
    async fn change_password(
        &self,
        user_id: Uuid,
        current_password: String,
        new_password: String,
    ) -> AppResult<()>;

    /// Create an administrator account (not reachable over HTTP)
    async fn create_admin(&self, email: String, name: String, password: String)
        -> AppResult<User>;
}

/// Generate JWT token for a user
fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Verify JWT token and extract claims
pub fn decode_token(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_profile(name: Option<&str>, phone: Option<&str>) -> AppResult<()> {
    if let Some(name) = name {
        validate_person_name(name)?;
    }
    if let Some(phone) = phone.filter(|p| !p.trim().is_empty()) {
        validate_phone(phone)?;
    }
    Ok(())
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    async fn create_account(&self, registration: Registration) -> AppResult<User> {
        let email = normalize_email(&registration.email);
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("Invalid email format"));
        }
        validate_profile(Some(&registration.name), registration.phone.as_deref())?;

        if self.uow.users().find_by_email(&email).await?.is_some() {
            tracing::warn!(email = %email, "Registration with an existing email");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = Password::new(&registration.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                email,
                password_hash,
                name: registration.name.trim().to_string(),
                phone: registration.phone.map(|p| p.trim().to_string()),
                address: registration.address,
                role: registration.role,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "Account created");
        Ok(user)
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<User> {
        if !registration.role.is_self_registrable() {
            return Err(AppError::validation(
                "Role must be either user or hotelier",
            ));
        }
        self.create_account(registration).await
    }

    async fn login(
        &self,
        email: String,
        password: String,
        expected_role: Option<Role>,
    ) -> AppResult<AuthResponse> {
        let email = normalize_email(&email);
        let user = self
            .uow
            .users()
            .find_by_email(&email)
            .await?
            .filter(|u| expected_role.map_or(true, |role| u.role == role))
            .ok_or_not_found("User")?;

        let stored_password = Password::from_hash(user.password_hash.clone());
        if !stored_password.verify(&password) {
            tracing::warn!(user_id = %user.id, "Login with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active() {
            tracing::warn!(user_id = %user.id, "Login to a suspended account");
            return Err(AppError::AccountSuspended);
        }

        let token = generate_token(&user, &self.config)?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        decode_token(token, &self.config)
    }

    async fn me(&self, user_id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("User")
    }

    async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> AppResult<User> {
        validate_profile(update.name.as_deref(), update.phone.as_deref())?;

        let update = ProfileUpdate {
            name: update.name.map(|n| n.trim().to_string()),
            phone: update.phone.map(|p| p.trim().to_string()),
            address: update.address.map(|a| a.trim().to_string()),
        };
        self.uow.users().update_profile(user_id, update).await
    }

    async fn change_password(
        &self,
        user_id: Uuid,
        current_password: String,
        new_password: String,
    ) -> AppResult<()> {
        let user = self.me(user_id).await?;
        if !Password::from_hash(user.password_hash).verify(&current_password) {
            return Err(AppError::InvalidCredentials);
        }

        let password_hash = Password::new(&new_password)?.into_string();
        self.uow
            .users()
            .update_password(user_id, password_hash)
            .await?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    async fn create_admin(
        &self,
        email: String,
        name: String,
        password: String,
    ) -> AppResult<User> {
        self.create_account(Registration {
            email,
            password,
            name,
            phone: None,
            address: None,
            role: Role::Admin,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockUserRepository, StubPersistence};
    use domain::UserStatus;

    const PASSWORD: &str = "Secret#123";

    fn config() -> Config {
        Config::new("sqlite::memory:", "a-test-secret-that-is-long-enough-123").unwrap()
    }

    fn stored_user(role: Role, status: UserStatus) -> User {
        User {
            id: Uuid::new_v4(),
            email: "guest@example.com".to_string(),
            password_hash: Password::new(PASSWORD).unwrap().into_string(),
            name: "Guest User".to_string(),
            phone: None,
            address: None,
            role,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(users: MockUserRepository) -> Authenticator<StubPersistence> {
        let uow = StubPersistence {
            users: Arc::new(users),
            ..Default::default()
        };
        Authenticator::new(Arc::new(uow), config())
    }

    fn registration(role: Role) -> Registration {
        Registration {
            email: "New.Guest@Example.com".to_string(),
            password: PASSWORD.to_string(),
            name: "New Guest".to_string(),
            phone: Some("9812345678".to_string()),
            address: None,
            role,
        }
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email_without_insert() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .withf(|email| email == "new.guest@example.com")
            .returning(|_| Ok(Some(stored_user(Role::User, UserStatus::Active))));
        users.expect_create().never();

        let result = service(users).register(registration(Role::User)).await;
        assert!(matches!(result, Err(AppError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_normalizes_email() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|u| {
                u.email == "new.guest@example.com"
                    && u.role == Role::Hotelier
                    && u.password_hash != PASSWORD
            })
            .returning(|u| {
                let mut user = stored_user(u.role, UserStatus::Active);
                user.email = u.email;
                Ok(user)
            });

        let user = service(users)
            .register(registration(Role::Hotelier))
            .await
            .unwrap();
        assert_eq!(user.role, Role::Hotelier);
    }

    #[tokio::test]
    async fn test_register_refuses_admin_role() {
        let result = service(MockUserRepository::new())
            .register(registration(Role::Admin))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_phone() {
        let mut reg = registration(Role::User);
        reg.phone = Some("call me".to_string());

        let result = service(MockUserRepository::new()).register(reg).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_wrong_password_issues_no_token() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_user(Role::User, UserStatus::Active))));

        let result = service(users)
            .login("guest@example.com".into(), "Wrong#123".into(), None)
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let result = service(users)
            .login("nobody@example.com".into(), PASSWORD.into(), None)
            .await;
        assert!(matches!(result, Err(AppError::NotFound("User"))));
    }

    #[tokio::test]
    async fn test_login_with_other_role_is_not_found() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_user(Role::User, UserStatus::Active))));

        let result = service(users)
            .login("guest@example.com".into(), PASSWORD.into(), Some(Role::Hotelier))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_login_suspended_account() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_user(Role::User, UserStatus::Suspended))));

        let result = service(users)
            .login("guest@example.com".into(), PASSWORD.into(), None)
            .await;
        assert!(matches!(result, Err(AppError::AccountSuspended)));
    }

    #[tokio::test]
    async fn test_login_token_carries_identity() {
        let user = stored_user(Role::Hotelier, UserStatus::Active);
        let expected_id = user.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(users);
        let auth = service
            .login("GUEST@example.com ".into(), PASSWORD.into(), Some(Role::Hotelier))
            .await
            .unwrap();

        assert_eq!(auth.token.token_type, "Bearer");
        let claims = service.verify_token(&auth.token.access_token).unwrap();
        assert_eq!(claims.sub, expected_id);
        assert_eq!(claims.role, Role::Hotelier);
        assert_eq!(auth.user.id, expected_id);
    }

    #[test]
    fn test_verify_token_rejects_garbage() {
        assert!(matches!(
            decode_token("not-a-token", &config()),
            Err(AppError::Jwt(_))
        ));
    }

    #[tokio::test]
    async fn test_change_password_checks_current() {
        let user = stored_user(Role::User, UserStatus::Active);
        let id = user.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        users.expect_update_password().never();

        let result = service(users)
            .change_password(id, "Wrong#123".into(), "Another#456".into())
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }
}
