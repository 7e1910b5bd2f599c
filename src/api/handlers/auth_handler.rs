//! Authentication and profile handlers.

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{rate_limit_auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::{AuthResponse, Registration};
use crate::types::{Created, MessageResponse};
use domain::{ProfileUpdate, Role, UserResponse};

/// Account registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "guest@example.com")]
    pub email: String,
    /// At least 8 characters with upper and lower case, a digit and a symbol
    #[schema(example = "Secure#Pass1", min_length = 8)]
    pub password: String,
    #[schema(example = "Sita Sharma")]
    pub name: String,
    #[schema(example = "9812345678")]
    pub phone: Option<String>,
    pub address: Option<String>,
    /// `user` (default) or `hotelier`
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::User
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "guest@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "Secure#Pass1")]
    pub password: String,
    /// Only accept an account holding this role
    pub role: Option<Role>,
}

/// Profile update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    #[validate(length(max = 255, message = "Address is too long"))]
    pub address: Option<String>,
}

/// Password change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    pub new_password: String,
}

/// Create authentication routes
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route_layer(middleware::from_fn_with_state(
            state,
            rate_limit_auth_middleware,
        ));

    Router::new()
        .route("/me", get(me).put(update_profile))
        .route("/password", put(change_password))
        .merge(public)
}

/// Register a guest or hotelier account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered"),
        (status = 429, description = "Too many attempts")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .auth_service
        .register(Registration {
            email: payload.email,
            password: payload.password,
            name: payload.name,
            phone: payload.phone,
            address: payload.address,
            role: payload.role,
        })
        .await?;

    Ok(Created(UserResponse::from(user)))
}

/// Log in and receive a JWT
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account suspended"),
        (status = 404, description = "No such account"),
        (status = 429, description = "Too many attempts")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let auth = state
        .auth_service
        .login(payload.email, payload.password, payload.role)
        .await?;

    Ok(Json(auth))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<UserResponse>> {
    let user = state.auth_service.me(current_user.id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update the current user's profile
#[utoipa::path(
    put,
    path = "/api/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .auth_service
        .update_profile(
            current_user.id,
            ProfileUpdate {
                name: payload.name,
                phone: payload.phone,
                address: payload.address,
            },
        )
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Change the current user's password
#[utoipa::path(
    put,
    path = "/api/auth/password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "New password too weak"),
        (status = 401, description = "Current password is wrong")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth_service
        .change_password(
            current_user.id,
            payload.current_password,
            payload.new_password,
        )
        .await?;

    Ok(Json(MessageResponse::new("Password changed")))
}
