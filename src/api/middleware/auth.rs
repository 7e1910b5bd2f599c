//! JWT authentication and capability middleware.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;
use crate::services::{Actor, Claims};
use domain::{Capability, Role};

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Handlers taking `CurrentUser` reject anonymous requests with 401;
/// `Option<CurrentUser>` accepts them.
#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// JWT authentication middleware.
///
/// A request without an Authorization header passes through anonymously.
/// A header that is malformed, badly signed or expired is rejected with 401.
/// Otherwise the `CurrentUser` is injected into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(header) = request.headers().get(AUTHORIZATION) {
        let token = header
            .to_str()
            .ok()
            .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
            .ok_or(AppError::Unauthorized)?;

        let claims = state.auth_service.verify_token(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Unauthorized
        })?;

        request.extensions_mut().insert(CurrentUser::from(claims));
    }

    Ok(next.run(request).await)
}

/// Capability guard; runs after `auth_middleware`.
pub async fn require_capability(
    capability: Capability,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;

    if !user.role.can(capability) {
        tracing::warn!(user_id = %user.id, role = %user.role, ?capability, "Capability denied");
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}
