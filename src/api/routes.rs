//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    admin_routes, analytics_routes, auth_routes, booking_routes, hotel_routes,
    notification_routes, review_routes, room_routes,
};
use super::middleware::auth_middleware;
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes(state.clone()))
        .nest("/hotels", hotel_routes())
        .nest("/rooms", room_routes())
        .nest("/bookings", booking_routes())
        .nest("/reviews", review_routes())
        .nest("/notifications", notification_routes())
        .nest("/analytics", analytics_routes())
        .nest("/admin", admin_routes())
        // Resolves the bearer token if present; handlers decide whether one is required
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        // Health check endpoints
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Hotel booking API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    redis: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    fn from_result<E: ToString>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => ServiceStatus {
                status: "healthy",
                error: None,
            },
            Err(e) => ServiceStatus {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        }
    }

    fn is_unhealthy(&self) -> bool {
        self.status == "unhealthy"
    }
}

/// Health check endpoint with database and Redis connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_status = ServiceStatus::from_result(state.database.ping().await);

    // Redis is optional; running without it only disables auth rate limiting
    let redis_status = match &state.cache {
        Some(cache) => ServiceStatus::from_result(cache.ping().await),
        None => ServiceStatus {
            status: "disabled",
            error: None,
        },
    };

    let all_healthy = !db_status.is_unhealthy() && !redis_status.is_unhealthy();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth {
            database: db_status,
            redis: redis_status,
        },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request},
    };
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use sea_orm::DatabaseConnection;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::config::Config;
    use crate::infra::{Database, StubPersistence};
    use crate::services::{
        AnalyticsManager, AnalyticsService, AuthService, Authenticator, BookingManager,
        BookingService, Claims, HotelManager, HotelService, MockServiceContainer,
        NotificationManager, NotificationService, ReviewManager, ReviewService, UserManager,
        UserService,
    };
    use domain::Role;

    const SECRET: &str = "router-test-secret-0123456789abcdefgh";

    fn router() -> Router {
        let uow = Arc::new(StubPersistence::default());
        let config = Config::new("sqlite::memory:", SECRET).unwrap();

        let auth: Arc<dyn AuthService> = Arc::new(Authenticator::new(uow.clone(), config));
        let users: Arc<dyn UserService> = Arc::new(UserManager::new(uow.clone()));
        let hotels: Arc<dyn HotelService> = Arc::new(HotelManager::new(uow.clone()));
        let bookings: Arc<dyn BookingService> = Arc::new(BookingManager::new(uow.clone()));
        let reviews: Arc<dyn ReviewService> = Arc::new(ReviewManager::new(uow.clone()));
        let notifications: Arc<dyn NotificationService> =
            Arc::new(NotificationManager::new(uow.clone()));
        let analytics: Arc<dyn AnalyticsService> = Arc::new(AnalyticsManager::new(uow));

        let mut container = MockServiceContainer::new();
        container.expect_auth().return_const(auth);
        container.expect_users().return_const(users);
        container.expect_hotels().return_const(hotels);
        container.expect_bookings().return_const(bookings);
        container.expect_reviews().return_const(reviews);
        container.expect_notifications().return_const(notifications);
        container.expect_analytics().return_const(analytics);

        let database = Arc::new(Database::from_connection(DatabaseConnection::Disconnected));
        create_router(AppState::from_container(&container, database, None))
    }

    fn token(role: Role) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            role,
            exp: now + 3600,
            iat: now,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    async fn status_of(uri: &str, authorization: Option<String>) -> StatusCode {
        let mut request = Request::builder().uri(uri);
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }
        router()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_guarded_route_needs_token() {
        assert_eq!(
            status_of("/api/hotels/mine", None).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_guarded_route_checks_capability() {
        let guest = format!("Bearer {}", token(Role::User));
        assert_eq!(
            status_of("/api/hotels/mine", Some(guest.clone())).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of("/api/admin/stats", Some(guest)).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_bad_token_rejected_even_on_public_route() {
        assert_eq!(
            status_of("/api/hotels", Some("Bearer garbage".to_string())).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of("/api/hotels", Some("Basic abc".to_string())).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_root_is_public() {
        assert_eq!(status_of("/", None).await, StatusCode::OK);
    }
}
