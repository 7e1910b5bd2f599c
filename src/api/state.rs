//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database};
use crate::services::{
    AnalyticsService, AuthService, BookingService, HotelService, NotificationService,
    ReviewService, ServiceContainer, Services, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub hotel_service: Arc<dyn HotelService>,
    pub booking_service: Arc<dyn BookingService>,
    pub review_service: Arc<dyn ReviewService>,
    pub notification_service: Arc<dyn NotificationService>,
    pub analytics_service: Arc<dyn AnalyticsService>,
    /// Redis cache; auth rate limiting is off without it
    pub cache: Option<Arc<Cache>>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, cache: Option<Arc<Cache>>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_container(&container, database, cache)
    }

    /// Create application state from any service container.
    pub fn from_container(
        container: &dyn ServiceContainer,
        database: Arc<Database>,
        cache: Option<Arc<Cache>>,
    ) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            hotel_service: container.hotels(),
            booking_service: container.bookings(),
            review_service: container.reviews(),
            notification_service: container.notifications(),
            analytics_service: container.analytics(),
            cache,
            database,
        }
    }
}
