//! Service Container - Centralized service access.
//!
//! Every service shares one `Persistence` unit of work, so they all see the
//! same connection pool.

use std::sync::Arc;

use super::{
    AnalyticsManager, AnalyticsService, AuthService, Authenticator, BookingManager,
    BookingService, HotelManager, HotelService, NotificationManager, NotificationService,
    ReviewManager, ReviewService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn hotels(&self) -> Arc<dyn HotelService>;

    fn bookings(&self) -> Arc<dyn BookingService>;

    fn reviews(&self) -> Arc<dyn ReviewService>;

    fn notifications(&self) -> Arc<dyn NotificationService>;

    fn analytics(&self) -> Arc<dyn AnalyticsService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    hotel_service: Arc<dyn HotelService>,
    booking_service: Arc<dyn BookingService>,
    review_service: Arc<dyn ReviewService>,
    notification_service: Arc<dyn NotificationService>,
    analytics_service: Arc<dyn AnalyticsService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            hotel_service: Arc::new(HotelManager::new(uow.clone())),
            booking_service: Arc::new(BookingManager::new(uow.clone())),
            review_service: Arc::new(ReviewManager::new(uow.clone())),
            notification_service: Arc::new(NotificationManager::new(uow.clone())),
            analytics_service: Arc::new(AnalyticsManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn hotels(&self) -> Arc<dyn HotelService> {
        self.hotel_service.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingService> {
        self.booking_service.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewService> {
        self.review_service.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationService> {
        self.notification_service.clone()
    }

    fn analytics(&self) -> Arc<dyn AnalyticsService> {
        self.analytics_service.clone()
    }
}
