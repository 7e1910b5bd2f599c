//! Analytics service - Dashboard figures for hoteliers and admins.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::infra::UnitOfWork;
use domain::{BookingSummary, Hotel, HotelStatus, Role};

/// Figures across a hotelier's own hotels
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HotelierStats {
    pub hotels: u64,
    pub rooms: u64,
    pub bookings: BookingSummary,
    /// Review-weighted mean over hotels that have reviews
    pub average_rating: f64,
    pub review_count: i64,
}

/// Account counts per role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UsersByRole {
    pub user: u64,
    pub hotelier: u64,
    pub admin: u64,
}

/// Hotel counts per moderation status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HotelsByStatus {
    pub pending: u64,
    pub active: u64,
    pub rejected: u64,
    pub suspended: u64,
}

/// Platform-wide figures for admins
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PlatformStats {
    pub users: UsersByRole,
    pub hotels: HotelsByStatus,
    pub bookings: BookingSummary,
}

/// Analytics service trait for dependency injection.
#[async_trait]
pub trait AnalyticsService: Send + Sync {
    async fn hotelier_stats(&self, owner_id: Uuid) -> AppResult<HotelierStats>;

    async fn platform_stats(&self) -> AppResult<PlatformStats>;
}

/// Concrete implementation of AnalyticsService using Unit of Work.
pub struct AnalyticsManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AnalyticsManager<U> {
    /// Create new analytics service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn weighted_rating(hotels: &[Hotel]) -> (f64, i64) {
    let (sum, count) = hotels
        .iter()
        .filter(|h| h.review_count > 0)
        .fold((0.0, 0i64), |(sum, count), h| {
            (
                sum + h.average_rating * h.review_count as f64,
                count + h.review_count as i64,
            )
        });

    if count == 0 {
        (0.0, 0)
    } else {
        (((sum / count as f64) * 10.0).round() / 10.0, count)
    }
}

#[async_trait]
impl<U: UnitOfWork> AnalyticsService for AnalyticsManager<U> {
    async fn hotelier_stats(&self, owner_id: Uuid) -> AppResult<HotelierStats> {
        let hotels = self.uow.hotels().list_by_owner(owner_id).await?;
        let hotel_ids: Vec<Uuid> = hotels.iter().map(|h| h.id).collect();

        let rooms = self.uow.rooms();
        let bookings = self.uow.bookings();
        let (room_count, summary) = tokio::try_join!(
            rooms.count_for_hotels(&hotel_ids),
            bookings.summary(Some(owner_id)),
        )?;

        let (average_rating, review_count) = weighted_rating(&hotels);
        Ok(HotelierStats {
            hotels: hotels.len() as u64,
            rooms: room_count,
            bookings: summary,
            average_rating,
            review_count,
        })
    }

    async fn platform_stats(&self) -> AppResult<PlatformStats> {
        let users = self.uow.users();
        let hotels = self.uow.hotels();
        let bookings = self.uow.bookings();

        let (user, hotelier, admin, pending, active, rejected, suspended, summary) = tokio::try_join!(
            users.count_by_role(Role::User),
            users.count_by_role(Role::Hotelier),
            users.count_by_role(Role::Admin),
            hotels.count_by_status(HotelStatus::Pending),
            hotels.count_by_status(HotelStatus::Active),
            hotels.count_by_status(HotelStatus::Rejected),
            hotels.count_by_status(HotelStatus::Suspended),
            bookings.summary(None),
        )?;

        Ok(PlatformStats {
            users: UsersByRole {
                user,
                hotelier,
                admin,
            },
            hotels: HotelsByStatus {
                pending,
                active,
                rejected,
                suspended,
            },
            bookings: summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        MockBookingRepository, MockHotelRepository, MockRoomRepository, MockUserRepository,
        StubPersistence,
    };
    use chrono::Utc;

    fn hotel(owner_id: Uuid, average_rating: f64, review_count: i32) -> Hotel {
        Hotel {
            id: Uuid::new_v4(),
            owner_id,
            name: "Hotel".to_string(),
            city: "Bhaktapur".to_string(),
            address: "Durbar Square".to_string(),
            description: String::new(),
            amenities: vec![],
            images: vec![],
            status: HotelStatus::Active,
            average_rating,
            review_count,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_weighted_rating_ignores_unreviewed_hotels() {
        let owner = Uuid::new_v4();
        let hotels = vec![hotel(owner, 5.0, 1), hotel(owner, 4.0, 3), hotel(owner, 0.0, 0)];
        assert_eq!(weighted_rating(&hotels), (4.3, 4));
        assert_eq!(weighted_rating(&[]), (0.0, 0));
    }

    #[tokio::test]
    async fn test_hotelier_stats() {
        let owner = Uuid::new_v4();
        let mut hotels = MockHotelRepository::new();
        hotels
            .expect_list_by_owner()
            .returning(move |o| Ok(vec![hotel(o, 4.0, 2), hotel(o, 0.0, 0)]));
        let mut rooms = MockRoomRepository::new();
        rooms
            .expect_count_for_hotels()
            .withf(|ids| ids.len() == 2)
            .returning(|_| Ok(5));
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_summary()
            .withf(move |o| *o == Some(owner))
            .returning(|_| {
                Ok(BookingSummary {
                    total: 3,
                    upcoming: 3,
                    ..Default::default()
                })
            });

        let service = AnalyticsManager::new(Arc::new(StubPersistence {
            hotels: Arc::new(hotels),
            rooms: Arc::new(rooms),
            bookings: Arc::new(bookings),
            ..Default::default()
        }));
        let stats = service.hotelier_stats(owner).await.unwrap();

        assert_eq!(stats.hotels, 2);
        assert_eq!(stats.rooms, 5);
        assert_eq!(stats.bookings.total, 3);
        assert_eq!(stats.average_rating, 4.0);
        assert_eq!(stats.review_count, 2);
    }

    #[tokio::test]
    async fn test_platform_stats() {
        let mut users = MockUserRepository::new();
        users.expect_count_by_role().returning(|role| {
            Ok(match role {
                Role::User => 10,
                Role::Hotelier => 3,
                Role::Admin => 1,
            })
        });
        let mut hotels = MockHotelRepository::new();
        hotels.expect_count_by_status().returning(|status| {
            Ok(if status == HotelStatus::Active { 2 } else { 1 })
        });
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_summary()
            .returning(|_| Ok(BookingSummary::default()));

        let service = AnalyticsManager::new(Arc::new(StubPersistence {
            users: Arc::new(users),
            hotels: Arc::new(hotels),
            bookings: Arc::new(bookings),
            ..Default::default()
        }));
        let stats = service.platform_stats().await.unwrap();

        assert_eq!(stats.users.user, 10);
        assert_eq!(stats.users.admin, 1);
        assert_eq!(stats.hotels.active, 2);
        assert_eq!(stats.hotels.pending, 1);
    }
}
