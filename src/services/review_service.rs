//! Review service - Guest reviews, hotelier replies and hotel ratings.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::Actor;
use crate::config::NOTIFY_TITLE_NEW_REVIEW;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use domain::validation::require_text;
use domain::{BookingStatus, NewReview, NotificationDraft, NotificationKind, Review};

/// A guest's review of a hotel
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub hotel_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub rating: i32,
    pub comment: String,
}

/// Review service trait for dependency injection.
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Review a hotel the guest has stayed at
    async fn create_review(&self, guest_id: Uuid, request: ReviewRequest) -> AppResult<Review>;

    /// Answer a review of an owned hotel, once
    async fn reply_to_review(&self, actor: Actor, id: Uuid, reply: String) -> AppResult<Review>;

    /// Reviews of a hotel, newest first
    async fn list_for_hotel(&self, hotel_id: Uuid) -> AppResult<Vec<Review>>;

    /// Remove a review and refresh the hotel rating
    async fn delete_review(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ReviewService using Unit of Work.
pub struct ReviewManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ReviewManager<U> {
    /// Create new review service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// A guest may review a completed stay of theirs, once per booking.
    /// Without a booking, any completed stay at the hotel qualifies.
    async fn check_eligibility(&self, review: &NewReview) -> AppResult<()> {
        let Some(booking_id) = review.booking_id else {
            let stayed = self
                .uow
                .bookings()
                .has_completed_stay(review.user_id, review.hotel_id)
                .await?;
            if !stayed {
                return Err(AppError::validation(
                    "You can only review hotels you have stayed at",
                ));
            }
            return Ok(());
        };

        let booking = self
            .uow
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_not_found("Booking")?;

        if booking.guest_id != review.user_id {
            return Err(AppError::NotOwner);
        }
        if booking.hotel_id != review.hotel_id {
            return Err(AppError::validation("Booking is not for this hotel"));
        }
        if booking.status != BookingStatus::Completed {
            return Err(AppError::validation("Only completed stays can be reviewed"));
        }
        if self
            .uow
            .reviews()
            .find_by_booking(booking_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("This booking has already been reviewed"));
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> ReviewService for ReviewManager<U> {
    async fn create_review(&self, guest_id: Uuid, request: ReviewRequest) -> AppResult<Review> {
        let new_review = NewReview::new(
            guest_id,
            request.hotel_id,
            request.booking_id,
            request.rating,
            request.comment,
        )?;

        let hotel = self
            .uow
            .hotels()
            .find_by_id(new_review.hotel_id)
            .await?
            .ok_or_not_found("Hotel")?;
        self.check_eligibility(&new_review).await?;

        let hotel_id = hotel.id;
        let owner_id = hotel.owner_id;
        let draft = NotificationDraft::new(
            NotificationKind::General,
            NOTIFY_TITLE_NEW_REVIEW,
            format!(
                "\"{}\" received a {}-star review",
                hotel.name,
                new_review.rating.value()
            ),
        );

        let review = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let review = ctx.reviews().create(new_review).await?;
                    let rating = ctx.reviews().aggregate_for_hotel(hotel_id).await?;
                    ctx.hotels().set_rating(hotel_id, rating).await?;
                    ctx.notifications().create(owner_id, &draft).await?;
                    Ok(review)
                })
            })
            .await?;

        tracing::info!(review_id = %review.id, hotel_id = %hotel_id, "Review posted");
        Ok(review)
    }

    async fn reply_to_review(&self, actor: Actor, id: Uuid, reply: String) -> AppResult<Review> {
        require_text("Reply", &reply)?;

        let review = self
            .uow
            .reviews()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Review")?;
        let hotel = self
            .uow
            .hotels()
            .find_by_id(review.hotel_id)
            .await?
            .ok_or_not_found("Hotel")?;

        if !hotel.is_owned_by(actor.id) {
            return Err(AppError::NotOwner);
        }
        if review.has_reply() {
            return Err(AppError::conflict("Review already has a reply"));
        }

        self.uow
            .reviews()
            .set_reply(id, reply.trim().to_string())
            .await?
            .ok_or_else(|| AppError::conflict("Review already has a reply"))
    }

    async fn list_for_hotel(&self, hotel_id: Uuid) -> AppResult<Vec<Review>> {
        self.uow
            .hotels()
            .find_by_id(hotel_id)
            .await?
            .ok_or_not_found("Hotel")?;
        self.uow.reviews().list_for_hotel(hotel_id).await
    }

    async fn delete_review(&self, id: Uuid) -> AppResult<()> {
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let review = ctx
                        .reviews()
                        .find_by_id(id)
                        .await?
                        .ok_or_not_found("Review")?;
                    ctx.reviews().delete(id).await?;

                    let rating = ctx.reviews().aggregate_for_hotel(review.hotel_id).await?;
                    ctx.hotels().set_rating(review.hotel_id, rating).await
                })
            })
            .await?;

        tracing::info!(review_id = %id, "Review deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        MockBookingRepository, MockHotelRepository, MockReviewRepository, StubPersistence,
    };
    use chrono::{Duration, Utc};
    use domain::{Booking, Hotel, HotelStatus, PaymentMethod, Role};

    fn hotel(owner_id: Uuid) -> Hotel {
        Hotel {
            id: Uuid::new_v4(),
            owner_id,
            name: "Hotel Annapurna".to_string(),
            city: "Kathmandu".to_string(),
            address: "Durbar Marg".to_string(),
            description: String::new(),
            amenities: vec![],
            images: vec![],
            status: HotelStatus::Active,
            average_rating: 4.0,
            review_count: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn booking(guest_id: Uuid, hotel_id: Uuid, status: BookingStatus) -> Booking {
        let today = Utc::now().date_naive();
        Booking {
            id: Uuid::new_v4(),
            guest_id,
            room_id: Uuid::new_v4(),
            hotel_id,
            check_in: today - Duration::days(3),
            check_out: today - Duration::days(1),
            guests: 1,
            nights: 2,
            subtotal: 100.0,
            tax_amount: 13.0,
            total_amount: 113.0,
            status,
            payment_method: PaymentMethod::Esewa,
            special_requests: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn review(hotel_id: Uuid, reply: Option<&str>) -> Review {
        Review {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            hotel_id,
            booking_id: None,
            rating: 4,
            comment: "Lovely view".to_string(),
            reply: reply.map(str::to_string),
            replied_at: None,
            created_at: Utc::now(),
        }
    }

    fn hotels_returning(h: Hotel) -> Arc<MockHotelRepository> {
        let mut hotels = MockHotelRepository::new();
        hotels
            .expect_find_by_id()
            .returning(move |_| Ok(Some(h.clone())));
        Arc::new(hotels)
    }

    fn service(uow: StubPersistence) -> ReviewManager<StubPersistence> {
        ReviewManager::new(Arc::new(uow))
    }

    fn request(hotel_id: Uuid, booking_id: Option<Uuid>, rating: i32) -> ReviewRequest {
        ReviewRequest {
            hotel_id,
            booking_id,
            rating,
            comment: "Great stay".to_string(),
        }
    }

    #[tokio::test]
    async fn test_rating_out_of_range() {
        let result = service(StubPersistence::default())
            .create_review(Uuid::new_v4(), request(Uuid::new_v4(), None, 6))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_blank_comment() {
        let mut req = request(Uuid::new_v4(), None, 4);
        req.comment = "   ".to_string();

        let result = service(StubPersistence::default())
            .create_review(Uuid::new_v4(), req)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_review_without_stay_is_refused() {
        let h = hotel(Uuid::new_v4());
        let hotel_id = h.id;
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_has_completed_stay()
            .returning(|_, _| Ok(false));

        let result = service(StubPersistence {
            hotels: hotels_returning(h),
            bookings: Arc::new(bookings),
            ..Default::default()
        })
        .create_review(Uuid::new_v4(), request(hotel_id, None, 5))
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_review_of_someone_elses_booking() {
        let h = hotel(Uuid::new_v4());
        let hotel_id = h.id;
        let b = booking(Uuid::new_v4(), hotel_id, BookingStatus::Completed);
        let booking_id = b.id;
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(b.clone())));

        let result = service(StubPersistence {
            hotels: hotels_returning(h),
            bookings: Arc::new(bookings),
            ..Default::default()
        })
        .create_review(Uuid::new_v4(), request(hotel_id, Some(booking_id), 5))
        .await;
        assert!(matches!(result, Err(AppError::NotOwner)));
    }

    #[tokio::test]
    async fn test_review_of_upcoming_booking() {
        let guest = Uuid::new_v4();
        let h = hotel(Uuid::new_v4());
        let hotel_id = h.id;
        let b = booking(guest, hotel_id, BookingStatus::Upcoming);
        let booking_id = b.id;
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(b.clone())));

        let result = service(StubPersistence {
            hotels: hotels_returning(h),
            bookings: Arc::new(bookings),
            ..Default::default()
        })
        .create_review(guest, request(hotel_id, Some(booking_id), 5))
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_second_review_of_booking_conflicts() {
        let guest = Uuid::new_v4();
        let h = hotel(Uuid::new_v4());
        let hotel_id = h.id;
        let b = booking(guest, hotel_id, BookingStatus::Completed);
        let booking_id = b.id;
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(b.clone())));
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_find_by_booking()
            .returning(move |_| Ok(Some(review(hotel_id, None))));

        let result = service(StubPersistence {
            hotels: hotels_returning(h),
            bookings: Arc::new(bookings),
            reviews: Arc::new(reviews),
            ..Default::default()
        })
        .create_review(guest, request(hotel_id, Some(booking_id), 5))
        .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_reply_by_non_owner() {
        let h = hotel(Uuid::new_v4());
        let r = review(h.id, None);
        let id = r.id;
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_find_by_id()
            .returning(move |_| Ok(Some(r.clone())));
        reviews.expect_set_reply().never();

        let result = service(StubPersistence {
            hotels: hotels_returning(h),
            reviews: Arc::new(reviews),
            ..Default::default()
        })
        .reply_to_review(
            Actor::new(Uuid::new_v4(), Role::Hotelier),
            id,
            "Thanks!".to_string(),
        )
        .await;
        assert!(matches!(result, Err(AppError::NotOwner)));
    }

    #[tokio::test]
    async fn test_reply_is_written_once() {
        let owner = Actor::new(Uuid::new_v4(), Role::Hotelier);
        let h = hotel(owner.id);
        let r = review(h.id, Some("Already answered"));
        let id = r.id;
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_find_by_id()
            .returning(move |_| Ok(Some(r.clone())));
        reviews.expect_set_reply().never();

        let result = service(StubPersistence {
            hotels: hotels_returning(h),
            reviews: Arc::new(reviews),
            ..Default::default()
        })
        .reply_to_review(owner, id, "Thanks again".to_string())
        .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_reply_race_lost_is_conflict() {
        let owner = Actor::new(Uuid::new_v4(), Role::Hotelier);
        let h = hotel(owner.id);
        let r = review(h.id, None);
        let id = r.id;
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_find_by_id()
            .returning(move |_| Ok(Some(r.clone())));
        reviews.expect_set_reply().returning(|_, _| Ok(None));

        let result = service(StubPersistence {
            hotels: hotels_returning(h),
            reviews: Arc::new(reviews),
            ..Default::default()
        })
        .reply_to_review(owner, id, "Thank you".to_string())
        .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
