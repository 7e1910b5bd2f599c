//! Review repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::review::{self, ActiveModel, Entity as ReviewEntity};
use crate::errors::{AppError, AppResult};
use domain::{NewReview, Review};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Review repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Find review by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>>;

    /// Review left for a booking, if any
    async fn find_by_booking(&self, booking_id: Uuid) -> AppResult<Option<Review>>;

    /// Reviews of a hotel, newest first
    async fn list_for_hotel(&self, hotel_id: Uuid) -> AppResult<Vec<Review>>;

    /// Store the hotelier reply unless one exists; `None` if already replied
    async fn set_reply(&self, id: Uuid, reply: String) -> AppResult<Option<Review>>;
}

/// Concrete implementation of ReviewRepository
pub struct ReviewStore {
    db: DatabaseConnection,
}

impl ReviewStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Review>> {
    Ok(ReviewEntity::find_by_id(id).one(db).await?.map(Review::from))
}

pub(crate) async fn create<C: ConnectionTrait>(db: &C, new_review: NewReview) -> AppResult<Review> {
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(new_review.user_id),
        hotel_id: Set(new_review.hotel_id),
        booking_id: Set(new_review.booking_id),
        rating: Set(new_review.rating.value()),
        comment: Set(new_review.comment),
        reply: Set(None),
        replied_at: Set(None),
        created_at: Set(Utc::now()),
    };

    let model = active_model.insert(db).await.map_err(|e| {
        if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            AppError::conflict("This booking has already been reviewed")
        } else {
            AppError::from(e)
        }
    })?;

    Ok(Review::from(model))
}

/// All ratings of a hotel, for recomputing its aggregate
pub(crate) async fn ratings_for_hotel<C: ConnectionTrait>(
    db: &C,
    hotel_id: Uuid,
) -> AppResult<Vec<i32>> {
    ReviewEntity::find()
        .select_only()
        .column(review::Column::Rating)
        .filter(review::Column::HotelId.eq(hotel_id))
        .into_tuple::<i32>()
        .all(db)
        .await
        .map_err(AppError::from)
}

pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<()> {
    let result = ReviewEntity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Review"));
    }
    Ok(())
}

#[async_trait]
impl ReviewRepository for ReviewStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_booking(&self, booking_id: Uuid) -> AppResult<Option<Review>> {
        Ok(ReviewEntity::find()
            .filter(review::Column::BookingId.eq(booking_id))
            .one(&self.db)
            .await?
            .map(Review::from))
    }

    async fn list_for_hotel(&self, hotel_id: Uuid) -> AppResult<Vec<Review>> {
        Ok(ReviewEntity::find()
            .filter(review::Column::HotelId.eq(hotel_id))
            .order_by_desc(review::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Review::from)
            .collect())
    }

    async fn set_reply(&self, id: Uuid, reply: String) -> AppResult<Option<Review>> {
        // Conditional on the reply still being empty so it is written once
        let result = ReviewEntity::update_many()
            .col_expr(review::Column::Reply, Expr::value(reply))
            .col_expr(review::Column::RepliedAt, Expr::value(Utc::now()))
            .filter(review::Column::Id.eq(id))
            .filter(review::Column::Reply.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        find_by_id(&self.db, id).await
    }
}
