//! Hotel repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::hotel::{self, ActiveModel, Entity as HotelEntity};
use super::entities::{json_list, room};
use crate::errors::{AppError, AppResult, OptionExt};
use domain::{Hotel, HotelSearch, HotelStatus, HotelUpdate, NewHotel, RatingAggregate};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Hotel repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait HotelRepository: Send + Sync {
    /// Find hotel by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Hotel>>;

    /// Insert a pending listing
    async fn create(&self, owner_id: Uuid, hotel: NewHotel) -> AppResult<Hotel>;

    /// Apply listing changes
    async fn update(&self, id: Uuid, update: HotelUpdate) -> AppResult<Hotel>;

    /// Hotels matching every filter, newest first
    async fn search(&self, filter: &HotelSearch) -> AppResult<Vec<Hotel>>;

    /// Every hotel owned by a hotelier
    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Hotel>>;

    /// Count listings in a moderation state
    async fn count_by_status(&self, status: HotelStatus) -> AppResult<u64>;
}

/// Concrete implementation of HotelRepository
pub struct HotelStore {
    db: DatabaseConnection,
}

impl HotelStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Hotel>> {
    HotelEntity::find_by_id(id)
        .one(db)
        .await?
        .map(Hotel::try_from)
        .transpose()
}

async fn find_model<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<hotel::Model> {
    HotelEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_not_found("Hotel")
}

pub(crate) async fn set_status<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    status: HotelStatus,
) -> AppResult<Hotel> {
    let mut active: ActiveModel = find_model(db, id).await?.into();
    active.status = Set(status.as_str().to_string());
    active.updated_at = Set(Utc::now());

    Hotel::try_from(active.update(db).await?)
}

pub(crate) async fn set_rating<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    rating: RatingAggregate,
) -> AppResult<()> {
    let mut active: ActiveModel = find_model(db, id).await?.into();
    active.average_rating = Set(rating.average);
    active.review_count = Set(rating.count);
    active.updated_at = Set(Utc::now());
    active.update(db).await?;
    Ok(())
}

/// Delete a hotel; its rooms and reviews go with it
pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<()> {
    let result = HotelEntity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Hotel"));
    }
    Ok(())
}

const LIKE_ESCAPE: char = '\\';

/// `%term%` with the term's own LIKE wildcards matched literally
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn to_hotels(models: Vec<hotel::Model>) -> AppResult<Vec<Hotel>> {
    models.into_iter().map(Hotel::try_from).collect()
}

#[async_trait]
impl HotelRepository for HotelStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Hotel>> {
        find_by_id(&self.db, id).await
    }

    async fn create(&self, owner_id: Uuid, new_hotel: NewHotel) -> AppResult<Hotel> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            name: Set(new_hotel.name),
            city: Set(new_hotel.city),
            address: Set(new_hotel.address),
            description: Set(new_hotel.description),
            amenities: Set(json_list(&new_hotel.amenities)),
            images: Set(json_list(&new_hotel.images)),
            status: Set(HotelStatus::Pending.as_str().to_string()),
            average_rating: Set(0.0),
            review_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Hotel::try_from(active_model.insert(&self.db).await?)
    }

    async fn update(&self, id: Uuid, update: HotelUpdate) -> AppResult<Hotel> {
        let mut active: ActiveModel = find_model(&self.db, id).await?.into();

        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(city) = update.city {
            active.city = Set(city);
        }
        if let Some(address) = update.address {
            active.address = Set(address);
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(amenities) = update.amenities {
            active.amenities = Set(json_list(&amenities));
        }
        if let Some(images) = update.images {
            active.images = Set(json_list(&images));
        }
        active.updated_at = Set(Utc::now());

        Hotel::try_from(active.update(&self.db).await?)
    }

    async fn search(&self, filter: &HotelSearch) -> AppResult<Vec<Hotel>> {
        let mut query = HotelEntity::find().order_by_desc(hotel::Column::CreatedAt);

        if let Some(status) = filter.status {
            query = query.filter(hotel::Column::Status.eq(status.as_str()));
        }

        if let Some(location) = filter
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
        {
            let pattern = contains_pattern(&location.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(hotel::Column::City)))
                            .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(hotel::Column::Address)))
                            .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
                    ),
            );
        }

        if let Some(min_rating) = filter.min_rating {
            query = query.filter(hotel::Column::AverageRating.gte(min_rating));
        }

        // Some room must fall inside the price band
        if filter.min_price.is_some() || filter.max_price.is_some() {
            let mut rooms = Query::select();
            rooms.column(room::Column::HotelId).from(room::Entity);
            if let Some(min_price) = filter.min_price {
                rooms.and_where(room::Column::PricePerNight.gte(min_price));
            }
            if let Some(max_price) = filter.max_price {
                rooms.and_where(room::Column::PricePerNight.lte(max_price));
            }
            query = query.filter(hotel::Column::Id.in_subquery(rooms.to_owned()));
        }

        let hotels = to_hotels(query.all(&self.db).await?)?;

        Ok(hotels
            .into_iter()
            .filter(|h| h.has_amenities(&filter.amenities))
            .collect())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Hotel>> {
        let models = HotelEntity::find()
            .filter(hotel::Column::OwnerId.eq(owner_id))
            .order_by_desc(hotel::Column::CreatedAt)
            .all(&self.db)
            .await?;

        to_hotels(models)
    }

    async fn count_by_status(&self, status: HotelStatus) -> AppResult<u64> {
        HotelEntity::find()
            .filter(hotel::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
