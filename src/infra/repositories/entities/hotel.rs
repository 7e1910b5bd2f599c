//! Hotel database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::{parse_column, string_list};
use crate::errors::AppError;
use domain::Hotel;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hotels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub city: String,
    pub address: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub amenities: Json,
    pub images: Json,
    pub status: String,
    pub average_rating: f64,
    pub review_count: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::room::Entity")]
    Rooms,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rooms.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Hotel {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Hotel {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            city: model.city,
            address: model.address,
            description: model.description,
            amenities: string_list(model.amenities, "hotels.amenities")?,
            images: string_list(model.images, "hotels.images")?,
            status: parse_column(&model.status, "hotels.status")?,
            average_rating: model.average_rating,
            review_count: model.review_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
