//! Room database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::string_list;
use crate::errors::AppError;
use domain::Room;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price_per_night: f64,
    pub capacity: i32,
    pub total_rooms: i32,
    pub amenities: Json,
    pub images: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::hotel::Entity",
        from = "Column::HotelId",
        to = "super::hotel::Column::Id",
        on_delete = "Cascade"
    )]
    Hotel,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::hotel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hotel.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Room {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Room {
            id: model.id,
            hotel_id: model.hotel_id,
            name: model.name,
            description: model.description,
            price_per_night: model.price_per_night,
            capacity: model.capacity,
            total_rooms: model.total_rooms,
            amenities: string_list(model.amenities, "rooms.amenities")?,
            images: string_list(model.images, "rooms.images")?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
