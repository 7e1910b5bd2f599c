//! Booking database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::errors::AppError;
use domain::Booking;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub guest_id: Uuid,
    pub room_id: Uuid,
    pub hotel_id: Uuid,
    pub check_in: Date,
    pub check_out: Date,
    pub guests: i32,
    pub nights: i32,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    pub status: String,
    pub payment_method: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub special_requests: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::GuestId",
        to = "super::user::Column::Id"
    )]
    Guest,
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id"
    )]
    Room,
    #[sea_orm(
        belongs_to = "super::hotel::Entity",
        from = "Column::HotelId",
        to = "super::hotel::Column::Id"
    )]
    Hotel,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guest.def()
    }
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl Related<super::hotel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hotel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Booking {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: model.id,
            guest_id: model.guest_id,
            room_id: model.room_id,
            hotel_id: model.hotel_id,
            check_in: model.check_in,
            check_out: model.check_out,
            guests: model.guests,
            nights: model.nights,
            subtotal: model.subtotal,
            tax_amount: model.tax_amount,
            total_amount: model.total_amount,
            status: parse_column(&model.status, "bookings.status")?,
            payment_method: parse_column(&model.payment_method, "bookings.payment_method")?,
            special_requests: model.special_requests,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
