//! Review database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Review;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub hotel_id: Uuid,
    #[sea_orm(unique)]
    pub booking_id: Option<Uuid>,
    pub rating: i32,
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub reply: Option<String>,
    pub replied_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
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
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::hotel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hotel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Review {
    fn from(model: Model) -> Self {
        Review {
            id: model.id,
            user_id: model.user_id,
            hotel_id: model.hotel_id,
            booking_id: model.booking_id,
            rating: model.rating,
            comment: model.comment,
            reply: model.reply,
            replied_at: model.replied_at,
            created_at: model.created_at,
        }
    }
}
