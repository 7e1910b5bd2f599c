//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::errors::AppError;
use domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::hotel::Entity")]
    Hotels,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::hotel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hotels.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(User {
            id: model.id,
            role: parse_column(&model.role, "users.role")?,
            status: parse_column(&model.status, "users.status")?,
            email: model.email,
            password_hash: model.password_hash,
            name: model.name,
            phone: model.phone,
            address: model.address,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
