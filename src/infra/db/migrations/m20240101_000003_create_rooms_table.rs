//! Migration: Create rooms table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rooms::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Rooms::HotelId).uuid().not_null())
                    .col(ColumnDef::new(Rooms::Name).string().not_null())
                    .col(ColumnDef::new(Rooms::Description).text().not_null())
                    .col(ColumnDef::new(Rooms::PricePerNight).double().not_null())
                    .col(ColumnDef::new(Rooms::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(Rooms::TotalRooms)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Rooms::Amenities).json().not_null())
                    .col(ColumnDef::new(Rooms::Images).json().not_null())
                    .col(
                        ColumnDef::new(Rooms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Rooms::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rooms_hotel")
                            .from(Rooms::Table, Rooms::HotelId)
                            .to(Hotels::Table, Hotels::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rooms_hotel_id")
                    .table(Rooms::Table)
                    .col(Rooms::HotelId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Rooms {
    Table,
    Id,
    HotelId,
    Name,
    Description,
    PricePerNight,
    Capacity,
    TotalRooms,
    Amenities,
    Images,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Hotels {
    Table,
    Id,
}
