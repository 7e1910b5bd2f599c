//! Migration: Create hotels table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Hotels::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Hotels::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Hotels::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Hotels::Name).string().not_null())
                    .col(ColumnDef::new(Hotels::City).string().not_null())
                    .col(ColumnDef::new(Hotels::Address).string().not_null())
                    .col(ColumnDef::new(Hotels::Description).text().not_null())
                    .col(ColumnDef::new(Hotels::Amenities).json().not_null())
                    .col(ColumnDef::new(Hotels::Images).json().not_null())
                    .col(
                        ColumnDef::new(Hotels::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Hotels::AverageRating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Hotels::ReviewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Hotels::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Hotels::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hotels_owner")
                            .from(Hotels::Table, Hotels::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hotels_owner_id")
                    .table(Hotels::Table)
                    .col(Hotels::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hotels_status")
                    .table(Hotels::Table)
                    .col(Hotels::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Hotels::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Hotels {
    Table,
    Id,
    OwnerId,
    Name,
    City,
    Address,
    Description,
    Amenities,
    Images,
    Status,
    AverageRating,
    ReviewCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
