//! Migration: Create bookings table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::GuestId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::RoomId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::HotelId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::CheckIn).date().not_null())
                    .col(ColumnDef::new(Bookings::CheckOut).date().not_null())
                    .col(ColumnDef::new(Bookings::Guests).integer().not_null())
                    .col(ColumnDef::new(Bookings::Nights).integer().not_null())
                    .col(ColumnDef::new(Bookings::Subtotal).double().not_null())
                    .col(ColumnDef::new(Bookings::TaxAmount).double().not_null())
                    .col(ColumnDef::new(Bookings::TotalAmount).double().not_null())
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string_len(20)
                            .not_null()
                            .default("upcoming"),
                    )
                    .col(
                        ColumnDef::new(Bookings::PaymentMethod)
                            .string_len(20)
                            .not_null()
                            .default("pay_at_hotel"),
                    )
                    .col(ColumnDef::new(Bookings::SpecialRequests).text().null())
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_guest")
                            .from(Bookings::Table, Bookings::GuestId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_room")
                            .from(Bookings::Table, Bookings::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_hotel")
                            .from(Bookings::Table, Bookings::HotelId)
                            .to(Hotels::Table, Hotels::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Availability check scans one room's bookings by date
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_room_dates")
                    .table(Bookings::Table)
                    .col(Bookings::RoomId)
                    .col(Bookings::CheckIn)
                    .col(Bookings::CheckOut)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_guest_id")
                    .table(Bookings::Table)
                    .col(Bookings::GuestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_hotel_id")
                    .table(Bookings::Table)
                    .col(Bookings::HotelId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
    GuestId,
    RoomId,
    HotelId,
    CheckIn,
    CheckOut,
    Guests,
    Nights,
    Subtotal,
    TaxAmount,
    TotalAmount,
    Status,
    PaymentMethod,
    SpecialRequests,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Rooms {
    Table,
    Id,
}

#[derive(Iden)]
enum Hotels {
    Table,
    Id,
}
