use sea_orm_migration::{prelude::*, schema::*};

use super::m20260302_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Court::Table)
                    .if_not_exists()
                    .col(pk_auto(Court::Id))
                    .col(integer(Court::OwnerId))
                    .col(string(Court::Name))
                    .col(text_null(Court::Description))
                    .col(string(Court::Location))
                    .col(string_null(Court::Address))
                    .col(double_null(Court::Latitude))
                    .col(double_null(Court::Longitude))
                    .col(string(Court::CourtType))
                    .col(string(Court::Surface))
                    .col(double(Court::HourlyRate))
                    .col(time(Court::OpeningTime))
                    .col(time(Court::ClosingTime))
                    .col(boolean(Court::HasLighting).default(false))
                    .col(boolean(Court::HasParking).default(false))
                    .col(boolean(Court::HasEquipmentRental).default(false))
                    .col(boolean(Court::HasChangingRooms).default(false))
                    .col(boolean(Court::IsActive).default(true))
                    .col(
                        timestamp(Court::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp(Court::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_court_owner_id")
                            .from(Court::Table, Court::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_court_owner_name")
                    .table(Court::Table)
                    .col(Court::OwnerId)
                    .col(Court::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Court::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Court {
    Table,
    Id,
    OwnerId,
    Name,
    Description,
    Location,
    Address,
    Latitude,
    Longitude,
    CourtType,
    Surface,
    HourlyRate,
    OpeningTime,
    ClosingTime,
    HasLighting,
    HasParking,
    HasEquipmentRental,
    HasChangingRooms,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
