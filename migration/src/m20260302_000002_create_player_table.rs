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
                    .table(Player::Table)
                    .if_not_exists()
                    .col(pk_auto(Player::Id))
                    .col(integer_uniq(Player::UserId))
                    .col(string(Player::SkillLevel))
                    .col(string_null(Player::PreferredLocation))
                    .col(string_null(Player::Availability))
                    .col(text_null(Player::Bio))
                    .col(string_null(Player::PreferredCourtType))
                    .col(integer(Player::MaxTravelDistance).default(25))
                    .col(boolean(Player::IsLookingForPartner).default(true))
                    .col(double_null(Player::Latitude))
                    .col(double_null(Player::Longitude))
                    .col(
                        timestamp(Player::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_user_id")
                            .from(Player::Table, Player::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Player::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Player {
    Table,
    Id,
    UserId,
    SkillLevel,
    PreferredLocation,
    Availability,
    Bio,
    PreferredCourtType,
    MaxTravelDistance,
    IsLookingForPartner,
    Latitude,
    Longitude,
    CreatedAt,
}
