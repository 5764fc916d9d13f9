use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260302_000002_create_player_table::Player, m20260302_000004_create_court_table::Court,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(pk_auto(Booking::Id))
                    .col(integer(Booking::CourtId))
                    .col(integer(Booking::PlayerId))
                    .col(integer_null(Booking::PartnerPlayerId))
                    .col(date(Booking::BookingDate))
                    .col(time(Booking::StartTime))
                    .col(time(Booking::EndTime))
                    .col(string(Booking::Status).default("pending"))
                    .col(text_null(Booking::Notes))
                    .col(double(Booking::TotalCost))
                    .col(text_null(Booking::CancellationReason))
                    .col(text_null(Booking::RejectionReason))
                    .col(timestamp_null(Booking::ApprovedAt))
                    .col(timestamp_null(Booking::RejectedAt))
                    .col(timestamp_null(Booking::CancelledAt))
                    .col(
                        timestamp(Booking::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_court_id")
                            .from(Booking::Table, Booking::CourtId)
                            .to(Court::Table, Court::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_player_id")
                            .from(Booking::Table, Booking::PlayerId)
                            .to(Player::Table, Player::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_partner_player_id")
                            .from(Booking::Table, Booking::PartnerPlayerId)
                            .to(Player::Table, Player::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_court_date")
                    .table(Booking::Table)
                    .col(Booking::CourtId)
                    .col(Booking::BookingDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    Id,
    CourtId,
    PlayerId,
    PartnerPlayerId,
    BookingDate,
    StartTime,
    EndTime,
    Status,
    Notes,
    TotalCost,
    CancellationReason,
    RejectionReason,
    ApprovedAt,
    RejectedAt,
    CancelledAt,
    CreatedAt,
}
