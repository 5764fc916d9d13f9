use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260302_000002_create_player_table::Player, m20260302_000004_create_court_table::Court,
    m20260302_000005_create_booking_table::Booking,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SharedBooking::Table)
                    .if_not_exists()
                    .col(pk_auto(SharedBooking::Id))
                    .col(integer(SharedBooking::Player1Id))
                    .col(integer(SharedBooking::Player2Id))
                    .col(integer(SharedBooking::CourtId))
                    .col(date(SharedBooking::BookingDate))
                    .col(time(SharedBooking::StartTime))
                    .col(time(SharedBooking::EndTime))
                    .col(string(SharedBooking::Status).default("proposed"))
                    .col(double(SharedBooking::TotalCost))
                    .col(double(SharedBooking::Player1Share))
                    .col(double(SharedBooking::Player2Share))
                    .col(text_null(SharedBooking::InitiatorNotes))
                    .col(text_null(SharedBooking::PartnerNotes))
                    .col(integer_null(SharedBooking::AlternativeCourtId))
                    .col(date_null(SharedBooking::AlternativeDate))
                    .col(time_null(SharedBooking::AlternativeStartTime))
                    .col(time_null(SharedBooking::AlternativeEndTime))
                    .col(text_null(SharedBooking::AlternativeNotes))
                    .col(integer_null(SharedBooking::FinalBookingId))
                    .col(
                        timestamp(SharedBooking::ProposedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(timestamp_null(SharedBooking::RespondedAt))
                    .col(timestamp_null(SharedBooking::ConfirmedAt))
                    .col(timestamp(SharedBooking::ExpiresAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shared_booking_player1_id")
                            .from(SharedBooking::Table, SharedBooking::Player1Id)
                            .to(Player::Table, Player::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shared_booking_player2_id")
                            .from(SharedBooking::Table, SharedBooking::Player2Id)
                            .to(Player::Table, Player::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shared_booking_court_id")
                            .from(SharedBooking::Table, SharedBooking::CourtId)
                            .to(Court::Table, Court::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shared_booking_final_booking_id")
                            .from(SharedBooking::Table, SharedBooking::FinalBookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SharedBooking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SharedBooking {
    Table,
    Id,
    Player1Id,
    Player2Id,
    CourtId,
    BookingDate,
    StartTime,
    EndTime,
    Status,
    TotalCost,
    Player1Share,
    Player2Share,
    InitiatorNotes,
    PartnerNotes,
    AlternativeCourtId,
    AlternativeDate,
    AlternativeStartTime,
    AlternativeEndTime,
    AlternativeNotes,
    FinalBookingId,
    ProposedAt,
    RespondedAt,
    ConfirmedAt,
    ExpiresAt,
}
