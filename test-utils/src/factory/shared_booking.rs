//! Shared booking factory for creating two-player proposals.

use crate::factory::helpers::{days_from_today, hour};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating shared booking proposals.
///
/// Defaults to a `proposed` 10:00-11:00 slot two days from today costing 50.0,
/// split evenly, expiring 48 hours after creation.
pub struct SharedBookingFactory<'a> {
    db: &'a DatabaseConnection,
    player1_id: i32,
    player2_id: i32,
    court_id: i32,
    booking_date: NaiveDate,
    status: String,
    expires_at: DateTime<Utc>,
}

impl<'a> SharedBookingFactory<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        player1_id: i32,
        player2_id: i32,
        court_id: i32,
    ) -> Self {
        Self {
            db,
            player1_id,
            player2_id,
            court_id,
            booking_date: days_from_today(2),
            status: "proposed".to_string(),
            expires_at: Utc::now() + Duration::hours(48),
        }
    }

    /// Sets the proposal status.
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the booking date.
    pub fn date(mut self, booking_date: NaiveDate) -> Self {
        self.booking_date = booking_date;
        self
    }

    /// Sets the expiry timestamp.
    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Builds and inserts the proposal.
    pub async fn build(self) -> Result<entity::shared_booking::Model, DbErr> {
        entity::shared_booking::ActiveModel {
            player1_id: ActiveValue::Set(self.player1_id),
            player2_id: ActiveValue::Set(self.player2_id),
            court_id: ActiveValue::Set(self.court_id),
            booking_date: ActiveValue::Set(self.booking_date),
            start_time: ActiveValue::Set(hour(10)),
            end_time: ActiveValue::Set(hour(11)),
            status: ActiveValue::Set(self.status),
            total_cost: ActiveValue::Set(50.0),
            player1_share: ActiveValue::Set(25.0),
            player2_share: ActiveValue::Set(25.0),
            initiator_notes: ActiveValue::Set(None),
            partner_notes: ActiveValue::Set(None),
            alternative_court_id: ActiveValue::Set(None),
            alternative_date: ActiveValue::Set(None),
            alternative_start_time: ActiveValue::Set(None),
            alternative_end_time: ActiveValue::Set(None),
            alternative_notes: ActiveValue::Set(None),
            final_booking_id: ActiveValue::Set(None),
            proposed_at: ActiveValue::Set(Utc::now()),
            responded_at: ActiveValue::Set(None),
            confirmed_at: ActiveValue::Set(None),
            expires_at: ActiveValue::Set(self.expires_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a default proposal from `player1_id` to `player2_id`.
pub async fn create_shared_booking(
    db: &DatabaseConnection,
    player1_id: i32,
    player2_id: i32,
    court_id: i32,
) -> Result<entity::shared_booking::Model, DbErr> {
    SharedBookingFactory::new(db, player1_id, player2_id, court_id)
        .build()
        .await
}
