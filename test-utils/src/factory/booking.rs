//! Booking factory for creating test bookings.

use crate::factory::helpers::{days_from_today, hour};
use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test bookings with customizable fields.
///
/// Defaults to a pending 10:00-11:00 booking tomorrow costing 50.0.
pub struct BookingFactory<'a> {
    db: &'a DatabaseConnection,
    court_id: i32,
    player_id: i32,
    partner_player_id: Option<i32>,
    booking_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    status: String,
    total_cost: f64,
}

impl<'a> BookingFactory<'a> {
    /// Creates a new BookingFactory with default values.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `court_id` - ID of the booked court
    /// - `player_id` - Player profile ID of the booking player
    pub fn new(db: &'a DatabaseConnection, court_id: i32, player_id: i32) -> Self {
        Self {
            db,
            court_id,
            player_id,
            partner_player_id: None,
            booking_date: days_from_today(1),
            start_time: hour(10),
            end_time: hour(11),
            status: "pending".to_string(),
            total_cost: 50.0,
        }
    }

    /// Sets the second player of a shared booking.
    pub fn partner(mut self, partner_player_id: i32) -> Self {
        self.partner_player_id = Some(partner_player_id);
        self
    }

    /// Sets the booking date.
    pub fn date(mut self, booking_date: NaiveDate) -> Self {
        self.booking_date = booking_date;
        self
    }

    /// Sets the time window.
    pub fn window(mut self, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    /// Sets the status (`pending`, `confirmed`, `cancelled` or `rejected`).
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the total cost.
    pub fn total_cost(mut self, total_cost: f64) -> Self {
        self.total_cost = total_cost;
        self
    }

    /// Builds and inserts the booking entity into the database.
    pub async fn build(self) -> Result<entity::booking::Model, DbErr> {
        let now = Utc::now();
        let approved_at = if self.status == "confirmed" {
            Some(now)
        } else {
            None
        };

        entity::booking::ActiveModel {
            court_id: ActiveValue::Set(self.court_id),
            player_id: ActiveValue::Set(self.player_id),
            partner_player_id: ActiveValue::Set(self.partner_player_id),
            booking_date: ActiveValue::Set(self.booking_date),
            start_time: ActiveValue::Set(self.start_time),
            end_time: ActiveValue::Set(self.end_time),
            status: ActiveValue::Set(self.status),
            notes: ActiveValue::Set(None),
            total_cost: ActiveValue::Set(self.total_cost),
            cancellation_reason: ActiveValue::Set(None),
            rejection_reason: ActiveValue::Set(None),
            approved_at: ActiveValue::Set(approved_at),
            rejected_at: ActiveValue::Set(None),
            cancelled_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a default pending booking tomorrow 10:00-11:00.
pub async fn create_booking(
    db: &DatabaseConnection,
    court_id: i32,
    player_id: i32,
) -> Result<entity::booking::Model, DbErr> {
    BookingFactory::new(db, court_id, player_id).build().await
}
