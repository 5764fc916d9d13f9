use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateBookingDto {
    pub court_id: i32,
    /// `YYYY-MM-DD`
    pub booking_date: String,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct BookingDto {
    pub id: i32,
    pub court_id: i32,
    pub court_name: Option<String>,
    pub player_id: i32,
    pub partner_player_id: Option<i32>,
    pub booking_date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub notes: Option<String>,
    pub total_cost: f64,
    pub cancellation_reason: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Optional free-text reason for a rejection or cancellation.
#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct BookingReasonDto {
    pub reason: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct CalendarEventDto {
    pub id: i32,
    /// `booking` or `shared_booking`
    pub kind: String,
    pub title: String,
    /// `YYYY-MM-DDTHH:MM`
    pub start: String,
    pub end: String,
    pub status: String,
    pub color: String,
}
