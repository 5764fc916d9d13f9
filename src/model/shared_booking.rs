use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::court::CourtDto;

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct ProposeSharedBookingDto {
    pub partner_player_id: i32,
    pub court_id: i32,
    pub booking_date: String,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct RespondSharedBookingDto {
    /// `accept`, `counter_propose` or `decline`
    pub action: String,
    pub notes: Option<String>,
    pub alternative_court_id: Option<i32>,
    pub alternative_date: Option<String>,
    pub alternative_start_time: Option<String>,
    pub alternative_end_time: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct SharedBookingDto {
    pub id: i32,
    pub player1_id: i32,
    pub player2_id: i32,
    pub court_id: i32,
    pub booking_date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub total_cost: f64,
    pub player1_share: f64,
    pub player2_share: f64,
    pub initiator_notes: Option<String>,
    pub partner_notes: Option<String>,
    pub alternative_court_id: Option<i32>,
    pub alternative_date: Option<String>,
    pub alternative_start_time: Option<String>,
    pub alternative_end_time: Option<String>,
    pub alternative_notes: Option<String>,
    pub final_booking_id: Option<i32>,
    pub proposed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// `initiator` or `partner`, relative to the requesting player
    pub user_role: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct CourtSuggestionDto {
    pub court: CourtDto,
    pub distance_to_player1_km: f64,
    pub distance_to_player2_km: f64,
    pub score: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct SharedBookingStatsDto {
    pub total_proposals: u64,
    pub confirmed_bookings: u64,
    pub pending_proposals: u64,
    /// Percentage of proposals that ended confirmed, one decimal
    pub success_rate: f64,
}
