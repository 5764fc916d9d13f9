use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateCourtDto {
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub address: Option<String>,
    /// `indoor` or `outdoor`
    pub court_type: String,
    /// `clay`, `hard`, `grass` or `artificial`
    pub surface: String,
    pub hourly_rate: f64,
    /// `HH:MM`, defaults to 06:00
    pub opening_time: Option<String>,
    /// `HH:MM`, defaults to 22:00
    pub closing_time: Option<String>,
    #[serde(default)]
    pub has_lighting: bool,
    #[serde(default)]
    pub has_parking: bool,
    #[serde(default)]
    pub has_equipment_rental: bool,
    #[serde(default)]
    pub has_changing_rooms: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdateCourtDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub court_type: Option<String>,
    pub surface: Option<String>,
    pub hourly_rate: Option<f64>,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub has_lighting: Option<bool>,
    pub has_parking: Option<bool>,
    pub has_equipment_rental: Option<bool>,
    pub has_changing_rooms: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct CourtDto {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub court_type: String,
    pub surface: String,
    pub hourly_rate: f64,
    pub opening_time: String,
    pub closing_time: String,
    pub has_lighting: bool,
    pub has_parking: bool,
    pub has_equipment_rental: bool,
    pub has_changing_rooms: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct TimeSlotDto {
    pub start_time: String,
    pub end_time: String,
    /// Hourly rate after weekend and peak-hour adjustments
    pub hourly_rate: f64,
    pub total_cost: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct SlotAlternativeDto {
    pub start_time: String,
    pub end_time: String,
    pub hours_from_requested: u32,
    /// Starts between 18:00 and 21:00
    pub is_peak_hour: bool,
    pub hourly_rate: f64,
    pub total_cost: f64,
}

/// Up to three free slots of the requested length near the requested start.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct CourtAlternativesDto {
    pub court_id: i32,
    pub date: String,
    pub alternatives: Vec<SlotAlternativeDto>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct CourtAvailabilityDto {
    pub court_id: i32,
    pub date: String,
    pub duration_hours: u32,
    pub slots: Vec<TimeSlotDto>,
}
