use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::court::CourtDto;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct PlayerMatchDto {
    pub player_id: i32,
    pub user_id: i32,
    pub name: String,
    pub skill_level: String,
    pub availability: Option<String>,
    pub preferred_location: Option<String>,
    pub distance_km: Option<f64>,
    /// Compatibility score 0-100
    pub score: f64,
    pub skill_score: f64,
    pub location_score: f64,
    pub availability_score: f64,
    pub activity_score: f64,
    pub reason: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct MatchResultsDto {
    pub matches: Vec<PlayerMatchDto>,
    /// Radius that produced the result, `None` once the distance filter was dropped
    pub search_radius_km: Option<f64>,
    pub radius_expanded: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct CourtScoreBreakdownDto {
    pub preference: f64,
    pub distance: f64,
    pub availability: f64,
    pub value: f64,
    pub amenities: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct CourtRecommendationDto {
    pub court: CourtDto,
    pub score: f64,
    pub distance_km: Option<f64>,
    pub breakdown: CourtScoreBreakdownDto,
    /// Free hourly slots on the requested date
    pub available_slots: Option<usize>,
}
