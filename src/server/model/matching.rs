//! Player match and court recommendation results.

use chrono::NaiveDate;

use crate::{
    model::matching::{
        CourtRecommendationDto, CourtScoreBreakdownDto, MatchResultsDto, PlayerMatchDto,
    },
    server::model::{
        court::{Court, CourtType, Surface},
        player::{Availability, PlayerWithUser, SkillLevel},
    },
};

/// Optional narrowing of the candidate pool for player matching.
#[derive(Debug, Clone, Default)]
pub struct MatchFilters {
    pub skill_level: Option<SkillLevel>,
    pub availability: Option<Availability>,
    /// Kilometres; defaults to the player's max travel distance
    pub max_distance: Option<f64>,
    pub limit: usize,
}

/// Per-factor scores, each 0-100 before weighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    pub skill: f64,
    pub location: f64,
    pub availability: f64,
    pub activity: f64,
    /// Weighted total, 0-100, one decimal
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerMatch {
    pub candidate: PlayerWithUser,
    pub distance_km: Option<f64>,
    pub score: MatchScore,
    pub reason: Option<String>,
}

impl PlayerMatch {
    pub fn into_dto(self) -> PlayerMatchDto {
        let name = self.candidate.user.display_name();
        let player = self.candidate.player;

        PlayerMatchDto {
            player_id: player.id,
            user_id: player.user_id,
            name,
            skill_level: player.skill_level.as_str().to_string(),
            availability: player.availability.map(|a| a.as_str().to_string()),
            preferred_location: player.preferred_location,
            distance_km: self.distance_km,
            score: self.score.total,
            skill_score: self.score.skill,
            location_score: self.score.location,
            availability_score: self.score.availability,
            activity_score: self.score.activity,
            reason: self.reason,
        }
    }
}

/// Ranked matches plus the radius that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResults {
    pub matches: Vec<PlayerMatch>,
    /// `None` when the distance filter was dropped
    pub search_radius_km: Option<f64>,
    pub radius_expanded: bool,
}

impl MatchResults {
    pub fn into_dto(self) -> MatchResultsDto {
        MatchResultsDto {
            matches: self.matches.into_iter().map(PlayerMatch::into_dto).collect(),
            search_radius_km: self.search_radius_km,
            radius_expanded: self.radius_expanded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CourtSort {
    #[default]
    Recommended,
    PriceLow,
    PriceHigh,
    Distance,
}

impl CourtSort {
    /// Parses a sort key, falling back to `Recommended` for unknown values.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("price_low") => CourtSort::PriceLow,
            Some("price_high") => CourtSort::PriceHigh,
            Some("distance") => CourtSort::Distance,
            _ => CourtSort::Recommended,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CourtRecommendationFilters {
    pub location: Option<String>,
    pub max_price: Option<f64>,
    pub court_type: Option<CourtType>,
    pub surface: Option<Surface>,
    pub date: Option<NaiveDate>,
    pub max_distance: Option<f64>,
    pub sort: CourtSort,
    pub limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CourtScoreBreakdown {
    pub preference: f64,
    pub distance: f64,
    pub availability: f64,
    pub value: f64,
    pub amenities: f64,
}

impl CourtScoreBreakdown {
    /// Sum of all factors clamped to 0-100.
    pub fn total(&self) -> f64 {
        (self.preference + self.distance + self.availability + self.value + self.amenities)
            .clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourtRecommendation {
    pub court: Court,
    pub score: f64,
    pub distance_km: Option<f64>,
    pub breakdown: CourtScoreBreakdown,
    pub available_slots: Option<usize>,
}

impl CourtRecommendation {
    pub fn into_dto(self) -> CourtRecommendationDto {
        CourtRecommendationDto {
            court: self.court.into_dto(),
            score: self.score,
            distance_km: self.distance_km,
            breakdown: CourtScoreBreakdownDto {
                preference: self.breakdown.preference,
                distance: self.breakdown.distance,
                availability: self.breakdown.availability,
                value: self.breakdown.value,
                amenities: self.breakdown.amenities,
            },
            available_slots: self.available_slots,
        }
    }
}
