//! Player profiles, skill levels and availability preferences.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use std::str::FromStr;

use crate::{
    model::user::{PlayerDto, UpdatePlayerDto},
    server::{
        error::{internal::InternalError, AppError},
        model::user::User,
        util::{geo::Coordinates, parse::parse_optional_field},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Professional,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Professional => "professional",
        }
    }

    /// Numeric rank, 1 for beginner through 4 for professional.
    pub fn rank(&self) -> i32 {
        match self {
            SkillLevel::Beginner => 1,
            SkillLevel::Intermediate => 2,
            SkillLevel::Advanced => 3,
            SkillLevel::Professional => 4,
        }
    }

    /// Number of levels between two skill levels.
    pub fn difference(&self, other: &SkillLevel) -> i32 {
        (self.rank() - other.rank()).abs()
    }
}

impl FromStr for SkillLevel {
    type Err = InternalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            "professional" => Ok(SkillLevel::Professional),
            _ => Err(InternalError::UnknownVariant {
                kind: "skill level",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Weekdays,
    Weekends,
    Evenings,
    Flexible,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Weekdays => "weekdays",
            Availability::Weekends => "weekends",
            Availability::Evenings => "evenings",
            Availability::Flexible => "flexible",
        }
    }
}

impl FromStr for Availability {
    type Err = InternalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "weekdays" => Ok(Availability::Weekdays),
            "weekends" => Ok(Availability::Weekends),
            "evenings" => Ok(Availability::Evenings),
            "flexible" => Ok(Availability::Flexible),
            _ => Err(InternalError::UnknownVariant {
                kind: "availability",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: i32,
    pub user_id: i32,
    pub skill_level: SkillLevel,
    pub preferred_location: Option<String>,
    pub availability: Option<Availability>,
    pub bio: Option<String>,
    pub preferred_court_type: Option<String>,
    /// Kilometres
    pub max_travel_distance: i32,
    pub is_looking_for_partner: bool,
    pub coordinates: Option<Coordinates>,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(Player)` - Converted domain model
    /// - `Err(DbErr::Custom)` - Stored skill level or availability is unknown
    pub fn from_entity(entity: entity::player::Model) -> Result<Self, DbErr> {
        let skill_level = SkillLevel::from_str(&entity.skill_level)
            .map_err(|e| DbErr::Custom(e.to_string()))?;
        let availability = entity
            .availability
            .as_deref()
            .map(Availability::from_str)
            .transpose()
            .map_err(|e| DbErr::Custom(e.to_string()))?;

        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            skill_level,
            preferred_location: entity.preferred_location,
            availability,
            bio: entity.bio,
            preferred_court_type: entity.preferred_court_type,
            max_travel_distance: entity.max_travel_distance,
            is_looking_for_partner: entity.is_looking_for_partner,
            coordinates: Coordinates::from_parts(entity.latitude, entity.longitude),
            created_at: entity.created_at,
        })
    }

    pub fn into_dto(self) -> PlayerDto {
        PlayerDto {
            id: self.id,
            user_id: self.user_id,
            skill_level: self.skill_level.as_str().to_string(),
            preferred_location: self.preferred_location,
            availability: self.availability.map(|a| a.as_str().to_string()),
            bio: self.bio,
            preferred_court_type: self.preferred_court_type,
            max_travel_distance: self.max_travel_distance,
            is_looking_for_partner: self.is_looking_for_partner,
            latitude: self.coordinates.map(|c| c.latitude),
            longitude: self.coordinates.map(|c| c.longitude),
        }
    }
}

/// Player profile joined with its user account.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerWithUser {
    pub player: Player,
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct CreatePlayerParam {
    pub user_id: i32,
    pub skill_level: SkillLevel,
    pub preferred_location: Option<String>,
    pub availability: Option<Availability>,
    pub coordinates: Option<Coordinates>,
}

/// Profile edits. `None` leaves a field unchanged.
///
/// `coordinates` is `Some(None)` to clear stored coordinates after a location change
/// that could not be geocoded.
#[derive(Debug, Clone, Default)]
pub struct UpdatePlayerParam {
    pub skill_level: Option<SkillLevel>,
    pub preferred_location: Option<String>,
    pub availability: Option<Availability>,
    pub bio: Option<String>,
    pub preferred_court_type: Option<String>,
    pub max_travel_distance: Option<i32>,
    pub is_looking_for_partner: Option<bool>,
    pub coordinates: Option<Option<Coordinates>>,
}

impl TryFrom<UpdatePlayerDto> for UpdatePlayerParam {
    type Error = AppError;

    fn try_from(dto: UpdatePlayerDto) -> Result<Self, Self::Error> {
        if dto.max_travel_distance.is_some_and(|km| km <= 0) {
            return Err(AppError::BadRequest(
                "Max travel distance must be positive".to_string(),
            ));
        }

        Ok(Self {
            skill_level: parse_optional_field(dto.skill_level.as_deref())?,
            preferred_location: dto.preferred_location.map(|l| l.trim().to_string()),
            availability: parse_optional_field(dto.availability.as_deref())?,
            bio: dto.bio,
            preferred_court_type: dto.preferred_court_type.map(|t| t.trim().to_lowercase()),
            max_travel_distance: dto.max_travel_distance,
            is_looking_for_partner: dto.is_looking_for_partner,
            coordinates: None,
        })
    }
}
