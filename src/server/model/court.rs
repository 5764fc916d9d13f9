//! Courts, their surfaces and operating hours.

use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::DbErr;
use std::str::FromStr;

use crate::{
    model::court::{CourtDto, CreateCourtDto, UpdateCourtDto},
    server::{
        error::{internal::InternalError, AppError},
        service::rule::{default_closing_time, default_opening_time},
        util::{
            geo::Coordinates,
            parse::{format_time, parse_field, parse_optional_field, parse_optional_time},
        },
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourtType {
    Indoor,
    Outdoor,
}

impl CourtType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourtType::Indoor => "indoor",
            CourtType::Outdoor => "outdoor",
        }
    }
}

impl FromStr for CourtType {
    type Err = InternalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "indoor" => Ok(CourtType::Indoor),
            "outdoor" => Ok(CourtType::Outdoor),
            _ => Err(InternalError::UnknownVariant {
                kind: "court type",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Clay,
    Hard,
    Grass,
    Artificial,
}

impl Surface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Clay => "clay",
            Surface::Hard => "hard",
            Surface::Grass => "grass",
            Surface::Artificial => "artificial",
        }
    }
}

impl FromStr for Surface {
    type Err = InternalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "clay" => Ok(Surface::Clay),
            "hard" => Ok(Surface::Hard),
            "grass" => Ok(Surface::Grass),
            "artificial" => Ok(Surface::Artificial),
            _ => Err(InternalError::UnknownVariant {
                kind: "surface",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Court {
    pub id: i32,
    /// User ID of the owning court owner
    pub owner_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub address: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub court_type: CourtType,
    pub surface: Surface,
    pub hourly_rate: f64,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub has_lighting: bool,
    pub has_parking: bool,
    pub has_equipment_rental: bool,
    pub has_changing_rooms: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Court {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(Court)` - Converted domain model
    /// - `Err(DbErr::Custom)` - Stored court type or surface is unknown
    pub fn from_entity(entity: entity::court::Model) -> Result<Self, DbErr> {
        let court_type =
            CourtType::from_str(&entity.court_type).map_err(|e| DbErr::Custom(e.to_string()))?;
        let surface =
            Surface::from_str(&entity.surface).map_err(|e| DbErr::Custom(e.to_string()))?;

        Ok(Self {
            id: entity.id,
            owner_id: entity.owner_id,
            name: entity.name,
            description: entity.description,
            location: entity.location,
            address: entity.address,
            coordinates: Coordinates::from_parts(entity.latitude, entity.longitude),
            court_type,
            surface,
            hourly_rate: entity.hourly_rate,
            opening_time: entity.opening_time,
            closing_time: entity.closing_time,
            has_lighting: entity.has_lighting,
            has_parking: entity.has_parking,
            has_equipment_rental: entity.has_equipment_rental,
            has_changing_rooms: entity.has_changing_rooms,
            is_active: entity.is_active,
            created_at: entity.created_at,
        })
    }

    /// Number of amenities offered, 0 through 4.
    pub fn amenity_count(&self) -> u32 {
        [
            self.has_lighting,
            self.has_parking,
            self.has_equipment_rental,
            self.has_changing_rooms,
        ]
        .iter()
        .filter(|a| **a)
        .count() as u32
    }

    pub fn into_dto(self) -> CourtDto {
        CourtDto {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            description: self.description,
            location: self.location,
            address: self.address,
            latitude: self.coordinates.map(|c| c.latitude),
            longitude: self.coordinates.map(|c| c.longitude),
            court_type: self.court_type.as_str().to_string(),
            surface: self.surface.as_str().to_string(),
            hourly_rate: self.hourly_rate,
            opening_time: format_time(self.opening_time),
            closing_time: format_time(self.closing_time),
            has_lighting: self.has_lighting,
            has_parking: self.has_parking,
            has_equipment_rental: self.has_equipment_rental,
            has_changing_rooms: self.has_changing_rooms,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateCourtParam {
    pub owner_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub address: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub court_type: CourtType,
    pub surface: Surface,
    pub hourly_rate: f64,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub has_lighting: bool,
    pub has_parking: bool,
    pub has_equipment_rental: bool,
    pub has_changing_rooms: bool,
}

impl CreateCourtParam {
    /// Builds creation parameters for `owner_id` from a request body.
    ///
    /// Missing operating hours default to 06:00-22:00. Coordinates are filled in by
    /// geocoding afterwards.
    ///
    /// # Returns
    /// - `Ok(CreateCourtParam)` - Parsed parameters
    /// - `Err(AppError::BadRequest)` - Unknown court type or surface, or malformed time
    pub fn from_dto(owner_id: i32, dto: CreateCourtDto) -> Result<Self, AppError> {
        Ok(Self {
            owner_id,
            name: dto.name.trim().to_string(),
            description: dto.description,
            location: dto.location.trim().to_string(),
            address: dto.address,
            coordinates: None,
            court_type: parse_field(&dto.court_type)?,
            surface: parse_field(&dto.surface)?,
            hourly_rate: dto.hourly_rate,
            opening_time: parse_optional_time(dto.opening_time.as_deref())?
                .unwrap_or_else(default_opening_time),
            closing_time: parse_optional_time(dto.closing_time.as_deref())?
                .unwrap_or_else(default_closing_time),
            has_lighting: dto.has_lighting,
            has_parking: dto.has_parking,
            has_equipment_rental: dto.has_equipment_rental,
            has_changing_rooms: dto.has_changing_rooms,
        })
    }
}

/// Court edits. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateCourtParam {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub coordinates: Option<Option<Coordinates>>,
    pub court_type: Option<CourtType>,
    pub surface: Option<Surface>,
    pub hourly_rate: Option<f64>,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
    pub has_lighting: Option<bool>,
    pub has_parking: Option<bool>,
    pub has_equipment_rental: Option<bool>,
    pub has_changing_rooms: Option<bool>,
    pub is_active: Option<bool>,
}

impl TryFrom<UpdateCourtDto> for UpdateCourtParam {
    type Error = AppError;

    fn try_from(dto: UpdateCourtDto) -> Result<Self, Self::Error> {
        Ok(Self {
            name: dto.name.map(|n| n.trim().to_string()),
            description: dto.description,
            location: dto.location.map(|l| l.trim().to_string()),
            address: dto.address,
            coordinates: None,
            court_type: parse_optional_field(dto.court_type.as_deref())?,
            surface: parse_optional_field(dto.surface.as_deref())?,
            hourly_rate: dto.hourly_rate,
            opening_time: parse_optional_time(dto.opening_time.as_deref())?,
            closing_time: parse_optional_time(dto.closing_time.as_deref())?,
            has_lighting: dto.has_lighting,
            has_parking: dto.has_parking,
            has_equipment_rental: dto.has_equipment_rental,
            has_changing_rooms: dto.has_changing_rooms,
            is_active: dto.is_active,
        })
    }
}

/// Public court search filter.
#[derive(Debug, Clone, Default)]
pub struct CourtFilter {
    /// Case-insensitive substring of location or name
    pub location: Option<String>,
    pub max_price: Option<f64>,
    pub court_type: Option<CourtType>,
    pub surface: Option<Surface>,
}

/// One bookable hourly slot with its adjusted price.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub hourly_rate: f64,
    pub total_cost: f64,
}

impl TimeSlot {
    pub fn into_dto(self) -> crate::model::court::TimeSlotDto {
        crate::model::court::TimeSlotDto {
            start_time: format_time(self.start_time),
            end_time: format_time(self.end_time),
            hourly_rate: self.hourly_rate,
            total_cost: self.total_cost,
        }
    }
}

/// A free slot near a requested time that was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotAlternative {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Whole hours between this start and the requested start
    pub hours_from_requested: u32,
    pub is_peak_hour: bool,
    pub hourly_rate: f64,
    pub total_cost: f64,
}

impl SlotAlternative {
    pub fn into_dto(self) -> crate::model::court::SlotAlternativeDto {
        crate::model::court::SlotAlternativeDto {
            start_time: format_time(self.start_time),
            end_time: format_time(self.end_time),
            hours_from_requested: self.hours_from_requested,
            is_peak_hour: self.is_peak_hour,
            hourly_rate: self.hourly_rate,
            total_cost: self.total_cost,
        }
    }
}
