//! Court bookings and their lifecycle status.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sea_orm::DbErr;
use std::str::FromStr;

use crate::{
    model::booking::BookingDto,
    server::{
        error::internal::InternalError,
        util::parse::{format_date, format_time},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Rejected => "rejected",
        }
    }

    /// Whether a booking in this status holds its time slot.
    pub fn blocks_slot(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Calendar colour for this status.
    pub fn color(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "#ffc107",
            BookingStatus::Confirmed => "#28a745",
            BookingStatus::Cancelled => "#6c757d",
            BookingStatus::Rejected => "#dc3545",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = InternalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "rejected" => Ok(BookingStatus::Rejected),
            _ => Err(InternalError::UnknownVariant {
                kind: "booking status",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: i32,
    pub court_id: i32,
    pub player_id: i32,
    pub partner_player_id: Option<i32>,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub total_cost: f64,
    pub cancellation_reason: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(Booking)` - Converted domain model
    /// - `Err(DbErr::Custom)` - Stored status is unknown
    pub fn from_entity(entity: entity::booking::Model) -> Result<Self, DbErr> {
        let status =
            BookingStatus::from_str(&entity.status).map_err(|e| DbErr::Custom(e.to_string()))?;

        Ok(Self {
            id: entity.id,
            court_id: entity.court_id,
            player_id: entity.player_id,
            partner_player_id: entity.partner_player_id,
            booking_date: entity.booking_date,
            start_time: entity.start_time,
            end_time: entity.end_time,
            status,
            notes: entity.notes,
            total_cost: entity.total_cost,
            cancellation_reason: entity.cancellation_reason,
            rejection_reason: entity.rejection_reason,
            created_at: entity.created_at,
        })
    }

    pub fn start_datetime(&self) -> NaiveDateTime {
        self.booking_date.and_time(self.start_time)
    }

    pub fn end_datetime(&self) -> NaiveDateTime {
        self.booking_date.and_time(self.end_time)
    }

    /// Whether the given player is the booker or the partner.
    pub fn involves_player(&self, player_id: i32) -> bool {
        self.player_id == player_id || self.partner_player_id == Some(player_id)
    }

    pub fn into_dto(self, court_name: Option<String>) -> BookingDto {
        BookingDto {
            id: self.id,
            court_id: self.court_id,
            court_name,
            player_id: self.player_id,
            partner_player_id: self.partner_player_id,
            booking_date: format_date(self.booking_date),
            start_time: format_time(self.start_time),
            end_time: format_time(self.end_time),
            status: self.status.as_str().to_string(),
            notes: self.notes,
            total_cost: self.total_cost,
            cancellation_reason: self.cancellation_reason,
            rejection_reason: self.rejection_reason,
            created_at: self.created_at,
        }
    }
}

/// Booking joined with the name of its court, for listings.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingWithCourt {
    pub booking: Booking,
    pub court_name: String,
}

impl BookingWithCourt {
    pub fn into_dto(self) -> BookingDto {
        self.booking.into_dto(Some(self.court_name))
    }
}

#[derive(Debug, Clone)]
pub struct CreateBookingParam {
    pub court_id: i32,
    pub player_id: i32,
    pub partner_player_id: Option<i32>,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub notes: Option<String>,
    pub total_cost: f64,
}

/// A calendar entry for a booking or shared booking proposal.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub id: i32,
    pub kind: &'static str,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: String,
    pub color: &'static str,
}

impl CalendarEvent {
    pub fn into_dto(self) -> crate::model::booking::CalendarEventDto {
        crate::model::booking::CalendarEventDto {
            id: self.id,
            kind: self.kind.to_string(),
            title: self.title,
            start: self.start.format("%Y-%m-%dT%H:%M").to_string(),
            end: self.end.format("%Y-%m-%dT%H:%M").to_string(),
            status: self.status,
            color: self.color.to_string(),
        }
    }
}
