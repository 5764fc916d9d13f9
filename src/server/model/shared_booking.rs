//! Two-player booking proposals.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::DbErr;
use std::str::FromStr;

use crate::{
    model::shared_booking::{
        CourtSuggestionDto, RespondSharedBookingDto, SharedBookingDto, SharedBookingStatsDto,
    },
    server::{
        error::{internal::InternalError, rule::RuleViolation, AppError},
        model::court::Court,
        util::parse::{format_date, format_time, parse_date, parse_time},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedBookingStatus {
    Proposed,
    CounterProposed,
    Accepted,
    Confirmed,
    Cancelled,
    Expired,
}

impl SharedBookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SharedBookingStatus::Proposed => "proposed",
            SharedBookingStatus::CounterProposed => "counter_proposed",
            SharedBookingStatus::Accepted => "accepted",
            SharedBookingStatus::Confirmed => "confirmed",
            SharedBookingStatus::Cancelled => "cancelled",
            SharedBookingStatus::Expired => "expired",
        }
    }

    /// Statuses still waiting on a response.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            SharedBookingStatus::Proposed | SharedBookingStatus::CounterProposed
        )
    }

    pub fn pending_values() -> [&'static str; 2] {
        [
            SharedBookingStatus::Proposed.as_str(),
            SharedBookingStatus::CounterProposed.as_str(),
        ]
    }
}

impl FromStr for SharedBookingStatus {
    type Err = InternalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "proposed" => Ok(SharedBookingStatus::Proposed),
            "counter_proposed" => Ok(SharedBookingStatus::CounterProposed),
            "accepted" => Ok(SharedBookingStatus::Accepted),
            "confirmed" => Ok(SharedBookingStatus::Confirmed),
            "cancelled" => Ok(SharedBookingStatus::Cancelled),
            "expired" => Ok(SharedBookingStatus::Expired),
            _ => Err(InternalError::UnknownVariant {
                kind: "shared booking status",
                value: value.to_string(),
            }),
        }
    }
}

/// Response of the invited partner to a proposal.
#[derive(Debug, Clone, PartialEq)]
pub enum ProposalResponse {
    Accept {
        notes: Option<String>,
    },
    CounterPropose {
        alternative: AlternativeSlot,
        notes: Option<String>,
    },
    Decline {
        notes: Option<String>,
    },
}

/// Alternative court and time offered in a counter-proposal.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeSlot {
    pub court_id: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SharedBooking {
    pub id: i32,
    pub player1_id: i32,
    pub player2_id: i32,
    pub court_id: i32,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: SharedBookingStatus,
    pub total_cost: f64,
    pub player1_share: f64,
    pub player2_share: f64,
    pub initiator_notes: Option<String>,
    pub partner_notes: Option<String>,
    pub alternative: Option<AlternativeSlot>,
    pub alternative_notes: Option<String>,
    pub final_booking_id: Option<i32>,
    pub proposed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SharedBooking {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// The alternative slot is only present when all four alternative columns are set.
    pub fn from_entity(entity: entity::shared_booking::Model) -> Result<Self, DbErr> {
        let status = SharedBookingStatus::from_str(&entity.status)
            .map_err(|e| DbErr::Custom(e.to_string()))?;

        let alternative = match (
            entity.alternative_court_id,
            entity.alternative_date,
            entity.alternative_start_time,
            entity.alternative_end_time,
        ) {
            (Some(court_id), Some(date), Some(start_time), Some(end_time)) => {
                Some(AlternativeSlot {
                    court_id,
                    date,
                    start_time,
                    end_time,
                })
            }
            _ => None,
        };

        Ok(Self {
            id: entity.id,
            player1_id: entity.player1_id,
            player2_id: entity.player2_id,
            court_id: entity.court_id,
            booking_date: entity.booking_date,
            start_time: entity.start_time,
            end_time: entity.end_time,
            status,
            total_cost: entity.total_cost,
            player1_share: entity.player1_share,
            player2_share: entity.player2_share,
            initiator_notes: entity.initiator_notes,
            partner_notes: entity.partner_notes,
            alternative,
            alternative_notes: entity.alternative_notes,
            final_booking_id: entity.final_booking_id,
            proposed_at: entity.proposed_at,
            expires_at: entity.expires_at,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn involves(&self, player_id: i32) -> bool {
        self.player1_id == player_id || self.player2_id == player_id
    }

    /// Converts to a DTO, labelling the role of `viewer_player_id` when given.
    pub fn into_dto(self, viewer_player_id: Option<i32>) -> SharedBookingDto {
        let user_role = viewer_player_id.map(|id| {
            if id == self.player1_id {
                "initiator".to_string()
            } else {
                "partner".to_string()
            }
        });

        SharedBookingDto {
            id: self.id,
            player1_id: self.player1_id,
            player2_id: self.player2_id,
            court_id: self.court_id,
            booking_date: format_date(self.booking_date),
            start_time: format_time(self.start_time),
            end_time: format_time(self.end_time),
            status: self.status.as_str().to_string(),
            total_cost: self.total_cost,
            player1_share: self.player1_share,
            player2_share: self.player2_share,
            initiator_notes: self.initiator_notes,
            partner_notes: self.partner_notes,
            alternative_court_id: self.alternative.as_ref().map(|a| a.court_id),
            alternative_date: self.alternative.as_ref().map(|a| format_date(a.date)),
            alternative_start_time: self.alternative.as_ref().map(|a| format_time(a.start_time)),
            alternative_end_time: self.alternative.as_ref().map(|a| format_time(a.end_time)),
            alternative_notes: self.alternative_notes,
            final_booking_id: self.final_booking_id,
            proposed_at: self.proposed_at,
            expires_at: self.expires_at,
            user_role,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateSharedBookingParam {
    pub player1_id: i32,
    pub player2_id: i32,
    pub court_id: i32,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_cost: f64,
    pub initiator_notes: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl TryFrom<RespondSharedBookingDto> for ProposalResponse {
    type Error = AppError;

    fn try_from(dto: RespondSharedBookingDto) -> Result<Self, Self::Error> {
        let notes = dto.notes.filter(|n| !n.trim().is_empty());

        match dto.action.trim() {
            "accept" => Ok(ProposalResponse::Accept { notes }),
            "decline" => Ok(ProposalResponse::Decline { notes }),
            "counter_propose" => {
                let (Some(date), Some(start), Some(end)) = (
                    dto.alternative_date.as_deref(),
                    dto.alternative_start_time.as_deref(),
                    dto.alternative_end_time.as_deref(),
                ) else {
                    return Err(RuleViolation::CounterMissingSlot.into());
                };
                let court_id = dto
                    .alternative_court_id
                    .ok_or(RuleViolation::CounterMissingSlot)?;

                Ok(ProposalResponse::CounterPropose {
                    alternative: AlternativeSlot {
                        court_id,
                        date: parse_date(date)?,
                        start_time: parse_time(start)?,
                        end_time: parse_time(end)?,
                    },
                    notes,
                })
            }
            _ => Err(AppError::BadRequest("Invalid action".to_string())),
        }
    }
}

/// A court convenient for both players of a pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CourtSuggestion {
    pub court: Court,
    pub distance_to_player1_km: f64,
    pub distance_to_player2_km: f64,
    /// Convenience and fairness combined, higher is better
    pub score: f64,
}

impl CourtSuggestion {
    pub fn into_dto(self) -> CourtSuggestionDto {
        CourtSuggestionDto {
            court: self.court.into_dto(),
            distance_to_player1_km: self.distance_to_player1_km,
            distance_to_player2_km: self.distance_to_player2_km,
            score: self.score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharedBookingStats {
    pub total_proposals: u64,
    pub confirmed_bookings: u64,
    pub pending_proposals: u64,
    pub success_rate: f64,
}

impl SharedBookingStats {
    pub fn into_dto(self) -> SharedBookingStatsDto {
        SharedBookingStatsDto {
            total_proposals: self.total_proposals,
            confirmed_bookings: self.confirmed_bookings,
            pending_proposals: self.pending_proposals,
            success_rate: self.success_rate,
        }
    }
}
