//! Business rule violations.
//!
//! Each variant is one failing check of a rule set. The `Display` text is the reason
//! returned to the client, so rule sets can stop at the first violation and hand it
//! straight to the HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveTime;
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::service::rule::{
        CANCELLATION_NOTICE_HOURS, MAX_ADVANCE_BOOKING_DAYS, MAX_BOOKING_DURATION_HOURS,
        MAX_COURTS_PER_OWNER, MAX_HOURLY_RATE, MAX_MESSAGE_LENGTH, MIN_BOOKING_DURATION_MINUTES,
        MIN_HOURLY_RATE,
    },
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleViolation {
    // Booking creation
    #[error("Invalid date or time format")]
    InvalidDateTimeFormat,
    #[error("Court not available")]
    CourtNotAvailable,
    #[error("Player not found")]
    PlayerNotFound,
    #[error("Cannot book courts for past dates")]
    PastDate,
    #[error("Cannot book more than {} days in advance", MAX_ADVANCE_BOOKING_DAYS)]
    TooFarInAdvance,
    #[error("Start time must be before end time")]
    StartNotBeforeEnd,
    #[error("Minimum booking duration is {} minutes", MIN_BOOKING_DURATION_MINUTES)]
    DurationTooShort,
    #[error("Maximum booking duration is {} hours", MAX_BOOKING_DURATION_HOURS)]
    DurationTooLong,
    #[error("Booking cannot start before {}", .0.format("%H:%M"))]
    BeforeOpening(NaiveTime),
    #[error("Booking cannot end after {}", .0.format("%H:%M"))]
    AfterClosing(NaiveTime),
    #[error(
        "Time slot conflicts with existing booking from {} to {}",
        .start.format("%H:%M"),
        .end.format("%H:%M")
    )]
    SlotConflict { start: NaiveTime, end: NaiveTime },
    #[error("Cannot book your own court")]
    OwnCourt,

    // Approval and cancellation
    #[error("Booking not found")]
    BookingNotFound,
    #[error("Not authorized to approve this booking")]
    NotAuthorizedToApprove,
    #[error("Booking is already {0}")]
    AlreadyDecided(String),
    #[error("Cannot approve booking for past date")]
    ApprovalForPastDate,
    #[error("Not authorized to cancel this booking")]
    NotAuthorizedToCancel,
    #[error("Cannot cancel {0} booking")]
    NotCancellable(String),
    #[error("Must cancel at least {} hours in advance", CANCELLATION_NOTICE_HOURS)]
    CancellationNoticeTooShort,

    // Court creation
    #[error("Maximum {} courts allowed per owner", MAX_COURTS_PER_OWNER)]
    TooManyCourts,
    #[error("Court name already exists for this owner")]
    DuplicateCourtName,
    #[error("Hourly rate must be between ${} and ${}", MIN_HOURLY_RATE, MAX_HOURLY_RATE)]
    HourlyRateOutOfRange,
    #[error("Court name must be at least 3 characters long")]
    CourtNameTooShort,
    #[error("Location must be at least 5 characters long")]
    LocationTooShort,
    #[error("Closing time must be after opening time")]
    InvalidOperatingHours,

    // Registration
    #[error("Email address already registered")]
    EmailTaken,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Invalid user type")]
    InvalidUserType,
    #[error("Invalid skill level")]
    InvalidSkillLevel,
    #[error("Password must be at least 8 characters and contain a letter and a digit")]
    WeakPassword,
    #[error("Invalid admin code")]
    InvalidAdminCode,

    // Messaging
    #[error("Cannot send message to yourself")]
    MessageToSelf,
    #[error("Message content cannot be empty")]
    EmptyMessage,
    #[error("Message too long (max {} characters)", MAX_MESSAGE_LENGTH)]
    MessageTooLong,
    #[error("Sender account not valid")]
    InvalidSender,
    #[error("Recipient account not valid")]
    InvalidRecipient,
    #[error("Message rate limit exceeded. Try again later.")]
    MessageRateLimited,
    #[error("Not a participant in this conversation")]
    NotParticipant,
    #[error("Support is available for players only")]
    SupportForPlayersOnly,
    #[error("Support conversations must be with an active court owner")]
    SupportNeedsOwner,

    // Shared bookings
    #[error("Cannot book with yourself")]
    ProposalToSelf,
    #[error("One or both players not found")]
    ProposalPlayerNotFound,
    #[error("Booking date must be in the future")]
    ProposalDateNotFuture,
    #[error("End time must be after start time")]
    ProposalEndNotAfterStart,
    #[error("Court is not available for this time slot")]
    ProposalSlotTaken,
    #[error("There is already a pending proposal between you")]
    ProposalAlreadyPending,
    #[error("Not authorized to respond to this proposal")]
    NotProposalRecipient,
    #[error("This proposal is no longer active")]
    ProposalInactive,
    #[error("This proposal has expired")]
    ProposalExpired,
    #[error("Only the original proposer can confirm counter-proposals")]
    CounterNeedsProposer,
    #[error("Not authorized to confirm this booking")]
    NotAuthorizedToConfirm,
    #[error("Proposal must be accepted before booking")]
    ProposalNotAccepted,
    #[error("Not authorized to cancel this proposal")]
    NotAuthorizedToCancelProposal,
    #[error("Confirmed proposals cannot be cancelled")]
    ProposalAlreadyConfirmed,
    #[error("Counter-proposal requires an alternative date and time")]
    CounterMissingSlot,
}

impl IntoResponse for RuleViolation {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorDto {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_conflict_with_hours_and_minutes() {
        let violation = RuleViolation::SlotConflict {
            start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
        };

        assert_eq!(
            violation.to_string(),
            "Time slot conflicts with existing booking from 10:00 to 11:30"
        );
    }

    #[test]
    fn formats_limits_from_constants() {
        assert_eq!(
            RuleViolation::TooFarInAdvance.to_string(),
            "Cannot book more than 30 days in advance"
        );
        assert_eq!(
            RuleViolation::DurationTooLong.to_string(),
            "Maximum booking duration is 4 hours"
        );
        assert_eq!(
            RuleViolation::HourlyRateOutOfRange.to_string(),
            "Hourly rate must be between $10 and $500"
        );
    }
}
