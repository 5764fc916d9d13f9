//! Two-player booking proposals: propose, respond, finalize and cancel.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::DatabaseConnection;

use crate::{
    model::shared_booking::ProposeSharedBookingDto,
    server::{
        data::{
            booking::{BookingInsert, BookingRepository},
            court::CourtRepository,
            player::PlayerRepository,
            shared_booking::SharedBookingRepository,
        },
        error::{rule::RuleViolation, AppError},
        model::{
            booking::CreateBookingParam,
            court::{Court, CourtFilter},
            shared_booking::{
                AlternativeSlot, CourtSuggestion, CreateSharedBookingParam, ProposalResponse,
                SharedBooking, SharedBookingStats, SharedBookingStatus,
            },
        },
        service::{
            email::EmailService,
            notification::NotificationService,
            rule::{booking_cost, RuleEngine},
        },
        util::{
            geo::{haversine_km, Coordinates},
            parse::{format_date, format_time, parse_date, parse_time, round1},
        },
    },
};

/// Hours a proposal stays open for a response.
pub const PROPOSAL_TTL_HOURS: i64 = 48;
/// Players further apart than this get no meeting point suggestions.
const MAX_PAIR_DISTANCE_KM: f64 = 100.0;
/// Furthest a suggested court may be from either player.
const MAX_COURT_DISTANCE_KM: f64 = 30.0;

/// A proposal as submitted by the initiating player.
#[derive(Debug, Clone)]
pub struct ProposalRequest {
    pub partner_player_id: i32,
    pub court_id: i32,
    pub booking_date: String,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
}

impl From<ProposeSharedBookingDto> for ProposalRequest {
    fn from(dto: ProposeSharedBookingDto) -> Self {
        Self {
            partner_player_id: dto.partner_player_id,
            court_id: dto.court_id,
            booking_date: dto.booking_date,
            start_time: dto.start_time,
            end_time: dto.end_time,
            notes: dto.notes,
        }
    }
}

pub struct SharedBookingService<'a> {
    db: &'a DatabaseConnection,
    email: &'a EmailService,
}

impl<'a> SharedBookingService<'a> {
    pub fn new(db: &'a DatabaseConnection, email: &'a EmailService) -> Self {
        Self { db, email }
    }

    /// Proposes a joint booking to another player.
    ///
    /// # Arguments
    /// - `actor_user_id` - User acting for `player1_id`, used as notification sender
    /// - `player1_id` - Initiating player
    /// - `request` - Partner, court and raw slot strings
    /// - `now` - Current time; the proposal expires `PROPOSAL_TTL_HOURS` later
    ///
    /// # Returns
    /// - `Ok(SharedBooking)` - The stored proposal
    /// - `Err(AppError::RuleErr)` - First failing proposal check
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn propose(
        &self,
        actor_user_id: i32,
        player1_id: i32,
        request: ProposalRequest,
        now: DateTime<Utc>,
    ) -> Result<SharedBooking, AppError> {
        let player2_id = request.partner_player_id;
        if player1_id == player2_id {
            return Err(RuleViolation::ProposalToSelf.into());
        }

        let player_repo = PlayerRepository::new(self.db);
        if player_repo.find_by_id(player1_id).await?.is_none()
            || player_repo.find_by_id(player2_id).await?.is_none()
        {
            return Err(RuleViolation::ProposalPlayerNotFound.into());
        }

        let court = self.active_court(request.court_id).await?;
        let booking_date = parse_date(&request.booking_date)?;
        let start_time = parse_time(&request.start_time)?;
        let end_time = parse_time(&request.end_time)?;
        self.check_slot(&court, booking_date, start_time, end_time, now)
            .await?;

        let shared_repo = SharedBookingRepository::new(self.db);
        if shared_repo
            .pending_exists_between(player1_id, player2_id)
            .await?
        {
            return Err(RuleViolation::ProposalAlreadyPending.into());
        }

        let proposal = shared_repo
            .create(CreateSharedBookingParam {
                player1_id,
                player2_id,
                court_id: court.id,
                booking_date,
                start_time,
                end_time,
                total_cost: booking_cost(court.hourly_rate, start_time, end_time),
                initiator_notes: request.notes.filter(|n| !n.trim().is_empty()),
                expires_at: now + Duration::hours(PROPOSAL_TTL_HOURS),
            })
            .await?;

        tracing::info!(
            "Player {} proposed shared booking {} to player {}",
            player1_id,
            proposal.id,
            player2_id
        );

        NotificationService::new(self.db, self.email)
            .proposal_received(actor_user_id, &proposal, &court)
            .await;

        Ok(proposal)
    }

    /// Records the invited partner's response to a proposal.
    ///
    /// An expired proposal is marked expired before the error is returned.
    pub async fn respond(
        &self,
        shared_booking_id: i32,
        player_id: i32,
        response: ProposalResponse,
        now: DateTime<Utc>,
    ) -> Result<SharedBooking, AppError> {
        let repo = SharedBookingRepository::new(self.db);
        let proposal = self.find(shared_booking_id).await?;

        if proposal.player2_id != player_id {
            return Err(RuleViolation::NotProposalRecipient.into());
        }
        if !proposal.status.is_pending() {
            return Err(RuleViolation::ProposalInactive.into());
        }
        if proposal.is_expired(now) {
            repo.set_status(proposal.id, SharedBookingStatus::Expired)
                .await?;
            return Err(RuleViolation::ProposalExpired.into());
        }

        let updated = match response {
            ProposalResponse::Accept { notes } => {
                repo.record_response(proposal.id, SharedBookingStatus::Accepted, notes, None)
                    .await?
            }
            ProposalResponse::CounterPropose { alternative, notes } => {
                let court = self.active_court(alternative.court_id).await?;
                self.check_slot(
                    &court,
                    alternative.date,
                    alternative.start_time,
                    alternative.end_time,
                    now,
                )
                .await?;

                repo.record_response(
                    proposal.id,
                    SharedBookingStatus::CounterProposed,
                    notes,
                    Some(alternative),
                )
                .await?
            }
            ProposalResponse::Decline { notes } => {
                repo.record_response(proposal.id, SharedBookingStatus::Cancelled, notes, None)
                    .await?
            }
        };

        let updated = updated.ok_or_else(proposal_not_found)?;
        tracing::info!(
            "Player {} responded to shared booking {}: {}",
            player_id,
            updated.id,
            updated.status.as_str()
        );

        Ok(updated)
    }

    /// Turns an agreed proposal into a pending two-player booking.
    ///
    /// A counter-proposal is booked at its alternative slot, which only the original
    /// proposer may confirm. The proposal keeps its stored slot and status unless the
    /// booking is created.
    ///
    /// # Returns
    /// - `Ok(SharedBooking)` - Confirmed proposal with `final_booking_id` set
    /// - `Err(AppError::RuleErr)` - Wrong player, wrong status or the slot is taken
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn finalize(
        &self,
        actor_user_id: i32,
        shared_booking_id: i32,
        player_id: i32,
        now: DateTime<Utc>,
    ) -> Result<SharedBooking, AppError> {
        let proposal = self.find(shared_booking_id).await?;

        let alternative: Option<AlternativeSlot> = match proposal.status {
            SharedBookingStatus::CounterProposed => {
                if player_id != proposal.player1_id {
                    return Err(RuleViolation::CounterNeedsProposer.into());
                }
                Some(
                    proposal
                        .alternative
                        .clone()
                        .ok_or(RuleViolation::CounterMissingSlot)?,
                )
            }
            SharedBookingStatus::Accepted => {
                if !proposal.involves(player_id) {
                    return Err(RuleViolation::NotAuthorizedToConfirm.into());
                }
                None
            }
            _ => return Err(RuleViolation::ProposalNotAccepted.into()),
        };

        let slot = alternative.clone().unwrap_or(AlternativeSlot {
            court_id: proposal.court_id,
            date: proposal.booking_date,
            start_time: proposal.start_time,
            end_time: proposal.end_time,
        });

        let validated = RuleEngine::new(self.db)
            .validate_booking(
                slot.court_id,
                proposal.player1_id,
                &format_date(slot.date),
                &format_time(slot.start_time),
                &format_time(slot.end_time),
                now,
            )
            .await?;

        let inserted = BookingRepository::new(self.db)
            .create_checked(CreateBookingParam {
                court_id: slot.court_id,
                player_id: proposal.player1_id,
                partner_player_id: Some(proposal.player2_id),
                booking_date: slot.date,
                start_time: slot.start_time,
                end_time: slot.end_time,
                notes: proposal.initiator_notes.clone(),
                total_cost: validated.total_cost,
            })
            .await?;

        let booking = match inserted {
            BookingInsert::Created(booking) => booking,
            BookingInsert::Conflict(_) => return Err(RuleViolation::ProposalSlotTaken.into()),
        };

        let adopted = alternative
            .as_ref()
            .map(|slot| (slot, validated.total_cost));
        let confirmed = SharedBookingRepository::new(self.db)
            .mark_confirmed(proposal.id, booking.id, adopted)
            .await?
            .ok_or_else(proposal_not_found)?;

        tracing::info!(
            "Shared booking {} finalized as booking {}",
            confirmed.id,
            booking.id
        );

        NotificationService::new(self.db, self.email)
            .booking_requested(actor_user_id, &booking, &validated.court)
            .await;

        Ok(confirmed)
    }

    /// Cancels a proposal on behalf of either player while it is still open.
    pub async fn cancel(
        &self,
        shared_booking_id: i32,
        player_id: i32,
    ) -> Result<SharedBooking, AppError> {
        let proposal = self.find(shared_booking_id).await?;

        if !proposal.involves(player_id) {
            return Err(RuleViolation::NotAuthorizedToCancelProposal.into());
        }
        match proposal.status {
            SharedBookingStatus::Confirmed => {
                return Err(RuleViolation::ProposalAlreadyConfirmed.into())
            }
            SharedBookingStatus::Cancelled | SharedBookingStatus::Expired => {
                return Err(RuleViolation::ProposalInactive.into())
            }
            _ => {}
        }

        SharedBookingRepository::new(self.db)
            .set_status(proposal.id, SharedBookingStatus::Cancelled)
            .await?
            .ok_or_else(proposal_not_found)
    }

    /// Proposals the player takes part in, newest first.
    pub async fn list_for_player(
        &self,
        player_id: i32,
        include_expired: bool,
    ) -> Result<Vec<SharedBooking>, AppError> {
        Ok(SharedBookingRepository::new(self.db)
            .get_for_player(player_id, include_expired)
            .await?)
    }

    /// Unexpired proposals waiting on the player's response.
    pub async fn pending_for_player(
        &self,
        player_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Vec<SharedBooking>, AppError> {
        Ok(SharedBookingRepository::new(self.db)
            .get_pending_for_recipient(player_id, now)
            .await?)
    }

    /// Courts convenient for both players, best first.
    ///
    /// Empty when either player is unknown or has no coordinates.
    pub async fn suggest_courts(
        &self,
        player1_id: i32,
        player2_id: i32,
        limit: usize,
    ) -> Result<Vec<CourtSuggestion>, AppError> {
        let player_repo = PlayerRepository::new(self.db);
        let (Some(player1), Some(player2)) = (
            player_repo.find_by_id(player1_id).await?,
            player_repo.find_by_id(player2_id).await?,
        ) else {
            return Ok(Vec::new());
        };
        let (Some(a), Some(b)) = (player1.coordinates, player2.coordinates) else {
            return Ok(Vec::new());
        };

        let courts = CourtRepository::new(self.db)
            .search(&CourtFilter::default(), true)
            .await?;

        let mut suggestions = rank_meeting_points(a, b, courts);
        suggestions.truncate(limit);
        Ok(suggestions)
    }

    /// Platform-wide proposal counts.
    pub async fn stats(&self) -> Result<SharedBookingStats, AppError> {
        let repo = SharedBookingRepository::new(self.db);
        let total_proposals = repo.count_by_status(None).await?;
        let confirmed_bookings = repo
            .count_by_status(Some(SharedBookingStatus::Confirmed))
            .await?;
        let pending_proposals = repo.count_pending().await?;

        let success_rate = if total_proposals > 0 {
            round1(confirmed_bookings as f64 / total_proposals as f64 * 100.0)
        } else {
            0.0
        };

        Ok(SharedBookingStats {
            total_proposals,
            confirmed_bookings,
            pending_proposals,
            success_rate,
        })
    }

    async fn find(&self, shared_booking_id: i32) -> Result<SharedBooking, AppError> {
        SharedBookingRepository::new(self.db)
            .find_by_id(shared_booking_id)
            .await?
            .ok_or_else(proposal_not_found)
    }

    async fn active_court(&self, court_id: i32) -> Result<Court, AppError> {
        Ok(CourtRepository::new(self.db)
            .find_by_id(court_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or(RuleViolation::CourtNotAvailable)?)
    }

    /// Date strictly after today, start before end, and no blocking booking on the court.
    async fn check_slot(
        &self,
        court: &Court,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        if date <= now.date_naive() {
            return Err(RuleViolation::ProposalDateNotFuture.into());
        }
        if start_time >= end_time {
            return Err(RuleViolation::ProposalEndNotAfterStart.into());
        }

        let conflict = BookingRepository::new(self.db)
            .find_conflict(court.id, date, start_time, end_time, None)
            .await?;
        if conflict.is_some() {
            return Err(RuleViolation::ProposalSlotTaken.into());
        }

        Ok(())
    }
}

fn proposal_not_found() -> AppError {
    AppError::NotFound("Shared booking not found".to_string())
}

/// Ranks courts as meeting points for two players.
///
/// Courts must be within `MAX_COURT_DISTANCE_KM` of both players, not force a large detour
/// and not favour one player too heavily. Score is 60% convenience (closeness) and 40%
/// fairness (equal distances).
pub fn rank_meeting_points(a: Coordinates, b: Coordinates, courts: Vec<Court>) -> Vec<CourtSuggestion> {
    let pair_distance = haversine_km(a, b);
    if pair_distance > MAX_PAIR_DISTANCE_KM {
        return Vec::new();
    }

    let max_detour = if pair_distance <= 20.0 {
        15.0
    } else {
        pair_distance * 0.4
    };
    let max_unfairness = if pair_distance <= 10.0 {
        20.0
    } else {
        pair_distance * 0.6
    };

    let mut suggestions: Vec<CourtSuggestion> = courts
        .into_iter()
        .filter_map(|court| {
            let location = court.coordinates?;
            let to_a = haversine_km(a, location);
            let to_b = haversine_km(b, location);

            if to_a > MAX_COURT_DISTANCE_KM || to_b > MAX_COURT_DISTANCE_KM {
                return None;
            }
            if to_a.max(to_b) > pair_distance + max_detour {
                return None;
            }
            let difference = (to_a - to_b).abs();
            if difference > max_unfairness {
                return None;
            }

            let fairness = 100.0 - difference * 3.0;
            let convenience = (100.0 - (to_a + to_b) / 2.0 * 4.0).max(0.0);

            Some(CourtSuggestion {
                court,
                distance_to_player1_km: to_a,
                distance_to_player2_km: to_b,
                score: round1(convenience * 0.6 + fairness * 0.4),
            })
        })
        .collect();

    suggestions.sort_by(|x, y| {
        y.score
            .total_cmp(&x.score)
            .then(x.court.id.cmp(&y.court.id))
    });
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::data::booking::BookingRepository;
    use test_utils::{
        builder::TestBuilder,
        factory::{self, helpers::days_from_today},
    };

    struct Pair {
        player1_user_id: i32,
        player1: i32,
        player2: i32,
        court_id: i32,
    }

    async fn pair(db: &DatabaseConnection) -> Result<Pair, AppError> {
        let (_, court) = factory::create_court_with_owner(db).await?;
        let (user1, player1) = factory::create_player(db).await?;
        let (_, player2) = factory::create_player(db).await?;

        Ok(Pair {
            player1_user_id: user1.id,
            player1: player1.id,
            player2: player2.id,
            court_id: court.id,
        })
    }

    fn request(pair: &Pair, days: i64, start: &str, end: &str) -> ProposalRequest {
        ProposalRequest {
            partner_player_id: pair.player2,
            court_id: pair.court_id,
            booking_date: format_date(days_from_today(days)),
            start_time: start.to_string(),
            end_time: end.to_string(),
            notes: None,
        }
    }

    fn rule_err<T: std::fmt::Debug>(result: Result<T, AppError>) -> RuleViolation {
        match result {
            Err(AppError::RuleErr(violation)) => violation,
            other => panic!("expected rule violation, got {other:?}"),
        }
    }

    /// Tests proposal validation order and the duplicate pending check.
    ///
    /// Expected: self, past date, reversed times then duplicate are refused
    #[tokio::test]
    async fn propose_checks_in_order() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let p = pair(db).await?;
        let email = EmailService::disabled(reqwest::Client::new());
        let service = SharedBookingService::new(db, &email);
        let now = Utc::now();

        let mut to_self = request(&p, 2, "10:00", "11:00");
        to_self.partner_player_id = p.player1;
        assert_eq!(
            rule_err(service.propose(p.player1_user_id, p.player1, to_self, now).await),
            RuleViolation::ProposalToSelf
        );
        assert_eq!(
            rule_err(
                service
                    .propose(p.player1_user_id, p.player1, request(&p, 0, "10:00", "11:00"), now)
                    .await
            ),
            RuleViolation::ProposalDateNotFuture
        );
        assert_eq!(
            rule_err(
                service
                    .propose(p.player1_user_id, p.player1, request(&p, 2, "11:00", "10:00"), now)
                    .await
            ),
            RuleViolation::ProposalEndNotAfterStart
        );

        let proposal = service
            .propose(p.player1_user_id, p.player1, request(&p, 2, "10:00", "12:00"), now)
            .await?;
        assert_eq!(proposal.status, SharedBookingStatus::Proposed);
        assert_eq!(proposal.total_cost, 100.0);
        assert_eq!(proposal.player1_share, 50.0);
        let deadline = now + Duration::hours(PROPOSAL_TTL_HOURS);
        assert!((proposal.expires_at - deadline).num_seconds().abs() < 1);

        assert_eq!(
            rule_err(
                service
                    .propose(p.player1_user_id, p.player1, request(&p, 3, "10:00", "12:00"), now)
                    .await
            ),
            RuleViolation::ProposalAlreadyPending
        );

        Ok(())
    }

    /// Tests accept then finalize creates a two-player booking.
    ///
    /// Expected: confirmed proposal linked to a pending booking with the partner set
    #[tokio::test]
    async fn accept_then_finalize_creates_booking() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let p = pair(db).await?;
        let email = EmailService::disabled(reqwest::Client::new());
        let service = SharedBookingService::new(db, &email);
        let now = Utc::now();

        let proposal = service
            .propose(p.player1_user_id, p.player1, request(&p, 2, "10:00", "11:00"), now)
            .await?;

        assert_eq!(
            rule_err(
                service
                    .respond(proposal.id, p.player1, ProposalResponse::Accept { notes: None }, now)
                    .await
            ),
            RuleViolation::NotProposalRecipient
        );

        let accepted = service
            .respond(proposal.id, p.player2, ProposalResponse::Accept { notes: None }, now)
            .await?;
        assert_eq!(accepted.status, SharedBookingStatus::Accepted);

        let confirmed = service
            .finalize(p.player1_user_id, proposal.id, p.player2, now)
            .await?;
        assert_eq!(confirmed.status, SharedBookingStatus::Confirmed);

        let booking_id = confirmed.final_booking_id.expect("final booking linked");
        let booking = BookingRepository::new(db)
            .find_by_id(booking_id)
            .await?
            .expect("booking stored");
        assert_eq!(booking.player_id, p.player1);
        assert_eq!(booking.partner_player_id, Some(p.player2));

        assert_eq!(
            rule_err(service.cancel(proposal.id, p.player1).await),
            RuleViolation::ProposalAlreadyConfirmed
        );

        Ok(())
    }

    /// Tests that only the proposer can confirm a counter-proposal, which moves the slot.
    ///
    /// Expected: partner refused, proposer confirms at the alternative time
    #[tokio::test]
    async fn counter_proposal_needs_proposer() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let p = pair(db).await?;
        let email = EmailService::disabled(reqwest::Client::new());
        let service = SharedBookingService::new(db, &email);
        let now = Utc::now();

        let proposal = service
            .propose(p.player1_user_id, p.player1, request(&p, 2, "10:00", "11:00"), now)
            .await?;

        let alternative = AlternativeSlot {
            court_id: p.court_id,
            date: days_from_today(3),
            start_time: factory::helpers::hour(16),
            end_time: factory::helpers::hour(18),
        };
        let countered = service
            .respond(
                proposal.id,
                p.player2,
                ProposalResponse::CounterPropose {
                    alternative: alternative.clone(),
                    notes: Some("Later works better".to_string()),
                },
                now,
            )
            .await?;
        assert_eq!(countered.status, SharedBookingStatus::CounterProposed);
        assert_eq!(countered.alternative, Some(alternative.clone()));

        assert_eq!(
            rule_err(service.finalize(p.player1_user_id, proposal.id, p.player2, now).await),
            RuleViolation::CounterNeedsProposer
        );

        let confirmed = service
            .finalize(p.player1_user_id, proposal.id, p.player1, now)
            .await?;
        assert_eq!(confirmed.booking_date, alternative.date);
        assert_eq!(confirmed.start_time, alternative.start_time);
        assert_eq!(confirmed.total_cost, 100.0);

        Ok(())
    }

    /// Tests finalizing a counter-proposal whose alternative slot was booked meanwhile.
    ///
    /// Expected: conflict error, proposal still counter_proposed at its original slot
    #[tokio::test]
    async fn taken_counter_slot_leaves_proposal_untouched() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let p = pair(db).await?;
        let email = EmailService::disabled(reqwest::Client::new());
        let service = SharedBookingService::new(db, &email);
        let now = Utc::now();

        let proposal = service
            .propose(p.player1_user_id, p.player1, request(&p, 2, "10:00", "11:00"), now)
            .await?;
        let alternative = AlternativeSlot {
            court_id: p.court_id,
            date: days_from_today(3),
            start_time: factory::helpers::hour(16),
            end_time: factory::helpers::hour(18),
        };
        service
            .respond(
                proposal.id,
                p.player2,
                ProposalResponse::CounterPropose {
                    alternative: alternative.clone(),
                    notes: None,
                },
                now,
            )
            .await?;

        let (_, other) = factory::create_player(db).await?;
        factory::booking::BookingFactory::new(db, p.court_id, other.id)
            .date(alternative.date)
            .window(factory::helpers::hour(16), factory::helpers::hour(17))
            .build()
            .await?;

        let result = service
            .finalize(p.player1_user_id, proposal.id, p.player1, now)
            .await;
        assert!(matches!(
            rule_err(result),
            RuleViolation::SlotConflict { .. } | RuleViolation::ProposalSlotTaken
        ));

        let stored = SharedBookingRepository::new(db)
            .find_by_id(proposal.id)
            .await?
            .expect("proposal stored");
        assert_eq!(stored.status, SharedBookingStatus::CounterProposed);
        assert_eq!(stored.booking_date, proposal.booking_date);
        assert_eq!(stored.start_time, proposal.start_time);
        assert_eq!(stored.final_booking_id, None);

        Ok(())
    }

    /// Tests that responding after the deadline marks the proposal expired.
    ///
    /// Expected: Err(ProposalExpired) and stored status expired
    #[tokio::test]
    async fn respond_after_deadline_expires() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let p = pair(db).await?;

        let stale = factory::shared_booking::SharedBookingFactory::new(
            db, p.player1, p.player2, p.court_id,
        )
        .expires_at(Utc::now() - Duration::hours(1))
        .build()
        .await?;

        let email = EmailService::disabled(reqwest::Client::new());
        let service = SharedBookingService::new(db, &email);

        assert_eq!(
            rule_err(
                service
                    .respond(stale.id, p.player2, ProposalResponse::Accept { notes: None }, Utc::now())
                    .await
            ),
            RuleViolation::ProposalExpired
        );

        let stored = SharedBookingRepository::new(db)
            .find_by_id(stale.id)
            .await?
            .expect("proposal stored");
        assert_eq!(stored.status, SharedBookingStatus::Expired);

        let stats = service.stats().await?;
        assert_eq!(stats.total_proposals, 1);
        assert_eq!(stats.pending_proposals, 0);
        assert_eq!(stats.success_rate, 0.0);

        Ok(())
    }

    /// Tests meeting point ranking prefers a court halfway between the players.
    ///
    /// Expected: only the midpoint court; one beside player 1 is unfair, one in another city too far
    #[tokio::test]
    async fn suggests_midpoint_courts() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let owner = factory::create_owner(db).await?;

        let (_, player1) = factory::player::PlayerFactory::new(db)
            .coordinates(32.08, 34.78)
            .build()
            .await?;
        let (_, player2) = factory::player::PlayerFactory::new(db)
            .coordinates(32.16, 34.84)
            .build()
            .await?;

        factory::court::CourtFactory::new(db, owner.id)
            .coordinates(32.081, 34.781)
            .build()
            .await?;
        let midpoint = factory::court::CourtFactory::new(db, owner.id)
            .coordinates(32.12, 34.81)
            .build()
            .await?;
        factory::court::CourtFactory::new(db, owner.id)
            .coordinates(31.77, 35.21)
            .build()
            .await?;

        let email = EmailService::disabled(reqwest::Client::new());
        let suggestions = SharedBookingService::new(db, &email)
            .suggest_courts(player1.id, player2.id, 5)
            .await?;

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].court.id, midpoint.id);
        assert!(suggestions[0].distance_to_player1_km < 6.0);

        Ok(())
    }
}
