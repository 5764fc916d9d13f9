//! Booking requests, owner decisions, cancellations and calendars.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::DatabaseConnection;

use crate::{
    model::booking::CreateBookingDto,
    server::{
        data::{
            booking::{BookingInsert, BookingRepository},
            shared_booking::SharedBookingRepository,
        },
        error::{rule::RuleViolation, AppError},
        model::{
            booking::{BookingStatus, BookingWithCourt, CalendarEvent, CreateBookingParam},
            shared_booking::SharedBookingStatus,
            user::User,
        },
        service::{email::EmailService, notification::NotificationService, rule::RuleEngine},
    },
};

/// Calendar colour of shared booking proposals still being negotiated.
const PROPOSAL_COLOR: &str = "#17a2b8";

/// A booking request as submitted by a player.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub court_id: i32,
    pub booking_date: String,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
}

impl From<CreateBookingDto> for BookingRequest {
    fn from(dto: CreateBookingDto) -> Self {
        Self {
            court_id: dto.court_id,
            booking_date: dto.booking_date,
            start_time: dto.start_time,
            end_time: dto.end_time,
            notes: dto.notes,
        }
    }
}

pub struct BookingService<'a> {
    db: &'a DatabaseConnection,
    email: &'a EmailService,
}

impl<'a> BookingService<'a> {
    pub fn new(db: &'a DatabaseConnection, email: &'a EmailService) -> Self {
        Self { db, email }
    }

    /// Requests a booking for a player.
    ///
    /// Runs the booking rule set, then inserts through the locking transaction which re-checks
    /// the slot. The court owner is notified of the new request.
    ///
    /// # Arguments
    /// - `user` - Acting user, owner of the player profile
    /// - `player_id` - Player profile making the booking
    /// - `request` - Raw request fields
    /// - `now` - Current time
    ///
    /// # Returns
    /// - `Ok(BookingWithCourt)` - The pending booking
    /// - `Err(AppError::RuleErr)` - First failing rule, or the slot was taken concurrently
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn request_booking(
        &self,
        user: &User,
        player_id: i32,
        request: BookingRequest,
        now: DateTime<Utc>,
    ) -> Result<BookingWithCourt, AppError> {
        let validated = RuleEngine::new(self.db)
            .validate_booking(
                request.court_id,
                player_id,
                &request.booking_date,
                &request.start_time,
                &request.end_time,
                now,
            )
            .await?;

        let inserted = BookingRepository::new(self.db)
            .create_checked(CreateBookingParam {
                court_id: validated.court.id,
                player_id,
                partner_player_id: None,
                booking_date: validated.booking_date,
                start_time: validated.start_time,
                end_time: validated.end_time,
                notes: request.notes.filter(|n| !n.trim().is_empty()),
                total_cost: validated.total_cost,
            })
            .await?;

        let booking = match inserted {
            BookingInsert::Created(booking) => booking,
            BookingInsert::Conflict(existing) => {
                return Err(RuleViolation::SlotConflict {
                    start: existing.start_time,
                    end: existing.end_time,
                }
                .into())
            }
        };

        tracing::info!(
            "Player {} requested booking {} on court {}",
            player_id,
            booking.id,
            validated.court.id
        );

        NotificationService::new(self.db, self.email)
            .booking_requested(user.id, &booking, &validated.court)
            .await;

        Ok(BookingWithCourt {
            booking,
            court_name: validated.court.name,
        })
    }

    /// Confirms a pending booking on one of the owner's courts.
    pub async fn approve(
        &self,
        owner_id: i32,
        booking_id: i32,
        now: DateTime<Utc>,
    ) -> Result<BookingWithCourt, AppError> {
        let (_, court) = RuleEngine::new(self.db)
            .validate_booking_approval(booking_id, owner_id, now.date_naive())
            .await?;

        let Some(booking) = BookingRepository::new(self.db)
            .update_status(booking_id, &[BookingStatus::Pending], BookingStatus::Confirmed, None)
            .await?
        else {
            return Err(self.status_moved(booking_id, RuleViolation::AlreadyDecided).await);
        };

        NotificationService::new(self.db, self.email)
            .booking_status_changed(owner_id, &booking, &court)
            .await;

        Ok(BookingWithCourt {
            booking,
            court_name: court.name,
        })
    }

    /// Rejects a pending booking on one of the owner's courts.
    pub async fn reject(
        &self,
        owner_id: i32,
        booking_id: i32,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<BookingWithCourt, AppError> {
        let (_, court) = RuleEngine::new(self.db)
            .validate_booking_approval(booking_id, owner_id, now.date_naive())
            .await?;

        let Some(booking) = BookingRepository::new(self.db)
            .update_status(
                booking_id,
                &[BookingStatus::Pending],
                BookingStatus::Rejected,
                non_empty(reason),
            )
            .await?
        else {
            return Err(self.status_moved(booking_id, RuleViolation::AlreadyDecided).await);
        };

        NotificationService::new(self.db, self.email)
            .booking_status_changed(owner_id, &booking, &court)
            .await;

        Ok(BookingWithCourt {
            booking,
            court_name: court.name,
        })
    }

    /// Cancels a booking on behalf of its player, the court owner or an admin.
    ///
    /// # Arguments
    /// - `user` - Acting user
    /// - `player_id` - Acting user's player profile, if any
    pub async fn cancel(
        &self,
        user: &User,
        player_id: Option<i32>,
        booking_id: i32,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<BookingWithCourt, AppError> {
        let (_, court) = RuleEngine::new(self.db)
            .validate_booking_cancellation(booking_id, user, player_id, now)
            .await?;

        let Some(booking) = BookingRepository::new(self.db)
            .update_status(
                booking_id,
                &[BookingStatus::Pending, BookingStatus::Confirmed],
                BookingStatus::Cancelled,
                non_empty(reason),
            )
            .await?
        else {
            return Err(self.status_moved(booking_id, RuleViolation::NotCancellable).await);
        };

        tracing::info!("User {} cancelled booking {}", user.id, booking_id);

        NotificationService::new(self.db, self.email)
            .booking_status_changed(user.id, &booking, &court)
            .await;

        Ok(BookingWithCourt {
            booking,
            court_name: court.name,
        })
    }

    /// Error for a status update that found the booking already moved on.
    async fn status_moved(
        &self,
        booking_id: i32,
        violation: fn(String) -> RuleViolation,
    ) -> AppError {
        match BookingRepository::new(self.db).find_by_id(booking_id).await {
            Ok(Some(current)) => violation(current.status.as_str().to_string()).into(),
            Ok(None) => RuleViolation::BookingNotFound.into(),
            Err(e) => e.into(),
        }
    }

    /// Bookings the player made or partners in, optionally bounded by date.
    pub async fn list_for_player(
        &self,
        player_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<BookingWithCourt>, AppError> {
        Ok(BookingRepository::new(self.db)
            .get_for_player(player_id, from, to)
            .await?)
    }

    /// Bookings on the owner's courts, optionally filtered by status and date.
    pub async fn list_for_owner(
        &self,
        owner_id: i32,
        status: Option<BookingStatus>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<BookingWithCourt>, AppError> {
        Ok(BookingRepository::new(self.db)
            .get_for_owner(owner_id, status, from, to)
            .await?)
    }

    /// Calendar of a player's bookings and open shared booking proposals.
    ///
    /// Expired and cancelled proposals are left out, as are confirmed ones since their
    /// final booking is already listed.
    pub async fn player_calendar(
        &self,
        player_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        let bookings = BookingRepository::new(self.db)
            .get_for_player(player_id, Some(from), Some(to))
            .await?;

        let mut events: Vec<CalendarEvent> = bookings.into_iter().map(booking_event).collect();

        let proposals = SharedBookingRepository::new(self.db)
            .get_for_player(player_id, false)
            .await?;
        events.extend(
            proposals
                .into_iter()
                .filter(|p| {
                    p.status.is_pending() || p.status == SharedBookingStatus::Accepted
                })
                .filter(|p| p.booking_date >= from && p.booking_date <= to)
                .map(|p| CalendarEvent {
                    id: p.id,
                    kind: "shared_booking",
                    title: "Shared booking proposal".to_string(),
                    start: p.booking_date.and_time(p.start_time),
                    end: p.booking_date.and_time(p.end_time),
                    status: p.status.as_str().to_string(),
                    color: PROPOSAL_COLOR,
                }),
        );

        events.sort_by(|a, b| a.start.cmp(&b.start).then(a.id.cmp(&b.id)));
        Ok(events)
    }

    /// Calendar of bookings on the owner's courts.
    pub async fn owner_calendar(
        &self,
        owner_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        let bookings = BookingRepository::new(self.db)
            .get_for_owner(owner_id, None, Some(from), Some(to))
            .await?;

        Ok(bookings.into_iter().map(booking_event).collect())
    }
}

fn booking_event(row: BookingWithCourt) -> CalendarEvent {
    let booking = row.booking;
    CalendarEvent {
        id: booking.id,
        kind: "booking",
        title: row.court_name,
        start: booking.start_datetime(),
        end: booking.end_datetime(),
        status: booking.status.as_str().to_string(),
        color: booking.status.color(),
    }
}

fn non_empty(reason: Option<String>) -> Option<String> {
    reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{
        data::message::MessageRepository,
        model::{player::Player, user::Role},
    };
    use chrono::Duration;
    use test_utils::{builder::TestBuilder, factory};

    struct Fixture {
        owner: User,
        player_user: User,
        player: Player,
        court_id: i32,
    }

    async fn fixture(db: &DatabaseConnection) -> Result<Fixture, AppError> {
        let (owner, court) = factory::court::create_court_with_owner(db).await?;
        let (player_user, player) = factory::player::create_player(db).await?;

        Ok(Fixture {
            owner: User::from_entity(owner)?,
            player_user: User::from_entity(player_user)?,
            player: Player::from_entity(player)?,
            court_id: court.id,
        })
    }

    fn request(court_id: i32, days: i64, start: &str, end: &str) -> BookingRequest {
        BookingRequest {
            court_id,
            booking_date: (Utc::now() + Duration::days(days))
                .date_naive()
                .format("%Y-%m-%d")
                .to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            notes: None,
        }
    }

    /// Tests requesting a booking computes its cost and notifies the owner.
    ///
    /// Expected: Ok with a pending booking costing 75.0 and one unread message for the owner
    #[tokio::test]
    async fn request_booking_notifies_owner() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let f = fixture(db).await?;
        let email = EmailService::disabled(reqwest::Client::new());

        let booking = BookingService::new(db, &email)
            .request_booking(
                &f.player_user,
                f.player.id,
                request(f.court_id, 3, "09:00", "10:30"),
                Utc::now(),
            )
            .await?;

        assert_eq!(booking.booking.status, BookingStatus::Pending);
        assert_eq!(booking.booking.total_cost, 75.0);
        assert_eq!(MessageRepository::new(db).count_unread(f.owner.id).await?, 1);

        Ok(())
    }

    /// Tests that a second overlapping request is refused with the first slot's times.
    ///
    /// Expected: Err(SlotConflict 09:00-10:30)
    #[tokio::test]
    async fn refuses_overlapping_request() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let f = fixture(db).await?;
        let email = EmailService::disabled(reqwest::Client::new());
        let service = BookingService::new(db, &email);

        service
            .request_booking(&f.player_user, f.player.id, request(f.court_id, 3, "09:00", "10:30"), Utc::now())
            .await?;
        let result = service
            .request_booking(&f.player_user, f.player.id, request(f.court_id, 3, "10:00", "11:00"), Utc::now())
            .await;

        match result {
            Err(AppError::RuleErr(violation)) => assert_eq!(
                violation.to_string(),
                "Time slot conflicts with existing booking from 09:00 to 10:30"
            ),
            other => panic!("expected slot conflict, got {:?}", other.map(|b| b.booking.id)),
        }

        Ok(())
    }

    /// Tests the approve and cancel lifecycle with ownership checks.
    ///
    /// Expected: another owner is refused, the court owner confirms, the player cancels
    #[tokio::test]
    async fn approve_then_cancel() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let f = fixture(db).await?;
        let other_owner = factory::user::create_owner(db).await?;
        let email = EmailService::disabled(reqwest::Client::new());
        let service = BookingService::new(db, &email);
        let now = Utc::now();

        let booking = service
            .request_booking(&f.player_user, f.player.id, request(f.court_id, 5, "18:00", "19:00"), now)
            .await?;

        let result = service.approve(other_owner.id, booking.booking.id, now).await;
        assert!(matches!(
            result,
            Err(AppError::RuleErr(RuleViolation::NotAuthorizedToApprove))
        ));

        let approved = service.approve(f.owner.id, booking.booking.id, now).await?;
        assert_eq!(approved.booking.status, BookingStatus::Confirmed);

        let again = service.approve(f.owner.id, booking.booking.id, now).await;
        assert!(matches!(
            again,
            Err(AppError::RuleErr(RuleViolation::AlreadyDecided(_)))
        ));

        let cancelled = service
            .cancel(
                &f.player_user,
                Some(f.player.id),
                booking.booking.id,
                Some("  Injured ".to_string()),
                now,
            )
            .await?;
        assert_eq!(cancelled.booking.status, BookingStatus::Cancelled);
        assert_eq!(cancelled.booking.cancellation_reason.as_deref(), Some("Injured"));

        Ok(())
    }

    /// Tests that players need 24 hours notice while admins do not.
    ///
    /// Expected: Err(CancellationNoticeTooShort) for the player, Ok for the admin
    #[tokio::test]
    async fn admin_skips_cancellation_notice() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let f = fixture(db).await?;
        let admin = User::from_entity(factory::user::create_admin(db).await?)?;
        assert_eq!(admin.role, Role::Admin);

        let tonight = factory::booking::BookingFactory::new(db, f.court_id, f.player.id)
            .date(factory::helpers::days_from_today(0))
            .window(factory::helpers::hour(23), factory::helpers::hour(23) + Duration::minutes(59))
            .build()
            .await?;

        let email = EmailService::disabled(reqwest::Client::new());
        let service = BookingService::new(db, &email);

        let result = service
            .cancel(&f.player_user, Some(f.player.id), tonight.id, None, Utc::now())
            .await;
        assert!(matches!(
            result,
            Err(AppError::RuleErr(RuleViolation::CancellationNoticeTooShort))
        ));

        let cancelled = service
            .cancel(&admin, None, tonight.id, None, Utc::now())
            .await?;
        assert_eq!(cancelled.booking.status, BookingStatus::Cancelled);

        Ok(())
    }

    /// Tests the player calendar merges bookings and open proposals in date order.
    ///
    /// Expected: booking event followed by proposal event
    #[tokio::test]
    async fn player_calendar_includes_proposals() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let f = fixture(db).await?;
        let (_, partner) = factory::player::create_player(db).await?;

        factory::booking::create_booking(db, f.court_id, f.player.id).await?;
        factory::shared_booking::create_shared_booking(db, partner.id, f.player.id, f.court_id)
            .await?;

        let email = EmailService::disabled(reqwest::Client::new());
        let events = BookingService::new(db, &email)
            .player_calendar(
                f.player.id,
                factory::helpers::days_from_today(0),
                factory::helpers::days_from_today(7),
            )
            .await?;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, "booking");
        assert_eq!(events[0].color, BookingStatus::Pending.color());
        assert_eq!(events[1].kind, "shared_booking");

        Ok(())
    }

    /// Tests an approval racing a rejection of the same pending booking.
    ///
    /// Expected: exactly one decision lands; the other reports the booking already decided
    #[tokio::test]
    async fn concurrent_decisions_apply_once() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let f = fixture(db).await?;
        let email = EmailService::disabled(reqwest::Client::new());
        let service = BookingService::new(db, &email);
        let now = Utc::now();

        let booking = service
            .request_booking(&f.player_user, f.player.id, request(f.court_id, 4, "12:00", "13:00"), now)
            .await?;
        let id = booking.booking.id;

        let (approved, rejected) = tokio::join!(
            service.approve(f.owner.id, id, now),
            service.reject(f.owner.id, id, Some("Court closed".to_string()), now)
        );

        let stored = BookingRepository::new(db).find_by_id(id).await?.unwrap();
        match (approved, rejected) {
            (Ok(_), Err(AppError::RuleErr(RuleViolation::AlreadyDecided(status)))) => {
                assert_eq!(status, "confirmed");
                assert_eq!(stored.status, BookingStatus::Confirmed);
                assert!(stored.rejection_reason.is_none());
            }
            (Err(AppError::RuleErr(RuleViolation::AlreadyDecided(status))), Ok(_)) => {
                assert_eq!(status, "rejected");
                assert_eq!(stored.status, BookingStatus::Rejected);
                assert!(stored.approved_at.is_none());
            }
            (a, r) => panic!(
                "expected one decision, got {:?} and {:?}",
                a.map(|b| b.booking.status),
                r.map(|b| b.booking.status)
            ),
        }

        Ok(())
    }
}
