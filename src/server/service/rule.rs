//! Business rule engine.
//!
//! Every rule set is a fixed sequence of independent checks that stops at the first failure
//! and reports it as a `RuleViolation`. Checks that need no database access are plain
//! functions so they can be tested in isolation; `RuleEngine` runs the full sequences and
//! loads whatever rows the checks need.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sea_orm::DatabaseConnection;
use std::str::FromStr;

use crate::server::{
    data::{
        booking::BookingRepository, court::CourtRepository, message::MessageRepository,
        player::PlayerRepository, user::UserRepository,
    },
    error::{rule::RuleViolation, AppError},
    model::{
        booking::{Booking, BookingStatus},
        court::Court,
        player::{Player, SkillLevel},
        user::{Role, User},
    },
    util::parse::{parse_slot, round2},
};

pub const MAX_COURTS_PER_OWNER: u64 = 10;
pub const MAX_BOOKING_DURATION_HOURS: i64 = 4;
pub const MIN_BOOKING_DURATION_MINUTES: i64 = 60;
pub const CANCELLATION_NOTICE_HOURS: i64 = 24;
pub const MAX_ADVANCE_BOOKING_DAYS: i64 = 30;
pub const MIN_HOURLY_RATE: f64 = 10.0;
pub const MAX_HOURLY_RATE: f64 = 500.0;
pub const MAX_MESSAGE_LENGTH: usize = 1000;
/// Messages one sender may send within `MESSAGE_RATE_WINDOW_MINUTES`.
pub const MESSAGE_RATE_LIMIT: u64 = 50;
pub const MESSAGE_RATE_WINDOW_MINUTES: i64 = 60;
pub const MAX_SKILL_LEVEL_DIFFERENCE: i32 = 1;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MIN_COURT_NAME_LENGTH: usize = 3;
pub const MIN_LOCATION_LENGTH: usize = 5;

/// Opening time used when a court has none configured.
pub fn default_opening_time() -> NaiveTime {
    NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Closing time used when a court has none configured.
pub fn default_closing_time() -> NaiveTime {
    NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// A booking request that passed every check, with the rows the checks loaded.
#[derive(Debug, Clone)]
pub struct ValidatedBooking {
    pub court: Court,
    pub player: Player,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_cost: f64,
}

/// Booking cost for a slot at an hourly rate, rounded to cents.
pub fn booking_cost(hourly_rate: f64, start_time: NaiveTime, end_time: NaiveTime) -> f64 {
    let minutes = (end_time - start_time).num_minutes() as f64;
    round2(hourly_rate * minutes / 60.0)
}

/// Checks the date window and duration of a booking, steps 4 to 8 of booking validation.
pub fn check_booking_window(
    today: NaiveDate,
    booking_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<(), RuleViolation> {
    if booking_date < today {
        return Err(RuleViolation::PastDate);
    }
    if booking_date > today + Duration::days(MAX_ADVANCE_BOOKING_DAYS) {
        return Err(RuleViolation::TooFarInAdvance);
    }
    if start_time >= end_time {
        return Err(RuleViolation::StartNotBeforeEnd);
    }

    let minutes = (end_time - start_time).num_minutes();
    if minutes < MIN_BOOKING_DURATION_MINUTES {
        return Err(RuleViolation::DurationTooShort);
    }
    if minutes > MAX_BOOKING_DURATION_HOURS * 60 {
        return Err(RuleViolation::DurationTooLong);
    }

    Ok(())
}

/// Checks a slot lies within operating hours.
pub fn check_operating_hours(
    start_time: NaiveTime,
    end_time: NaiveTime,
    opening_time: NaiveTime,
    closing_time: NaiveTime,
) -> Result<(), RuleViolation> {
    if start_time < opening_time {
        return Err(RuleViolation::BeforeOpening(opening_time));
    }
    if end_time > closing_time {
        return Err(RuleViolation::AfterClosing(closing_time));
    }

    Ok(())
}

/// Checks a booking starts far enough in the future to be cancelled.
pub fn check_cancellation_notice(
    now: NaiveDateTime,
    booking_start: NaiveDateTime,
) -> Result<(), RuleViolation> {
    if booking_start <= now + Duration::hours(CANCELLATION_NOTICE_HOURS) {
        return Err(RuleViolation::CancellationNoticeTooShort);
    }

    Ok(())
}

/// Checks the court fields that need no database access, in creation order.
pub fn check_court_fields(
    name: &str,
    location: &str,
    hourly_rate: f64,
    opening_time: NaiveTime,
    closing_time: NaiveTime,
) -> Result<(), RuleViolation> {
    if !(MIN_HOURLY_RATE..=MAX_HOURLY_RATE).contains(&hourly_rate) {
        return Err(RuleViolation::HourlyRateOutOfRange);
    }
    if name.trim().chars().count() < MIN_COURT_NAME_LENGTH {
        return Err(RuleViolation::CourtNameTooShort);
    }
    if location.trim().chars().count() < MIN_LOCATION_LENGTH {
        return Err(RuleViolation::LocationTooShort);
    }
    if closing_time <= opening_time {
        return Err(RuleViolation::InvalidOperatingHours);
    }

    Ok(())
}

/// At least `MIN_PASSWORD_LENGTH` characters with a letter and a digit.
pub fn check_password(password: &str) -> Result<(), RuleViolation> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LENGTH;
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_letter && has_digit {
        Ok(())
    } else {
        Err(RuleViolation::WeakPassword)
    }
}

/// Checks message content and returns it trimmed.
pub fn check_message_content(content: &str) -> Result<&str, RuleViolation> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(RuleViolation::EmptyMessage);
    }
    if content.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(RuleViolation::MessageTooLong);
    }

    Ok(trimmed)
}

/// Runs the rule sets that need database lookups.
pub struct RuleEngine<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RuleEngine<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates a booking request in the fixed check order.
    ///
    /// # Arguments
    /// - `court_id` - Court to book
    /// - `player_id` - Player profile making the booking
    /// - `booking_date` / `start_time` / `end_time` - Raw `YYYY-MM-DD` and `HH:MM` strings
    /// - `now` - Current time; its date is "today"
    ///
    /// # Returns
    /// - `Ok(ValidatedBooking)` - All checks passed
    /// - `Err(AppError::RuleErr)` - First failing check
    /// - `Err(AppError::DbErr)` - Database error during a lookup
    pub async fn validate_booking(
        &self,
        court_id: i32,
        player_id: i32,
        booking_date: &str,
        start_time: &str,
        end_time: &str,
        now: DateTime<Utc>,
    ) -> Result<ValidatedBooking, AppError> {
        let (booking_date, start_time, end_time) = parse_slot(booking_date, start_time, end_time)?;

        let court = CourtRepository::new(self.db)
            .find_by_id(court_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or(RuleViolation::CourtNotAvailable)?;

        let player = PlayerRepository::new(self.db)
            .find_by_id(player_id)
            .await?
            .ok_or(RuleViolation::PlayerNotFound)?;

        check_booking_window(now.date_naive(), booking_date, start_time, end_time)?;
        check_operating_hours(start_time, end_time, court.opening_time, court.closing_time)?;

        if let Some(conflict) = BookingRepository::new(self.db)
            .find_conflict(court.id, booking_date, start_time, end_time, None)
            .await?
        {
            return Err(RuleViolation::SlotConflict {
                start: conflict.start_time,
                end: conflict.end_time,
            }
            .into());
        }

        if court.owner_id == player.user_id {
            return Err(RuleViolation::OwnCourt.into());
        }

        let total_cost = booking_cost(court.hourly_rate, start_time, end_time);

        Ok(ValidatedBooking {
            court,
            player,
            booking_date,
            start_time,
            end_time,
            total_cost,
        })
    }

    /// Validates that an owner may approve or reject a booking.
    ///
    /// # Returns
    /// - `Ok((Booking, Court))` - The pending booking and its court
    /// - `Err(AppError::RuleErr)` - Missing booking, foreign court, decided or past booking
    /// - `Err(AppError::DbErr)` - Database error during lookup
    pub async fn validate_booking_approval(
        &self,
        booking_id: i32,
        owner_id: i32,
        today: NaiveDate,
    ) -> Result<(Booking, Court), AppError> {
        let (booking, court) = BookingRepository::new(self.db)
            .find_with_court(booking_id)
            .await?
            .ok_or(RuleViolation::BookingNotFound)?;
        let court = Court::from_entity(court)?;

        if court.owner_id != owner_id {
            return Err(RuleViolation::NotAuthorizedToApprove.into());
        }
        if booking.status != BookingStatus::Pending {
            return Err(RuleViolation::AlreadyDecided(booking.status.as_str().to_string()).into());
        }
        if booking.booking_date < today {
            return Err(RuleViolation::ApprovalForPastDate.into());
        }

        Ok((booking, court))
    }

    /// Validates that a user may cancel a booking.
    ///
    /// Players may cancel bookings they made or partner in, owners bookings on their courts,
    /// admins any booking. Admins are exempt from the notice period.
    ///
    /// # Arguments
    /// - `user` - Acting user
    /// - `player_id` - Acting user's player profile, if any
    /// - `now` - Current time
    pub async fn validate_booking_cancellation(
        &self,
        booking_id: i32,
        user: &User,
        player_id: Option<i32>,
        now: DateTime<Utc>,
    ) -> Result<(Booking, Court), AppError> {
        let (booking, court) = BookingRepository::new(self.db)
            .find_with_court(booking_id)
            .await?
            .ok_or(RuleViolation::BookingNotFound)?;
        let court = Court::from_entity(court)?;

        let authorized = match user.role {
            Role::Admin => true,
            Role::Owner => court.owner_id == user.id,
            Role::Player => player_id.is_some_and(|id| booking.involves_player(id)),
        };
        if !authorized {
            return Err(RuleViolation::NotAuthorizedToCancel.into());
        }

        if !booking.status.blocks_slot() {
            return Err(RuleViolation::NotCancellable(booking.status.as_str().to_string()).into());
        }

        if user.role != Role::Admin {
            check_cancellation_notice(now.naive_utc(), booking.start_datetime())?;
        }

        Ok((booking, court))
    }

    /// Validates a new court for an owner.
    ///
    /// Order: court limit, duplicate name, rate range, name length, location length,
    /// operating hours.
    pub async fn validate_court_creation(
        &self,
        owner_id: i32,
        name: &str,
        location: &str,
        hourly_rate: f64,
        opening_time: NaiveTime,
        closing_time: NaiveTime,
    ) -> Result<(), AppError> {
        let court_repo = CourtRepository::new(self.db);

        let (total, _) = court_repo.count_by_owner(owner_id).await?;
        if total >= MAX_COURTS_PER_OWNER {
            return Err(RuleViolation::TooManyCourts.into());
        }
        if court_repo
            .name_exists_for_owner(owner_id, name.trim(), None)
            .await?
        {
            return Err(RuleViolation::DuplicateCourtName.into());
        }

        check_court_fields(name, location, hourly_rate, opening_time, closing_time)?;

        Ok(())
    }

    /// Validates a registration and returns the parsed role and skill level.
    ///
    /// # Arguments
    /// - `admin_code_valid` - Whether a valid bootstrap code was presented; admins can only
    ///   register with one
    pub async fn validate_user_registration(
        &self,
        email: &str,
        username: &str,
        role: &str,
        skill_level: Option<&str>,
        password: &str,
        admin_code_valid: bool,
    ) -> Result<(Role, Option<SkillLevel>), AppError> {
        let user_repo = UserRepository::new(self.db);

        if user_repo.email_exists(email).await? {
            return Err(RuleViolation::EmailTaken.into());
        }
        if user_repo.username_exists(username).await? {
            return Err(RuleViolation::UsernameTaken.into());
        }

        let role = Role::from_str(role.trim()).map_err(|_| RuleViolation::InvalidUserType)?;
        if role == Role::Admin && !admin_code_valid {
            return Err(RuleViolation::InvalidAdminCode.into());
        }

        let skill_level = match role {
            Role::Player => Some(
                skill_level
                    .and_then(|s| SkillLevel::from_str(s.trim()).ok())
                    .ok_or(RuleViolation::InvalidSkillLevel)?,
            ),
            _ => None,
        };

        check_password(password)?;

        Ok((role, skill_level))
    }

    /// Validates sending a message to a recipient and returns the trimmed content.
    ///
    /// Order: not to self, non-empty, length, sender active, recipient active, rate limit.
    pub async fn validate_message_sending(
        &self,
        sender_id: i32,
        recipient_id: i32,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        if sender_id == recipient_id {
            return Err(RuleViolation::MessageToSelf.into());
        }

        let content = check_message_content(content)?.to_string();
        self.check_sender(sender_id).await?;

        let recipient = UserRepository::new(self.db).find_by_id(recipient_id).await?;
        if !recipient.is_some_and(|u| u.is_active) {
            return Err(RuleViolation::InvalidRecipient.into());
        }

        self.check_rate(sender_id, now).await?;

        Ok(content)
    }

    /// Validates posting into an existing conversation, where there is no single recipient.
    pub async fn validate_conversation_message(
        &self,
        sender_id: i32,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let content = check_message_content(content)?.to_string();
        self.check_sender(sender_id).await?;
        self.check_rate(sender_id, now).await?;

        Ok(content)
    }

    async fn check_sender(&self, sender_id: i32) -> Result<(), AppError> {
        let sender = UserRepository::new(self.db).find_by_id(sender_id).await?;
        if !sender.is_some_and(|u| u.is_active) {
            return Err(RuleViolation::InvalidSender.into());
        }

        Ok(())
    }

    async fn check_rate(&self, sender_id: i32, now: DateTime<Utc>) -> Result<(), AppError> {
        let recent = MessageRepository::new(self.db)
            .count_sent_since(sender_id, now - Duration::minutes(MESSAGE_RATE_WINDOW_MINUTES))
            .await?;
        if recent >= MESSAGE_RATE_LIMIT {
            return Err(RuleViolation::MessageRateLimited.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{
        builder::TestBuilder,
        factory::{
            self,
            helpers::{days_from_today, hour},
        },
    };

    fn date(days: i64) -> NaiveDate {
        days_from_today(days)
    }

    fn rule_err(result: Result<impl std::fmt::Debug, AppError>) -> RuleViolation {
        match result {
            Err(AppError::RuleErr(violation)) => violation,
            other => panic!("expected rule violation, got {other:?}"),
        }
    }

    #[test]
    fn booking_window_checks_in_order() {
        let today = date(0);

        assert_eq!(
            check_booking_window(today, date(-1), hour(10), hour(11)),
            Err(RuleViolation::PastDate)
        );
        assert_eq!(
            check_booking_window(today, date(31), hour(10), hour(11)),
            Err(RuleViolation::TooFarInAdvance)
        );
        assert_eq!(
            check_booking_window(today, date(1), hour(11), hour(11)),
            Err(RuleViolation::StartNotBeforeEnd)
        );
        assert_eq!(
            check_booking_window(
                today,
                date(1),
                hour(10),
                NaiveTime::from_hms_opt(10, 30, 0).unwrap()
            ),
            Err(RuleViolation::DurationTooShort)
        );
        assert_eq!(
            check_booking_window(today, date(1), hour(8), hour(13)),
            Err(RuleViolation::DurationTooLong)
        );
        assert_eq!(check_booking_window(today, date(30), hour(8), hour(12)), Ok(()));
        assert_eq!(check_booking_window(today, today, hour(8), hour(9)), Ok(()));
    }

    #[test]
    fn operating_hours_report_the_limit() {
        let violation = check_operating_hours(hour(5), hour(7), hour(6), hour(22)).unwrap_err();
        assert_eq!(violation.to_string(), "Booking cannot start before 06:00");

        let violation = check_operating_hours(hour(21), hour(23), hour(6), hour(22)).unwrap_err();
        assert_eq!(violation.to_string(), "Booking cannot end after 22:00");

        assert!(check_operating_hours(hour(6), hour(22), hour(6), hour(22)).is_ok());
    }

    #[test]
    fn cancellation_needs_a_full_day_of_notice() {
        let now = date(0).and_time(hour(12));

        assert_eq!(
            check_cancellation_notice(now, date(1).and_time(hour(12))),
            Err(RuleViolation::CancellationNoticeTooShort)
        );
        assert!(check_cancellation_notice(now, date(1).and_time(hour(13))).is_ok());
    }

    #[test]
    fn court_fields_check_rate_before_names() {
        assert_eq!(
            check_court_fields("A", "Hi", 5.0, hour(6), hour(22)),
            Err(RuleViolation::HourlyRateOutOfRange)
        );
        assert_eq!(
            check_court_fields("A", "Hi", 50.0, hour(6), hour(22)),
            Err(RuleViolation::CourtNameTooShort)
        );
        assert_eq!(
            check_court_fields("Centre", "Hi", 50.0, hour(6), hour(22)),
            Err(RuleViolation::LocationTooShort)
        );
        assert_eq!(
            check_court_fields("Centre", "Tel Aviv", 50.0, hour(22), hour(6)),
            Err(RuleViolation::InvalidOperatingHours)
        );
        assert!(check_court_fields("Centre", "Tel Aviv", 500.0, hour(6), hour(22)).is_ok());
    }

    #[test]
    fn password_needs_length_letter_and_digit() {
        assert!(check_password("short1").is_err());
        assert!(check_password("longpassword").is_err());
        assert!(check_password("12345678").is_err());
        assert!(check_password("tennis2026").is_ok());
    }

    #[test]
    fn message_content_is_trimmed_and_bounded() {
        assert_eq!(check_message_content("   "), Err(RuleViolation::EmptyMessage));
        assert_eq!(
            check_message_content(&"x".repeat(MAX_MESSAGE_LENGTH + 1)),
            Err(RuleViolation::MessageTooLong)
        );
        assert_eq!(check_message_content("  hello "), Ok("hello"));
    }

    #[test]
    fn cost_is_rate_times_hours() {
        assert_eq!(booking_cost(50.0, hour(10), hour(12)), 100.0);
        assert_eq!(
            booking_cost(45.0, hour(10), NaiveTime::from_hms_opt(11, 30, 0).unwrap()),
            67.5
        );
    }

    /// Tests the full booking sequence against stored rows.
    ///
    /// Expected: inactive court, conflict and own-court failures in that order of checks
    #[tokio::test]
    async fn validate_booking_uses_stored_rows() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_booking_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let (owner, court) = factory::create_court_with_owner(db).await?;
        let closed = factory::court::CourtFactory::new(db, owner.id)
            .active(false)
            .build()
            .await?;
        let (_, player) = factory::create_player(db).await?;
        let (_, owner_as_player) = factory::player::PlayerFactory::new(db)
            .user_id(owner.id)
            .build()
            .await?;
        factory::booking::BookingFactory::new(db, court.id, player.id)
            .window(hour(10), hour(12))
            .build()
            .await?;

        let engine = RuleEngine::new(db);
        let now = Utc::now();
        let tomorrow = date(1).format("%Y-%m-%d").to_string();

        assert_eq!(
            rule_err(
                engine
                    .validate_booking(court.id, player.id, "tomorrow", "10:00", "11:00", now)
                    .await
            ),
            RuleViolation::InvalidDateTimeFormat
        );
        assert_eq!(
            rule_err(
                engine
                    .validate_booking(closed.id, player.id, &tomorrow, "10:00", "11:00", now)
                    .await
            ),
            RuleViolation::CourtNotAvailable
        );
        assert_eq!(
            rule_err(
                engine
                    .validate_booking(court.id, 999, &tomorrow, "10:00", "11:00", now)
                    .await
            ),
            RuleViolation::PlayerNotFound
        );
        assert_eq!(
            rule_err(
                engine
                    .validate_booking(court.id, player.id, &tomorrow, "11:00", "13:00", now)
                    .await
            )
            .to_string(),
            "Time slot conflicts with existing booking from 10:00 to 12:00"
        );
        assert_eq!(
            rule_err(
                engine
                    .validate_booking(court.id, owner_as_player.id, &tomorrow, "14:00", "15:00", now)
                    .await
            ),
            RuleViolation::OwnCourt
        );

        let validated = engine
            .validate_booking(court.id, player.id, &tomorrow, "12:00", "14:00", now)
            .await?;
        assert_eq!(validated.total_cost, 100.0);

        Ok(())
    }

    /// Tests registration checks for duplicates, role and skill level.
    ///
    /// Expected: first failing reason for each bad registration
    #[tokio::test]
    async fn validate_user_registration_checks_in_order() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_account_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        factory::user::UserFactory::new(db)
            .username("taken")
            .email("taken@example.com")
            .build()
            .await?;

        let engine = RuleEngine::new(db);

        assert_eq!(
            rule_err(
                engine
                    .validate_user_registration("TAKEN@example.com", "new", "player", Some("beginner"), "tennis2026", false)
                    .await
            ),
            RuleViolation::EmailTaken
        );
        assert_eq!(
            rule_err(
                engine
                    .validate_user_registration("new@example.com", "taken", "player", Some("beginner"), "tennis2026", false)
                    .await
            ),
            RuleViolation::UsernameTaken
        );
        assert_eq!(
            rule_err(
                engine
                    .validate_user_registration("new@example.com", "new", "coach", None, "tennis2026", false)
                    .await
            ),
            RuleViolation::InvalidUserType
        );
        assert_eq!(
            rule_err(
                engine
                    .validate_user_registration("new@example.com", "new", "admin", None, "tennis2026", false)
                    .await
            ),
            RuleViolation::InvalidAdminCode
        );
        assert_eq!(
            rule_err(
                engine
                    .validate_user_registration("new@example.com", "new", "player", Some("expert"), "tennis2026", false)
                    .await
            ),
            RuleViolation::InvalidSkillLevel
        );

        let (role, skill) = engine
            .validate_user_registration("new@example.com", "new", "owner", None, "tennis2026", false)
            .await?;
        assert_eq!(role, Role::Owner);
        assert_eq!(skill, None);

        Ok(())
    }

    /// Tests message rule order around the recipient and the rate limit.
    ///
    /// Expected: an inactive recipient is reported before the sender's rate limit
    #[tokio::test]
    async fn message_recipient_checked_before_rate_limit() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let engine = RuleEngine::new(db);
        let now = Utc::now();

        let sender = factory::create_user(db).await?;
        let friend = factory::create_user(db).await?;
        let inactive = factory::user::UserFactory::new(db).active(false).build().await?;

        let conversation = factory::create_direct_conversation(db, sender.id, friend.id).await?;
        for i in 0..MESSAGE_RATE_LIMIT {
            factory::create_message(db, conversation.id, sender.id, &format!("rally {i}")).await?;
        }

        assert_eq!(
            rule_err(
                engine
                    .validate_message_sending(sender.id, inactive.id, "hello", now)
                    .await
            ),
            RuleViolation::InvalidRecipient
        );
        assert_eq!(
            rule_err(
                engine
                    .validate_message_sending(sender.id, friend.id, "hello", now)
                    .await
            ),
            RuleViolation::MessageRateLimited
        );

        Ok(())
    }
}
