//! Court listings, owner court management and slot availability.

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{booking::BookingRepository, court::CourtRepository},
    error::{auth::AuthError, rule::RuleViolation, AppError},
    model::court::{
        Court, CourtFilter, CreateCourtParam, SlotAlternative, TimeSlot, UpdateCourtParam,
    },
    service::{
        geo::Geocoder,
        pricing::{alternative_slots, available_slots},
        rule::{check_court_fields, RuleEngine, MAX_BOOKING_DURATION_HOURS},
    },
    util::parse::{parse_date, parse_slot},
};

pub struct CourtService<'a> {
    db: &'a DatabaseConnection,
    geocoder: &'a Geocoder,
}

impl<'a> CourtService<'a> {
    pub fn new(db: &'a DatabaseConnection, geocoder: &'a Geocoder) -> Self {
        Self { db, geocoder }
    }

    /// Creates a court for an owner after running the court creation rules.
    ///
    /// The location is geocoded when a provider is configured; a failed lookup leaves the
    /// court without coordinates.
    ///
    /// # Returns
    /// - `Ok(Court)` - The stored court
    /// - `Err(AppError::RuleErr)` - First failing court rule
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn create(&self, mut param: CreateCourtParam) -> Result<Court, AppError> {
        RuleEngine::new(self.db)
            .validate_court_creation(
                param.owner_id,
                &param.name,
                &param.location,
                param.hourly_rate,
                param.opening_time,
                param.closing_time,
            )
            .await?;

        if param.coordinates.is_none() {
            param.coordinates = self.geocoder.geocode_or_none(&param.location).await;
        }

        let court = CourtRepository::new(self.db).create(param).await?;
        tracing::info!("Owner {} created court {}", court.owner_id, court.id);

        Ok(court)
    }

    /// Applies edits to one of the owner's courts.
    ///
    /// The merged court is re-checked against the field rules and the name must stay unique
    /// among the owner's courts. A changed location is geocoded again.
    ///
    /// # Returns
    /// - `Ok(Court)` - The updated court
    /// - `Err(AppError::NotFound)` - No court with that ID
    /// - `Err(AppError::AuthErr)` - Court belongs to another owner
    /// - `Err(AppError::RuleErr)` - Edit breaks a court rule
    pub async fn update(
        &self,
        owner_id: i32,
        court_id: i32,
        mut param: UpdateCourtParam,
    ) -> Result<Court, AppError> {
        let repo = CourtRepository::new(self.db);
        let court = self.owned(owner_id, court_id).await?;

        let name = param.name.as_deref().unwrap_or(&court.name);
        let location = param.location.as_deref().unwrap_or(&court.location);
        check_court_fields(
            name,
            location,
            param.hourly_rate.unwrap_or(court.hourly_rate),
            param.opening_time.unwrap_or(court.opening_time),
            param.closing_time.unwrap_or(court.closing_time),
        )?;

        if param.name.is_some()
            && repo
                .name_exists_for_owner(owner_id, name.trim(), Some(court.id))
                .await?
        {
            return Err(RuleViolation::DuplicateCourtName.into());
        }

        if let Some(location) = param.location.as_deref() {
            if location != court.location {
                param.coordinates = Some(self.geocoder.geocode_or_none(location).await);
            }
        }

        repo.update(court.id, param)
            .await?
            .ok_or_else(court_not_found)
    }

    /// Gets an active court, or any court for its owner and admins.
    pub async fn get(&self, court_id: i32, include_inactive: bool) -> Result<Court, AppError> {
        CourtRepository::new(self.db)
            .find_by_id(court_id)
            .await?
            .filter(|c| include_inactive || c.is_active)
            .ok_or_else(court_not_found)
    }

    pub async fn list_for_owner(&self, owner_id: i32) -> Result<Vec<Court>, AppError> {
        Ok(CourtRepository::new(self.db).get_by_owner(owner_id).await?)
    }

    /// Active courts matching the filter, cheapest first.
    pub async fn search(&self, filter: &CourtFilter) -> Result<Vec<Court>, AppError> {
        Ok(CourtRepository::new(self.db).search(filter, true).await?)
    }

    /// Free slots of a court on a date with their dynamic prices.
    ///
    /// # Arguments
    /// - `court_id` - Active court
    /// - `date` - Raw `YYYY-MM-DD` date
    /// - `duration_hours` - Slot length, 1 through `MAX_BOOKING_DURATION_HOURS`
    ///
    /// # Returns
    /// - `Ok((NaiveDate, Vec<TimeSlot>))` - Parsed date and its free slots
    /// - `Err(AppError::NotFound)` - Unknown or inactive court
    /// - `Err(AppError::BadRequest)` - Duration out of range
    /// - `Err(AppError::RuleErr)` - Malformed date
    pub async fn availability(
        &self,
        court_id: i32,
        date: &str,
        duration_hours: u32,
    ) -> Result<(NaiveDate, Vec<TimeSlot>), AppError> {
        if duration_hours == 0 || duration_hours as i64 > MAX_BOOKING_DURATION_HOURS {
            return Err(AppError::BadRequest(format!(
                "Duration must be between 1 and {} hours",
                MAX_BOOKING_DURATION_HOURS
            )));
        }

        let date = parse_date(date)?;
        let court = self.get(court_id, false).await?;
        let booked = BookingRepository::new(self.db)
            .get_blocking_for_court(court.id, date)
            .await?;

        let slots = available_slots(
            date,
            court.opening_time,
            court.closing_time,
            court.hourly_rate,
            duration_hours,
            &booked,
        );

        Ok((date, slots))
    }

    /// Free slots near a requested slot, for when the request conflicts with a booking.
    ///
    /// # Arguments
    /// - `court_id` - Active court
    /// - `date` / `start_time` / `end_time` - Raw `YYYY-MM-DD` and `HH:MM` strings of the
    ///   requested slot
    ///
    /// # Returns
    /// - `Ok((NaiveDate, Vec<SlotAlternative>))` - Parsed date and up to three alternatives
    /// - `Err(AppError::NotFound)` - Unknown or inactive court
    /// - `Err(AppError::RuleErr)` - Malformed date or time, or end not after start
    pub async fn alternatives(
        &self,
        court_id: i32,
        date: &str,
        start_time: &str,
        end_time: &str,
    ) -> Result<(NaiveDate, Vec<SlotAlternative>), AppError> {
        let (date, start_time, end_time) = parse_slot(date, start_time, end_time)?;
        if end_time <= start_time {
            return Err(RuleViolation::StartNotBeforeEnd.into());
        }

        let court = self.get(court_id, false).await?;
        let booked = BookingRepository::new(self.db)
            .get_blocking_for_court(court.id, date)
            .await?;

        let alternatives = alternative_slots(
            date,
            court.opening_time,
            court.closing_time,
            court.hourly_rate,
            start_time,
            end_time,
            &booked,
        );

        Ok((date, alternatives))
    }

    async fn owned(&self, owner_id: i32, court_id: i32) -> Result<Court, AppError> {
        let court = self.get(court_id, true).await?;
        if court.owner_id != owner_id {
            return Err(AuthError::AccessDenied(
                owner_id,
                format!("court {} belongs to owner {}", court.id, court.owner_id),
            )
            .into());
        }

        Ok(court)
    }
}

fn court_not_found() -> AppError {
    AppError::NotFound("Court not found".to_string())
}
