//! Court factory for creating test courts.

use crate::factory::{
    helpers::{hour, next_id},
    user::create_owner,
};
use chrono::{NaiveTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test courts with customizable fields.
pub struct CourtFactory<'a> {
    db: &'a DatabaseConnection,
    owner_id: i32,
    name: String,
    location: String,
    court_type: String,
    surface: String,
    hourly_rate: f64,
    opening_time: NaiveTime,
    closing_time: NaiveTime,
    latitude: Option<f64>,
    longitude: Option<f64>,
    has_lighting: bool,
    has_parking: bool,
    is_active: bool,
}

impl<'a> CourtFactory<'a> {
    /// Creates a new CourtFactory with default values.
    ///
    /// Defaults:
    /// - name: `"Court {id}"`
    /// - location: `"Tel Aviv"`
    /// - outdoor hard court at 50.0 per hour
    /// - open 06:00-22:00, active, no coordinates
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `owner_id` - User ID of the owning court owner
    pub fn new(db: &'a DatabaseConnection, owner_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            owner_id,
            name: format!("Court {}", id),
            location: "Tel Aviv".to_string(),
            court_type: "outdoor".to_string(),
            surface: "hard".to_string(),
            hourly_rate: 50.0,
            opening_time: hour(6),
            closing_time: hour(22),
            latitude: None,
            longitude: None,
            has_lighting: false,
            has_parking: false,
            is_active: true,
        }
    }

    /// Sets the court name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the location text.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Sets the court type (`indoor` or `outdoor`).
    pub fn court_type(mut self, court_type: impl Into<String>) -> Self {
        self.court_type = court_type.into();
        self
    }

    /// Sets the surface.
    pub fn surface(mut self, surface: impl Into<String>) -> Self {
        self.surface = surface.into();
        self
    }

    /// Sets the hourly rate.
    pub fn hourly_rate(mut self, hourly_rate: f64) -> Self {
        self.hourly_rate = hourly_rate;
        self
    }

    /// Sets operating hours.
    pub fn hours(mut self, opening_time: NaiveTime, closing_time: NaiveTime) -> Self {
        self.opening_time = opening_time;
        self.closing_time = closing_time;
        self
    }

    /// Sets geographic coordinates.
    pub fn coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Sets lighting and parking amenities.
    pub fn amenities(mut self, has_lighting: bool, has_parking: bool) -> Self {
        self.has_lighting = has_lighting;
        self.has_parking = has_parking;
        self
    }

    /// Sets whether the court is active.
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Builds and inserts the court entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::court::Model)` - Created court entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::court::Model, DbErr> {
        let now = Utc::now();
        entity::court::ActiveModel {
            owner_id: ActiveValue::Set(self.owner_id),
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set(None),
            location: ActiveValue::Set(self.location),
            address: ActiveValue::Set(None),
            latitude: ActiveValue::Set(self.latitude),
            longitude: ActiveValue::Set(self.longitude),
            court_type: ActiveValue::Set(self.court_type),
            surface: ActiveValue::Set(self.surface),
            hourly_rate: ActiveValue::Set(self.hourly_rate),
            opening_time: ActiveValue::Set(self.opening_time),
            closing_time: ActiveValue::Set(self.closing_time),
            has_lighting: ActiveValue::Set(self.has_lighting),
            has_parking: ActiveValue::Set(self.has_parking),
            has_equipment_rental: ActiveValue::Set(false),
            has_changing_rooms: ActiveValue::Set(false),
            is_active: ActiveValue::Set(self.is_active),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a court with default values for an existing owner.
pub async fn create_court(
    db: &DatabaseConnection,
    owner_id: i32,
) -> Result<entity::court::Model, DbErr> {
    CourtFactory::new(db, owner_id).build().await
}

/// Creates an owner user and a default court belonging to it.
pub async fn create_court_with_owner(
    db: &DatabaseConnection,
) -> Result<(entity::user::Model, entity::court::Model), DbErr> {
    let owner = create_owner(db).await?;
    let court = create_court(db, owner.id).await?;
    Ok((owner, court))
}
