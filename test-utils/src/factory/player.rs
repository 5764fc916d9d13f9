//! Player factory for creating player profiles together with their user.

use crate::factory::user::UserFactory;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr, EntityTrait};

/// Factory for creating test players with customizable profile fields.
///
/// A player-role user is created first unless `user_id` is supplied.
///
/// # Example
///
/// ```rust,ignore
/// let (user, player) = PlayerFactory::new(&db)
///     .skill_level("advanced")
///     .coordinates(32.08, 34.78)
///     .build()
///     .await?;
/// ```
pub struct PlayerFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: Option<i32>,
    active: bool,
    skill_level: String,
    preferred_location: Option<String>,
    availability: Option<String>,
    preferred_court_type: Option<String>,
    max_travel_distance: i32,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl<'a> PlayerFactory<'a> {
    /// Creates a new PlayerFactory with default values.
    ///
    /// Defaults:
    /// - skill_level: `"intermediate"`
    /// - preferred_location: `"Tel Aviv"`
    /// - availability: `"weekends"`
    /// - max_travel_distance: `25`
    /// - no coordinates
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            user_id: None,
            active: true,
            skill_level: "intermediate".to_string(),
            preferred_location: Some("Tel Aviv".to_string()),
            availability: Some("weekends".to_string()),
            preferred_court_type: None,
            max_travel_distance: 25,
            latitude: None,
            longitude: None,
        }
    }

    /// Attaches the profile to an existing user instead of creating one.
    pub fn user_id(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Sets whether the created user account is active.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Sets the skill level name.
    pub fn skill_level(mut self, skill_level: impl Into<String>) -> Self {
        self.skill_level = skill_level.into();
        self
    }

    /// Sets the preferred location text.
    pub fn preferred_location(mut self, location: impl Into<String>) -> Self {
        self.preferred_location = Some(location.into());
        self
    }

    /// Sets the availability preference.
    pub fn availability(mut self, availability: impl Into<String>) -> Self {
        self.availability = Some(availability.into());
        self
    }

    /// Sets the preferred court type or surface.
    pub fn preferred_court_type(mut self, court_type: impl Into<String>) -> Self {
        self.preferred_court_type = Some(court_type.into());
        self
    }

    /// Sets the maximum travel distance in kilometres.
    pub fn max_travel_distance(mut self, km: i32) -> Self {
        self.max_travel_distance = km;
        self
    }

    /// Sets geographic coordinates.
    pub fn coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Builds and inserts the user (when needed) and the player profile.
    ///
    /// # Returns
    /// - `Ok((user, player))` - The owning user and the created profile
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(
        self,
    ) -> Result<(entity::user::Model, entity::player::Model), DbErr> {
        let user = match self.user_id {
            Some(user_id) => entity::prelude::User::find_by_id(user_id)
                    .one(self.db)
                    .await?
                .ok_or_else(|| DbErr::RecordNotFound(format!("user {}", user_id)))?,
            None => UserFactory::new(self.db).active(self.active).build().await?,
        };

        let player = entity::player::ActiveModel {
            user_id: ActiveValue::Set(user.id),
            skill_level: ActiveValue::Set(self.skill_level),
            preferred_location: ActiveValue::Set(self.preferred_location),
            availability: ActiveValue::Set(self.availability),
            bio: ActiveValue::Set(None),
            preferred_court_type: ActiveValue::Set(self.preferred_court_type),
            max_travel_distance: ActiveValue::Set(self.max_travel_distance),
            is_looking_for_partner: ActiveValue::Set(true),
            latitude: ActiveValue::Set(self.latitude),
            longitude: ActiveValue::Set(self.longitude),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok((user, player))
    }
}

/// Creates a player and its user with default values.
pub async fn create_player(
    db: &DatabaseConnection,
) -> Result<(entity::user::Model, entity::player::Model), DbErr> {
    PlayerFactory::new(db).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;

    #[tokio::test]
    async fn creates_player_with_user() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_account_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let (user, player) = create_player(db).await?;

        assert_eq!(player.user_id, user.id);
        assert_eq!(player.skill_level, "intermediate");
        assert_eq!(player.max_travel_distance, 25);

        Ok(())
    }
}
