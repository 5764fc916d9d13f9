//! Self-service profile edits.

use sea_orm::DatabaseConnection;

use crate::server::{
    data::{player::PlayerRepository, user::UserRepository},
    error::{auth::AuthError, AppError},
    model::{
        player::{Player, UpdatePlayerParam},
        user::{UpdateUserParam, User},
    },
    service::geo::Geocoder,
};

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
    geocoder: &'a Geocoder,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a DatabaseConnection, geocoder: &'a Geocoder) -> Self {
        Self { db, geocoder }
    }

    /// Updates the account fields of a user.
    ///
    /// # Returns
    /// - `Ok(User)` - Updated user
    /// - `Err(AppError::AuthErr(UserNotInDatabase))` - User was deleted mid-session
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn update_user(&self, user_id: i32, param: UpdateUserParam) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .update_profile(user_id, param)
            .await?
            .ok_or_else(|| AuthError::UserNotInDatabase(user_id).into())
    }

    /// Updates a player profile, re-geocoding when the preferred location changes.
    ///
    /// A location the geocoder cannot resolve clears the stored coordinates so
    /// matching falls back to text comparison.
    ///
    /// # Returns
    /// - `Ok(Player)` - Updated profile
    /// - `Err(AppError::NotFound)` - No player with that ID
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn update_player(
        &self,
        player: &Player,
        mut param: UpdatePlayerParam,
    ) -> Result<Player, AppError> {
        if let Some(location) = param.preferred_location.as_deref() {
            if player.preferred_location.as_deref() != Some(location) {
                param.coordinates = Some(self.geocoder.geocode_or_none(location).await);
            }
        }

        PlayerRepository::new(self.db)
            .update(player.id, param)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Player {} not found", player.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{
        model::player::{Availability, SkillLevel},
        util::geo::Coordinates,
    };
    use test_utils::{builder::TestBuilder, factory};

    /// Tests account edits leave unset fields alone.
    ///
    /// Expected: phone updated, city kept
    #[tokio::test]
    async fn update_user_keeps_unset_fields() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let geocoder = Geocoder::disabled(reqwest::Client::new());
        let user = factory::create_user(db).await?;

        UserRepository::new(db)
            .update_profile(
                user.id,
                UpdateUserParam {
                    city: Some("Haifa".to_string()),
                    ..Default::default()
                },
            )
            .await?;

        let updated = UserService::new(db, &geocoder)
            .update_user(
                user.id,
                UpdateUserParam {
                    phone: Some("050-1234567".to_string()),
                    ..Default::default()
                },
            )
            .await?;

        assert_eq!(updated.phone.as_deref(), Some("050-1234567"));
        assert_eq!(updated.city.as_deref(), Some("Haifa"));

        let missing = UserService::new(db, &geocoder)
            .update_user(user.id + 100, UpdateUserParam::default())
            .await;
        assert!(matches!(
            missing,
            Err(AppError::AuthErr(AuthError::UserNotInDatabase(_)))
        ));

        Ok(())
    }

    /// Tests a new preferred location clears coordinates the geocoder cannot resolve.
    ///
    /// Expected: coordinates kept for unrelated edits, cleared on relocation
    #[tokio::test]
    async fn update_player_regeocodes_new_location() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let geocoder = Geocoder::disabled(reqwest::Client::new());
        let (_, entity) = factory::player::PlayerFactory::new(db)
            .coordinates(32.08, 34.78)
            .build()
            .await?;
        let player = Player::from_entity(entity)?;
        let service = UserService::new(db, &geocoder);

        let updated = service
            .update_player(
                &player,
                UpdatePlayerParam {
                    skill_level: Some(SkillLevel::Advanced),
                    preferred_location: Some("Tel Aviv".to_string()),
                    availability: Some(Availability::Flexible),
                    ..Default::default()
                },
            )
            .await?;
        assert_eq!(updated.skill_level, SkillLevel::Advanced);
        assert_eq!(
            updated.coordinates,
            Some(Coordinates {
                latitude: 32.08,
                longitude: 34.78
            })
        );

        let moved = service
            .update_player(
                &updated,
                UpdatePlayerParam {
                    preferred_location: Some("Eilat".to_string()),
                    ..Default::default()
                },
            )
            .await?;
        assert_eq!(moved.preferred_location.as_deref(), Some("Eilat"));
        assert!(moved.coordinates.is_none());

        Ok(())
    }
}
