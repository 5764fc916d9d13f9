//! Player profile repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::{
    player::{CreatePlayerParam, Player, PlayerWithUser, UpdatePlayerParam},
    user::User,
};

/// Default travel radius for new players, in kilometres.
const DEFAULT_MAX_TRAVEL_DISTANCE: i32 = 25;

pub struct PlayerRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PlayerRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a player profile for an existing user.
    ///
    /// New players are marked as looking for a partner with the default travel radius.
    ///
    /// # Returns
    /// - `Ok(Player)` - The created profile
    /// - `Err(DbErr)` - Database error, including a second profile for the same user
    pub async fn create(&self, param: CreatePlayerParam) -> Result<Player, DbErr> {
        insert_player(self.db, param).await
    }

    pub async fn find_by_id(&self, player_id: i32) -> Result<Option<Player>, DbErr> {
        entity::prelude::Player::find_by_id(player_id)
            .one(self.db)
            .await?
            .map(Player::from_entity)
            .transpose()
    }

    pub async fn find_by_user_id(&self, user_id: i32) -> Result<Option<Player>, DbErr> {
        entity::prelude::Player::find()
            .filter(entity::player::Column::UserId.eq(user_id))
            .one(self.db)
            .await?
            .map(Player::from_entity)
            .transpose()
    }

    /// Finds a player together with its user account.
    ///
    /// # Returns
    /// - `Ok(Some(PlayerWithUser))` - Player and user found
    /// - `Ok(None)` - No player with that ID, or its user row is missing
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_with_user(&self, player_id: i32) -> Result<Option<PlayerWithUser>, DbErr> {
        let result = entity::prelude::Player::find_by_id(player_id)
            .find_also_related(entity::prelude::User)
            .one(self.db)
            .await?;

        match result {
            Some((player, Some(user))) => Ok(Some(PlayerWithUser {
                player: Player::from_entity(player)?,
                user: User::from_entity(user)?,
            })),
            _ => Ok(None),
        }
    }

    /// Gets every player whose user account is active, except one.
    ///
    /// This is the candidate pool for matching; scoring and filtering happen in memory.
    ///
    /// # Arguments
    /// - `exclude_player_id` - The requesting player
    ///
    /// # Returns
    /// - `Ok(Vec<PlayerWithUser>)` - Candidates ordered by player ID
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_active_candidates(
        &self,
        exclude_player_id: i32,
    ) -> Result<Vec<PlayerWithUser>, DbErr> {
        let rows = entity::prelude::Player::find()
            .find_also_related(entity::prelude::User)
            .filter(entity::player::Column::Id.ne(exclude_player_id))
            .filter(entity::user::Column::IsActive.eq(true))
            .order_by_asc(entity::player::Column::Id)
            .all(self.db)
            .await?;

        rows.into_iter()
            .filter_map(|(player, user)| user.map(|user| (player, user)))
            .map(|(player, user)| {
                Ok(PlayerWithUser {
                    player: Player::from_entity(player)?,
                    user: User::from_entity(user)?,
                })
            })
            .collect()
    }

    /// Applies profile edits.
    ///
    /// # Returns
    /// - `Ok(Some(Player))` - Updated profile
    /// - `Ok(None)` - No player with that ID
    /// - `Err(DbErr)` - Database error during update
    pub async fn update(
        &self,
        player_id: i32,
        param: UpdatePlayerParam,
    ) -> Result<Option<Player>, DbErr> {
        let Some(entity) = entity::prelude::Player::find_by_id(player_id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: entity::player::ActiveModel = entity.into();
        if let Some(skill_level) = param.skill_level {
            active.skill_level = ActiveValue::Set(skill_level.as_str().to_string());
        }
        if let Some(location) = param.preferred_location {
            active.preferred_location = ActiveValue::Set(Some(location));
        }
        if let Some(availability) = param.availability {
            active.availability = ActiveValue::Set(Some(availability.as_str().to_string()));
        }
        if let Some(bio) = param.bio {
            active.bio = ActiveValue::Set(Some(bio));
        }
        if let Some(court_type) = param.preferred_court_type {
            active.preferred_court_type = ActiveValue::Set(Some(court_type));
        }
        if let Some(distance) = param.max_travel_distance {
            active.max_travel_distance = ActiveValue::Set(distance);
        }
        if let Some(looking) = param.is_looking_for_partner {
            active.is_looking_for_partner = ActiveValue::Set(looking);
        }
        if let Some(coordinates) = param.coordinates {
            active.latitude = ActiveValue::Set(coordinates.map(|c| c.latitude));
            active.longitude = ActiveValue::Set(coordinates.map(|c| c.longitude));
        }

        let entity = active.update(self.db).await?;
        Ok(Some(Player::from_entity(entity)?))
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        entity::prelude::Player::find().count(self.db).await
    }
}

/// Inserts a player profile on any connection, including an open transaction.
pub(super) async fn insert_player<C: ConnectionTrait>(
    conn: &C,
    param: CreatePlayerParam,
) -> Result<Player, DbErr> {
    let entity = entity::player::ActiveModel {
        user_id: ActiveValue::Set(param.user_id),
        skill_level: ActiveValue::Set(param.skill_level.as_str().to_string()),
        preferred_location: ActiveValue::Set(param.preferred_location),
        availability: ActiveValue::Set(param.availability.map(|a| a.as_str().to_string())),
        bio: ActiveValue::Set(None),
        preferred_court_type: ActiveValue::Set(None),
        max_travel_distance: ActiveValue::Set(DEFAULT_MAX_TRAVEL_DISTANCE),
        is_looking_for_partner: ActiveValue::Set(true),
        latitude: ActiveValue::Set(param.coordinates.map(|c| c.latitude)),
        longitude: ActiveValue::Set(param.coordinates.map(|c| c.longitude)),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Player::from_entity(entity)
}
