//! User data repository for database operations.
//!
//! This module provides the `UserRepository` for managing user records in the database.
//! It handles account creation, credential lookup, profile updates, activation, the
//! paginated admin listing and the messaging directory, converting entity models to domain
//! models at the boundary.

use std::future::Future;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::server::{
    data::{owner::insert_owner, player::insert_player},
    model::{
        player::CreatePlayerParam,
        user::{
            AccountProfile, CreateUserParam, NewProfile, Role, UpdateUserParam, User,
            UserCredentials, UserFilter,
        },
    },
};

/// Repository providing database operations for user management.
///
/// This struct holds a reference to the database connection and provides methods
/// for creating, reading, updating, and querying user records.
pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `UserRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a new active user.
    ///
    /// The email is stored lowercased so lookups are case-insensitive.
    ///
    /// # Arguments
    /// - `param` - Account fields including the already hashed password
    ///
    /// # Returns
    /// - `Ok(User)` - The created user
    /// - `Err(DbErr)` - Database error, including unique constraint violations
    pub async fn create(&self, param: CreateUserParam) -> Result<User, DbErr> {
        insert_user(self.db, param).await
    }

    /// Inserts a user and their role profile in one transaction.
    ///
    /// `claim` is awaited after both rows are written and before commit; when it resolves
    /// to `false` nothing is stored. A failed profile insert rolls back the user row.
    ///
    /// # Arguments
    /// - `param` - Account fields including the already hashed password
    /// - `profile` - Player or owner profile to create with the account
    /// - `claim` - Final check that must hold for the account to be kept
    ///
    /// # Returns
    /// - `Ok(Some(AccountProfile))` - Account and profile committed
    /// - `Ok(None)` - `claim` failed, transaction rolled back
    /// - `Err(DbErr)` - Database error, transaction rolled back
    pub async fn create_account(
        &self,
        param: CreateUserParam,
        profile: NewProfile,
        claim: impl Future<Output = bool>,
    ) -> Result<Option<AccountProfile>, DbErr> {
        let txn = self.db.begin().await?;

        let user = insert_user(&txn, param).await?;
        let (player, owner) = match profile {
            NewProfile::None => (None, None),
            NewProfile::Player {
                skill_level,
                preferred_location,
                availability,
                coordinates,
            } => {
                let player = insert_player(
                    &txn,
                    CreatePlayerParam {
                        user_id: user.id,
                        skill_level,
                        preferred_location,
                        availability,
                        coordinates,
                    },
                )
                .await?;
                (Some(player), None)
            }
            NewProfile::Owner { business_name } => {
                let owner = insert_owner(&txn, user.id, business_name).await?;
                (None, Some(owner))
            }
        };

        if !claim.await {
            txn.rollback().await?;
            return Ok(None);
        }

        txn.commit().await?;

        Ok(Some(AccountProfile {
            user,
            player,
            owner,
        }))
    }

    /// Finds a user by ID.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - User found
    /// - `Ok(None)` - No user with that ID
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, DbErr> {
        entity::prelude::User::find_by_id(user_id)
            .one(self.db)
            .await?
            .map(User::from_entity)
            .transpose()
    }

    /// Finds several users by ID, skipping IDs that do not exist.
    pub async fn find_by_ids(&self, user_ids: &[i32]) -> Result<Vec<User>, DbErr> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::User::find()
            .filter(entity::user::Column::Id.is_in(user_ids.to_vec()))
            .order_by_asc(entity::user::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(User::from_entity)
            .collect()
    }

    /// Looks up a user and password hash by username or email.
    ///
    /// # Arguments
    /// - `login` - Username, or email compared case-insensitively
    ///
    /// # Returns
    /// - `Ok(Some(UserCredentials))` - Matching account
    /// - `Ok(None)` - No account matches
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_credentials(&self, login: &str) -> Result<Option<UserCredentials>, DbErr> {
        let login = login.trim();
        let entity = entity::prelude::User::find()
            .filter(
                Condition::any()
                    .add(entity::user::Column::Username.eq(login))
                    .add(entity::user::Column::Email.eq(login.to_lowercase())),
            )
            .one(self.db)
            .await?;

        let Some(entity) = entity else {
            return Ok(None);
        };

        let password_hash = entity.password_hash.clone();
        Ok(Some(UserCredentials {
            user: User::from_entity(entity)?,
            password_hash,
        }))
    }

    /// Checks whether an email address is already registered.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email.trim().to_lowercase()))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Checks whether a username is already taken.
    pub async fn username_exists(&self, username: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::User::find()
            .filter(entity::user::Column::Username.eq(username.trim()))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Applies self-service profile edits.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - Updated user
    /// - `Ok(None)` - No user with that ID
    /// - `Err(DbErr)` - Database error during update
    pub async fn update_profile(
        &self,
        user_id: i32,
        param: UpdateUserParam,
    ) -> Result<Option<User>, DbErr> {
        let Some(entity) = entity::prelude::User::find_by_id(user_id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: entity::user::ActiveModel = entity.into();
        if let Some(full_name) = param.full_name {
            active.full_name = ActiveValue::Set(Some(full_name));
        }
        if let Some(phone) = param.phone {
            active.phone = ActiveValue::Set(Some(phone));
        }
        if let Some(city) = param.city {
            active.city = ActiveValue::Set(Some(city));
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;
        Ok(Some(User::from_entity(entity)?))
    }

    /// Activates or deactivates a user account.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - Updated user
    /// - `Ok(None)` - No user with that ID
    /// - `Err(DbErr)` - Database error during update
    pub async fn set_active(&self, user_id: i32, is_active: bool) -> Result<Option<User>, DbErr> {
        let Some(entity) = entity::prelude::User::find_by_id(user_id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: entity::user::ActiveModel = entity.into();
        active.is_active = ActiveValue::Set(is_active);
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;
        Ok(Some(User::from_entity(entity)?))
    }

    /// Checks if any admin users exist in the database.
    ///
    /// Used at startup to decide whether a bootstrap admin code should be generated.
    ///
    /// # Returns
    /// - `Ok(true)` - At least one admin user exists in the database
    /// - `Ok(false)` - No admin users exist (first-time setup scenario)
    /// - `Err(DbErr)` - Database error during count query
    pub async fn admin_exists(&self) -> Result<bool, DbErr> {
        Ok(self.count_by_role(Role::Admin).await? > 0)
    }

    /// Counts users holding a role.
    pub async fn count_by_role(&self, role: Role) -> Result<u64, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::Role.eq(role.as_str()))
            .count(self.db)
            .await
    }

    /// Counts all users and active users.
    ///
    /// # Returns
    /// - `Ok((total, active))` - User counts
    /// - `Err(DbErr)` - Database error during count queries
    pub async fn count_totals(&self) -> Result<(u64, u64), DbErr> {
        let total = entity::prelude::User::find().count(self.db).await?;
        let active = entity::prelude::User::find()
            .filter(entity::user::Column::IsActive.eq(true))
            .count(self.db)
            .await?;

        Ok((total, active))
    }

    /// Active users other than `exclude_user_id`, for picking a message recipient.
    ///
    /// # Arguments
    /// - `exclude_user_id` - The searching user
    /// - `role` - Only users with this role
    /// - `search` - Case-insensitive substring of username or full name
    /// - `limit` - Maximum users returned
    ///
    /// # Returns
    /// - `Ok(Vec<User>)` - Users ordered by full name, then username
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_messaging_directory(
        &self,
        exclude_user_id: i32,
        role: Option<Role>,
        search: Option<&str>,
        limit: u64,
    ) -> Result<Vec<User>, DbErr> {
        let mut query = entity::prelude::User::find()
            .filter(entity::user::Column::Id.ne(exclude_user_id))
            .filter(entity::user::Column::IsActive.eq(true));

        if let Some(role) = role {
            query = query.filter(entity::user::Column::Role.eq(role.as_str()));
        }
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(entity::user::Column::Username.contains(search))
                    .add(entity::user::Column::FullName.contains(search)),
            );
        }

        query
            .order_by_asc(entity::user::Column::FullName)
            .order_by_asc(entity::user::Column::Username)
            .limit(limit)
            .all(self.db)
            .await?
            .into_iter()
            .map(User::from_entity)
            .collect()
    }

    /// Gets a page of users matching a filter, newest first.
    ///
    /// # Arguments
    /// - `filter` - Optional role, active flag and search text
    /// - `page` - Zero-indexed page number
    /// - `per_page` - Number of users per page
    ///
    /// # Returns
    /// - `Ok((users, total))` - Users on the page and the total matching count
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_all_paginated(
        &self,
        filter: &UserFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<User>, u64), DbErr> {
        let mut query = entity::prelude::User::find();

        if let Some(role) = filter.role {
            query = query.filter(entity::user::Column::Role.eq(role.as_str()));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(entity::user::Column::IsActive.eq(is_active));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(entity::user::Column::Username.contains(search))
                    .add(entity::user::Column::Email.contains(search.to_lowercase().as_str()))
                    .add(entity::user::Column::FullName.contains(search)),
            );
        }

        let paginator = query
            .order_by_desc(entity::user::Column::CreatedAt)
            .order_by_desc(entity::user::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let users = paginator
            .fetch_page(page)
            .await?
            .into_iter()
            .map(User::from_entity)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((users, total))
    }
}

async fn insert_user<C: ConnectionTrait>(conn: &C, param: CreateUserParam) -> Result<User, DbErr> {
    let now = Utc::now();
    let entity = entity::user::ActiveModel {
        username: ActiveValue::Set(param.username),
        email: ActiveValue::Set(param.email.to_lowercase()),
        password_hash: ActiveValue::Set(param.password_hash),
        role: ActiveValue::Set(param.role.as_str().to_string()),
        full_name: ActiveValue::Set(param.full_name),
        phone: ActiveValue::Set(param.phone),
        city: ActiveValue::Set(param.city),
        is_active: ActiveValue::Set(true),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    User::from_entity(entity)
}
