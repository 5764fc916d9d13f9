//! User accounts, roles and owner profiles.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use std::str::FromStr;

use crate::{
    model::{
        chat::ContactDto,
        user::{CurrentUserDto, OwnerDto, RegisterDto, UpdateUserDto, UserDto},
    },
    server::{
        error::internal::InternalError,
        model::player::{Availability, Player, SkillLevel},
        util::geo::Coordinates,
    },
};

/// Account role. Each user has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player,
    Owner,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "player",
            Role::Owner => "owner",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = InternalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "player" => Ok(Role::Player),
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            _ => Err(InternalError::UnknownVariant {
                kind: "role",
                value: value.to_string(),
            }),
        }
    }
}

/// User account without credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The user entity from the database
    ///
    /// # Returns
    /// - `Ok(User)` - Converted domain model
    /// - `Err(DbErr::Custom)` - Stored role is not a known role
    pub fn from_entity(entity: entity::user::Model) -> Result<Self, DbErr> {
        let role = Role::from_str(&entity.role).map_err(|e| DbErr::Custom(e.to_string()))?;

        Ok(Self {
            id: entity.id,
            username: entity.username,
            email: entity.email,
            role,
            full_name: entity.full_name,
            phone: entity.phone,
            city: entity.city,
            is_active: entity.is_active,
            created_at: entity.created_at,
        })
    }

    /// Name shown to other users, falling back to the username.
    pub fn display_name(&self) -> String {
        self.full_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.username.clone())
    }

    /// Converts domain model to DTO for API responses.
    pub fn into_dto(self) -> UserDto {
        UserDto {
            id: self.id,
            username: self.username,
            email: self.email,
            role: self.role.as_str().to_string(),
            full_name: self.full_name,
            phone: self.phone,
            city: self.city,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }

    pub fn into_contact_dto(self) -> ContactDto {
        ContactDto {
            user_id: self.id,
            username: self.username,
            full_name: self.full_name,
            role: self.role.as_str().to_string(),
        }
    }
}

/// User together with the stored password hash, used only for login.
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Court owner business profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Owner {
    pub id: i32,
    pub user_id: i32,
    pub business_name: Option<String>,
}

impl Owner {
    pub fn from_entity(entity: entity::owner::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            business_name: entity.business_name,
        }
    }

    pub fn into_dto(self) -> OwnerDto {
        OwnerDto {
            id: self.id,
            user_id: self.user_id,
            business_name: self.business_name,
        }
    }
}

/// Parameters for inserting a new user.
#[derive(Debug, Clone)]
pub struct CreateUserParam {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

/// Self-service profile edits. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserParam {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

impl From<UpdateUserDto> for UpdateUserParam {
    fn from(dto: UpdateUserDto) -> Self {
        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());
        Self {
            full_name: trim(dto.full_name),
            phone: trim(dto.phone),
            city: trim(dto.city),
        }
    }
}

/// Registration request after trimming and normalizing identifiers.
#[derive(Debug, Clone)]
pub struct RegisterParam {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub skill_level: Option<String>,
    pub preferred_location: Option<String>,
    pub availability: Option<String>,
    pub business_name: Option<String>,
    pub admin_code: Option<String>,
}

impl From<RegisterDto> for RegisterParam {
    fn from(dto: RegisterDto) -> Self {
        let non_empty = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };

        Self {
            username: dto.username.trim().to_string(),
            email: dto.email.trim().to_lowercase(),
            password: dto.password,
            role: dto.role.trim().to_lowercase(),
            full_name: non_empty(dto.full_name),
            phone: non_empty(dto.phone),
            city: non_empty(dto.city),
            skill_level: non_empty(dto.skill_level),
            preferred_location: non_empty(dto.preferred_location),
            availability: non_empty(dto.availability),
            business_name: non_empty(dto.business_name),
            admin_code: non_empty(dto.admin_code),
        }
    }
}

/// Role profile stored together with a new account.
#[derive(Debug, Clone, PartialEq)]
pub enum NewProfile {
    None,
    Player {
        skill_level: SkillLevel,
        preferred_location: Option<String>,
        availability: Option<Availability>,
        coordinates: Option<Coordinates>,
    },
    Owner {
        business_name: Option<String>,
    },
}

/// A user with the profile that matches their role.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountProfile {
    pub user: User,
    pub player: Option<Player>,
    pub owner: Option<Owner>,
}

impl AccountProfile {
    pub fn into_dto(self) -> CurrentUserDto {
        CurrentUserDto {
            user: self.user.into_dto(),
            player: self.player.map(Player::into_dto),
            owner: self.owner.map(Owner::into_dto),
        }
    }
}

/// Admin user list filter.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    /// Case-insensitive substring of username, email or full name
    pub search: Option<String>,
}

/// A page of users with pagination metadata.
#[derive(Debug, Clone)]
pub struct PaginatedUsers {
    pub users: Vec<User>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl PaginatedUsers {
    pub fn into_dto(self) -> crate::model::user::PaginatedUsersDto {
        crate::model::user::PaginatedUsersDto {
            users: self.users.into_iter().map(User::into_dto).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}
