use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct RegisterDto {
    pub username: String,
    pub email: String,
    pub password: String,
    /// `player` or `owner`
    pub role: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    /// Required for players
    pub skill_level: Option<String>,
    pub preferred_location: Option<String>,
    pub availability: Option<String>,
    pub business_name: Option<String>,
    /// One-time code printed at startup while no admin exists
    pub admin_code: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct LoginDto {
    /// Username or email address
    pub login: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct PlayerDto {
    pub id: i32,
    pub user_id: i32,
    pub skill_level: String,
    pub preferred_location: Option<String>,
    pub availability: Option<String>,
    pub bio: Option<String>,
    pub preferred_court_type: Option<String>,
    pub max_travel_distance: i32,
    pub is_looking_for_partner: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct OwnerDto {
    pub id: i32,
    pub user_id: i32,
    pub business_name: Option<String>,
}

/// The logged in user with whichever profile matches their role.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct CurrentUserDto {
    pub user: UserDto,
    pub player: Option<PlayerDto>,
    pub owner: Option<OwnerDto>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdateUserDto {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdatePlayerDto {
    pub skill_level: Option<String>,
    pub preferred_location: Option<String>,
    pub availability: Option<String>,
    pub bio: Option<String>,
    pub preferred_court_type: Option<String>,
    pub max_travel_distance: Option<i32>,
    pub is_looking_for_partner: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct PaginatedUsersDto {
    pub users: Vec<UserDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}
