use sea_orm::DatabaseConnection;
use tower_sessions::Session;

use crate::server::{
    data::{player::PlayerRepository, user::UserRepository},
    error::{auth::AuthError, AppError},
    middleware::session::AuthSession,
    model::{
        player::Player,
        user::{Role, User},
    },
};

/// Role a route requires. Admins do not inherit player or owner access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Player,
    Owner,
    Admin,
}

impl Permission {
    fn role(&self) -> Role {
        match self {
            Permission::Player => Role::Player,
            Permission::Owner => Role::Owner,
            Permission::Admin => Role::Admin,
        }
    }
}

pub struct AuthGuard<'a> {
    db: &'a DatabaseConnection,
    session: &'a Session,
}

impl<'a> AuthGuard<'a> {
    pub fn new(db: &'a DatabaseConnection, session: &'a Session) -> Self {
        Self { db, session }
    }

    /// Loads the session user and checks every listed permission.
    ///
    /// Deactivated accounts are refused even when no permission is listed.
    ///
    /// # Returns
    /// - `Ok(User)` - Authenticated active user holding all permissions
    /// - `Err(AppError::AuthErr(UserNotInSession))` - Not logged in
    /// - `Err(AppError::AuthErr(UserNotInDatabase))` - Session points at a deleted user
    /// - `Err(AppError::AuthErr(AccountDisabled))` - User is deactivated
    /// - `Err(AppError::AuthErr(AccessDenied))` - First permission the user lacks
    pub async fn require(&self, permissions: &[Permission]) -> Result<User, AppError> {
        let Some(user_id) = AuthSession::new(self.session).get_user_id().await? else {
            return Err(AuthError::UserNotInSession.into());
        };

        let Some(user) = UserRepository::new(self.db).find_by_id(user_id).await? else {
            return Err(AuthError::UserNotInDatabase(user_id).into());
        };

        if !user.is_active {
            return Err(AuthError::AccountDisabled(user_id).into());
        }

        for permission in permissions {
            if user.role != permission.role() {
                return Err(AuthError::AccessDenied(
                    user_id,
                    format!(
                        "route requires {} role but user is {}",
                        permission.role().as_str(),
                        user.role.as_str()
                    ),
                )
                .into());
            }
        }

        Ok(user)
    }

    /// Requires a player and loads their profile.
    ///
    /// # Returns
    /// - `Ok((User, Player))` - Player account with its profile
    /// - `Err(AppError::AuthErr(PlayerProfileMissing))` - Player role but no profile row
    /// - Any error from [`Self::require`]
    pub async fn require_player(&self) -> Result<(User, Player), AppError> {
        let user = self.require(&[Permission::Player]).await?;

        let Some(player) = PlayerRepository::new(self.db)
            .find_by_user_id(user.id)
            .await?
        else {
            return Err(AuthError::PlayerProfileMissing(user.id).into());
        };

        Ok((user, player))
    }
}
