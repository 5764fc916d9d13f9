//! Type-safe session management wrappers.
//!
//! The API only keeps the authenticated user in the session. `AuthSession` wraps the
//! tower-sessions `Session` so handlers never touch raw session keys.

use tower_sessions::Session;

use crate::server::error::AppError;

const SESSION_AUTH_USER_ID: &str = "auth:user";

/// Authentication session management.
pub struct AuthSession<'a> {
    session: &'a Session,
}

impl<'a> AuthSession<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Gets the underlying Session reference, as needed by `AuthGuard`.
    pub fn inner(&self) -> &Session {
        self.session
    }

    /// Stores the user ID after a successful login.
    ///
    /// The session ID is rotated first so an ID issued before login cannot be reused.
    ///
    /// # Returns
    /// - `Ok(())` - User ID stored
    /// - `Err(AppError::SessionErr(_))` - Failed to store in session
    pub async fn set_user_id(&self, user_id: i32) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        self.session.insert(SESSION_AUTH_USER_ID, user_id).await?;
        Ok(())
    }

    /// Retrieves the logged-in user ID.
    ///
    /// # Returns
    /// - `Ok(Some(user_id))` - User is logged in
    /// - `Ok(None)` - No user in session
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn get_user_id(&self) -> Result<Option<i32>, AppError> {
        Ok(self.session.get::<i32>(SESSION_AUTH_USER_ID).await?)
    }

    pub async fn is_authenticated(&self) -> Result<bool, AppError> {
        Ok(self.get_user_id().await?.is_some())
    }

    /// Removes all session data and deletes the session record.
    pub async fn clear(&self) -> Result<(), AppError> {
        self.session.flush().await?;
        Ok(())
    }
}
