use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No user ID is stored in the session.
    ///
    /// The request was made without logging in first, or the session expired.
    /// Results in a 401 Unauthorized response.
    #[error("User not found in session")]
    UserNotInSession,

    /// The session references a user that no longer exists.
    ///
    /// Results in a 401 Unauthorized response and the caller should log in again.
    #[error("User {0} referenced by session not found in database")]
    UserNotInDatabase(i32),

    /// Username/email and password did not match a stored account.
    ///
    /// Results in a 401 Unauthorized response. The message does not reveal which
    /// half of the credentials was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The account has been deactivated by an admin.
    ///
    /// Results in a 403 Forbidden response.
    #[error("User {0} account is deactivated")]
    AccountDisabled(i32),

    /// The user lacks a permission required by the endpoint.
    ///
    /// # Fields
    /// - User ID that was denied
    /// - Server-side description of the missing permission (logged, not returned)
    #[error("Access denied for user {0}: {1}")]
    AccessDenied(i32, String),

    /// The user has the player role but no player profile row.
    ///
    /// Results in a 403 Forbidden response.
    #[error("User {0} has no player profile")]
    PlayerProfileMissing(i32),
}

/// Converts authentication errors into HTTP responses.
///
/// Maps authentication errors to appropriate HTTP status codes and user-friendly error messages:
/// - `UserNotInSession` / `UserNotInDatabase` → 401 Unauthorized with "Authentication required"
/// - `InvalidCredentials` → 401 Unauthorized with "Invalid username or password"
/// - `AccountDisabled` → 403 Forbidden with "Account is deactivated"
/// - `AccessDenied` / `PlayerProfileMissing` → 403 Forbidden with "Access denied"
///
/// All errors are logged at debug level for diagnostics while keeping client-facing messages
/// generic to avoid information leakage.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let (status, message) = match self {
            Self::UserNotInSession | Self::UserNotInDatabase(_) => {
                (StatusCode::UNAUTHORIZED, "Authentication required")
            }
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid username or password"),
            Self::AccountDisabled(_) => (StatusCode::FORBIDDEN, "Account is deactivated"),
            Self::AccessDenied(_, _) | Self::PlayerProfileMissing(_) => {
                (StatusCode::FORBIDDEN, "Access denied")
            }
        };

        (
            status,
            Json(ErrorDto {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
