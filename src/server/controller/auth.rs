use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, SuccessDto},
        user::{CurrentUserDto, LoginDto, RegisterDto},
    },
    server::{
        error::AppError,
        middleware::{auth::AuthGuard, session::AuthSession},
        model::user::RegisterParam,
        service::auth::AuthService,
        state::AppState,
    },
};

pub static AUTH_TAG: &str = "auth";

/// Creates an account and logs it in.
///
/// Players need a skill level, owners may give a business name. Registering as admin
/// requires the one-time code printed in the server log while no admin exists.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = AUTH_TAG,
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account created and logged in", body = CurrentUserDto),
        (status = 400, description = "First failing registration rule", body = ErrorDto),
        (status = 429, description = "Too many attempts"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterDto>,
) -> Result<impl IntoResponse, AppError> {
    let auth_service = AuthService::new(&state.db, &state.geocoder);

    let user = auth_service
        .register(
            RegisterParam::from(payload),
            &state.admin_code_service,
            &state.email,
        )
        .await?;

    AuthSession::new(&session).set_user_id(user.id).await?;

    let profile = auth_service.profile(user).await?;

    Ok((StatusCode::CREATED, Json(profile.into_dto())))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = CurrentUserDto),
        (status = 401, description = "Invalid username or password", body = ErrorDto),
        (status = 403, description = "Account is deactivated", body = ErrorDto),
        (status = 429, description = "Too many attempts"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginDto>,
) -> Result<impl IntoResponse, AppError> {
    let auth_service = AuthService::new(&state.db, &state.geocoder);

    let user = auth_service.login(&payload.login, &payload.password).await?;
    AuthSession::new(&session).set_user_id(user.id).await?;

    let profile = auth_service.profile(user).await?;

    Ok((StatusCode::OK, Json(profile.into_dto())))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Session cleared", body = SuccessDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    AuthSession::new(&session).clear().await?;

    Ok((StatusCode::OK, Json(SuccessDto::new("Logged out"))))
}

/// Returns the logged-in user with their player or owner profile.
#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Current user", body = CurrentUserDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let profile = AuthService::new(&state.db, &state.geocoder)
        .profile(user)
        .await?;

    Ok((StatusCode::OK, Json(profile.into_dto())))
}
