use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        user::{UpdateUserDto, UserDto},
    },
    server::{
        error::AppError, middleware::auth::AuthGuard, model::user::UpdateUserParam,
        service::user::UserService, state::AppState,
    },
};

pub static USER_TAG: &str = "user";

/// Updates the logged-in user's name, phone or city. Omitted fields are kept.
#[utoipa::path(
    put,
    path = "/api/user/profile",
    tag = USER_TAG,
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Updated account", body = UserDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdateUserDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let user = UserService::new(&state.db, &state.geocoder)
        .update_user(user.id, UpdateUserParam::from(payload))
        .await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}
