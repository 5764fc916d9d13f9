use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        court::CourtDto,
        dashboard::PlatformStatsDto,
        shared_booking::SharedBookingStatsDto,
        user::{PaginatedUsersDto, UserDto},
    },
    server::{
        controller::param::UserListParam,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::user::UserFilter,
        service::{
            admin::{AdminService, USERS_PER_PAGE},
            shared_booking::SharedBookingService,
        },
        state::AppState,
    },
};

pub static ADMIN_TAG: &str = "admin";

/// Get paginated list of users
///
/// Filters by role, active flag and a search string matched against username, email and
/// full name.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = ADMIN_TAG,
    params(UserListParam),
    responses(
        (status = 200, description = "Page of users, newest first", body = PaginatedUsersDto),
        (status = 400, description = "Unknown role", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_users(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<UserListParam>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let filter = UserFilter::try_from(&params)?;
    let users = AdminService::new(&state.db)
        .get_users(
            &filter,
            params.page.unwrap_or(0),
            params.per_page.unwrap_or(USERS_PER_PAGE),
        )
        .await?;

    Ok((StatusCode::OK, Json(users.into_dto())))
}

/// Activate or deactivate a user account
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/toggle",
    tag = ADMIN_TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User with the flipped active flag", body = UserDto),
        (status = 400, description = "Admin tried to deactivate themselves", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn toggle_user(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let user = AdminService::new(&state.db).toggle_user(&admin, id).await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

/// Activate or deactivate a court listing
#[utoipa::path(
    post,
    path = "/api/admin/courts/{id}/toggle",
    tag = ADMIN_TAG,
    params(
        ("id" = i32, Path, description = "Court ID")
    ),
    responses(
        (status = 200, description = "Court with the flipped active flag", body = CourtDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "Court not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn toggle_court(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let court = AdminService::new(&state.db).toggle_court(&admin, id).await?;

    Ok((StatusCode::OK, Json(court.into_dto())))
}

/// Get platform-wide statistics
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "User, court and booking counts with revenue", body = PlatformStatsDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_stats(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let stats = AdminService::new(&state.db).platform_stats().await?;

    Ok((StatusCode::OK, Json(stats.into_dto())))
}

/// Get shared booking proposal statistics
#[utoipa::path(
    get,
    path = "/api/admin/shared-bookings/stats",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Proposal counts and success rate", body = SharedBookingStatsDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_shared_booking_stats(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let stats = SharedBookingService::new(&state.db, &state.email)
        .stats()
        .await?;

    Ok((StatusCode::OK, Json(stats.into_dto())))
}
