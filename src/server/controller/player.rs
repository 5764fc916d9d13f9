use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        booking::CalendarEventDto,
        dashboard::PlayerDashboardDto,
        user::{PlayerDto, UpdatePlayerDto},
    },
    server::{
        controller::param::CalendarParam,
        error::AppError,
        middleware::auth::AuthGuard,
        model::player::UpdatePlayerParam,
        service::{analytics::AnalyticsService, booking::BookingService, user::UserService},
        state::AppState,
        util::parse::parse_date,
    },
};

pub static PLAYER_TAG: &str = "player";

/// Upcoming bookings, proposals waiting on the player and unread message count.
#[utoipa::path(
    get,
    path = "/api/player/dashboard",
    tag = PLAYER_TAG,
    responses(
        (status = 200, description = "Player dashboard", body = PlayerDashboardDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a player", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let (_, player) = AuthGuard::new(&state.db, &session)
        .require_player()
        .await?;

    let dashboard = AnalyticsService::new(&state.db)
        .player_dashboard(&player)
        .await?;

    Ok((StatusCode::OK, Json(dashboard.into_dto())))
}

/// Edits the player profile. A new preferred location is geocoded again.
#[utoipa::path(
    put,
    path = "/api/player/profile",
    tag = PLAYER_TAG,
    request_body = UpdatePlayerDto,
    responses(
        (status = 200, description = "Updated profile", body = PlayerDto),
        (status = 400, description = "Invalid skill level, availability or distance", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a player", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdatePlayerDto>,
) -> Result<impl IntoResponse, AppError> {
    let (_, player) = AuthGuard::new(&state.db, &session)
        .require_player()
        .await?;

    let player = UserService::new(&state.db, &state.geocoder)
        .update_player(&player, UpdatePlayerParam::try_from(payload)?)
        .await?;

    Ok((StatusCode::OK, Json(player.into_dto())))
}

/// Calendar events for the player's bookings and open proposals.
#[utoipa::path(
    get,
    path = "/api/player/calendar",
    tag = PLAYER_TAG,
    params(CalendarParam),
    responses(
        (status = 200, description = "Events in the window", body = Vec<CalendarEventDto>),
        (status = 400, description = "Malformed date", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a player", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_calendar(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CalendarParam>,
) -> Result<impl IntoResponse, AppError> {
    let (_, player) = AuthGuard::new(&state.db, &session)
        .require_player()
        .await?;

    let from = parse_date(&params.start)?;
    let to = parse_date(&params.end)?;

    let events = BookingService::new(&state.db, &state.email)
        .player_calendar(player.id, from, to)
        .await?;

    let dto: Vec<CalendarEventDto> = events.into_iter().map(|e| e.into_dto()).collect();

    Ok((StatusCode::OK, Json(dto)))
}
