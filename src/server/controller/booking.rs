use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        booking::{BookingDto, BookingReasonDto, CalendarEventDto, CreateBookingDto},
    },
    server::{
        controller::param::{BookingListParam, CalendarParam, DateRangeParam},
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{booking::BookingWithCourt, user::Role},
        service::booking::{BookingRequest, BookingService},
        state::AppState,
        util::parse::{parse_date, parse_optional_date, parse_optional_field},
    },
};

pub static BOOKING_TAG: &str = "booking";

fn into_dtos(bookings: Vec<BookingWithCourt>) -> Vec<BookingDto> {
    bookings.into_iter().map(BookingWithCourt::into_dto).collect()
}

/// Requests a court booking. The owner is notified and must approve it.
#[utoipa::path(
    post,
    path = "/api/player/bookings",
    tag = BOOKING_TAG,
    request_body = CreateBookingDto,
    responses(
        (status = 201, description = "Pending booking created", body = BookingDto),
        (status = 400, description = "First failing booking rule", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a player", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_booking(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateBookingDto>,
) -> Result<impl IntoResponse, AppError> {
    let (user, player) = AuthGuard::new(&state.db, &session)
        .require_player()
        .await?;

    let booking = BookingService::new(&state.db, &state.email)
        .request_booking(&user, player.id, BookingRequest::from(payload), Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(booking.into_dto())))
}

/// Bookings the player made or partners in.
#[utoipa::path(
    get,
    path = "/api/player/bookings",
    tag = BOOKING_TAG,
    params(DateRangeParam),
    responses(
        (status = 200, description = "Bookings by date and start time", body = Vec<BookingDto>),
        (status = 400, description = "Malformed date", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a player", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_player_bookings(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<DateRangeParam>,
) -> Result<impl IntoResponse, AppError> {
    let (_, player) = AuthGuard::new(&state.db, &session)
        .require_player()
        .await?;

    let bookings = BookingService::new(&state.db, &state.email)
        .list_for_player(
            player.id,
            parse_optional_date(params.from.as_deref())?,
            parse_optional_date(params.to.as_deref())?,
        )
        .await?;

    Ok((StatusCode::OK, Json(into_dtos(bookings))))
}

/// Cancels a booking.
///
/// Players may cancel their own or partnered bookings and owners bookings on their courts,
/// both at least 24 hours ahead. Admins may cancel any booking at any time.
#[utoipa::path(
    post,
    path = "/api/bookings/{id}/cancel",
    tag = BOOKING_TAG,
    params(
        ("id" = i32, Path, description = "Booking ID")
    ),
    request_body = BookingReasonDto,
    responses(
        (status = 200, description = "Cancelled booking", body = BookingDto),
        (status = 400, description = "Booking cannot be cancelled", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Not allowed to cancel this booking", body = ErrorDto),
        (status = 404, description = "Booking not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<BookingReasonDto>,
) -> Result<impl IntoResponse, AppError> {
    let guard = AuthGuard::new(&state.db, &session);
    let (user, player_id) = match guard.require(&[]).await? {
        user if user.role == Role::Player => {
            let (user, player) = guard.require_player().await?;
            (user, Some(player.id))
        }
        user => (user, None),
    };

    let booking = BookingService::new(&state.db, &state.email)
        .cancel(&user, player_id, id, payload.reason, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(booking.into_dto())))
}

/// Bookings on the owner's courts.
#[utoipa::path(
    get,
    path = "/api/owner/bookings",
    tag = BOOKING_TAG,
    params(BookingListParam),
    responses(
        (status = 200, description = "Bookings by date and start time", body = Vec<BookingDto>),
        (status = 400, description = "Malformed status or date", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an owner", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_owner_bookings(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<BookingListParam>,
) -> Result<impl IntoResponse, AppError> {
    let owner = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Owner])
        .await?;

    let bookings = BookingService::new(&state.db, &state.email)
        .list_for_owner(
            owner.id,
            parse_optional_field(params.status.as_deref())?,
            parse_optional_date(params.from.as_deref())?,
            parse_optional_date(params.to.as_deref())?,
        )
        .await?;

    Ok((StatusCode::OK, Json(into_dtos(bookings))))
}

#[utoipa::path(
    post,
    path = "/api/owner/bookings/{id}/approve",
    tag = BOOKING_TAG,
    params(
        ("id" = i32, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Confirmed booking", body = BookingDto),
        (status = 400, description = "Booking is not pending or already started", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Court belongs to another owner", body = ErrorDto),
        (status = 404, description = "Booking not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn approve_booking(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let owner = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Owner])
        .await?;

    let booking = BookingService::new(&state.db, &state.email)
        .approve(owner.id, id, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(booking.into_dto())))
}

#[utoipa::path(
    post,
    path = "/api/owner/bookings/{id}/reject",
    tag = BOOKING_TAG,
    params(
        ("id" = i32, Path, description = "Booking ID")
    ),
    request_body = BookingReasonDto,
    responses(
        (status = 200, description = "Rejected booking", body = BookingDto),
        (status = 400, description = "Booking is not pending or already started", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Court belongs to another owner", body = ErrorDto),
        (status = 404, description = "Booking not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reject_booking(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<BookingReasonDto>,
) -> Result<impl IntoResponse, AppError> {
    let owner = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Owner])
        .await?;

    let booking = BookingService::new(&state.db, &state.email)
        .reject(owner.id, id, payload.reason, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(booking.into_dto())))
}

/// Calendar events for bookings on the owner's courts.
#[utoipa::path(
    get,
    path = "/api/owner/calendar",
    tag = BOOKING_TAG,
    params(CalendarParam),
    responses(
        (status = 200, description = "Events in the window", body = Vec<CalendarEventDto>),
        (status = 400, description = "Malformed date", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an owner", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_owner_calendar(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CalendarParam>,
) -> Result<impl IntoResponse, AppError> {
    let owner = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Owner])
        .await?;

    let events = BookingService::new(&state.db, &state.email)
        .owner_calendar(owner.id, parse_date(&params.start)?, parse_date(&params.end)?)
        .await?;

    let dto: Vec<CalendarEventDto> = events.into_iter().map(|e| e.into_dto()).collect();

    Ok((StatusCode::OK, Json(dto)))
}
