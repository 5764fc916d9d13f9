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
        court::{
            CourtAlternativesDto, CourtAvailabilityDto, CourtDto, CreateCourtDto, UpdateCourtDto,
        },
    },
    server::{
        controller::param::{AvailabilityParam, CourtSearchParam, SlotParam},
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::court::{
            Court, CourtFilter, CreateCourtParam, SlotAlternative, TimeSlot, UpdateCourtParam,
        },
        service::court::CourtService,
        state::AppState,
        util::parse::format_date,
    },
};

pub static COURT_TAG: &str = "court";

const DEFAULT_SLOT_DURATION_HOURS: u32 = 1;

fn into_dtos(courts: Vec<Court>) -> Vec<CourtDto> {
    courts.into_iter().map(Court::into_dto).collect()
}

/// Active courts matching the optional filters, cheapest first.
#[utoipa::path(
    get,
    path = "/api/courts",
    tag = COURT_TAG,
    params(CourtSearchParam),
    responses(
        (status = 200, description = "Matching courts", body = Vec<CourtDto>),
        (status = 400, description = "Unknown court type or surface", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn search_courts(
    State(state): State<AppState>,
    Query(params): Query<CourtSearchParam>,
) -> Result<impl IntoResponse, AppError> {
    let filter = CourtFilter::try_from(params)?;

    let courts = CourtService::new(&state.db, &state.geocoder)
        .search(&filter)
        .await?;

    Ok((StatusCode::OK, Json(into_dtos(courts))))
}

#[utoipa::path(
    get,
    path = "/api/courts/{id}",
    tag = COURT_TAG,
    params(
        ("id" = i32, Path, description = "Court ID")
    ),
    responses(
        (status = 200, description = "Court details", body = CourtDto),
        (status = 404, description = "Court not found or inactive", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_court(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let court = CourtService::new(&state.db, &state.geocoder)
        .get(id, false)
        .await?;

    Ok((StatusCode::OK, Json(court.into_dto())))
}

/// Free slots on a date, priced with weekend, peak-hour and demand adjustments.
#[utoipa::path(
    get,
    path = "/api/courts/{id}/availability",
    tag = COURT_TAG,
    params(
        ("id" = i32, Path, description = "Court ID"),
        AvailabilityParam
    ),
    responses(
        (status = 200, description = "Free slots", body = CourtAvailabilityDto),
        (status = 400, description = "Malformed date or duration out of range", body = ErrorDto),
        (status = 404, description = "Court not found or inactive", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<AvailabilityParam>,
) -> Result<impl IntoResponse, AppError> {
    let duration_hours = params.duration.unwrap_or(DEFAULT_SLOT_DURATION_HOURS);

    let (date, slots) = CourtService::new(&state.db, &state.geocoder)
        .availability(id, &params.date, duration_hours)
        .await?;

    let dto = CourtAvailabilityDto {
        court_id: id,
        date: format_date(date),
        duration_hours,
        slots: slots.into_iter().map(TimeSlot::into_dto).collect(),
    };

    Ok((StatusCode::OK, Json(dto)))
}

/// Nearby free slots of the same length when a requested slot is taken.
#[utoipa::path(
    get,
    path = "/api/courts/{id}/alternatives",
    tag = COURT_TAG,
    params(
        ("id" = i32, Path, description = "Court ID"),
        SlotParam
    ),
    responses(
        (status = 200, description = "Up to three alternatives, nearest first", body = CourtAlternativesDto),
        (status = 400, description = "Malformed date or time, or end not after start", body = ErrorDto),
        (status = 404, description = "Court not found or inactive", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_alternatives(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<SlotParam>,
) -> Result<impl IntoResponse, AppError> {
    let (date, alternatives) = CourtService::new(&state.db, &state.geocoder)
        .alternatives(id, &params.date, &params.start_time, &params.end_time)
        .await?;

    let dto = CourtAlternativesDto {
        court_id: id,
        date: format_date(date),
        alternatives: alternatives
            .into_iter()
            .map(SlotAlternative::into_dto)
            .collect(),
    };

    Ok((StatusCode::OK, Json(dto)))
}

#[utoipa::path(
    post,
    path = "/api/owner/courts",
    tag = COURT_TAG,
    request_body = CreateCourtDto,
    responses(
        (status = 201, description = "Court created", body = CourtDto),
        (status = 400, description = "First failing court rule", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a court owner", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_court(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateCourtDto>,
) -> Result<impl IntoResponse, AppError> {
    let owner = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Owner])
        .await?;

    let param = CreateCourtParam::from_dto(owner.id, payload)?;
    let court = CourtService::new(&state.db, &state.geocoder)
        .create(param)
        .await?;

    Ok((StatusCode::CREATED, Json(court.into_dto())))
}

/// All of the owner's courts, including deactivated ones.
#[utoipa::path(
    get,
    path = "/api/owner/courts",
    tag = COURT_TAG,
    responses(
        (status = 200, description = "Owner's courts", body = Vec<CourtDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a court owner", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_owner_courts(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let owner = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Owner])
        .await?;

    let courts = CourtService::new(&state.db, &state.geocoder)
        .list_for_owner(owner.id)
        .await?;

    Ok((StatusCode::OK, Json(into_dtos(courts))))
}

#[utoipa::path(
    put,
    path = "/api/owner/courts/{id}",
    tag = COURT_TAG,
    params(
        ("id" = i32, Path, description = "Court ID")
    ),
    request_body = UpdateCourtDto,
    responses(
        (status = 200, description = "Updated court", body = CourtDto),
        (status = 400, description = "Edit breaks a court rule", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Court belongs to another owner", body = ErrorDto),
        (status = 404, description = "Court not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_court(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCourtDto>,
) -> Result<impl IntoResponse, AppError> {
    let owner = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Owner])
        .await?;

    let param = UpdateCourtParam::try_from(payload)?;
    let court = CourtService::new(&state.db, &state.geocoder)
        .update(owner.id, id, param)
        .await?;

    Ok((StatusCode::OK, Json(court.into_dto())))
}
