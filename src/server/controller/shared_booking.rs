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
        shared_booking::{
            CourtSuggestionDto, ProposeSharedBookingDto, RespondSharedBookingDto,
            SharedBookingDto,
        },
    },
    server::{
        controller::param::{CourtSuggestionParam, SharedBookingListParam},
        error::AppError,
        middleware::auth::AuthGuard,
        model::shared_booking::{ProposalResponse, SharedBooking},
        service::shared_booking::{ProposalRequest, SharedBookingService},
        state::AppState,
    },
};

pub static SHARED_BOOKING_TAG: &str = "shared_booking";

const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Proposes a joint booking to another player, who has 48 hours to respond.
#[utoipa::path(
    post,
    path = "/api/player/shared-bookings",
    tag = SHARED_BOOKING_TAG,
    request_body = ProposeSharedBookingDto,
    responses(
        (status = 201, description = "Proposal created", body = SharedBookingDto),
        (status = 400, description = "Invalid slot or a proposal is already pending", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a player", body = ErrorDto),
        (status = 404, description = "Partner or court not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn propose(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ProposeSharedBookingDto>,
) -> Result<impl IntoResponse, AppError> {
    let (user, player) = AuthGuard::new(&state.db, &session)
        .require_player()
        .await?;

    let proposal = SharedBookingService::new(&state.db, &state.email)
        .propose(user.id, player.id, ProposalRequest::from(payload), Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(proposal.into_dto(Some(player.id)))))
}

/// Proposals the player initiated or received, newest first.
#[utoipa::path(
    get,
    path = "/api/player/shared-bookings",
    tag = SHARED_BOOKING_TAG,
    params(SharedBookingListParam),
    responses(
        (status = 200, description = "Proposals with the viewer's role", body = Vec<SharedBookingDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a player", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_shared_bookings(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<SharedBookingListParam>,
) -> Result<impl IntoResponse, AppError> {
    let (_, player) = AuthGuard::new(&state.db, &session)
        .require_player()
        .await?;

    let proposals = SharedBookingService::new(&state.db, &state.email)
        .list_for_player(player.id, params.include_expired.unwrap_or(false))
        .await?;

    Ok((StatusCode::OK, Json(into_dtos(proposals, player.id))))
}

/// Unexpired proposals waiting on this player's response.
#[utoipa::path(
    get,
    path = "/api/player/shared-bookings/pending",
    tag = SHARED_BOOKING_TAG,
    responses(
        (status = 200, description = "Pending proposals", body = Vec<SharedBookingDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a player", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_pending(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let (_, player) = AuthGuard::new(&state.db, &session)
        .require_player()
        .await?;

    let proposals = SharedBookingService::new(&state.db, &state.email)
        .pending_for_player(player.id, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(into_dtos(proposals, player.id))))
}

/// Accepts, declines or counter-proposes a received proposal.
#[utoipa::path(
    post,
    path = "/api/player/shared-bookings/{id}/respond",
    tag = SHARED_BOOKING_TAG,
    params(
        ("id" = i32, Path, description = "Shared booking ID")
    ),
    request_body = RespondSharedBookingDto,
    responses(
        (status = 200, description = "Updated proposal", body = SharedBookingDto),
        (status = 400, description = "Invalid action, or proposal no longer active", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Player is not the recipient", body = ErrorDto),
        (status = 404, description = "Proposal not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn respond(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<RespondSharedBookingDto>,
) -> Result<impl IntoResponse, AppError> {
    let (_, player) = AuthGuard::new(&state.db, &session)
        .require_player()
        .await?;

    let proposal = SharedBookingService::new(&state.db, &state.email)
        .respond(id, player.id, ProposalResponse::try_from(payload)?, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(proposal.into_dto(Some(player.id)))))
}

/// Books the court for an agreed proposal.
///
/// Either player may finalize an accepted proposal; only the initiator may finalize
/// a counter-proposal.
#[utoipa::path(
    post,
    path = "/api/player/shared-bookings/{id}/finalize",
    tag = SHARED_BOOKING_TAG,
    params(
        ("id" = i32, Path, description = "Shared booking ID")
    ),
    responses(
        (status = 200, description = "Confirmed proposal with its booking", body = SharedBookingDto),
        (status = 400, description = "Proposal not agreed or slot no longer valid", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Player may not finalize this proposal", body = ErrorDto),
        (status = 404, description = "Proposal not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn finalize(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let (user, player) = AuthGuard::new(&state.db, &session)
        .require_player()
        .await?;

    let proposal = SharedBookingService::new(&state.db, &state.email)
        .finalize(user.id, id, player.id, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(proposal.into_dto(Some(player.id)))))
}

#[utoipa::path(
    post,
    path = "/api/player/shared-bookings/{id}/cancel",
    tag = SHARED_BOOKING_TAG,
    params(
        ("id" = i32, Path, description = "Shared booking ID")
    ),
    responses(
        (status = 200, description = "Cancelled proposal", body = SharedBookingDto),
        (status = 400, description = "Proposal already settled", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Player is not part of this proposal", body = ErrorDto),
        (status = 404, description = "Proposal not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn cancel(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let (_, player) = AuthGuard::new(&state.db, &session)
        .require_player()
        .await?;

    let proposal = SharedBookingService::new(&state.db, &state.email)
        .cancel(id, player.id)
        .await?;

    Ok((StatusCode::OK, Json(proposal.into_dto(Some(player.id)))))
}

/// Courts that are a fair meeting point for the player and a partner.
#[utoipa::path(
    get,
    path = "/api/player/shared-bookings/court-suggestions",
    tag = SHARED_BOOKING_TAG,
    params(CourtSuggestionParam),
    responses(
        (status = 200, description = "Courts by score", body = Vec<CourtSuggestionDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a player", body = ErrorDto),
        (status = 404, description = "Partner not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn suggest_courts(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CourtSuggestionParam>,
) -> Result<impl IntoResponse, AppError> {
    let (_, player) = AuthGuard::new(&state.db, &session)
        .require_player()
        .await?;

    let suggestions = SharedBookingService::new(&state.db, &state.email)
        .suggest_courts(
            player.id,
            params.partner_player_id,
            params.limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT),
        )
        .await?;

    let dto: Vec<CourtSuggestionDto> = suggestions.into_iter().map(|s| s.into_dto()).collect();

    Ok((StatusCode::OK, Json(dto)))
}

fn into_dtos(proposals: Vec<SharedBooking>, viewer_player_id: i32) -> Vec<SharedBookingDto> {
    proposals
        .into_iter()
        .map(|p| p.into_dto(Some(viewer_player_id)))
        .collect()
}
