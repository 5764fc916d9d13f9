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
        matching::{CourtRecommendationDto, MatchResultsDto, PlayerMatchDto},
    },
    server::{
        controller::param::{CourtRecommendationParam, LimitParam, MatchParam},
        error::AppError,
        middleware::auth::AuthGuard,
        model::matching::{
            CourtRecommendation, CourtRecommendationFilters, MatchFilters, PlayerMatch,
        },
        service::matching::MatchingService,
        state::AppState,
    },
};

pub static MATCHING_TAG: &str = "matching";

/// Ranks other players by compatibility with the requesting player.
///
/// The response reports the radius that was finally searched and whether it had to be
/// widened to find anyone.
#[utoipa::path(
    get,
    path = "/api/player/matches",
    tag = MATCHING_TAG,
    params(MatchParam),
    responses(
        (status = 200, description = "Matches with score breakdowns", body = MatchResultsDto),
        (status = 400, description = "Unknown skill level or availability", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a player", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn find_matches(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<MatchParam>,
) -> Result<impl IntoResponse, AppError> {
    let (_, player) = AuthGuard::new(&state.db, &session)
        .require_player()
        .await?;

    let results = MatchingService::new(&state.db)
        .find_matches(player.id, MatchFilters::try_from(params)?)
        .await?;

    Ok((StatusCode::OK, Json(results.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/player/partner-suggestions",
    tag = MATCHING_TAG,
    params(LimitParam),
    responses(
        (status = 200, description = "Highly compatible players with a reason each", body = Vec<PlayerMatchDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a player", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn suggest_partners(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<LimitParam>,
) -> Result<impl IntoResponse, AppError> {
    let (_, player) = AuthGuard::new(&state.db, &session)
        .require_player()
        .await?;

    let partners = MatchingService::new(&state.db)
        .suggest_partners(player.id, params.limit.unwrap_or_default())
        .await?;

    let dto: Vec<PlayerMatchDto> = partners.into_iter().map(PlayerMatch::into_dto).collect();

    Ok((StatusCode::OK, Json(dto)))
}

#[utoipa::path(
    get,
    path = "/api/player/court-recommendations",
    tag = MATCHING_TAG,
    params(CourtRecommendationParam),
    responses(
        (status = 200, description = "Scored courts in the requested order", body = Vec<CourtRecommendationDto>),
        (status = 400, description = "Malformed filter", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a player", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn recommend_courts(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CourtRecommendationParam>,
) -> Result<impl IntoResponse, AppError> {
    let (_, player) = AuthGuard::new(&state.db, &session)
        .require_player()
        .await?;

    let courts = MatchingService::new(&state.db)
        .recommend_courts(player.id, CourtRecommendationFilters::try_from(params)?)
        .await?;

    let dto: Vec<CourtRecommendationDto> = courts
        .into_iter()
        .map(CourtRecommendation::into_dto)
        .collect();

    Ok((StatusCode::OK, Json(dto)))
}
