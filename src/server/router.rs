//! Route table and OpenAPI document.
//!
//! Handlers are registered through `OpenApiRouter` so every route lands in the generated
//! document, served by Swagger UI at `/api/docs`.

use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    controller::{
        admin::{self, ADMIN_TAG},
        auth::{self, AUTH_TAG},
        booking::{self, BOOKING_TAG},
        chat::{self, CHAT_TAG},
        court::{self, COURT_TAG},
        matching::{self, MATCHING_TAG},
        owner::{self, OWNER_TAG},
        player::{self, PLAYER_TAG},
        shared_booking::{self, SHARED_BOOKING_TAG},
        user::{self, USER_TAG},
    },
    error::{config::ConfigError, AppError},
    state::AppState,
};

/// Login and registration attempts allowed per client before throttling.
const AUTH_BURST_SIZE: u32 = 10;
/// Seconds for one throttled attempt to be replenished.
const AUTH_REPLENISH_SECONDS: u64 = 6;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CourtMatch API",
        description = "Tennis court booking, player matching and messaging"
    ),
    tags(
        (name = AUTH_TAG, description = "Registration, login and the current user"),
        (name = USER_TAG, description = "Account settings"),
        (name = PLAYER_TAG, description = "Player dashboard, profile and calendar"),
        (name = COURT_TAG, description = "Court listings and owner court management"),
        (name = BOOKING_TAG, description = "Booking requests and owner approval"),
        (name = SHARED_BOOKING_TAG, description = "Two-player booking proposals"),
        (name = MATCHING_TAG, description = "Partner matching and court recommendations"),
        (name = CHAT_TAG, description = "Conversations and polling-based messages"),
        (name = OWNER_TAG, description = "Owner dashboard and revenue analytics"),
        (name = ADMIN_TAG, description = "User and court moderation, platform statistics")
    )
)]
struct ApiDoc;

/// Builds the API router with its OpenAPI document and Swagger UI.
///
/// Login and registration are rate limited per client IP, so the server must be run with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// # Arguments
/// - `app_url` - Browser origin allowed to make credentialed CORS requests
///
/// # Returns
/// - `Ok(Router<AppState>)` - Router awaiting its state
/// - `Err(AppError::ConfigErr)` - `app_url` is not a valid origin header
/// - `Err(AppError::InternalError)` - Rate limiter configuration rejected
pub fn router(app_url: &str) -> Result<Router<AppState>, AppError> {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(auth_routes()?)
        .routes(routes!(auth::logout))
        .routes(routes!(auth::get_user))
        .routes(routes!(user::update_profile))
        .merge(player_routes())
        .merge(court_routes())
        .merge(booking_routes())
        .merge(shared_booking_routes())
        .merge(chat_routes())
        .merge(owner_routes())
        .merge(admin_routes())
        .split_for_parts();

    let router = router
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
        .layer(cors_layer(app_url)?);

    Ok(router)
}

fn auth_routes() -> Result<OpenApiRouter<AppState>, AppError> {
    let governor_config = GovernorConfigBuilder::default()
        .per_second(AUTH_REPLENISH_SECONDS)
        .burst_size(AUTH_BURST_SIZE)
        .finish()
        .ok_or_else(|| AppError::InternalError("Invalid rate limiter configuration".to_string()))?;

    Ok(OpenApiRouter::new()
        .routes(routes!(auth::register))
        .routes(routes!(auth::login))
        .layer(GovernorLayer::new(Arc::new(governor_config))))
}

fn player_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(player::get_dashboard))
        .routes(routes!(player::update_profile))
        .routes(routes!(player::get_calendar))
        .routes(routes!(matching::find_matches))
        .routes(routes!(matching::suggest_partners))
        .routes(routes!(matching::recommend_courts))
}

fn court_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(court::search_courts))
        .routes(routes!(court::get_court))
        .routes(routes!(court::get_availability))
        .routes(routes!(court::get_alternatives))
        .routes(routes!(court::create_court, court::get_owner_courts))
        .routes(routes!(court::update_court))
}

fn booking_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(booking::create_booking, booking::get_player_bookings))
        .routes(routes!(booking::cancel_booking))
        .routes(routes!(booking::get_owner_bookings))
        .routes(routes!(booking::approve_booking))
        .routes(routes!(booking::reject_booking))
        .routes(routes!(booking::get_owner_calendar))
}

fn shared_booking_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(shared_booking::propose, shared_booking::get_shared_bookings))
        .routes(routes!(shared_booking::get_pending))
        .routes(routes!(shared_booking::respond))
        .routes(routes!(shared_booking::finalize))
        .routes(routes!(shared_booking::cancel))
        .routes(routes!(shared_booking::suggest_courts))
}

fn chat_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(chat::get_conversations, chat::start_conversation))
        .routes(routes!(chat::start_support))
        .routes(routes!(chat::get_users))
        .routes(routes!(chat::get_messages, chat::send_message))
        .routes(routes!(chat::mark_read))
        .routes(routes!(chat::get_unread_count))
}

fn owner_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(owner::get_dashboard))
        .routes(routes!(owner::get_analytics))
        .routes(routes!(owner::get_monthly_revenue))
        .routes(routes!(owner::get_financial_report))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(admin::get_users))
        .routes(routes!(admin::toggle_user))
        .routes(routes!(admin::toggle_court))
        .routes(routes!(admin::get_stats))
        .routes(routes!(admin::get_shared_booking_stats))
}

/// Allows the configured front-end origin to call the API with the session cookie.
fn cors_layer(app_url: &str) -> Result<CorsLayer, AppError> {
    let origin = app_url.trim_end_matches('/').parse().map_err(
        |e: axum::http::header::InvalidHeaderValue| {
            ConfigError::InvalidEnvVar {
                name: "APP_URL".to_string(),
                reason: e.to_string(),
            }
        },
    )?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_every_tag() {
        let doc = ApiDoc::openapi();
        let tags = doc.tags.unwrap_or_default();

        assert_eq!(tags.len(), 10);
        assert!(tags.iter().any(|t| t.name == SHARED_BOOKING_TAG));
    }

    #[test]
    fn rejects_invalid_cors_origin() {
        assert!(cors_layer("http://localhost:8080").is_ok());
        assert!(cors_layer("bad\norigin").is_err());
    }
}
