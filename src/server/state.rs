//! Application state shared across all request handlers.
//!
//! `AppState` is built once during startup and cloned into each handler through Axum's
//! state extraction. Every field is cheap to clone: the database connection is a pool,
//! `reqwest::Client` and the service caches are reference-counted.

use sea_orm::DatabaseConnection;

use super::service::{admin::code::AdminCodeService, email::EmailService, geo::Geocoder};

#[derive(Clone)]
pub struct AppState {
    /// Connection pool for the SQLite database.
    pub db: DatabaseConnection,

    /// HTTP client for external APIs, configured without redirects.
    pub http_client: reqwest::Client,

    /// OpenCage geocoder with its lookup cache.
    pub geocoder: Geocoder,

    /// SendGrid email sender.
    pub email: EmailService,

    /// One-time admin bootstrap code, used while no admin exists.
    pub admin_code_service: AdminCodeService,

    /// Application base URL for links in emails and logs.
    pub app_url: String,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        http_client: reqwest::Client,
        geocoder: Geocoder,
        email: EmailService,
        admin_code_service: AdminCodeService,
        app_url: String,
    ) -> Self {
        Self {
            db,
            http_client,
            geocoder,
            email,
            admin_code_service,
            app_url,
        }
    }
}
