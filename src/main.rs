mod model;
mod server;

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::server::{
    config::Config,
    error::AppError,
    router,
    scheduler::proposal_expiry,
    service::{admin::code::AdminCodeService, email::EmailService, geo::Geocoder},
    startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let session = startup::connect_to_session(&db).await?;
    let http_client = startup::setup_reqwest_client()?;

    let geocoder = Geocoder::new(
        http_client.clone(),
        config.opencage_api_key.clone(),
        config.opencage_url.clone(),
    );
    let email = EmailService::new(http_client.clone(), &config);

    let admin_code_service = AdminCodeService::new();

    tracing::info!("Starting server");

    // Check for admin users and generate a registration code if none exist
    startup::check_for_admin(&db, &config, &admin_code_service).await?;

    let scheduler_db = db.clone();
    tokio::spawn(async move {
        if let Err(e) = proposal_expiry::start_scheduler(scheduler_db).await {
            tracing::error!("Proposal expiry scheduler error: {}", e);
        }
    });

    let app = router::router(&config.app_url)?
        .with_state(AppState::new(
            db,
            http_client,
            geocoder,
            email,
            admin_code_service,
            config.app_url.clone(),
        ))
        .layer(session);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::InternalError(format!("Server error: {e}")))?;

    Ok(())
}

/// `RUST_LOG` from the environment or `.env`, defaulting to `info`.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_reads_dotenv_level() {
        dotenvy::from_read_override("RUST_LOG=courtmatch=debug\n".as_bytes()).unwrap();

        assert_eq!(log_filter().to_string(), "courtmatch=debug");
    }
}
