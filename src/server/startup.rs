use time::Duration;
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::server::{
    config::Config, data::user::UserRepository, error::AppError,
    service::admin::code::AdminCodeService,
};

/// Days of inactivity after which a login session expires.
const SESSION_INACTIVITY_DAYS: i64 = 7;

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then runs all pending SeaORM migrations so the schema is current before
/// any request is served.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Creates the session layer backed by the application database.
///
/// Sessions live in the same Sqlite file as the application data and expire after
/// `SESSION_INACTIVITY_DAYS` without a request.
///
/// # Returns
/// - `Ok(SessionManagerLayer)` - Layer to wrap the router with
/// - `Err(AppError::DbErr)` - Session table migration failed
pub async fn connect_to_session(
    db: &sea_orm::DatabaseConnection,
) -> Result<SessionManagerLayer<SqliteStore>, AppError> {
    let pool = db.get_sqlite_connection_pool();
    let session_store = SqliteStore::new(pool.clone());

    session_store
        .migrate()
        .await
        .map_err(|e| sea_orm::DbErr::Custom(e.to_string()))?;

    Ok(SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(SESSION_INACTIVITY_DAYS))))
}

/// HTTP client for the geocoding and email providers.
///
/// Redirects are disabled so API keys are never forwarded to another host.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    Ok(reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(std::time::Duration::from_secs(10))
        .build()?)
}

/// Generates a one-time admin registration code when no admin account exists.
///
/// The code is logged together with the registration endpoint. It expires after
/// `ADMIN_CODE_TTL`; restarting the server issues a fresh one.
pub async fn check_for_admin(
    db: &sea_orm::DatabaseConnection,
    config: &Config,
    admin_code_service: &AdminCodeService,
) -> Result<(), AppError> {
    if UserRepository::new(db).admin_exists().await? {
        return Ok(());
    }

    let code = admin_code_service.generate().await;

    tracing::info!(
        "No admin account exists. Register at {}/api/auth/register with role \"admin\" and admin_code \"{}\"",
        config.app_url.trim_end_matches('/'),
        code
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{builder::TestBuilder, factory};

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            bind_address: "127.0.0.1:0".to_string(),
            app_url: "http://localhost:8080".to_string(),
            opencage_api_key: None,
            opencage_url: String::new(),
            sendgrid_api_key: None,
            sendgrid_from_email: None,
            sendgrid_url: String::new(),
        }
    }

    /// Tests startup against a database without any admin.
    ///
    /// Expected: Ok with a valid code generated
    #[tokio::test]
    async fn generates_code_without_admin() -> Result<(), AppError> {
        let test = TestBuilder::new().with_account_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let codes = AdminCodeService::new();

        check_for_admin(db, &test_config(), &codes).await?;

        assert!(codes.has_valid_code().await);

        Ok(())
    }

    /// Tests startup once an admin account exists.
    ///
    /// Expected: Ok with no code generated
    #[tokio::test]
    async fn skips_code_when_admin_exists() -> Result<(), AppError> {
        let test = TestBuilder::new().with_account_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        factory::create_admin(db).await?;
        let codes = AdminCodeService::new();

        check_for_admin(db, &test_config(), &codes).await?;

        assert!(!codes.has_valid_code().await);

        Ok(())
    }

    #[test]
    fn test_sessions_expire_like_server_sessions() {
        assert_eq!(
            test_utils::context::SESSION_INACTIVITY_DAYS,
            SESSION_INACTIVITY_DAYS
        );
    }
}
