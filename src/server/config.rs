use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_APP_URL: &str = "http://localhost:8080";

const OPENCAGE_GEOCODE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";
const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub app_url: String,

    pub opencage_api_key: Option<String>,
    pub opencage_url: String,

    pub sendgrid_api_key: Option<String>,
    pub sendgrid_from_email: Option<String>,
    pub sendgrid_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?,
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
            app_url: std::env::var("APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.to_string()),
            opencage_api_key: optional_var("OPENCAGE_API_KEY"),
            opencage_url: OPENCAGE_GEOCODE_URL.to_string(),
            sendgrid_api_key: optional_var("SENDGRID_API_KEY"),
            sendgrid_from_email: optional_var("SENDGRID_FROM_EMAIL"),
            sendgrid_url: SENDGRID_SEND_URL.to_string(),
        })
    }

    /// Parses the bind address into a socket address.
    ///
    /// # Returns
    /// - `Ok(SocketAddr)` - Address to listen on
    /// - `Err(AppError::ConfigErr(InvalidEnvVar))` - `BIND_ADDRESS` is not `host:port`
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, AppError> {
        self.bind_address.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::InvalidEnvVar {
                name: "BIND_ADDRESS".to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Reads an optional variable, treating empty values as unset.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
