//! Forward geocoding through OpenCage with an in-memory cache.
//!
//! Lookups are keyed by the lowercased, trimmed location text. Without an API key the
//! geocoder is disabled and every lookup returns `None`, so callers fall back to text
//! location matching.

use std::{collections::HashMap, sync::Arc};

use serde::Deserialize;
use tokio::sync::RwLock;
use url::Url;

use crate::server::{error::AppError, util::geo::Coordinates};

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

#[derive(Clone)]
pub struct Geocoder {
    http_client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    cache: Arc<RwLock<HashMap<String, Option<Coordinates>>>>,
}

impl Geocoder {
    pub fn new(http_client: reqwest::Client, api_key: Option<String>, base_url: String) -> Self {
        Self {
            http_client,
            api_key,
            base_url,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// A geocoder that never calls out, for tests and deployments without a key.
    pub fn disabled(http_client: reqwest::Client) -> Self {
        Self::new(http_client, None, String::new())
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Resolves a free-text location to coordinates.
    ///
    /// Both hits and misses are cached. Empty locations are never looked up.
    ///
    /// # Arguments
    /// - `location` - Free-text place such as a city or address
    ///
    /// # Returns
    /// - `Ok(Some(Coordinates))` - First result from the provider
    /// - `Ok(None)` - Geocoding disabled, empty input or no result
    /// - `Err(AppError)` - The request failed or the response could not be parsed
    pub async fn geocode(&self, location: &str) -> Result<Option<Coordinates>, AppError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(None);
        };

        let key = cache_key(location);
        if key.is_empty() {
            return Ok(None);
        }

        if let Some(cached) = self.cache.read().await.get(&key) {
            return Ok(*cached);
        }

        let url = Url::parse_with_params(
            &self.base_url,
            &[("q", location.trim()), ("key", api_key), ("limit", "1")],
        )
        .map_err(|e| AppError::InternalError(format!("Invalid geocoding URL: {}", e)))?;

        let response: GeocodeResponse = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let coordinates = response
            .results
            .first()
            .map(|r| Coordinates::new(r.geometry.lat, r.geometry.lng));

        tracing::debug!("Geocoded '{}' to {:?}", key, coordinates);
        self.cache.write().await.insert(key, coordinates);

        Ok(coordinates)
    }

    /// Like `geocode` but logs failures and returns `None` instead.
    ///
    /// Used where a missing position only degrades scoring.
    pub async fn geocode_or_none(&self, location: &str) -> Option<Coordinates> {
        match self.geocode(location).await {
            Ok(coordinates) => coordinates,
            Err(e) => {
                tracing::warn!("Geocoding '{}' failed: {}", location.trim(), e);
                None
            }
        }
    }
}

fn cache_key(location: &str) -> String {
    location.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_geocoder_returns_none() {
        let geocoder = Geocoder::disabled(reqwest::Client::new());

        assert!(!geocoder.is_enabled());
        assert_eq!(geocoder.geocode("Tel Aviv").await.unwrap(), None);
    }

    #[tokio::test]
    async fn serves_cached_results_without_network() {
        let geocoder = Geocoder::new(
            reqwest::Client::new(),
            Some("key".to_string()),
            "http://127.0.0.1:9/unreachable".to_string(),
        );
        geocoder
            .cache
            .write()
            .await
            .insert("tel aviv".to_string(), Some(Coordinates::new(32.08, 34.78)));

        let coordinates = geocoder.geocode("  Tel Aviv ").await.unwrap();
        assert_eq!(coordinates, Some(Coordinates::new(32.08, 34.78)));
    }

    #[test]
    fn parses_provider_response() {
        let body = r#"{"results":[{"geometry":{"lat":31.77,"lng":35.21}}],"status":{"code":200}}"#;
        let response: GeocodeResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.results[0].geometry.lat, 31.77);
        assert_eq!(response.results[0].geometry.lng, 35.21);
    }
}
