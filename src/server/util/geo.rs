//! Great-circle distance helpers.

use crate::server::util::parse::round2;

/// Mean earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds coordinates only when both halves are present.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        Some(Self::new(latitude?, longitude?))
    }

    /// Point halfway between two coordinates, averaged per axis.
    ///
    /// Adequate for the city-scale distances between two players.
    pub fn midpoint(&self, other: &Coordinates) -> Coordinates {
        Coordinates::new(
            (self.latitude + other.latitude) / 2.0,
            (self.longitude + other.longitude) / 2.0,
        )
    }
}

/// Haversine distance between two points, rounded to two decimals.
///
/// # Arguments
/// - `a` - First point
/// - `b` - Second point
///
/// # Returns
/// - `f64` - Distance in kilometres
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    round2(EARTH_RADIUS_KM * c)
}

/// Distance between two optional points, `None` when either side lacks coordinates.
pub fn distance_between(a: Option<Coordinates>, b: Option<Coordinates>) -> Option<f64> {
    Some(haversine_km(a?, b?))
}
