//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{City, Coordinate, FuelType, InputError, Radius, Station, find_city};
use crate::landuse::{LandUseCounts, TrafficLevel};
use crate::normalize::{BrandStyle, SkipCounts};
use crate::summary::StationSummary;

/// Radius used when the request names none.
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Where to search.
///
/// A preset city wins over a custom coordinate; `radius_km` wins over
/// `radius_m`.
#[derive(Debug, Default, Deserialize)]
pub struct LocationRequest {
    /// Preset city name
    pub city: Option<String>,

    /// Custom center latitude
    pub lat: Option<f64>,

    /// Custom center longitude
    pub lon: Option<f64>,

    /// Radius in metres
    pub radius_m: Option<f64>,

    /// Radius in kilometres
    pub radius_km: Option<f64>,
}

/// Result of resolving a [`LocationRequest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Location {
    Resolved(Coordinate, Radius),
    /// Neither a city nor a coordinate was given
    Missing,
}

impl LocationRequest {
    /// Resolve the center and radius, validating both.
    pub fn resolve(&self) -> Result<Location, InputError> {
        let radius = match (self.radius_km, self.radius_m) {
            (Some(km), _) => Radius::kilometers(km)?,
            (None, Some(m)) => Radius::meters(m)?,
            (None, None) => Radius::kilometers(DEFAULT_RADIUS_KM)?,
        };

        let city = self.city.as_deref().map(str::trim).filter(|c| !c.is_empty());
        let center = match (city, self.lat, self.lon) {
            (Some(name), _, _) => find_city(name)
                .ok_or_else(|| InputError::UnknownCity(name.to_string()))?
                .coordinate()?,
            (None, Some(lat), Some(lon)) => Coordinate::new(lat, lon)?,
            (None, Some(_), None) | (None, None, Some(_)) => {
                return Err(InputError::PartialCoordinate);
            }
            (None, None, None) => return Ok(Location::Missing),
        };

        Ok(Location::Resolved(center, radius))
    }
}

/// Filters for a station search.
///
/// Read from the same query string as [`LocationRequest`].
#[derive(Debug, Default, Deserialize)]
pub struct StationsRequest {
    /// Keep only this brand; empty means all
    pub brand: Option<String>,

    /// Keep only stations this close
    pub max_distance_km: Option<f64>,

    /// distance, name or brand
    pub sort: Option<String>,
}

/// A station with its brand display style.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub name: String,
    pub brand: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    pub distance_km: Option<f64>,
    pub fuel_types: Vec<FuelType>,
    pub phone: String,
    pub website: String,
    pub opening_hours: String,
    pub style: BrandStyle,
}

impl StationResult {
    pub fn from_station(station: &Station, style: BrandStyle) -> Self {
        Self {
            name: station.name.clone(),
            brand: station.brand.clone(),
            address: station.address.clone(),
            lat: station.coordinate.lat(),
            lon: station.coordinate.lon(),
            distance_km: station.distance_km,
            fuel_types: station.fuel_types.iter().copied().collect(),
            phone: station.phone.clone(),
            website: station.website.clone(),
            opening_hours: station.opening_hours.clone(),
            style,
        }
    }
}

/// Response for a station search.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub center: Coordinate,
    pub radius_km: f64,

    /// Stations after filtering and sorting
    pub stations: Vec<StationResult>,

    /// Figures over the filtered stations
    pub summary: StationSummary,

    /// Brands present before filtering, for a brand picker
    pub brands: Vec<String>,

    /// Elements dropped during normalization
    pub skipped: SkipCounts,

    /// Set when no station matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response for a land-use search.
#[derive(Debug, Serialize)]
pub struct LandUseResponse {
    pub center: Coordinate,
    pub radius_km: f64,
    pub counts: LandUseCounts,
    pub population_estimate: u64,
    pub traffic: TrafficLevel,
    pub traffic_description: &'static str,
}

/// A preset city.
#[derive(Debug, Serialize)]
pub struct CityResult {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl From<&City> for CityResult {
    fn from(city: &City) -> Self {
        Self {
            name: city.name,
            lat: city.lat,
            lon: city.lon,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
