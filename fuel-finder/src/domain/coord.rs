//! Geographic coordinates and great-circle distance.

use std::fmt;

use serde::Serialize;

/// Mean earth radius in kilometres (IUGG).
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Scale applied before rounding a coordinate into a dedup key (6 decimal places).
const KEY_SCALE: f64 = 1_000_000.0;

/// Error returned when a latitude/longitude pair is out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidCoordinate {
    reason: &'static str,
}

/// A validated WGS84 point.
///
/// Latitude is always within [-90, 90] and longitude within [-180, 180];
/// both are finite.
///
/// # Examples
///
/// ```
/// use fuel_finder::domain::Coordinate;
///
/// let islamabad = Coordinate::new(33.6844, 73.0479).unwrap();
/// assert_eq!(islamabad.lat(), 33.6844);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoordinate {
                reason: "latitude and longitude must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate {
                reason: "latitude must be between -90 and 90",
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinate {
                reason: "longitude must be between -180 and 180",
            });
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to `other` in kilometres (haversine).
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }

    /// Key identifying this point at 6 decimal places.
    ///
    /// Two coordinates with equal keys are treated as the same station.
    pub fn dedup_key(&self) -> (i64, i64) {
        (
            (self.lat * KEY_SCALE).round() as i64,
            (self.lon * KEY_SCALE).round() as i64,
        )
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.lat, self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn accepts_boundaries() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinate::new(90.0001, 0.0).is_err());
        assert!(Coordinate::new(-91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, 180.5).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn error_display() {
        let err = Coordinate::new(100.0, 0.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid coordinate: latitude must be between -90 and 90"
        );
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = coord(33.6844, 73.0479);
        assert_eq!(p.distance_km(&p), 0.0);
    }

    #[test]
    fn distance_lahore_islamabad() {
        // Roughly 270 km as the crow flies.
        let lahore = coord(31.5204, 74.3587);
        let islamabad = coord(33.6844, 73.0479);
        let d = lahore.distance_km(&islamabad);
        assert!((260.0..280.0).contains(&d), "got {d}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = coord(0.0, 0.0);
        let b = coord(1.0, 0.0);
        let d = a.distance_km(&b);
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }

    #[test]
    fn dedup_key_rounds_to_six_places() {
        let a = coord(33.684_400_1, 73.047_900_4);
        let b = coord(33.684_399_9, 73.047_899_6);
        assert_eq!(a.dedup_key(), b.dedup_key());

        let c = coord(33.684_41, 73.0479);
        assert_ne!(a.dedup_key(), c.dedup_key());
    }

    #[test]
    fn display_uses_six_decimals() {
        assert_eq!(coord(33.6844, 73.0479).to_string(), "33.684400,73.047900");
    }
}
