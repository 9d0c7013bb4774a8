//! Search radius.

use std::fmt;

/// Error returned when a radius is zero, negative, or not finite.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid radius: {value} must be a positive, finite number")]
pub struct InvalidRadius {
    value: f64,
}

/// A positive search radius, stored in kilometres.
///
/// ```
/// use fuel_finder::domain::Radius;
///
/// let r = Radius::meters(1500.0).unwrap();
/// assert_eq!(r.as_km(), 1.5);
///
/// assert!(Radius::kilometers(0.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct Radius {
    km: f64,
}

impl Radius {
    pub fn kilometers(km: f64) -> Result<Self, InvalidRadius> {
        if !km.is_finite() || km <= 0.0 {
            return Err(InvalidRadius { value: km });
        }
        Ok(Self { km })
    }

    pub fn meters(m: f64) -> Result<Self, InvalidRadius> {
        if !m.is_finite() || m <= 0.0 {
            return Err(InvalidRadius { value: m });
        }
        Ok(Self { km: m / 1000.0 })
    }

    pub fn as_km(&self) -> f64 {
        self.km
    }

    pub fn as_meters(&self) -> f64 {
        self.km * 1000.0
    }
}

impl fmt::Debug for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Radius({} km)", self.km)
    }
}
