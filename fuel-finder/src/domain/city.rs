//! Preset Pakistani cities.

use serde::Serialize;

use super::{Coordinate, InvalidCoordinate};

/// A named preset search center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct City {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl City {
    /// The city center as a validated coordinate.
    pub fn coordinate(&self) -> Result<Coordinate, InvalidCoordinate> {
        Coordinate::new(self.lat, self.lon)
    }
}

/// Preset cities offered as quick search centers.
pub const CITIES: &[City] = &[
    City { name: "Lahore", lat: 31.5204, lon: 74.3587 },
    City { name: "Karachi", lat: 24.8607, lon: 67.0011 },
    City { name: "Islamabad", lat: 33.6844, lon: 73.0479 },
    City { name: "Rawalpindi", lat: 33.5651, lon: 73.0169 },
    City { name: "Faisalabad", lat: 31.4504, lon: 73.1350 },
    City { name: "Peshawar", lat: 34.0151, lon: 71.5249 },
    City { name: "Quetta", lat: 30.1798, lon: 66.9750 },
    City { name: "Multan", lat: 30.1575, lon: 71.5249 },
    City { name: "Hyderabad", lat: 25.3960, lon: 68.3578 },
    City { name: "Sialkot", lat: 32.4945, lon: 74.5229 },
];

/// Look up a preset city by name, ignoring case and surrounding whitespace.
pub fn find_city(name: &str) -> Option<&'static City> {
    let name = name.trim();
    CITIES.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}
