//! Normalized fuel station.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::Coordinate;

/// Name used when no usable name tag exists.
pub const UNNAMED: &str = "Unnamed";

/// Brand used when neither tags nor inference produce one.
pub const UNKNOWN_BRAND: &str = "Unknown";

/// Address used when no usable address tag exists.
pub const NO_ADDRESS: &str = "Address not available";

/// Placeholder for optional contact fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// A fuel grade advertised by a station.
///
/// Each grade corresponds to one boolean OSM tag (`fuel:diesel=yes`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FuelType {
    Diesel,
    #[serde(rename = "Octane 91")]
    Octane91,
    #[serde(rename = "Octane 95")]
    Octane95,
    #[serde(rename = "Octane 97")]
    Octane97,
    #[serde(rename = "LPG")]
    Lpg,
    #[serde(rename = "CNG")]
    Cng,
}

impl FuelType {
    pub const ALL: [FuelType; 6] = [
        FuelType::Diesel,
        FuelType::Octane91,
        FuelType::Octane95,
        FuelType::Octane97,
        FuelType::Lpg,
        FuelType::Cng,
    ];

    /// The OSM tag key flagging this grade.
    pub fn tag_key(self) -> &'static str {
        match self {
            FuelType::Diesel => "fuel:diesel",
            FuelType::Octane91 => "fuel:octane_91",
            FuelType::Octane95 => "fuel:octane_95",
            FuelType::Octane97 => "fuel:octane_97",
            FuelType::Lpg => "fuel:lpg",
            FuelType::Cng => "fuel:cng",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            FuelType::Diesel => "Diesel",
            FuelType::Octane91 => "Octane 91",
            FuelType::Octane95 => "Octane 95",
            FuelType::Octane97 => "Octane 97",
            FuelType::Lpg => "LPG",
            FuelType::Cng => "CNG",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fuel station produced by one search.
///
/// Text fields are never empty; absent data is represented by the
/// sentinel constants in this module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub name: String,
    pub brand: String,
    pub address: String,
    pub coordinate: Coordinate,
    /// Great-circle distance from the search center, if it could be computed.
    pub distance_km: Option<f64>,
    pub fuel_types: BTreeSet<FuelType>,
    pub phone: String,
    pub website: String,
    pub opening_hours: String,
}
