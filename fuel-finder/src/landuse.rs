//! Land-use breakdown, population estimate, and traffic level.

use std::collections::BTreeMap;

use chrono::{Local, Timelike};
use serde::Serialize;

use crate::domain::{Coordinate, Radius};
use crate::overpass::RawElement;

/// Number of parcels per `landuse` value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LandUseCounts(BTreeMap<String, usize>);

impl LandUseCounts {
    /// Count the `landuse` tag over parcels within `radius` of `center`.
    ///
    /// Untagged elements are ignored. A parcel whose position lies outside
    /// the radius is dropped; a parcel with no usable position is counted,
    /// since the query already selected it for this region.
    pub fn from_elements(elements: &[RawElement], center: Coordinate, radius: Radius) -> Self {
        let mut counts = BTreeMap::new();
        for element in elements {
            let Some(landuse) = element.tags.get("landuse") else {
                continue;
            };
            let position = element
                .position()
                .and_then(|p| Coordinate::new(p.lat, p.lon).ok());
            if let Some(position) = position {
                let distance = center.distance_km(&position);
                if !distance.is_finite() || distance > radius.as_km() {
                    continue;
                }
            }
            *counts.entry(landuse.to_string()).or_default() += 1;
        }
        Self(counts)
    }

    pub fn get(&self, landuse: &str) -> usize {
        self.0.get(landuse).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// People attributed to each parcel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationWeights {
    pub residential: u64,
    pub commercial: u64,
    pub industrial: u64,
}

impl Default for PopulationWeights {
    fn default() -> Self {
        Self {
            residential: 150,
            commercial: 50,
            industrial: 30,
        }
    }
}

/// Rough population estimate from parcel counts.
pub fn estimate_population(counts: &LandUseCounts, weights: &PopulationWeights) -> u64 {
    counts.get("residential") as u64 * weights.residential
        + counts.get("commercial") as u64 * weights.commercial
        + counts.get("industrial") as u64 * weights.industrial
}

/// Time-of-day traffic estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLevel {
    Heavy,
    Moderate,
    Light,
}

impl TrafficLevel {
    /// Classify an hour of the day (0-23).
    ///
    /// 7-9 and 17-19 are peak hours, 10-16 normal business hours.
    pub fn at_hour(hour: u32) -> Self {
        match hour {
            7..=9 | 17..=19 => TrafficLevel::Heavy,
            10..=16 => TrafficLevel::Moderate,
            _ => TrafficLevel::Light,
        }
    }

    /// Classify the current local hour.
    pub fn now() -> Self {
        Self::at_hour(Local::now().hour())
    }

    pub fn description(self) -> &'static str {
        match self {
            TrafficLevel::Heavy => "Peak hours traffic",
            TrafficLevel::Moderate => "Normal business hours",
            TrafficLevel::Light => "Off-peak hours",
        }
    }
}
