//! Station filtering and ordering.
//!
//! Applies the user's brand and distance filters, then sorts. Sorting is
//! stable, so stations that compare equal keep their normalized order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::domain::Station;

/// Field to order stations by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Nearest first; stations without a distance last
    #[default]
    Distance,
    /// Name, case-insensitive
    Name,
    /// Brand, case-insensitive
    Brand,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" => Ok(SortKey::Distance),
            "name" => Ok(SortKey::Name),
            "brand" => Ok(SortKey::Brand),
            other => Err(format!("unknown sort key '{other}' (expected distance, name or brand)")),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Distance => "distance",
            SortKey::Name => "name",
            SortKey::Brand => "brand",
        })
    }
}

/// User-chosen filters and ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Keep only this brand (trimmed, ASCII case-insensitive).
    pub brand: Option<String>,
    /// Keep only stations at most this far away. Stations without a
    /// distance are dropped when set.
    pub max_distance_km: Option<f64>,
    pub sort: SortKey,
}

impl Selection {
    pub fn new(sort: SortKey) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_max_distance_km(mut self, km: f64) -> Self {
        self.max_distance_km = Some(km);
        self
    }

    fn keeps(&self, station: &Station) -> bool {
        let brand_ok = self
            .brand
            .as_deref()
            .is_none_or(|b| station.brand.trim().eq_ignore_ascii_case(b.trim()));

        let distance_ok = match self.max_distance_km {
            None => true,
            Some(max) => station.distance_km.is_some_and(|d| d <= max),
        };

        brand_ok && distance_ok
    }
}

/// Filter and sort stations.
///
/// Returns a new list; the input is untouched.
pub fn select(stations: &[Station], selection: &Selection) -> Vec<Station> {
    let mut selected: Vec<Station> = stations
        .iter()
        .filter(|s| selection.keeps(s))
        .cloned()
        .collect();

    match selection.sort {
        SortKey::Distance => selected.sort_by(|a, b| compare_distance(a.distance_km, b.distance_km)),
        SortKey::Name => selected.sort_by_cached_key(|s| s.name.to_lowercase()),
        SortKey::Brand => selected.sort_by_cached_key(|s| s.brand.to_lowercase()),
    }

    selected
}

/// Missing distances sort after every present one.
fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
