//! Raw element to [`Station`] normalization.
//!
//! For each element: resolve a position, drop it if outside the exact
//! radius, resolve name/brand/address through tag fallbacks, reject it if the
//! name or brand is not English, then deduplicate by rounded coordinate.
//! Per-element drops are counted, never raised.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::domain::{
    Coordinate, FuelType, NO_ADDRESS, NOT_AVAILABLE, Radius, Station, UNKNOWN_BRAND, UNNAMED,
};
use crate::overpass::{RawElement, Tags};

use super::brand::BrandTable;
use super::text::{EnglishHeuristic, translate_known_terms};

/// Configuration for normalization.
#[derive(Debug, Clone, Default)]
pub struct NormalizerConfig {
    /// English text classifier
    pub heuristic: EnglishHeuristic,
    /// Known brands for inference
    pub brands: BrandTable,
    /// Translate known Urdu terms in generic tags before classifying them.
    pub translate_known_terms: bool,
}

/// Counts of elements dropped during normalization, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    /// No point and no centroid, or an out-of-range position
    pub missing_coordinate: usize,
    /// Farther from the center than the radius
    pub outside_radius: usize,
    /// Name or brand failed the English test
    pub non_english: usize,
    /// Same rounded coordinate as an earlier station
    pub duplicate: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.missing_coordinate + self.outside_radius + self.non_english + self.duplicate
    }
}

/// Result of normalizing one response.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    /// Stations in response order.
    pub stations: Vec<Station>,
    pub skipped: SkipCounts,
}

/// Turns raw elements into stations.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Normalize `elements` found around `center` within `radius`.
    pub fn normalize(&self, elements: &[RawElement], center: Coordinate, radius: Radius) -> Normalized {
        let mut out = Normalized::default();
        let mut seen = HashSet::new();

        for element in elements {
            let Some(coordinate) = element
                .position()
                .and_then(|p| Coordinate::new(p.lat, p.lon).ok())
            else {
                out.skipped.missing_coordinate += 1;
                continue;
            };

            let distance = center.distance_km(&coordinate);
            if !distance.is_finite() || distance > radius.as_km() {
                out.skipped.outside_radius += 1;
                continue;
            }

            let tags = &element.tags;
            let name = self.resolve_name(tags);
            let brand = self.resolve_brand(tags, &name);

            if !self.is_english(&name) || !self.is_english(&brand) {
                tracing::trace!(id = ?element.id, %name, %brand, "dropping non-English station");
                out.skipped.non_english += 1;
                continue;
            }

            if !seen.insert(coordinate.dedup_key()) {
                out.skipped.duplicate += 1;
                continue;
            }

            out.stations.push(Station {
                name,
                brand,
                address: self.resolve_address(tags),
                coordinate,
                distance_km: Some(distance),
                fuel_types: fuel_types(tags),
                phone: first_present(tags, &["phone", "contact:phone"]),
                website: first_present(tags, &["website", "contact:website"]),
                opening_hours: first_present(tags, &["opening_hours"]),
            });
        }

        out
    }

    fn is_english(&self, text: &str) -> bool {
        self.config.heuristic.is_english(text)
    }

    /// A generic (untagged-language) value, if it is English.
    fn generic<'a>(&self, tags: &'a Tags, key: &str) -> Option<Cow<'a, str>> {
        let value = tags.get(key)?;
        let value = if self.config.translate_known_terms {
            translate_known_terms(value)
        } else {
            Cow::Borrowed(value)
        };
        self.is_english(&value).then_some(value)
    }

    /// The `key:en` value, else the English generic `key` value.
    fn localized(&self, tags: &Tags, key: &str) -> Option<String> {
        tags.get(&format!("{key}:en"))
            .map(str::to_owned)
            .or_else(|| self.generic(tags, key).map(Cow::into_owned))
    }

    fn resolve_name(&self, tags: &Tags) -> String {
        self.localized(tags, "name")
            .or_else(|| self.localized(tags, "brand"))
            .or_else(|| self.localized(tags, "operator"))
            .unwrap_or_else(|| UNNAMED.to_string())
    }

    fn resolve_brand(&self, tags: &Tags, name: &str) -> String {
        if let Some(brand) = self.localized(tags, "brand") {
            return brand;
        }

        let brands = &self.config.brands;
        brands
            .infer(name)
            .or_else(|| tags.get("operator").and_then(|op| brands.infer(op)))
            .unwrap_or(UNKNOWN_BRAND)
            .to_string()
    }

    fn resolve_address(&self, tags: &Tags) -> String {
        self.localized(tags, "addr:full")
            .or_else(|| self.street_address(tags))
            .or_else(|| self.localized(tags, "addr:city"))
            .unwrap_or_else(|| NO_ADDRESS.to_string())
    }

    /// Street, prefixed with the house number when both are English.
    fn street_address(&self, tags: &Tags) -> Option<String> {
        let street = self.localized(tags, "addr:street")?;
        match self.generic(tags, "addr:housenumber") {
            Some(number) => Some(format!("{number} {street}")),
            None => Some(street),
        }
    }
}

fn fuel_types(tags: &Tags) -> BTreeSet<FuelType> {
    FuelType::ALL
        .into_iter()
        .filter(|fuel| tags.flag(fuel.tag_key()))
        .collect()
}

fn first_present(tags: &Tags, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| tags.get(key))
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}
