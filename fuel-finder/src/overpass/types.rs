//! Overpass API response types.
//!
//! These types mirror the JSON structure of an Overpass `[out:json]`
//! response. Only the fields the pipeline reads are modelled; unknown
//! fields are ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Top-level Overpass response.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<RawElement>,
}

/// OSM element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Node,
    Way,
    Relation,
    #[serde(other)]
    Other,
}

/// A plain latitude/longitude pair as sent by Overpass (`center`).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// One tagged element from the upstream data source.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawElement {
    #[serde(rename = "type")]
    pub kind: ElementKind,

    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub lat: Option<f64>,

    #[serde(default)]
    pub lon: Option<f64>,

    /// Centroid, present for ways/relations queried with `out center`.
    #[serde(default)]
    pub center: Option<LatLon>,

    #[serde(default)]
    pub tags: Tags,
}

impl RawElement {
    /// Resolve the element's position.
    ///
    /// A direct point wins; otherwise the supplied centroid is used.
    /// Returns `None` if the element carries neither.
    pub fn position(&self) -> Option<LatLon> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(LatLon { lat, lon }),
            _ => self.center,
        }
    }
}

/// Free-form OSM tags.
///
/// Never assume a key is present; blank values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Tags(HashMap<String, String>);

impl Tags {
    /// Get a trimmed, non-empty tag value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Whether a boolean tag is set to `yes`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v.eq_ignore_ascii_case("yes"))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Tags(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
