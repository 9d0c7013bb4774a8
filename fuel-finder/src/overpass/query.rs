//! Overpass QL query construction.
//!
//! Turns a center point and radius into a query string. Pure: no I/O.

use std::fmt;
use std::str::FromStr;

use crate::domain::{Coordinate, Radius};

/// Default kilometres per degree used for bounding boxes.
pub const DEFAULT_KM_PER_DEGREE: f64 = 111.0;

/// Default server-side timeout embedded in queries (seconds).
const DEFAULT_QUERY_TIMEOUT_SECS: u32 = 30;

/// Which elements a query selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementFilter {
    /// `amenity=fuel` nodes and ways
    Fuel,
    /// Any `landuse` ways and relations
    Landuse,
}

impl ElementFilter {
    fn selectors(self) -> [(&'static str, &'static str); 2] {
        match self {
            ElementFilter::Fuel => [("node", r#"["amenity"="fuel"]"#), ("way", r#"["amenity"="fuel"]"#)],
            ElementFilter::Landuse => [("way", r#"["landuse"]"#), ("relation", r#"["landuse"]"#)],
        }
    }
}

/// How the search region is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchArea {
    /// Native `around:` radius filter
    #[default]
    Around,
    /// Degree-based bounding box (needs an exact-distance post-filter)
    BoundingBox,
}

impl FromStr for SearchArea {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "around" => Ok(SearchArea::Around),
            "bbox" | "bounding_box" => Ok(SearchArea::BoundingBox),
            other => Err(format!("unknown search area '{other}' (expected around or bbox)")),
        }
    }
}

/// A south/west/north/east box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Approximate a circle with a square box of `radius / km_per_degree` degrees.
    ///
    /// No cosine correction is applied, so the box is narrower than the
    /// circle in longitude away from the equator. Edges are clamped to valid
    /// ranges.
    pub fn around(center: Coordinate, radius: Radius, km_per_degree: f64) -> Self {
        let delta = radius.as_km() / km_per_degree;
        Self {
            south: (center.lat() - delta).max(-90.0),
            west: (center.lon() - delta).max(-180.0),
            north: (center.lat() + delta).min(90.0),
            east: (center.lon() + delta).min(180.0),
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6},{:.6},{:.6},{:.6}",
            self.south, self.west, self.north, self.east
        )
    }
}

/// A built query, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct OverpassQuery {
    filter: ElementFilter,
    text: String,
}

impl OverpassQuery {
    pub fn filter(&self) -> ElementFilter {
        self.filter
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Builds Overpass QL queries.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    area: SearchArea,
    km_per_degree: f64,
    timeout_secs: u32,
}

impl QueryBuilder {
    pub fn new(area: SearchArea) -> Self {
        Self {
            area,
            km_per_degree: DEFAULT_KM_PER_DEGREE,
            timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
        }
    }

    /// Set the kilometres-per-degree factor used for bounding boxes.
    pub fn with_km_per_degree(mut self, km_per_degree: f64) -> Self {
        self.km_per_degree = km_per_degree;
        self
    }

    /// Set the server-side timeout embedded in the query.
    pub fn with_timeout(mut self, secs: u32) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn area(&self) -> SearchArea {
        self.area
    }

    /// Build a query selecting `filter` elements within `radius` of `center`.
    ///
    /// Ways and relations are returned with their centroid (`out center`).
    pub fn build(&self, center: Coordinate, radius: Radius, filter: ElementFilter) -> OverpassQuery {
        let region = match self.area {
            SearchArea::Around => format!(
                "(around:{:.0},{:.6},{:.6})",
                radius.as_meters().ceil(),
                center.lat(),
                center.lon()
            ),
            SearchArea::BoundingBox => {
                format!("({})", BoundingBox::around(center, radius, self.km_per_degree))
            }
        };

        let mut text = format!("[out:json][timeout:{}];\n(\n", self.timeout_secs);
        for (kind, selector) in filter.selectors() {
            text.push_str(&format!("  {kind}{selector}{region};\n"));
        }
        text.push_str(");\nout center;\n");

        OverpassQuery { filter, text }
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(SearchArea::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn islamabad() -> Coordinate {
        Coordinate::new(33.6844, 73.0479).unwrap()
    }

    #[test]
    fn around_fuel_query() {
        let q = QueryBuilder::new(SearchArea::Around).build(
            islamabad(),
            Radius::meters(1000.0).unwrap(),
            ElementFilter::Fuel,
        );

        assert_eq!(q.filter(), ElementFilter::Fuel);
        assert_eq!(
            q.as_str(),
            "[out:json][timeout:30];\n(\n  \
             node[\"amenity\"=\"fuel\"](around:1000,33.684400,73.047900);\n  \
             way[\"amenity\"=\"fuel\"](around:1000,33.684400,73.047900);\n\
             );\nout center;\n"
        );
    }

    #[test]
    fn bbox_landuse_query() {
        let q = QueryBuilder::new(SearchArea::BoundingBox).with_timeout(10).build(
            Coordinate::new(0.0, 0.0).unwrap(),
            Radius::kilometers(111.0).unwrap(),
            ElementFilter::Landuse,
        );

        assert_eq!(q.filter(), ElementFilter::Landuse);
        assert!(q.as_str().starts_with("[out:json][timeout:10];"));
        assert!(q.as_str().contains(
            "way[\"landuse\"](-1.000000,-1.000000,1.000000,1.000000);"
        ));
        assert!(q.as_str().contains(
            "relation[\"landuse\"](-1.000000,-1.000000,1.000000,1.000000);"
        ));
        assert!(q.as_str().ends_with("out center;\n"));
    }

    #[test]
    fn bounding_box_uses_conversion_factor() {
        let bbox = BoundingBox::around(islamabad(), Radius::kilometers(5.0).unwrap(), 111.0);
        let delta = 5.0 / 111.0;
        assert!((bbox.north - (33.6844 + delta)).abs() < 1e-12);
        assert!((bbox.south - (33.6844 - delta)).abs() < 1e-12);
        assert!((bbox.east - (73.0479 + delta)).abs() < 1e-12);
        assert!((bbox.west - (73.0479 - delta)).abs() < 1e-12);

        let wide = BoundingBox::around(islamabad(), Radius::kilometers(5.0).unwrap(), 55.5);
        assert!(wide.north - wide.south > bbox.north - bbox.south);
    }

    #[test]
    fn bounding_box_is_clamped() {
        let pole = Coordinate::new(89.99, 179.99).unwrap();
        let bbox = BoundingBox::around(pole, Radius::kilometers(50.0).unwrap(), 111.0);
        assert_eq!(bbox.north, 90.0);
        assert_eq!(bbox.east, 180.0);
    }

    #[test]
    fn search_area_from_str() {
        assert_eq!("around".parse::<SearchArea>(), Ok(SearchArea::Around));
        assert_eq!("BBOX".parse::<SearchArea>(), Ok(SearchArea::BoundingBox));
        assert!("circle".parse::<SearchArea>().is_err());
    }

    #[test]
    fn fractional_meters_round_up() {
        let q = QueryBuilder::default().build(
            islamabad(),
            Radius::meters(999.2).unwrap(),
            ElementFilter::Fuel,
        );
        assert!(q.as_str().contains("(around:1000,"));
    }
}
