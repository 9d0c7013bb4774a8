//! Fixture element source for running without network access.
//!
//! Loads Overpass responses from JSON files and serves them as if they were
//! live API responses.

use std::path::Path;
use std::sync::Arc;

use super::client::parse_elements;
use super::error::OverpassError;
use super::query::{ElementFilter, OverpassQuery};
use super::source::ElementSource;
use super::types::RawElement;

/// File holding the fuel station response.
pub const STATIONS_FILE: &str = "stations.json";

/// File holding the land-use response.
pub const LANDUSE_FILE: &str = "landuse.json";

/// Element source that serves pre-loaded responses.
///
/// Every query receives the full file for its filter; region filtering is
/// left to the exact-distance checks in the normalizer and in
/// `LandUseCounts::from_elements`.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    stations: Arc<Vec<RawElement>>,
    landuse: Arc<Vec<RawElement>>,
}

impl FixtureSource {
    /// Load `stations.json` and `landuse.json` from a directory.
    ///
    /// A missing file yields an empty element list for that filter; a file
    /// that exists but does not parse is an error.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, OverpassError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(OverpassError::Fixture(format!(
                "fixture directory {} does not exist",
                dir.display()
            )));
        }

        Ok(Self {
            stations: Arc::new(load_file(&dir.join(STATIONS_FILE))?),
            landuse: Arc::new(load_file(&dir.join(LANDUSE_FILE))?),
        })
    }

    /// Build a fixture from in-memory elements.
    pub fn from_elements(stations: Vec<RawElement>, landuse: Vec<RawElement>) -> Self {
        Self {
            stations: Arc::new(stations),
            landuse: Arc::new(landuse),
        }
    }
}

fn load_file(path: &Path) -> Result<Vec<RawElement>, OverpassError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "fixture file missing, serving no elements");
        return Ok(Vec::new());
    }

    let json = std::fs::read_to_string(path).map_err(|e| {
        OverpassError::Fixture(format!("failed to read {}: {}", path.display(), e))
    })?;

    parse_elements(&json).map_err(|e| {
        OverpassError::Fixture(format!("failed to parse {}: {}", path.display(), e))
    })
}

impl ElementSource for FixtureSource {
    async fn fetch(&self, query: &OverpassQuery) -> Result<Vec<RawElement>, OverpassError> {
        let elements = match query.filter() {
            ElementFilter::Fuel => &self.stations,
            ElementFilter::Landuse => &self.landuse,
        };
        Ok(elements.as_ref().clone())
    }
}
