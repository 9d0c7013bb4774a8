//! Station search pipeline.
//!
//! query builder -> element source -> normalizer. The finder holds no state
//! between calls; each search returns an owned result for the caller.

use serde::Serialize;

use crate::domain::{Coordinate, InputError, Radius, Station};
use crate::landuse::{LandUseCounts, PopulationWeights, TrafficLevel, estimate_population};
use crate::normalize::{Normalizer, SkipCounts};
use crate::overpass::{ElementFilter, ElementSource, OverpassError, QueryBuilder};

/// Error from a search.
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// Rejected before any network call
    #[error(transparent)]
    Input(#[from] InputError),

    /// Upstream fetch failed (retries exhausted or malformed response)
    #[error("failed to fetch elements: {0}")]
    Fetch(#[from] OverpassError),
}

/// Stations found around one center.
#[derive(Debug, Clone)]
pub struct StationSearch {
    pub center: Coordinate,
    pub radius: Radius,
    /// Stations in response order, before any user filter.
    pub stations: Vec<Station>,
    /// Elements returned by the source.
    pub raw_count: usize,
    pub skipped: SkipCounts,
}

/// Land use around one center.
#[derive(Debug, Clone, Serialize)]
pub struct LandUseReport {
    pub counts: LandUseCounts,
    pub population_estimate: u64,
    pub traffic: TrafficLevel,
}

/// Runs searches against an element source.
#[derive(Debug, Clone)]
pub struct StationFinder<S> {
    source: S,
    queries: QueryBuilder,
    normalizer: Normalizer,
    weights: PopulationWeights,
}

impl<S: ElementSource> StationFinder<S> {
    pub fn new(source: S, queries: QueryBuilder, normalizer: Normalizer) -> Self {
        Self {
            source,
            queries,
            normalizer,
            weights: PopulationWeights::default(),
        }
    }

    /// Set the per-parcel population weights.
    pub fn with_population_weights(mut self, weights: PopulationWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Find fuel stations within `radius` of `center`.
    pub async fn find_stations(
        &self,
        center: Coordinate,
        radius: Radius,
    ) -> Result<StationSearch, FinderError> {
        let query = self.queries.build(center, radius, ElementFilter::Fuel);
        let elements = self.source.fetch(&query).await?;
        let normalized = self.normalizer.normalize(&elements, center, radius);

        tracing::info!(
            %center,
            radius_km = radius.as_km(),
            raw = elements.len(),
            stations = normalized.stations.len(),
            skipped = normalized.skipped.total(),
            "station search complete"
        );

        Ok(StationSearch {
            center,
            radius,
            stations: normalized.stations,
            raw_count: elements.len(),
            skipped: normalized.skipped,
        })
    }

    /// Count land-use parcels within `radius` of `center`.
    pub async fn land_use(
        &self,
        center: Coordinate,
        radius: Radius,
    ) -> Result<LandUseReport, FinderError> {
        let query = self.queries.build(center, radius, ElementFilter::Landuse);
        let elements = self.source.fetch(&query).await?;
        let counts = LandUseCounts::from_elements(&elements, center, radius);
        let population_estimate = estimate_population(&counts, &self.weights);

        tracing::info!(
            %center,
            radius_km = radius.as_km(),
            parcels = counts.total(),
            population_estimate,
            "land use search complete"
        );

        Ok(LandUseReport {
            counts,
            population_estimate,
            traffic: TrafficLevel::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::overpass::{
        ElementKind, FixtureSource, LatLon, NoDelay, OverpassQuery, RawElement, RetryPolicy,
        SearchArea, retry_with_backoff,
    };

    fn node(lat: f64, lon: f64, tags: &[(&str, &str)]) -> RawElement {
        RawElement {
            kind: ElementKind::Node,
            id: None,
            lat: Some(lat),
            lon: Some(lon),
            center: None,
            tags: tags.iter().copied().collect(),
        }
    }

    fn finder(stations: Vec<RawElement>, landuse: Vec<RawElement>) -> StationFinder<FixtureSource> {
        StationFinder::new(
            FixtureSource::from_elements(stations, landuse),
            QueryBuilder::default(),
            Normalizer::default(),
        )
    }

    #[tokio::test]
    async fn single_station_end_to_end() {
        let finder = finder(
            vec![node(
                33.6844,
                73.0479,
                &[("amenity", "fuel"), ("name", "PSO Station"), ("brand", "PSO")],
            )],
            vec![],
        );

        let center = Coordinate::new(33.6844, 73.0479).unwrap();
        let search = finder
            .find_stations(center, Radius::meters(1000.0).unwrap())
            .await
            .unwrap();

        assert_eq!(search.stations.len(), 1);
        assert_eq!(search.raw_count, 1);
        let station = &search.stations[0];
        assert_eq!(station.name, "PSO Station");
        assert_eq!(station.brand, "PSO");
        assert!(station.distance_km.unwrap() < 1e-6);
    }

    #[tokio::test]
    async fn empty_result_is_not_an_error() {
        let finder = finder(vec![], vec![]);
        let center = Coordinate::new(24.8607, 67.0011).unwrap();
        let search = finder
            .find_stations(center, Radius::kilometers(5.0).unwrap())
            .await
            .unwrap();
        assert!(search.stations.is_empty());
        assert_eq!(search.skipped.total(), 0);
    }

    #[tokio::test]
    async fn land_use_report() {
        let parcel = |l: &str| RawElement {
            kind: ElementKind::Way,
            id: None,
            lat: None,
            lon: None,
            center: None,
            tags: [("landuse", l)].into_iter().collect(),
        };
        let finder = finder(
            vec![],
            vec![parcel("residential"), parcel("residential"), parcel("industrial")],
        );

        let center = Coordinate::new(31.5204, 74.3587).unwrap();
        let report = finder
            .land_use(center, Radius::kilometers(1.0).unwrap())
            .await
            .unwrap();
        assert_eq!(report.counts.get("residential"), 2);
        assert_eq!(report.population_estimate, 330);

        let weighted = finder.with_population_weights(PopulationWeights {
            residential: 1,
            commercial: 1,
            industrial: 1,
        });
        let report = weighted
            .land_use(center, Radius::kilometers(1.0).unwrap())
            .await
            .unwrap();
        assert_eq!(report.population_estimate, 3);
    }

    #[tokio::test]
    async fn land_use_ignores_far_parcels() {
        let lahore_parcel = RawElement {
            kind: ElementKind::Way,
            id: Some(1),
            lat: None,
            lon: None,
            center: Some(LatLon {
                lat: 31.5204,
                lon: 74.3587,
            }),
            tags: [("landuse", "residential")].into_iter().collect(),
        };
        let finder = StationFinder::new(
            FixtureSource::from_elements(vec![], vec![lahore_parcel]),
            QueryBuilder::new(SearchArea::BoundingBox),
            Normalizer::default(),
        );

        let islamabad = Coordinate::new(33.6844, 73.0479).unwrap();
        let report = finder
            .land_use(islamabad, Radius::kilometers(1.0).unwrap())
            .await
            .unwrap();
        assert_eq!(report.counts.get("residential"), 0);
        assert!(report.counts.is_empty());
        assert_eq!(report.population_estimate, 0);

        let lahore = Coordinate::new(31.5204, 74.3587).unwrap();
        let report = finder
            .land_use(lahore, Radius::kilometers(1.0).unwrap())
            .await
            .unwrap();
        assert_eq!(report.counts.get("residential"), 1);
        assert_eq!(report.population_estimate, 150);
    }

    /// Fails transiently a fixed number of times, then serves one station.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
        policy: RetryPolicy,
    }

    impl Flaky {
        async fn attempt(&self) -> Result<Vec<RawElement>, OverpassError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                Err(OverpassError::Api {
                    status: 502,
                    message: "bad gateway".into(),
                })
            } else {
                Ok(vec![node(33.6844, 73.0479, &[("name", "PSO")])])
            }
        }
    }

    impl ElementSource for Flaky {
        async fn fetch(&self, _query: &OverpassQuery) -> Result<Vec<RawElement>, OverpassError> {
            retry_with_backoff(&self.policy, &NoDelay, || self.attempt()).await
        }
    }

    #[tokio::test]
    async fn fetch_failure_is_distinct_from_empty() {
        let finder = StationFinder::new(
            Flaky {
                failures: 5,
                calls: AtomicU32::new(0),
                policy: RetryPolicy::default(),
            },
            QueryBuilder::new(SearchArea::BoundingBox),
            Normalizer::default(),
        );

        let center = Coordinate::new(33.6844, 73.0479).unwrap();
        let result = finder.find_stations(center, Radius::kilometers(1.0).unwrap()).await;
        assert!(matches!(
            result,
            Err(FinderError::Fetch(OverpassError::RetriesExhausted { attempts: 3, .. }))
        ));
        assert_eq!(finder.source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let finder = StationFinder::new(
            Flaky {
                failures: 2,
                calls: AtomicU32::new(0),
                policy: RetryPolicy::default(),
            },
            QueryBuilder::default(),
            Normalizer::default(),
        );

        let center = Coordinate::new(33.6844, 73.0479).unwrap();
        let search = finder
            .find_stations(center, Radius::kilometers(1.0).unwrap())
            .await
            .unwrap();
        assert_eq!(search.stations.len(), 1);
        assert_eq!(finder.source.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn error_display() {
        let err: FinderError = InputError::UnknownCity("Gotham".into()).into();
        assert_eq!(err.to_string(), "unknown city: Gotham");

        let err: FinderError = OverpassError::Malformed {
            message: "expected value at line 1".into(),
            body: None,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "failed to fetch elements: malformed response: expected value at line 1"
        );
    }
}
