//! Overpass API access.
//!
//! Builds Overpass QL queries, sends them with bounded retries, and parses
//! the returned element list. Any service returning the same `elements`
//! shape can stand in for the public endpoint.

mod client;
mod error;
mod fixture;
mod query;
mod retry;
mod source;
mod types;

pub use client::{DEFAULT_ENDPOINT, OverpassClient, OverpassConfig, parse_elements};
pub use error::OverpassError;
pub use fixture::{FixtureSource, LANDUSE_FILE, STATIONS_FILE};
pub use query::{
    BoundingBox, DEFAULT_KM_PER_DEGREE, ElementFilter, OverpassQuery, QueryBuilder, SearchArea,
};
pub use retry::{Delay, NoDelay, RetryPolicy, TokioDelay, retry_with_backoff};
pub use source::{AnySource, ElementSource};
pub use types::{ElementKind, LatLon, OverpassResponse, RawElement, Tags};
