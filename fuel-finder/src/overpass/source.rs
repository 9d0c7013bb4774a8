//! Abstraction over where raw elements come from.

use std::future::Future;

use super::client::OverpassClient;
use super::error::OverpassError;
use super::fixture::FixtureSource;
use super::query::OverpassQuery;
use super::types::RawElement;

/// Trait for providing raw elements for a query.
///
/// This abstraction allows the pipeline to be tested without a network.
pub trait ElementSource: Send + Sync {
    /// Fetch every element matching `query`.
    fn fetch(
        &self,
        query: &OverpassQuery,
    ) -> impl Future<Output = Result<Vec<RawElement>, OverpassError>> + Send;
}

/// The element sources the server can be configured with.
#[derive(Debug, Clone)]
pub enum AnySource {
    /// Live Overpass API
    Live(OverpassClient),
    /// Local fixture files
    Fixture(FixtureSource),
}

impl ElementSource for AnySource {
    async fn fetch(&self, query: &OverpassQuery) -> Result<Vec<RawElement>, OverpassError> {
        match self {
            AnySource::Live(client) => client.fetch(query).await,
            AnySource::Fixture(fixture) => fixture.fetch(query).await,
        }
    }
}
