//! Application state for the web layer.

use std::sync::Arc;

use crate::normalize::BrandTable;
use crate::overpass::AnySource;
use crate::pipeline::StationFinder;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Search pipeline
    pub finder: Arc<StationFinder<AnySource>>,

    /// Brand table used for display styles
    pub brands: Arc<BrandTable>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(finder: StationFinder<AnySource>, brands: BrandTable) -> Self {
        Self {
            finder: Arc::new(finder),
            brands: Arc::new(brands),
        }
    }
}
