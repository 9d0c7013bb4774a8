use fuel_finder::config::FinderConfig;
use fuel_finder::normalize::Normalizer;
use fuel_finder::overpass::{AnySource, FixtureSource, OverpassClient};
use fuel_finder::pipeline::StationFinder;
use fuel_finder::web::{AppState, create_router};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "fuel_finder=info,tower_http=info";

#[tokio::main]
async fn main() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = match FinderConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Fixture files replace the network when configured
    let source = match &config.fixtures {
        Some(dir) => {
            let fixtures = FixtureSource::load(dir).expect("Failed to load fixtures");
            tracing::info!(dir = %dir.display(), "serving fixture data");
            AnySource::Fixture(fixtures)
        }
        None => {
            let client = OverpassClient::new(config.overpass.clone())
                .expect("Failed to create Overpass client");
            tracing::info!(endpoint = client.endpoint(), "using Overpass API");
            AnySource::Live(client)
        }
    };

    let brands = config.normalizer.brands.clone();
    let finder = StationFinder::new(
        source,
        config.queries.clone(),
        Normalizer::new(config.normalizer),
    );
    let app = create_router(AppState::new(finder, brands));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .expect("Failed to bind listen address");
    tracing::info!("Fuel finder listening on http://{}", config.bind);
    tracing::info!("  GET /health        - Health check");
    tracing::info!("  GET /api/cities    - Preset cities");
    tracing::info!("  GET /api/stations  - Stations around a city or coordinate");
    tracing::info!("  GET /api/landuse   - Land use and population estimate");

    axum::serve(listener, app).await.expect("Server error");
}
