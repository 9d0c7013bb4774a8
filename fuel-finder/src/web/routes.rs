//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::domain::{CITIES, Coordinate, InputError, Radius};
use crate::filter::{Selection, SortKey, select};
use crate::pipeline::FinderError;
use crate::summary::{available_brands, summarize};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/cities", get(list_cities))
        .route("/api/stations", get(search_stations))
        .route("/api/landuse", get(search_land_use))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Preset search centers.
async fn list_cities() -> Json<Vec<CityResult>> {
    Json(CITIES.iter().map(CityResult::from).collect())
}

/// Find, filter and sort stations around a city or coordinate.
async fn search_stations(
    State(state): State<AppState>,
    location: Result<Query<LocationRequest>, QueryRejection>,
    req: Result<Query<StationsRequest>, QueryRejection>,
) -> Result<Json<StationsResponse>, AppError> {
    let Query(location) = location?;
    let Query(req) = req?;
    let (center, radius) = resolve(&location)?;
    let selection = selection(&req)?;

    let search = state.finder.find_stations(center, radius).await?;
    let brands = available_brands(&search.stations);
    let selected = select(&search.stations, &selection);
    let summary = summarize(&selected);

    let message = if search.stations.is_empty() {
        Some(format!(
            "No fuel stations found within {} km of {center}",
            radius.as_km()
        ))
    } else if selected.is_empty() {
        Some("No stations match the selected filters".to_string())
    } else {
        None
    };

    let stations = selected
        .iter()
        .map(|s| StationResult::from_station(s, state.brands.style(&s.brand)))
        .collect();

    Ok(Json(StationsResponse {
        center,
        radius_km: radius.as_km(),
        stations,
        summary,
        brands,
        skipped: search.skipped,
        message,
    }))
}

/// Land-use breakdown around a city or coordinate.
async fn search_land_use(
    State(state): State<AppState>,
    location: Result<Query<LocationRequest>, QueryRejection>,
) -> Result<Json<LandUseResponse>, AppError> {
    let Query(location) = location?;
    let (center, radius) = resolve(&location)?;
    let report = state.finder.land_use(center, radius).await?;

    Ok(Json(LandUseResponse {
        center,
        radius_km: radius.as_km(),
        counts: report.counts,
        population_estimate: report.population_estimate,
        traffic: report.traffic,
        traffic_description: report.traffic.description(),
    }))
}

fn resolve(location: &LocationRequest) -> Result<(Coordinate, Radius), AppError> {
    match location.resolve()? {
        Location::Resolved(center, radius) => Ok((center, radius)),
        Location::Missing => Err(AppError::BadRequest {
            message: "either city or lat and lon is required".to_string(),
        }),
    }
}

fn selection(req: &StationsRequest) -> Result<Selection, AppError> {
    let sort = match req.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s
            .parse::<SortKey>()
            .map_err(|message| AppError::BadRequest { message })?,
        None => SortKey::default(),
    };

    let mut selection = Selection::new(sort);
    if let Some(brand) = req.brand.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        selection = selection.with_brand(brand);
    }
    if let Some(max) = req.max_distance_km {
        if !(max.is_finite() && max >= 0.0) {
            return Err(AppError::BadRequest {
                message: format!("invalid max_distance_km: {max}"),
            });
        }
        selection = selection.with_max_distance_km(max);
    }
    Ok(selection)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
}

impl From<InputError> for AppError {
    fn from(e: InputError) -> Self {
        match e {
            InputError::UnknownCity(_) => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<FinderError> for AppError {
    fn from(e: FinderError) -> Self {
        match e {
            FinderError::Input(e) => e.into(),
            FinderError::Fetch(_) => AppError::BadGateway {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
        };

        if status.is_server_error() {
            tracing::error!(%status, %message, "request failed");
        } else {
            tracing::debug!(%status, %message, "request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
