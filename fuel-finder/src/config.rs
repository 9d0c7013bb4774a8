//! Runtime configuration read from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::normalize::{
    BrandTable, DEFAULT_PUNCTUATION, EnglishHeuristic, InvalidBrandTable, NormalizerConfig,
};
use crate::overpass::{
    DEFAULT_ENDPOINT, DEFAULT_KM_PER_DEGREE, OverpassConfig, QueryBuilder, RetryPolicy, SearchArea,
};

pub const OVERPASS_URL: &str = "OVERPASS_URL";
pub const OVERPASS_TIMEOUT_SECS: &str = "OVERPASS_TIMEOUT_SECS";
pub const OVERPASS_MAX_ATTEMPTS: &str = "OVERPASS_MAX_ATTEMPTS";
pub const OVERPASS_BACKOFF_BASE_SECS: &str = "OVERPASS_BACKOFF_BASE_SECS";
pub const OVERPASS_BACKOFF_MULTIPLIER: &str = "OVERPASS_BACKOFF_MULTIPLIER";
pub const QUERY_AREA: &str = "FUEL_FINDER_QUERY_AREA";
pub const KM_PER_DEGREE: &str = "FUEL_FINDER_KM_PER_DEGREE";
pub const ENGLISH_PUNCTUATION: &str = "FUEL_FINDER_ENGLISH_PUNCTUATION";
pub const BRANDS: &str = "FUEL_FINDER_BRANDS";
pub const TRANSLATE_TERMS: &str = "FUEL_FINDER_TRANSLATE_TERMS";
pub const FIXTURES: &str = "FUEL_FINDER_FIXTURES";
pub const BIND: &str = "FUEL_FINDER_BIND";

/// Default listen address.
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
    3000,
);

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid FUEL_FINDER_BRANDS: {0}")]
    Brands(#[from] InvalidBrandTable),
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    pub overpass: OverpassConfig,
    pub queries: QueryBuilder,
    pub normalizer: NormalizerConfig,
    /// Serve fixture files from this directory instead of the network.
    pub fixtures: Option<PathBuf>,
    pub bind: SocketAddr,
}

impl FinderConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Unset or blank keys take their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs: u64 =
            parse(&get, OVERPASS_TIMEOUT_SECS)?.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(invalid(OVERPASS_TIMEOUT_SECS, "0", "must be at least 1"));
        }

        let defaults = RetryPolicy::default();
        let max_attempts = parse(&get, OVERPASS_MAX_ATTEMPTS)?.unwrap_or(defaults.max_attempts);
        if max_attempts == 0 {
            return Err(invalid(OVERPASS_MAX_ATTEMPTS, "0", "must be at least 1"));
        }
        let base_delay = parse(&get, OVERPASS_BACKOFF_BASE_SECS)?
            .map(Duration::from_secs)
            .unwrap_or(defaults.base_delay);
        let multiplier =
            parse(&get, OVERPASS_BACKOFF_MULTIPLIER)?.unwrap_or(defaults.multiplier);
        if multiplier == 0 {
            return Err(invalid(OVERPASS_BACKOFF_MULTIPLIER, "0", "must be at least 1"));
        }

        let endpoint = get(OVERPASS_URL).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let overpass = OverpassConfig::new(endpoint.trim())
            .with_timeout(timeout_secs)
            .with_retry(RetryPolicy::new(max_attempts, base_delay, multiplier));

        let area = match get(QUERY_AREA) {
            Some(v) => v
                .parse::<SearchArea>()
                .map_err(|reason| invalid(QUERY_AREA, &v, reason))?,
            None => SearchArea::default(),
        };
        let km_per_degree: f64 = parse(&get, KM_PER_DEGREE)?.unwrap_or(DEFAULT_KM_PER_DEGREE);
        if !(km_per_degree.is_finite() && km_per_degree > 0.0) {
            return Err(invalid(
                KM_PER_DEGREE,
                &km_per_degree.to_string(),
                "must be a positive, finite number",
            ));
        }
        let queries = QueryBuilder::new(area)
            .with_km_per_degree(km_per_degree)
            .with_timeout(u32::try_from(timeout_secs).unwrap_or(u32::MAX));

        // Punctuation is read raw; a value of only spaces is not blank here.
        let heuristic = match lookup(ENGLISH_PUNCTUATION) {
            Some(p) => EnglishHeuristic::new(&p),
            None => EnglishHeuristic::new(DEFAULT_PUNCTUATION),
        };
        let brands = match get(BRANDS) {
            Some(table) => BrandTable::parse(&table)?,
            None => BrandTable::default(),
        };
        let translate_known_terms = match get(TRANSLATE_TERMS) {
            Some(v) => parse_bool(&v)
                .ok_or_else(|| invalid(TRANSLATE_TERMS, &v, "expected true or false"))?,
            None => false,
        };

        let bind = parse(&get, BIND)?.unwrap_or(DEFAULT_BIND);

        Ok(Self {
            overpass,
            queries,
            normalizer: NormalizerConfig {
                heuristic,
                brands,
                translate_known_terms,
            },
            fixtures: get(FIXTURES).map(|d| PathBuf::from(d.trim())),
            bind,
        })
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            overpass: OverpassConfig::default(),
            queries: QueryBuilder::default(),
            normalizer: NormalizerConfig::default(),
            fixtures: None,
            bind: DEFAULT_BIND,
        }
    }
}

fn parse<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(key)
        .map(|v| v.trim().parse::<T>().map_err(|e| invalid(key, &v, e)))
        .transpose()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(key: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
