//! Summary statistics over a station list.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::Station;

/// The nearest station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Closest {
    pub name: String,
    pub distance_km: f64,
}

/// Number of stations carrying one brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandCount {
    pub brand: String,
    pub count: usize,
}

/// Aggregate figures for a set of stations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSummary {
    pub total: usize,
    pub closest: Option<Closest>,
    pub distinct_brands: usize,
    /// Mean over stations that have a distance.
    pub average_distance_km: Option<f64>,
    /// Most common brand first; ties by brand name.
    pub brand_counts: Vec<BrandCount>,
}

/// Summarize `stations`.
pub fn summarize(stations: &[Station]) -> StationSummary {
    let closest = stations
        .iter()
        .filter_map(|s| s.distance_km.map(|d| (s, d)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(s, d)| Closest {
            name: s.name.clone(),
            distance_km: d,
        });

    let distances: Vec<f64> = stations.iter().filter_map(|s| s.distance_km).collect();
    let average_distance_km =
        (!distances.is_empty()).then(|| distances.iter().sum::<f64>() / distances.len() as f64);

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for station in stations {
        *counts.entry(station.brand.as_str()).or_default() += 1;
    }
    let mut brand_counts: Vec<BrandCount> = counts
        .into_iter()
        .map(|(brand, count)| BrandCount {
            brand: brand.to_string(),
            count,
        })
        .collect();
    brand_counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.brand.cmp(&b.brand)));

    StationSummary {
        total: stations.len(),
        closest,
        distinct_brands: brand_counts.len(),
        average_distance_km,
        brand_counts,
    }
}

/// Distinct brands for a brand picker, sorted ignoring case.
pub fn available_brands(stations: &[Station]) -> Vec<String> {
    let mut brands: Vec<String> = stations.iter().map(|s| s.brand.trim().to_string()).collect();
    // Ties on case go to the exact string so the order is stable.
    brands.sort_by_cached_key(|b| (b.to_lowercase(), b.clone()));
    brands.dedup();
    brands
}
