//! Station normalization.
//!
//! Converts raw Overpass elements into [`Station`](crate::domain::Station)
//! values under an English-only output policy.

mod brand;
mod normalizer;
mod text;

pub use brand::{BrandStyle, BrandTable, InvalidBrandTable, KnownBrand};
pub use normalizer::{Normalized, Normalizer, NormalizerConfig, SkipCounts};
pub use text::{DEFAULT_PUNCTUATION, EnglishHeuristic, translate_known_terms};
