//! Domain types for station search.
//!
//! All types enforce their invariants at construction time, so a search
//! that reaches the network has already been validated.

mod city;
mod coord;
mod error;
mod radius;
mod station;

pub use city::{CITIES, City, find_city};
pub use coord::{Coordinate, InvalidCoordinate};
pub use error::InputError;
pub use radius::{InvalidRadius, Radius};
pub use station::{FuelType, NO_ADDRESS, NOT_AVAILABLE, Station, UNKNOWN_BRAND, UNNAMED};
