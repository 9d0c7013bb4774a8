//! Domain error types.
//!
//! These errors reject a search before any network call is made.

use super::{InvalidCoordinate, InvalidRadius};

/// Invalid search input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    /// Center point out of range
    #[error(transparent)]
    Coordinate(#[from] InvalidCoordinate),

    /// Radius zero, negative, or not finite
    #[error(transparent)]
    Radius(#[from] InvalidRadius),

    /// Neither a preset city nor a custom coordinate was usable
    #[error("unknown city: {0}")]
    UnknownCity(String),

    /// Only one of latitude/longitude was given
    #[error("latitude and longitude must be given together")]
    PartialCoordinate,
}
