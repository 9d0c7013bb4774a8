//! Web layer for the fuel station finder.
//!
//! JSON endpoints for a map or dashboard front end to render.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
