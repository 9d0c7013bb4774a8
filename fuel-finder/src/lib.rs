//! Fuel station finder.
//!
//! Looks up fuel stations around a point from OpenStreetMap via the Overpass
//! API, normalizes them into English-only records with known brands, and
//! serves them to a renderer as JSON.

pub mod config;
pub mod domain;
pub mod filter;
pub mod landuse;
pub mod normalize;
pub mod overpass;
pub mod pipeline;
pub mod summary;
pub mod web;
