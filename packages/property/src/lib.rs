#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Metric derivation, classification and display engine for the mansion
//! map.
//!
//! Raw GeoJSON property bags are parsed once into typed records
//! ([`schema`]), reduced to a single scalar per view ([`resolve`]),
//! classified into colour bands ([`classify`]) and rendered into legends,
//! styles, tooltips and info-panel summaries ([`display`]). [`MapData`]
//! ties the loaded collections together and caches break sets per view.

pub mod classify;
pub mod collection;
pub mod display;
pub mod extract;
pub mod format;
pub mod manifest;
pub mod maxima;
pub mod numeric;
pub mod progress;
pub mod resolve;
pub mod schema;
pub mod search;

pub use collection::MapData;

use thiserror::Error;

/// Errors from loading map data.
#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(Box<geojson::Error>),

    /// The document parsed, but is not a `FeatureCollection`.
    #[error("{0} data is not a GeoJSON FeatureCollection")]
    NotFeatureCollection(String),
}

impl From<geojson::Error> for PropertyError {
    fn from(e: geojson::Error) -> Self {
        Self::GeoJson(Box::new(e))
    }
}
