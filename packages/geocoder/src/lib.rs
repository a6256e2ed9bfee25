#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! External place search for the mansion map.
//!
//! When a postcode query matches nothing locally, the map falls back to a
//! free-text place search. Providers are configured via TOML files in
//! `services/` (see [`service_registry`]) and implement [`PlaceSearch`].
//! [`zoom::suggested_zoom`] turns a result into a sensible map zoom, and
//! [`session::SearchSession`] debounces typing and drops stale responses.

pub mod nominatim;
pub mod place;
pub mod service_registry;
pub mod session;
pub mod zoom;

use async_trait::async_trait;
use thiserror::Error;

use crate::place::Place;

/// Errors from place search.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Rate limit exceeded")]
    RateLimited,

    /// An embedded service configuration is malformed or missing.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// A free-text place search provider.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Places matching `query`, best first. Results without usable
    /// coordinates are already dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request or response parsing fails.
    async fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError>;
}
