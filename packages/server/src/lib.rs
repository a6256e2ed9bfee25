#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the mansion map.
//!
//! Loads the constituency and postcode feature collections once at
//! startup, then serves legends, per-feature styles, tooltips, info-panel
//! summaries and search over a JSON API. The raw `GeoJSON` files are served
//! under `/data` for the map frontend.

mod handlers;
pub mod search;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use mansion_map_geocoder::{
    GeocodeError, PlaceSearch, nominatim::NominatimClient, service_registry::nominatim_config,
    zoom::ZoomLimits,
};
use mansion_map_property::{MapData, PropertyError, progress::NullProgress, search::SearchIndex};
use thiserror::Error;

/// Errors that stop the server from starting.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The map data could not be loaded.
    #[error("Failed to load map data: {0}")]
    Data(#[from] PropertyError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

/// Server settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Directory holding the `GeoJSON` files and manifest.
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT` and `DATA_DIR`, falling back to
    /// `127.0.0.1:8080` and `data`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            data_dir: lookup("DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Loaded feature collections with lookups and the break-set cache.
    pub data: Arc<MapData>,
    pub search: SearchIndex,
    /// External place search used when a postcode query matches nothing.
    pub places: Arc<dyn PlaceSearch>,
    pub zoom_limits: ZoomLimits,
}

impl AppState {
    #[must_use]
    pub fn new(data: MapData, places: Arc<dyn PlaceSearch>) -> Self {
        let search = SearchIndex::build(&data);
        Self {
            data: Arc::new(data),
            search,
            places,
            zoom_limits: ZoomLimits::default(),
        }
    }

    /// Loads `data_dir` and wires up the configured Nominatim service.
    ///
    /// # Errors
    ///
    /// * If the constituency collection cannot be read or parsed
    /// * If the embedded geocoder configuration is invalid
    pub fn load(data_dir: &Path) -> Result<Self, ServerError> {
        log::info!("Loading map data from {}...", data_dir.display());
        let data = MapData::load_dir(data_dir, &NullProgress)?;
        log::info!(
            "Loaded {} constituencies and {} postcodes",
            data.constituencies().len(),
            data.postcodes().len()
        );

        let places = NominatimClient::new(reqwest::Client::new(), nominatim_config()?);
        Ok(Self::new(data, Arc::new(places)))
    }
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/datasets", web::get().to(handlers::datasets))
            .route("/legend", web::get().to(handlers::legend))
            .route("/styles", web::get().to(handlers::styles))
            .route("/maxima", web::get().to(handlers::maxima))
            .route("/constituencies/{code}", web::get().to(handlers::constituency))
            .route("/postcodes/{postcode}", web::get().to(handlers::postcode))
            .route("/search", web::get().to(handlers::search)),
    );
}

/// Starts the mansion map API server.
///
/// Loads the map data from `config.data_dir` and starts the Actix-Web HTTP
/// server. The caller provides the async runtime (e.g. via
/// `#[actix_web::main]`) and initialises logging.
///
/// # Errors
///
/// * If the map data fails to load
/// * If the HTTP server fails to bind or encounters a runtime error
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let state = web::Data::new(AppState::load(&config.data_dir)?);
    let data_dir = config.data_dir.clone();

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve the raw feature collections
            .service(Files::new("/data", &data_dir))
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn config_from_env_values() {
        let config = ServerConfig::from_lookup(|key| match key {
            "BIND_ADDR" => Some("0.0.0.0".to_string()),
            "PORT" => Some("3000".to_string()),
            "DATA_DIR" => Some("/srv/map".to_string()),
            _ => None,
        });
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.data_dir, PathBuf::from("/srv/map"));
    }

    #[test]
    fn invalid_port_falls_back() {
        let config = ServerConfig::from_lookup(|key| (key == "PORT").then(|| "http".to_string()));
        assert_eq!(config.port, 8080);
    }
}
