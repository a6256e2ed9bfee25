//! Compile-time registry of place-search service configurations.
//!
//! Each provider is defined in a TOML file under `services/`, embedded at
//! compile time and exposed via [`all_services`] and [`enabled_services`].

use std::time::Duration;

use serde::Deserialize;

use crate::GeocodeError;

/// A place-search service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"nominatim"`).
    pub id: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Lower values are preferred.
    pub priority: u32,
    pub provider: ProviderConfig,
}

/// Provider-specific configuration, tagged by `type` in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Nominatim / `OpenStreetMap` free-text search.
    Nominatim(NominatimConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NominatimConfig {
    /// Search endpoint, e.g. `https://nominatim.openstreetmap.org/search`.
    pub base_url: String,
    /// Contact address sent with each request, per the usage policy.
    #[serde(default)]
    pub email: Option<String>,
    /// Comma-separated ISO country codes.
    pub country_codes: String,
    pub accept_language: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Quiet period before a typed query is sent.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl NominatimConfig {
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

const fn default_true() -> bool {
    true
}

const fn default_max_results() -> usize {
    8
}

const fn default_debounce_ms() -> u64 {
    450
}

impl GeocodingService {
    #[must_use]
    pub fn base_url(&self) -> &str {
        match &self.provider {
            ProviderConfig::Nominatim(config) => &config.base_url,
        }
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const SERVICE_TOMLS: &[(&str, &str)] = &[("nominatim", include_str!("../services/nominatim.toml"))];

/// Parses every embedded service configuration.
///
/// # Errors
///
/// Returns [`GeocodeError::Config`] naming the first malformed file.
pub fn all_services() -> Result<Vec<GeocodingService>, GeocodeError> {
    SERVICE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str).map_err(|e| GeocodeError::Config {
                message: format!("Failed to parse geocoding service '{name}': {e}"),
            })
        })
        .collect()
}

/// Enabled services, sorted by priority (ascending).
///
/// # Errors
///
/// Returns [`GeocodeError::Config`] if any embedded file is malformed.
pub fn enabled_services() -> Result<Vec<GeocodingService>, GeocodeError> {
    let mut services: Vec<GeocodingService> =
        all_services()?.into_iter().filter(|s| s.enabled).collect();
    services.sort_by_key(|s| s.priority);
    Ok(services)
}

/// The highest-priority enabled Nominatim configuration.
///
/// # Errors
///
/// Returns [`GeocodeError::Config`] if none is configured.
pub fn nominatim_config() -> Result<NominatimConfig, GeocodeError> {
    enabled_services()?
        .into_iter()
        .map(|s| match s.provider {
            ProviderConfig::Nominatim(config) => config,
        })
        .next()
        .ok_or_else(|| GeocodeError::Config {
            message: "No enabled Nominatim service".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_services() {
        assert_eq!(all_services().unwrap().len(), SERVICE_TOMLS.len());
    }

    #[test]
    fn service_ids_are_unique() {
        let services = all_services().unwrap();
        let mut seen = BTreeSet::new();
        for svc in &services {
            assert!(seen.insert(&svc.id), "Duplicate service ID: {}", svc.id);
        }
    }

    #[test]
    fn services_have_required_fields() {
        for svc in &all_services().unwrap() {
            assert!(!svc.id.is_empty());
            assert!(!svc.name.is_empty(), "Service {} has empty name", svc.id);
            assert!(!svc.base_url().is_empty(), "Service {} has empty base_url", svc.id);
        }
    }

    #[test]
    fn nominatim_searches_great_britain() {
        let config = nominatim_config().unwrap();
        assert_eq!(config.country_codes, "gb");
        assert_eq!(config.max_results, 8);
        assert_eq!(config.debounce(), Duration::from_millis(450));
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let svc: GeocodingService = toml::de::from_str(
            r#"
            id = "local"
            name = "Local"
            priority = 2

            [provider]
            type = "nominatim"
            base_url = "http://localhost:8080/search"
            country_codes = "gb"
            accept_language = "en"
            "#,
        )
        .unwrap();
        assert!(svc.enabled);
        let ProviderConfig::Nominatim(config) = svc.provider;
        assert_eq!(config.email, None);
        assert_eq!(config.debounce_ms, 450);
    }
}
