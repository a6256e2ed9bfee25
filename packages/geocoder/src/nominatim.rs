//! Nominatim / `OpenStreetMap` free-text place search.
//!
//! The public instance allows roughly one request per second; callers go
//! through a [`crate::session::SearchSession`], which debounces typing so
//! only settled queries reach the network.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};

use crate::{GeocodeError, PlaceSearch, place::Place, service_registry::NominatimConfig};

/// HTTP client for one configured Nominatim endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    config: NominatimConfig,
}

impl NominatimClient {
    #[must_use]
    pub const fn new(client: reqwest::Client, config: NominatimConfig) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub const fn config(&self) -> &NominatimConfig {
        &self.config
    }

    /// Query string for `query`, in request order.
    #[must_use]
    pub fn query_params(&self, query: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("format", "jsonv2".to_string()),
            ("addressdetails", "1".to_string()),
            ("limit", self.config.max_results.to_string()),
            ("countrycodes", self.config.country_codes.clone()),
            ("polygon_geojson", "0".to_string()),
            ("q", query.to_string()),
        ];
        if let Some(email) = self.config.email.as_deref().filter(|e| !e.is_empty()) {
            params.push(("email", email.to_string()));
        }
        params
    }
}

#[async_trait]
impl PlaceSearch for NominatimClient {
    async fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        log::debug!("nominatim search: {query:?}");
        let resp = self
            .client
            .get(&self.config.base_url)
            .query(&self.query_params(query))
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, &self.config.accept_language)
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited);
        }
        if !resp.status().is_success() {
            return Err(GeocodeError::Status(resp.status().as_u16()));
        }

        let body: serde_json::Value = resp.json().await?;
        parse_response(body, self.config.max_results)
    }
}

/// Parses a `jsonv2` response, keeping at most `limit` results that carry
/// finite coordinates.
fn parse_response(body: serde_json::Value, limit: usize) -> Result<Vec<Place>, GeocodeError> {
    let serde_json::Value::Array(results) = body else {
        return Err(GeocodeError::Parse {
            message: "Nominatim response is not an array".to_string(),
        });
    };

    let places = results
        .into_iter()
        .take(limit)
        .filter_map(|value| match serde_json::from_value::<Place>(value) {
            Ok(place) => Some(place),
            Err(e) => {
                log::warn!("skipping malformed Nominatim result: {e}");
                None
            }
        })
        .filter(|place| place.lat_lon().is_some())
        .collect();

    Ok(places)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service_registry::nominatim_config;

    #[test]
    fn parses_nominatim_results() {
        let body = serde_json::json!([
            {"lat": "51.5", "lon": "-0.12", "display_name": "Westminster"},
            {"lat": "bad", "lon": "-0.12", "display_name": "Nowhere"},
            {"lon": "-0.12"},
        ]);
        let places = parse_response(body, 8).unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].display_name.as_deref(), Some("Westminster"));
    }

    #[test]
    fn caps_results() {
        let body = serde_json::Value::Array(
            (0..12)
                .map(|i| serde_json::json!({"lat": "51.0", "lon": format!("{i}")}))
                .collect(),
        );
        assert_eq!(parse_response(body, 8).unwrap().len(), 8);
    }

    #[test]
    fn rejects_non_array() {
        let err = parse_response(serde_json::json!({"error": "x"}), 8).unwrap_err();
        assert!(matches!(err, GeocodeError::Parse { .. }));
    }

    #[test]
    fn sends_expected_params() {
        let client = NominatimClient::new(reqwest::Client::new(), nominatim_config().unwrap());
        let params = client.query_params("kensington");
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("format"), Some("jsonv2"));
        assert_eq!(get("addressdetails"), Some("1"));
        assert_eq!(get("limit"), Some("8"));
        assert_eq!(get("countrycodes"), Some("gb"));
        assert_eq!(get("polygon_geojson"), Some("0"));
        assert_eq!(get("q"), Some("kensington"));
        assert_eq!(get("email"), Some("info@taxpolicy.org.uk"));
    }
}
