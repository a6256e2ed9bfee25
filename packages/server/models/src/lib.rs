#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the mansion map server.
//!
//! These wrap the display types from `mansion_map_property_models` with
//! the identifiers and view context a client needs.

use mansion_map_property_models::{
    CouncilTaxBand, Dataset, SubMetric, TxMetric, ViewState,
    display::{ConstituencySummary, FeatureStyle, Legend, PostcodeSummary, Tooltip},
};
use serde::{Deserialize, Serialize};

/// Shown while an external place search is pending.
pub const SEARCHING_MESSAGE: &str = "Searching wider map…";
/// The external place search returned nothing usable.
pub const NO_PLACES_MESSAGE: &str = "No matching places found";
/// The external place search failed.
pub const SEARCH_UNAVAILABLE_MESSAGE: &str = "Unable to reach map search. Try again.";

/// Zoom for a postcode the query matched exactly.
pub const EXACT_POSTCODE_ZOOM: i32 = 16;
/// Zoom for a postcode picked from a list of partial matches.
pub const POSTCODE_ZOOM: i32 = 14;

/// `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    pub healthy: bool,
    pub version: String,
    pub constituencies: usize,
    pub postcodes: usize,
}

/// One selectable sub-metric (a band or a transaction metric).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOption {
    pub value: String,
    pub label: String,
}

/// A dataset and the sub-metrics it offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDataset {
    pub id: Dataset,
    pub label: String,
    pub sub_metrics: Vec<ApiOption>,
    /// Sub-metric selected when the dataset is first chosen.
    pub default_sub_metric: Option<String>,
}

impl ApiDataset {
    #[must_use]
    pub fn all() -> Vec<Self> {
        let defaults = ViewState::default();
        Dataset::ALL
            .iter()
            .map(|dataset| {
                let (sub_metrics, default_sub_metric) = match dataset {
                    Dataset::CouncilTax => (
                        CouncilTaxBand::ALL
                            .iter()
                            .map(|band| ApiOption {
                                value: band.key().to_string(),
                                label: band.label().to_string(),
                            })
                            .collect(),
                        Some(defaults.band.key().to_string()),
                    ),
                    Dataset::MansionTax => (
                        TxMetric::ALL
                            .iter()
                            .map(|metric| ApiOption {
                                value: metric.as_ref().to_string(),
                                label: metric.label().to_string(),
                            })
                            .collect(),
                        Some(TxMetric::EstimatedRevenue.as_ref().to_string()),
                    ),
                    Dataset::MansionTaxPostcodes | Dataset::HousePrice | Dataset::HousePriceChange => {
                        (vec![], None)
                    }
                };
                Self {
                    id: *dataset,
                    label: dataset.label().to_string(),
                    sub_metrics,
                    default_sub_metric,
                }
            })
            .collect()
    }
}

/// View selection shared by every view-dependent endpoint. Missing fields
/// fall back to the default view.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ViewQueryParams {
    pub dataset: Option<Dataset>,
    pub band: Option<CouncilTaxBand>,
    pub metric: Option<TxMetric>,
}

impl ViewQueryParams {
    /// Switches to `dataset`, then applies whichever sub-metric belongs to
    /// it. A band or metric for another dataset is ignored.
    #[must_use]
    pub fn view(&self) -> ViewState {
        let view = self
            .dataset
            .map_or_else(ViewState::default, |dataset| {
                ViewState::default().with_dataset(dataset)
            });
        let sub_metric = match view.dataset {
            Dataset::CouncilTax => self.band.map(SubMetric::Band),
            Dataset::MansionTax => self.metric.map(SubMetric::Transaction),
            Dataset::MansionTaxPostcodes | Dataset::HousePrice | Dataset::HousePriceChange => None,
        };
        sub_metric
            .and_then(|sub_metric| view.with_sub_metric(sub_metric))
            .unwrap_or(view)
    }
}

/// `GET /api/legend`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLegend {
    pub view: ViewState,
    pub breaks: Vec<f64>,
    pub legend: Legend,
}

/// Style for one constituency polygon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFeatureStyle {
    pub code: String,
    pub value: Option<f64>,
    pub style: FeatureStyle,
}

/// `GET /api/styles`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStyles {
    pub view: ViewState,
    pub breaks: Vec<f64>,
    pub features: Vec<ApiFeatureStyle>,
}

/// `GET /api/constituencies/{code}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConstituency {
    pub view: ViewState,
    pub value: Option<f64>,
    pub style: FeatureStyle,
    pub tooltip: Tooltip,
    pub summary: ConstituencySummary,
}

/// `GET /api/postcodes/{postcode}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPostcode {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub summary: PostcodeSummary,
}

/// Query parameters for `GET /api/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQueryParams {
    #[serde(default)]
    pub q: String,
    /// Selects the search mode: postcodes for the postcode dataset,
    /// constituencies otherwise.
    pub dataset: Option<Dataset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApiBounds {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ApiSearchResult {
    #[serde(rename_all = "camelCase")]
    Constituency { name: String, code: String },
    #[serde(rename_all = "camelCase")]
    Postcode {
        label: String,
        clean: String,
        lat: f64,
        lon: f64,
        zoom: i32,
    },
    /// A place from the external geocoder.
    #[serde(rename_all = "camelCase")]
    External {
        name: String,
        locality: String,
        lat: f64,
        lon: f64,
        /// Suggested zoom, already clamped to the map's limits.
        zoom: i32,
        bounds: Option<ApiBounds>,
    },
}

/// `GET /api/search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearchResponse {
    pub results: Vec<ApiSearchResult>,
    /// Shown in place of results, e.g. a prompt for more characters.
    pub message: Option<String>,
    /// The query exactly matched a known postcode.
    pub exact: bool,
}

impl ApiSearchResponse {
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            ..Default::default()
        }
    }
}
