//! Output types handed to the rendering side: style decisions, legend
//! entries, comparison bars, bar charts, tooltips and info-panel summaries.

use serde::{Deserialize, Serialize};

/// Leaflet-style path options for one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    pub fill_color: String,
    pub weight: f64,
    pub opacity: f64,
    pub color: String,
    pub dash_array: String,
    pub fill_opacity: f64,
    pub interactive: bool,
}

impl FeatureStyle {
    /// Transparent fill with a dashed grey outline. Not clickable.
    #[must_use]
    pub fn no_data() -> Self {
        Self {
            fill_color: "transparent".to_string(),
            weight: 0.6,
            opacity: 1.0,
            color: "#cccccc".to_string(),
            dash_array: "2 4".to_string(),
            fill_opacity: 0.0,
            interactive: false,
        }
    }

    /// Solid fill in `fill_color` with a thin white outline.
    #[must_use]
    pub fn filled(fill_color: &str) -> Self {
        Self {
            fill_color: fill_color.to_string(),
            weight: 0.5,
            opacity: 1.0,
            color: "#ffffff".to_string(),
            dash_array: String::new(),
            fill_opacity: 0.8,
            interactive: true,
        }
    }

    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.interactive
    }
}

/// One row of the legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub color: String,
    pub from: f64,
    /// Upper bound, or `None` for the open-ended top class.
    pub to: Option<f64>,
    /// Formatted range, e.g. `£250,000 – £400,000` or `£1,000,000+`.
    pub label: String,
}

/// The legend panel contents for one view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
    /// Free text shown instead of (or alongside) the entries, e.g.
    /// `No data`.
    pub note: Option<String>,
}

/// The measured part of a comparison bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BarReading {
    /// The value or the scale was unusable.
    NoData,
    #[serde(rename_all = "camelCase")]
    Value {
        value: f64,
        max_value: f64,
        /// Marker position along the track, 0 to 100.
        ratio_pct: f64,
        formatted_value: String,
        formatted_max: String,
    },
}

/// A single value drawn against a dataset-wide maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonBar {
    pub label: String,
    pub color: String,
    pub reading: BarReading,
}

impl ComparisonBar {
    #[must_use]
    pub const fn has_data(&self) -> bool {
        matches!(self.reading, BarReading::Value { .. })
    }
}

/// One column of a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarItem {
    pub label: String,
    pub value: f64,
    pub display_value: String,
    pub tooltip: String,
    pub color: String,
}

/// A small multi-column bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChart {
    pub items: Vec<BarItem>,
    /// Value corresponding to a full-height column.
    pub max_value: f64,
}

/// Hover text for one feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub title: String,
    pub lines: Vec<String>,
}

/// Info-panel contents for a constituency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstituencySummary {
    pub code: Option<String>,
    pub name: String,
    pub mansion_tax_properties: ComparisonBar,
    /// Tier breakdown, absent when there are no £2m+ sales.
    pub transactions: Option<BarChart>,
    pub estimated_revenue: f64,
    /// Band distribution, absent when omitted or when no band data exists.
    pub council_tax: Option<BarChart>,
    pub median_price: ComparisonBar,
    pub price_change: ComparisonBar,
}

/// Info-panel contents for a postcode marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostcodeSummary {
    pub label: String,
    pub postcode: Option<String>,
    /// Tier breakdown, absent when no £2m+ sales are recorded.
    pub properties: Option<BarChart>,
    /// Summary of the enclosing constituency, without the council tax
    /// section.
    pub constituency: Option<ConstituencySummary>,
}
