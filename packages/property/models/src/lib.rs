#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset, view-state and property record types for the mansion map.
//!
//! This crate defines the fixed vocabulary shared by every other crate in
//! the workspace: the five selectable datasets, the council tax bands, the
//! high-value transaction tiers and their surcharge rates, and the typed
//! property records that GeoJSON property bags are parsed into at load time.

pub mod display;
pub mod manifest;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One of the datasets the map can display.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dataset {
    /// Point markers for postcodes with at least one £2m+ sale.
    MansionTaxPostcodes,
    /// Constituency choropleth of high-value transactions.
    MansionTax,
    /// Constituency choropleth of the share of homes in a council tax band.
    CouncilTax,
    /// Constituency choropleth of the 2025 median house price.
    HousePrice,
    /// Constituency choropleth of the 1995-2025 median price change.
    HousePriceChange,
}

impl Dataset {
    /// Every dataset, in selector order.
    pub const ALL: &[Self] = &[
        Self::MansionTaxPostcodes,
        Self::MansionTax,
        Self::CouncilTax,
        Self::HousePrice,
        Self::HousePriceChange,
    ];

    /// Human-readable selector label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MansionTaxPostcodes => "Mansion tax postcodes",
            Self::MansionTax => "Mansion tax - constituencies",
            Self::CouncilTax => "Council tax bands",
            Self::HousePrice => "Median house price (2025)",
            Self::HousePriceChange => "House price change 1995-2025",
        }
    }

    /// Whether this dataset renders postcode points rather than
    /// constituency polygons.
    #[must_use]
    pub const fn is_postcode(self) -> bool {
        matches!(self, Self::MansionTaxPostcodes)
    }
}

/// A council tax valuation band.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum CouncilTaxBand {
    #[serde(rename = "band_A")]
    #[strum(serialize = "band_A")]
    A,
    #[serde(rename = "band_B")]
    #[strum(serialize = "band_B")]
    B,
    #[serde(rename = "band_C")]
    #[strum(serialize = "band_C")]
    C,
    #[serde(rename = "band_D")]
    #[strum(serialize = "band_D")]
    D,
    #[serde(rename = "band_E")]
    #[strum(serialize = "band_E")]
    E,
    #[serde(rename = "band_F")]
    #[strum(serialize = "band_F")]
    F,
    #[serde(rename = "band_G")]
    #[strum(serialize = "band_G")]
    G,
    #[serde(rename = "band_H")]
    #[strum(serialize = "band_H")]
    H,
    #[serde(rename = "band_I")]
    #[strum(serialize = "band_I")]
    I,
}

impl CouncilTaxBand {
    /// All bands in property-bag order.
    pub const ALL: [Self; 9] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
        Self::I,
    ];

    /// Position of this band in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Property-bag key (e.g. `band_A`).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::A => "band_A",
            Self::B => "band_B",
            Self::C => "band_C",
            Self::D => "band_D",
            Self::E => "band_E",
            Self::F => "band_F",
            Self::G => "band_G",
            Self::H => "band_H",
            Self::I => "band_I",
        }
    }

    /// Single-letter axis label.
    #[must_use]
    pub const fn letter(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::H => "H",
            Self::I => "I",
        }
    }

    /// Display label (e.g. `Band A`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "Band A",
            Self::B => "Band B",
            Self::C => "Band C",
            Self::D => "Band D",
            Self::E => "Band E",
            Self::F => "Band F",
            Self::G => "Band G",
            Self::H => "Band H",
            Self::I => "Band I",
        }
    }

    /// Bar colour used in the council tax distribution chart.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::A => "#f7fbff",
            Self::B => "#deebf7",
            Self::C => "#c6dbef",
            Self::D => "#9ecae1",
            Self::E => "#6baed6",
            Self::F => "#4292c6",
            Self::G => "#2171b5",
            Self::H => "#08519c",
            Self::I => "#08306b",
        }
    }
}

/// A high-value transaction price tier. Each variant is named after the
/// lower bound of its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TxTier {
    /// £2m - £2.5m.
    TwoMillion,
    /// £2.5m - £3.5m.
    TwoAndAHalfMillion,
    /// £3.5m - £5m.
    ThreeAndAHalfMillion,
    /// £5m and above.
    FiveMillionPlus,
}

impl TxTier {
    /// All tiers, cheapest first.
    pub const ALL: [Self; 4] = [
        Self::TwoMillion,
        Self::TwoAndAHalfMillion,
        Self::ThreeAndAHalfMillion,
        Self::FiveMillionPlus,
    ];

    /// Position of this tier in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Constituency property-bag key.
    #[must_use]
    pub const fn count_key(self) -> &'static str {
        match self {
            Self::TwoMillion => "tx_2m_to_2_5m_count",
            Self::TwoAndAHalfMillion => "tx_2_5m_to_3_5m_count",
            Self::ThreeAndAHalfMillion => "tx_3_5m_to_5m_count",
            Self::FiveMillionPlus => "tx_over_5m_count",
        }
    }

    /// Postcode property-bag key (the range label used by the sales CSV).
    #[must_use]
    pub const fn postcode_key(self) -> &'static str {
        match self {
            Self::TwoMillion => "£2m - £2.5m",
            Self::TwoAndAHalfMillion => "£2.5m - £3.5m",
            Self::ThreeAndAHalfMillion => "£3.5m - £5m",
            Self::FiveMillionPlus => "£5m+",
        }
    }

    /// Compact label for bar chart axes.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TwoMillion => "£2m-£2.5m",
            Self::TwoAndAHalfMillion => "£2.5m-£3.5m",
            Self::ThreeAndAHalfMillion => "£3.5m-£5m",
            Self::FiveMillionPlus => "£5m+",
        }
    }

    /// Flat annual surcharge per property in this tier, in pounds.
    #[must_use]
    pub const fn surcharge_rate(self) -> f64 {
        match self {
            Self::TwoMillion => 2_500.0,
            Self::TwoAndAHalfMillion => 3_500.0,
            Self::ThreeAndAHalfMillion => 5_000.0,
            Self::FiveMillionPlus => 7_500.0,
        }
    }

    /// Bar colour for this tier.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::TwoMillion => "#fbb4b9",
            Self::TwoAndAHalfMillion => "#f768a1",
            Self::ThreeAndAHalfMillion => "#c51b8a",
            Self::FiveMillionPlus => "#7a0177",
        }
    }
}

/// Whether a transaction metric is a property count or a pound amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Number of properties.
    Count,
    /// Amount in pounds.
    Amount,
}

/// The sub-metric selector for the mansion tax dataset.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum TxMetric {
    /// Estimated annual surcharge revenue across all tiers.
    #[serde(rename = "tx_estimated_revenue")]
    #[strum(serialize = "tx_estimated_revenue")]
    EstimatedRevenue,
    /// All £2m+ sales.
    #[serde(rename = "tx_2m_plus_count")]
    #[strum(serialize = "tx_2m_plus_count")]
    WithinMansionTax,
    /// £2m - £2.5m sales.
    #[serde(rename = "tx_2m_to_2_5m_count")]
    #[strum(serialize = "tx_2m_to_2_5m_count")]
    TwoMillion,
    /// £2.5m - £3.5m sales.
    #[serde(rename = "tx_2_5m_to_3_5m_count")]
    #[strum(serialize = "tx_2_5m_to_3_5m_count")]
    TwoAndAHalfMillion,
    /// £3.5m - £5m sales.
    #[serde(rename = "tx_3_5m_to_5m_count")]
    #[strum(serialize = "tx_3_5m_to_5m_count")]
    ThreeAndAHalfMillion,
    /// £5m+ sales.
    #[serde(rename = "tx_over_5m_count")]
    #[strum(serialize = "tx_over_5m_count")]
    FiveMillionPlus,
}

impl TxMetric {
    /// All metrics in selector order.
    pub const ALL: &[Self] = &[
        Self::EstimatedRevenue,
        Self::WithinMansionTax,
        Self::TwoMillion,
        Self::TwoAndAHalfMillion,
        Self::ThreeAndAHalfMillion,
        Self::FiveMillionPlus,
    ];

    /// Selector label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EstimatedRevenue => "Estimated mansion tax revenue",
            Self::WithinMansionTax => "Within mansion tax",
            Self::TwoMillion => "£2m - £2.5m",
            Self::TwoAndAHalfMillion => "£2.5m - £3.5m",
            Self::ThreeAndAHalfMillion => "£3.5m - £5m",
            Self::FiveMillionPlus => "£5m+",
        }
    }

    #[must_use]
    pub const fn kind(self) -> MetricKind {
        match self {
            Self::EstimatedRevenue => MetricKind::Amount,
            _ => MetricKind::Count,
        }
    }

    /// The single tier this metric counts, if it is a per-tier metric.
    #[must_use]
    pub const fn tier(self) -> Option<TxTier> {
        match self {
            Self::EstimatedRevenue | Self::WithinMansionTax => None,
            Self::TwoMillion => Some(TxTier::TwoMillion),
            Self::TwoAndAHalfMillion => Some(TxTier::TwoAndAHalfMillion),
            Self::ThreeAndAHalfMillion => Some(TxTier::ThreeAndAHalfMillion),
            Self::FiveMillionPlus => Some(TxTier::FiveMillionPlus),
        }
    }
}

/// The secondary selector narrowing a dataset to one displayed quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SubMetric {
    /// Active council tax band.
    Band(CouncilTaxBand),
    /// Active transaction metric.
    Transaction(TxMetric),
}

/// The user's current selection: one active dataset plus the remembered
/// sub-metric for each dataset that has one.
///
/// Transitions return a new value; nothing is mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub dataset: Dataset,
    pub band: CouncilTaxBand,
    pub metric: TxMetric,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            dataset: Dataset::MansionTaxPostcodes,
            band: CouncilTaxBand::H,
            metric: TxMetric::EstimatedRevenue,
        }
    }
}

impl ViewState {
    /// Switches the active dataset.
    ///
    /// Selecting the mansion tax dataset always resets the transaction
    /// metric to estimated revenue.
    #[must_use]
    pub const fn with_dataset(self, dataset: Dataset) -> Self {
        let metric = match dataset {
            Dataset::MansionTax => TxMetric::EstimatedRevenue,
            _ => self.metric,
        };
        Self {
            dataset,
            band: self.band,
            metric,
        }
    }

    /// Switches the sub-metric.
    ///
    /// Returns `None` when the sub-metric does not apply to the active
    /// dataset (e.g. a band while viewing house prices).
    #[must_use]
    pub const fn with_sub_metric(self, sub_metric: SubMetric) -> Option<Self> {
        match (self.dataset, sub_metric) {
            (Dataset::CouncilTax, SubMetric::Band(band)) => Some(Self { band, ..self }),
            (Dataset::MansionTax, SubMetric::Transaction(metric)) => Some(Self { metric, ..self }),
            _ => None,
        }
    }

    /// Label describing what is currently shown.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self.dataset {
            Dataset::MansionTax => self.metric.label(),
            dataset => dataset.label(),
        }
    }

    /// Heading for the legend panel.
    #[must_use]
    pub fn legend_title(&self) -> String {
        match self.dataset {
            Dataset::CouncilTax => format!("{} share", self.band.label()),
            _ => self.label().to_string(),
        }
    }
}

/// Transaction counts for one constituency. Every field is independently
/// optional; a missing or malformed source value is `None`, never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCounts {
    /// Per-tier counts, indexed by [`TxTier::index`].
    pub tiers: [Option<f64>; 4],
    /// `tx_2m_plus_count`.
    pub two_million_plus: Option<f64>,
    /// `tx_total_count`.
    pub total: Option<f64>,
    /// `tx_rejected_count`.
    pub rejected: Option<f64>,
}

impl TransactionCounts {
    #[must_use]
    pub const fn tier(&self, tier: TxTier) -> Option<f64> {
        self.tiers[tier.index()]
    }

    /// The count a count-typed metric reads. Always `None` for
    /// [`TxMetric::EstimatedRevenue`].
    #[must_use]
    pub const fn metric_count(&self, metric: TxMetric) -> Option<f64> {
        match metric {
            TxMetric::EstimatedRevenue => None,
            TxMetric::WithinMansionTax => self.two_million_plus,
            TxMetric::TwoMillion => self.tier(TxTier::TwoMillion),
            TxMetric::TwoAndAHalfMillion => self.tier(TxTier::TwoAndAHalfMillion),
            TxMetric::ThreeAndAHalfMillion => self.tier(TxTier::ThreeAndAHalfMillion),
            TxMetric::FiveMillionPlus => self.tier(TxTier::FiveMillionPlus),
        }
    }
}

/// Typed properties of one constituency feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstituencyProperties {
    /// ONS constituency code (e.g. `E14001234`), trimmed.
    pub pcon_code: Option<String>,
    /// Constituency name, trimmed.
    pub name: Option<String>,
    /// Band counts, indexed by [`CouncilTaxBand::index`]. A missing band
    /// is a legitimate zero.
    pub bands: [f64; 9],
    pub median_price_2025: Option<f64>,
    pub median_price_1995: Option<f64>,
    /// Percentage change as published by the source. Not recomputed.
    pub median_price_change_pct: Option<f64>,
    pub transactions: TransactionCounts,
}

impl ConstituencyProperties {
    #[must_use]
    pub const fn band(&self, band: CouncilTaxBand) -> f64 {
        self.bands[band.index()]
    }

    /// Name for headings and tooltips.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.pcon_code.as_deref())
            .unwrap_or("Unknown constituency")
    }
}

/// Typed properties of one postcode point feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostcodeProperties {
    /// Display form, e.g. `SW1A 1AA`.
    pub postcode_label: Option<String>,
    /// Normalised form, e.g. `SW1A1AA`.
    pub postcode_clean: Option<String>,
    /// Constituency the postcode falls in.
    pub pcon_code: Option<String>,
    /// Number of £2m+ sales at this postcode.
    pub hv_count: Option<f64>,
    /// Per-tier counts, indexed by [`TxTier::index`].
    pub tiers: [Option<f64>; 4],
    /// `£0 - £2m` sales.
    pub under_two_million: Option<f64>,
    /// `Total Sales`.
    pub total_sales: Option<f64>,
    /// `rejected_multiple_transactions`.
    pub rejected: Option<f64>,
}

impl PostcodeProperties {
    #[must_use]
    pub const fn tier(&self, tier: TxTier) -> Option<f64> {
        self.tiers[tier.index()]
    }

    /// Label for headings and markers. Falls back to the cleaned postcode.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.postcode_label
            .as_deref()
            .or(self.postcode_clean.as_deref())
    }
}

/// Per-band counts with their total. Missing bands count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandStats {
    pub values: [f64; 9],
    pub total: f64,
}

impl BandStats {
    #[must_use]
    pub const fn value(&self, band: CouncilTaxBand) -> f64 {
        self.values[band.index()]
    }
}

/// House price figures, each independently optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HousePriceInfo {
    pub price_2025: Option<f64>,
    pub price_1995: Option<f64>,
    pub change_pct: Option<f64>,
}

/// Transaction counts plus the revenue they imply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    pub counts: TransactionCounts,
    pub estimated_revenue: f64,
}

/// Dataset-wide maxima used as comparison-bar denominators.
///
/// All four start at zero; an empty collection leaves them there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalMaxima {
    pub price_2025: f64,
    pub change_pct: f64,
    pub transactions: f64,
    pub mansion_tax_properties: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_round_trips_through_strum() {
        for dataset in Dataset::ALL {
            let parsed: Dataset = dataset.as_ref().parse().unwrap();
            assert_eq!(parsed, *dataset);
        }
        assert_eq!(Dataset::HousePriceChange.to_string(), "house_price_change");
    }

    #[test]
    fn band_keys_parse_back() {
        for band in CouncilTaxBand::ALL {
            assert_eq!(band.key().parse::<CouncilTaxBand>().unwrap(), band);
            assert_eq!(band.to_string(), band.key());
        }
    }

    #[test]
    fn tx_metric_serializes_as_field_key() {
        let json = serde_json::to_string(&TxMetric::WithinMansionTax).unwrap();
        assert_eq!(json, "\"tx_2m_plus_count\"");
        assert_eq!(
            "tx_over_5m_count".parse::<TxMetric>().unwrap(),
            TxMetric::FiveMillionPlus
        );
    }

    #[test]
    fn only_revenue_is_an_amount() {
        for metric in TxMetric::ALL {
            let expected = if *metric == TxMetric::EstimatedRevenue {
                MetricKind::Amount
            } else {
                MetricKind::Count
            };
            assert_eq!(metric.kind(), expected);
        }
    }

    #[test]
    fn switching_to_mansion_tax_resets_metric() {
        let view = ViewState {
            dataset: Dataset::MansionTax,
            band: CouncilTaxBand::H,
            metric: TxMetric::FiveMillionPlus,
        };
        let view = view.with_dataset(Dataset::HousePrice);
        assert_eq!(view.metric, TxMetric::FiveMillionPlus);
        let view = view.with_dataset(Dataset::MansionTax);
        assert_eq!(view.metric, TxMetric::EstimatedRevenue);
    }

    #[test]
    fn sub_metric_must_match_dataset() {
        let view = ViewState::default().with_dataset(Dataset::CouncilTax);
        let updated = view
            .with_sub_metric(SubMetric::Band(CouncilTaxBand::D))
            .unwrap();
        assert_eq!(updated.band, CouncilTaxBand::D);
        assert!(
            view.with_sub_metric(SubMetric::Transaction(TxMetric::TwoMillion))
                .is_none()
        );
        assert!(
            ViewState::default()
                .with_dataset(Dataset::HousePrice)
                .with_sub_metric(SubMetric::Band(CouncilTaxBand::A))
                .is_none()
        );
    }

    #[test]
    fn legend_title_follows_selection() {
        let view = ViewState::default().with_dataset(Dataset::CouncilTax);
        assert_eq!(view.legend_title(), "Band H share");
        let view = view.with_dataset(Dataset::MansionTax);
        assert_eq!(view.legend_title(), "Estimated mansion tax revenue");
        let view = view.with_dataset(Dataset::HousePrice);
        assert_eq!(view.legend_title(), "Median house price (2025)");
    }

    #[test]
    fn constituency_display_name_falls_back_to_code() {
        let mut props = ConstituencyProperties {
            pcon_code: Some("E14000639".to_string()),
            ..Default::default()
        };
        assert_eq!(props.display_name(), "E14000639");
        props.pcon_code = None;
        assert_eq!(props.display_name(), "Unknown constituency");
    }

    #[test]
    fn metric_count_reads_matching_field() {
        let counts = TransactionCounts {
            tiers: [Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
            two_million_plus: Some(10.0),
            total: Some(500.0),
            rejected: None,
        };
        assert_eq!(counts.metric_count(TxMetric::WithinMansionTax), Some(10.0));
        assert_eq!(counts.metric_count(TxMetric::ThreeAndAHalfMillion), Some(3.0));
        assert_eq!(counts.metric_count(TxMetric::EstimatedRevenue), None);
    }
}
