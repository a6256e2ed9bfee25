//! Resolves "the value shown for this feature" under a view.
//!
//! A [`MetricSelector`] is derived once from a [`ViewState`] and then
//! applied to every feature, so per-feature code never re-inspects the
//! dataset name.

use mansion_map_property_models::{
    ConstituencyProperties, CouncilTaxBand, Dataset, MetricKind, TxMetric, ViewState,
};

use crate::extract::{band_percent, band_stats, estimated_revenue};

/// How legend thresholds and headline values are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// `£1,250,000`
    Currency,
    /// `£1.3m`, `£250k`
    CurrencyShort,
    /// `1,250`
    Count,
    /// `12.5%`
    Percent,
}

/// The single scalar a view maps each constituency to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSelector {
    /// Share of homes in one council tax band, as a percentage.
    BandShare(CouncilTaxBand),
    /// 2025 median price.
    MedianPrice,
    /// 1995-2025 median price change, as published.
    PriceChange,
    /// A count-typed transaction metric.
    TransactionCount(TxMetric),
    /// Estimated surcharge revenue.
    EstimatedRevenue,
    /// Postcode markers: constituencies carry no value.
    PostcodeMarkers,
}

impl From<&ViewState> for MetricSelector {
    fn from(view: &ViewState) -> Self {
        match view.dataset {
            Dataset::MansionTaxPostcodes => Self::PostcodeMarkers,
            Dataset::CouncilTax => Self::BandShare(view.band),
            Dataset::HousePrice => Self::MedianPrice,
            Dataset::HousePriceChange => Self::PriceChange,
            Dataset::MansionTax => match view.metric.kind() {
                MetricKind::Amount => Self::EstimatedRevenue,
                MetricKind::Count => Self::TransactionCount(view.metric),
            },
        }
    }
}

impl MetricSelector {
    /// The metric value for `props`, or `None` for "no data".
    ///
    /// `Some(0.0)` is a real observation and is never substituted for a
    /// missing value.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn value(self, props: &ConstituencyProperties) -> Option<f64> {
        let value = match self {
            Self::BandShare(band) => {
                let stats = band_stats(props);
                if stats.total == 0.0 {
                    return None;
                }
                Some(band_percent(stats.value(band), stats.total))
            }
            Self::MedianPrice => props.median_price_2025,
            Self::PriceChange => props.median_price_change_pct,
            Self::TransactionCount(metric) => props.transactions.metric_count(metric),
            Self::EstimatedRevenue => Some(estimated_revenue(&props.transactions)),
            Self::PostcodeMarkers => None,
        };
        value.filter(|v| v.is_finite())
    }

    /// Whether `props` should be drawn as a data-bearing feature.
    ///
    /// Stricter than `value().is_some()` for transaction metrics, where a
    /// zero count or zero revenue counts as no data.
    #[must_use]
    pub fn has_data(self, props: &ConstituencyProperties) -> bool {
        match self {
            Self::BandShare(_) => band_stats(props).total > 0.0,
            Self::MedianPrice | Self::PriceChange => self.value(props).is_some(),
            Self::TransactionCount(_) | Self::EstimatedRevenue => {
                self.value(props).is_some_and(|v| v > 0.0)
            }
            Self::PostcodeMarkers => false,
        }
    }

    /// Fixed thresholds for transaction metrics; `None` for metrics whose
    /// breaks are derived from the data.
    #[must_use]
    pub const fn literal_breaks(self) -> Option<&'static [f64]> {
        match self {
            Self::TransactionCount(_) => Some(&[0.0, 50.0, 100.0, 300.0, 1_000.0, 5_000.0]),
            Self::EstimatedRevenue => Some(&[
                0.0,
                100_000.0,
                300_000.0,
                500_000.0,
                1_000_000.0,
                10_000_000.0,
            ]),
            Self::BandShare(_) | Self::MedianPrice | Self::PriceChange | Self::PostcodeMarkers => {
                None
            }
        }
    }

    #[must_use]
    pub const fn value_format(self) -> ValueFormat {
        match self {
            Self::MedianPrice => ValueFormat::Currency,
            Self::EstimatedRevenue => ValueFormat::CurrencyShort,
            Self::TransactionCount(_) => ValueFormat::Count,
            Self::BandShare(_) | Self::PriceChange | Self::PostcodeMarkers => ValueFormat::Percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mansion_map_property_models::{TransactionCounts, TxTier};

    fn council_tax(band: CouncilTaxBand) -> MetricSelector {
        let view = ViewState {
            band,
            ..ViewState::default().with_dataset(Dataset::CouncilTax)
        };
        MetricSelector::from(&view)
    }

    fn mansion_tax(metric: TxMetric) -> MetricSelector {
        let view = ViewState {
            metric,
            ..ViewState::default().with_dataset(Dataset::MansionTax)
        };
        MetricSelector::from(&view)
    }

    #[test]
    fn band_share_end_to_end() {
        let mut props = ConstituencyProperties::default();
        props.bands[CouncilTaxBand::A.index()] = 10.0;
        props.bands[CouncilTaxBand::B.index()] = 0.0;
        props.bands[CouncilTaxBand::D.index()] = 40.0;

        let selector = council_tax(CouncilTaxBand::D);
        let value = selector.value(&props).unwrap();
        assert!((value - 80.0).abs() < 1e-9);
        assert!(selector.has_data(&props));
    }

    #[test]
    fn band_share_without_total_is_no_data() {
        let props = ConstituencyProperties::default();
        let selector = council_tax(CouncilTaxBand::H);
        assert_eq!(selector.value(&props), None);
        assert!(!selector.has_data(&props));
    }

    #[test]
    fn band_share_zero_is_a_value() {
        let mut props = ConstituencyProperties::default();
        props.bands[CouncilTaxBand::A.index()] = 10.0;
        assert_eq!(council_tax(CouncilTaxBand::H).value(&props), Some(0.0));
    }

    #[test]
    fn house_price_reads_price_and_change() {
        let view = ViewState::default().with_dataset(Dataset::HousePrice);
        let props = ConstituencyProperties {
            median_price_2025: Some(450_000.0),
            median_price_change_pct: Some(-3.5),
            ..Default::default()
        };
        assert_eq!(MetricSelector::from(&view).value(&props), Some(450_000.0));
        let view = view.with_dataset(Dataset::HousePriceChange);
        let selector = MetricSelector::from(&view);
        assert_eq!(selector.value(&props), Some(-3.5));
        assert!(selector.has_data(&props));
    }

    #[test]
    fn missing_price_propagates_as_none() {
        let selector = MetricSelector::MedianPrice;
        let props = ConstituencyProperties::default();
        assert_eq!(selector.value(&props), None);
        assert!(!selector.has_data(&props));
    }

    #[test]
    fn transaction_count_needs_positive_value_for_data() {
        let selector = mansion_tax(TxMetric::FiveMillionPlus);
        let mut props = ConstituencyProperties::default();
        props.transactions.tiers[TxTier::FiveMillionPlus.index()] = Some(0.0);
        assert_eq!(selector.value(&props), Some(0.0));
        assert!(!selector.has_data(&props));

        props.transactions.tiers[TxTier::FiveMillionPlus.index()] = Some(4.0);
        assert!(selector.has_data(&props));
    }

    #[test]
    fn revenue_is_always_a_value() {
        let selector = mansion_tax(TxMetric::EstimatedRevenue);
        assert_eq!(selector, MetricSelector::EstimatedRevenue);
        let props = ConstituencyProperties {
            transactions: TransactionCounts {
                tiers: [Some(1.0), None, None, None],
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(selector.value(&props), Some(2_500.0));
        assert!(selector.has_data(&props));
        let empty = ConstituencyProperties::default();
        assert_eq!(selector.value(&empty), Some(0.0));
        assert!(!selector.has_data(&empty));
    }

    #[test]
    fn postcode_view_has_no_constituency_values() {
        let selector = MetricSelector::from(&ViewState::default());
        let props = ConstituencyProperties {
            median_price_2025: Some(1.0),
            ..Default::default()
        };
        assert_eq!(selector, MetricSelector::PostcodeMarkers);
        assert_eq!(selector.value(&props), None);
        assert!(!selector.has_data(&props));
    }

    #[test]
    fn formats_follow_metric() {
        assert_eq!(MetricSelector::MedianPrice.value_format(), ValueFormat::Currency);
        assert_eq!(
            mansion_tax(TxMetric::WithinMansionTax).value_format(),
            ValueFormat::Count
        );
        assert_eq!(
            mansion_tax(TxMetric::EstimatedRevenue).value_format(),
            ValueFormat::CurrencyShort
        );
        assert_eq!(MetricSelector::PriceChange.value_format(), ValueFormat::Percent);
    }
}
