//! Per-dataset metric extractors over typed constituency records.

use mansion_map_property_models::{
    BandStats, ConstituencyProperties, HousePriceInfo, TransactionCounts, TransactionInfo, TxTier,
};

/// Band counts in fixed order and their sum.
#[must_use]
pub fn band_stats(props: &ConstituencyProperties) -> BandStats {
    BandStats {
        values: props.bands,
        total: props.bands.iter().sum(),
    }
}

/// `value` as a percentage of `total`, or 0 when there is no total.
#[must_use]
pub fn band_percent(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value / total * 100.0
    } else {
        0.0
    }
}

#[must_use]
pub const fn house_price_info(props: &ConstituencyProperties) -> HousePriceInfo {
    HousePriceInfo {
        price_2025: props.median_price_2025,
        price_1995: props.median_price_1995,
        change_pct: props.median_price_change_pct,
    }
}

/// Sum of `count * rate` over tiers with a positive count.
///
/// Missing and non-positive counts contribute nothing, so the result is
/// never negative.
#[must_use]
pub fn estimated_revenue(counts: &TransactionCounts) -> f64 {
    TxTier::ALL
        .iter()
        .filter_map(|tier| {
            let count = counts.tier(*tier)?;
            let rate = tier.surcharge_rate();
            (count.is_finite() && count > 0.0 && rate > 0.0).then_some(count * rate)
        })
        .sum()
}

#[must_use]
pub fn transaction_info(props: &ConstituencyProperties) -> TransactionInfo {
    TransactionInfo {
        counts: props.transactions,
        estimated_revenue: estimated_revenue(&props.transactions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mansion_map_property_models::CouncilTaxBand;

    fn counts(tiers: [Option<f64>; 4]) -> TransactionCounts {
        TransactionCounts {
            tiers,
            ..Default::default()
        }
    }

    #[test]
    fn band_total_sums_all_bands() {
        let mut props = ConstituencyProperties::default();
        props.bands[CouncilTaxBand::A.index()] = 10.0;
        props.bands[CouncilTaxBand::D.index()] = 40.0;
        let stats = band_stats(&props);
        assert!((stats.total - 50.0).abs() < f64::EPSILON);
        assert!((stats.value(CouncilTaxBand::D) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn band_percents_never_exceed_one_hundred() {
        let mut props = ConstituencyProperties::default();
        for (i, band) in CouncilTaxBand::ALL.iter().enumerate() {
            props.bands[band.index()] = f64::from(u32::try_from(i * 7 + 3).unwrap());
        }
        let stats = band_stats(&props);
        let sum: f64 = CouncilTaxBand::ALL
            .iter()
            .map(|b| band_percent(stats.value(*b), stats.total))
            .sum();
        assert!(sum <= 100.0 + 1e-9);
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn band_percent_of_empty_total_is_zero() {
        assert!(band_percent(5.0, 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn revenue_applies_flat_rates() {
        let c = counts([Some(2.0), Some(1.0), None, Some(1.0)]);
        // 2 * 2500 + 1 * 3500 + 1 * 7500
        assert!((estimated_revenue(&c) - 16_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn revenue_is_zero_without_counts() {
        assert!(estimated_revenue(&counts([None; 4])).abs() < f64::EPSILON);
        assert!(estimated_revenue(&counts([Some(0.0); 4])).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_counts_contribute_nothing() {
        let c = counts([Some(-5.0), Some(1.0), None, None]);
        assert!((estimated_revenue(&c) - 3_500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn revenue_is_monotone_in_each_tier() {
        for tier in TxTier::ALL {
            let mut previous = 0.0;
            for n in 0..20 {
                let mut tiers = [Some(3.0); 4];
                tiers[tier.index()] = Some(f64::from(n));
                let revenue = estimated_revenue(&counts(tiers));
                assert!(revenue >= previous);
                previous = revenue;
            }
        }
    }

    #[test]
    fn change_pct_is_read_not_derived() {
        let props = ConstituencyProperties {
            median_price_2025: Some(200_000.0),
            median_price_1995: Some(100_000.0),
            median_price_change_pct: Some(42.0),
            ..Default::default()
        };
        assert_eq!(house_price_info(&props).change_pct, Some(42.0));
    }
}
