//! Dataset-wide maxima for comparison bars.

use mansion_map_property_models::{ConstituencyProperties, GlobalMaxima};

/// Single pass over `features`. Each maximum starts at zero and only moves
/// for a strictly greater finite value, so negative or missing values never
/// lower it.
pub fn global_maxima<'a>(
    features: impl IntoIterator<Item = &'a ConstituencyProperties>,
) -> GlobalMaxima {
    features
        .into_iter()
        .fold(GlobalMaxima::default(), |mut acc, props| {
            raise(&mut acc.price_2025, props.median_price_2025);
            raise(&mut acc.change_pct, props.median_price_change_pct);
            raise(&mut acc.transactions, props.transactions.total);
            raise(
                &mut acc.mansion_tax_properties,
                props.transactions.two_million_plus,
            );
            acc
        })
}

fn raise(current: &mut f64, candidate: Option<f64>) {
    if let Some(value) = candidate.filter(|v| v.is_finite())
        && value > *current
    {
        *current = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mansion_map_property_models::TransactionCounts;

    fn with_price(price: Option<f64>) -> ConstituencyProperties {
        ConstituencyProperties {
            median_price_2025: price,
            ..Default::default()
        }
    }

    #[test]
    fn picks_largest_price_and_skips_missing() {
        let features = [
            with_price(Some(500_000.0)),
            with_price(Some(750_000.0)),
            with_price(None),
        ];
        let maxima = global_maxima(&features);
        assert!((maxima.price_2025 - 750_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_collection_stays_at_zero() {
        assert_eq!(global_maxima(&[]), GlobalMaxima::default());
    }

    #[test]
    fn negatives_never_lower_the_seed() {
        let features = [ConstituencyProperties {
            median_price_change_pct: Some(-12.0),
            ..Default::default()
        }];
        assert!(global_maxima(&features).change_pct.abs() < f64::EPSILON);
    }

    #[test]
    fn tracks_transaction_totals_separately() {
        let features = [
            ConstituencyProperties {
                transactions: TransactionCounts {
                    two_million_plus: Some(90.0),
                    total: Some(1_200.0),
                    ..Default::default()
                },
                ..Default::default()
            },
            ConstituencyProperties {
                transactions: TransactionCounts {
                    two_million_plus: Some(140.0),
                    total: Some(800.0),
                    ..Default::default()
                },
                ..Default::default()
            },
        ];
        let maxima = global_maxima(&features);
        assert!((maxima.transactions - 1_200.0).abs() < f64::EPSILON);
        assert!((maxima.mansion_tax_properties - 140.0).abs() < f64::EPSILON);
    }
}
