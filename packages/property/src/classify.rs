//! Colour classification: break sets and ramp lookups.

use serde::{Deserialize, Serialize};

use crate::resolve::MetricSelector;
use mansion_map_property_models::ConstituencyProperties;

/// Sequential blue ramp, lightest first. Shared by every dataset.
pub const COLOR_RAMP: [&str; 6] = [
    "#f7fbff", "#c6dbef", "#9ecae1", "#4292c6", "#0868ac", "#08306b",
];

/// Fill used when a break set is too small to classify anything.
pub const UNCLASSIFIED_COLOR: &str = "#f0f0f0";

const QUANTILE_CLASSES: usize = 5;

/// Ordered, strictly increasing thresholds. The last class is open-ended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreakSet(Vec<f64>);

impl BreakSet {
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Ramp colour for `value`: the highest threshold at or below `value`
    /// picks its ramp index, clamped to the ramp length.
    #[must_use]
    pub fn color_for(&self, value: f64) -> &'static str {
        if self.0.len() < 2 {
            return UNCLASSIFIED_COLOR;
        }
        self.0
            .iter()
            .rposition(|threshold| value >= *threshold)
            .map_or(COLOR_RAMP[0], |i| {
                COLOR_RAMP[i.min(COLOR_RAMP.len() - 1)]
            })
    }
}

impl From<Vec<f64>> for BreakSet {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Computes the break set for `selector` over `features`.
///
/// Transaction metrics use fixed thresholds regardless of the data.
/// Continuous metrics use five quantile cut points plus the maximum,
/// deduplicated, so low-cardinality data can produce fewer classes. An
/// empty value distribution produces an empty set.
pub fn compute_breaks<'a>(
    selector: MetricSelector,
    features: impl IntoIterator<Item = &'a ConstituencyProperties>,
) -> BreakSet {
    if let Some(literal) = selector.literal_breaks() {
        return BreakSet(literal.to_vec());
    }

    let mut values: Vec<f64> = features
        .into_iter()
        .filter_map(|props| selector.value(props))
        .filter(|v| v.is_finite())
        .collect();

    quantile_breaks(&mut values)
}

/// Quantile breaks over raw values. Sorts `values` in place.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn quantile_breaks(values: &mut [f64]) -> BreakSet {
    if values.is_empty() {
        return BreakSet::default();
    }
    values.sort_by(f64::total_cmp);

    let last = values.len() - 1;
    let mut breaks: Vec<f64> = (0..QUANTILE_CLASSES)
        .map(|i| {
            let q = i as f64 / QUANTILE_CLASSES as f64;
            let rank = (q * last as f64).floor() as usize;
            values[rank.min(last)]
        })
        .collect();
    breaks.push(values[last]);
    breaks.dedup();

    log::trace!("quantile_breaks: n={} breaks={breaks:?}", values.len());

    BreakSet(breaks)
}
