//! Builders for everything the map renders: feature styles, legends,
//! comparison bars, bar charts, tooltips and info-panel summaries.
//!
//! All builders are pure functions of typed records, the active view and
//! precomputed breaks or maxima.

use mansion_map_property_models::{
    BandStats, ConstituencyProperties, CouncilTaxBand, Dataset, GlobalMaxima, MetricKind,
    PostcodeProperties, TransactionInfo, TxTier, ViewState,
    display::{
        BarChart, BarItem, BarReading, ComparisonBar, ConstituencySummary, FeatureStyle, Legend,
        LegendEntry, PostcodeSummary, Tooltip,
    },
};

use crate::{
    classify::BreakSet,
    extract::{band_percent, band_stats, house_price_info, transaction_info},
    format::{
        format_change_opt, format_count, format_currency, format_currency_compact,
        format_currency_opt, format_number, format_number_opt, format_percent, format_value,
    },
    resolve::MetricSelector,
};

/// Legend text for the postcode marker layer.
pub const POSTCODE_LEGEND_NOTE: &str = "Each marker shows a postcode with at least one £2m+ \
property. Important: marker locations are approximate. Individual properties are not shown; \
only postcodes.";

const NO_DATA_NOTE: &str = "No data";
const NO_DATA_AVAILABLE: &str = "No data available";

pub const MANSION_TAX_PROPERTIES_COLOR: &str = "#F15BB5";
pub const MEDIAN_PRICE_COLOR: &str = "#1133AF";
pub const PRICE_CHANGE_COLOR: &str = "#0E9C8F";

/// Nudge added to each lower bound so the legend swatch lands inside its
/// own class.
const LEGEND_EPSILON: f64 = 1e-9;

/// Builds the legend for `view` from its break set.
#[must_use]
pub fn legend(view: &ViewState, breaks: &BreakSet) -> Legend {
    if view.dataset == Dataset::MansionTaxPostcodes {
        return Legend {
            title: view.legend_title(),
            entries: vec![],
            note: Some(POSTCODE_LEGEND_NOTE.to_string()),
        };
    }

    let title = view.legend_title();
    if breaks.is_empty() {
        return Legend {
            title,
            entries: vec![],
            note: Some(NO_DATA_NOTE.to_string()),
        };
    }

    let format = MetricSelector::from(view).value_format();
    let thresholds = breaks.as_slice();
    let entries = thresholds
        .iter()
        .enumerate()
        .map(|(i, from)| {
            let to = thresholds.get(i + 1).copied();
            let from_label = format_value(format, *from);
            let label = match to {
                Some(to) => format!("{from_label} – {}", format_value(format, to)),
                None => format!("{from_label}+"),
            };
            LegendEntry {
                color: breaks.color_for(from + LEGEND_EPSILON).to_string(),
                from: *from,
                to,
                label,
            }
        })
        .collect();

    Legend {
        title,
        entries,
        note: None,
    }
}

/// Style for a constituency polygon. Anything without a metric value is
/// drawn as a dashed, non-interactive outline.
#[must_use]
pub fn feature_style(
    selector: MetricSelector,
    breaks: &BreakSet,
    props: &ConstituencyProperties,
) -> FeatureStyle {
    selector.value(props).map_or_else(FeatureStyle::no_data, |value| {
        FeatureStyle::filled(breaks.color_for(value))
    })
}

/// A value plotted against a positive maximum. Negative values sit at the
/// origin; values above the maximum are pinned to the end of the track.
#[must_use]
pub fn comparison_bar(
    label: &str,
    color: &str,
    value: Option<f64>,
    max_value: f64,
    format: impl Fn(f64) -> String,
) -> ComparisonBar {
    let reading = match value {
        Some(value) if value.is_finite() && max_value.is_finite() && max_value > 0.0 => {
            let ratio_pct = (value.max(0.0) / max_value).min(1.0) * 100.0;
            BarReading::Value {
                value,
                max_value,
                ratio_pct,
                formatted_value: format(value),
                formatted_max: format(max_value),
            }
        }
        _ => BarReading::NoData,
    };
    ComparisonBar {
        label: label.to_string(),
        color: color.to_string(),
        reading,
    }
}

#[derive(Clone, Copy)]
enum ChartMode {
    Percent,
    Count,
}

fn bar_chart(items: Vec<BarItem>, mode: ChartMode) -> Option<BarChart> {
    if items.is_empty() {
        return None;
    }
    let raw_max = items
        .iter()
        .map(|item| item.value)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let max_value = if raw_max > 0.0 {
        raw_max
    } else {
        match mode {
            ChartMode::Percent => 100.0,
            ChartMode::Count => 1.0,
        }
    };
    Some(BarChart { items, max_value })
}

/// Percentage of homes in each band. Band I is left out when empty.
#[must_use]
pub fn council_tax_bars(stats: &BandStats) -> Option<BarChart> {
    if stats.total <= 0.0 {
        return None;
    }
    let items = CouncilTaxBand::ALL
        .iter()
        .filter(|band| **band != CouncilTaxBand::I || stats.value(**band) > 0.0)
        .map(|band| {
            let count = stats.value(*band);
            let percent = band_percent(count, stats.total);
            BarItem {
                label: band.letter().to_string(),
                value: percent,
                display_value: format_percent(percent, 1),
                tooltip: format!(
                    "{}: {} ({} properties)",
                    band.label(),
                    format_percent(percent, 1),
                    format_number(count)
                ),
                color: band.color().to_string(),
            }
        })
        .collect();
    bar_chart(items, ChartMode::Percent)
}

fn positive_count(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0)
}

/// Tier breakdown of £2m+ sales, as counts with their share of the
/// aggregate. `None` unless the aggregate is a positive number.
#[must_use]
pub fn transaction_bars(info: &TransactionInfo) -> Option<BarChart> {
    let total = info
        .counts
        .two_million_plus
        .filter(|t| t.is_finite() && *t > 0.0)?;
    let items = TxTier::ALL
        .iter()
        .map(|tier| {
            let count = positive_count(info.counts.tier(*tier));
            let percent = count / total * 100.0;
            BarItem {
                label: tier.label().to_string(),
                value: count,
                display_value: format_count(count),
                tooltip: format!(
                    "{}: {} ({})",
                    tier.label(),
                    format_count(count),
                    format_percent(percent, 1)
                ),
                color: tier.color().to_string(),
            }
        })
        .collect();
    bar_chart(items, ChartMode::Count)
}

/// Tier counts for one postcode. `None` when every tier is empty.
#[must_use]
pub fn postcode_bars(props: &PostcodeProperties) -> Option<BarChart> {
    let items: Vec<BarItem> = TxTier::ALL
        .iter()
        .map(|tier| {
            let count = positive_count(props.tier(*tier));
            BarItem {
                label: tier.label().to_string(),
                value: count,
                display_value: format_count(count),
                tooltip: format!("{}: {}", tier.label(), format_count(count)),
                color: tier.color().to_string(),
            }
        })
        .collect();
    if items.iter().all(|item| item.value <= 0.0) {
        return None;
    }
    bar_chart(items, ChartMode::Count)
}

/// Hover text for a constituency under `view`.
#[must_use]
pub fn tooltip(view: &ViewState, props: &ConstituencyProperties) -> Tooltip {
    let title = props.display_name().to_string();
    let selector = MetricSelector::from(view);

    if !selector.has_data(props) {
        return Tooltip {
            title,
            lines: vec![NO_DATA_AVAILABLE.to_string()],
        };
    }

    let prices = house_price_info(props);
    let lines = match view.dataset {
        Dataset::CouncilTax => {
            let stats = band_stats(props);
            let count = stats.value(view.band);
            vec![
                format!(
                    "{} in {}",
                    format_percent(band_percent(count, stats.total), 2),
                    view.band.label()
                ),
                format!("{} properties", format_number(count)),
            ]
        }
        Dataset::HousePrice => vec![
            format!(
                "{} median price (2025)",
                format_currency_opt(prices.price_2025)
            ),
            format!("{} in 1995", format_currency_opt(prices.price_1995)),
        ],
        Dataset::HousePriceChange => vec![
            format!("{} since 1995", format_change_opt(prices.change_pct)),
            format!(
                "{} → {}",
                format_currency_opt(prices.price_1995),
                format_currency_opt(prices.price_2025)
            ),
        ],
        Dataset::MansionTax => {
            let info = transaction_info(props);
            match view.metric.kind() {
                MetricKind::Count => vec![format!(
                    "{} mansion tax properties",
                    format_number_opt(info.counts.metric_count(view.metric))
                )],
                MetricKind::Amount => vec![
                    format!(
                        "{} estimated revenue",
                        format_currency_compact(info.estimated_revenue)
                    ),
                    format!(
                        "{} mansion tax properties",
                        format_number_opt(info.counts.two_million_plus)
                    ),
                ],
            }
        }
        Dataset::MansionTaxPostcodes => vec![NO_DATA_AVAILABLE.to_string()],
    };

    Tooltip { title, lines }
}

/// Info-panel summary for one constituency.
#[must_use]
pub fn constituency_summary(
    props: &ConstituencyProperties,
    maxima: &GlobalMaxima,
    include_council_tax: bool,
) -> ConstituencySummary {
    let prices = house_price_info(props);
    let info = transaction_info(props);

    ConstituencySummary {
        code: props.pcon_code.clone(),
        name: props.display_name().to_string(),
        mansion_tax_properties: comparison_bar(
            "Mansion tax properties",
            MANSION_TAX_PROPERTIES_COLOR,
            info.counts.two_million_plus,
            maxima.mansion_tax_properties,
            format_count,
        ),
        transactions: transaction_bars(&info),
        estimated_revenue: info.estimated_revenue,
        council_tax: if include_council_tax {
            council_tax_bars(&band_stats(props))
        } else {
            None
        },
        median_price: comparison_bar(
            "Median price (2025)",
            MEDIAN_PRICE_COLOR,
            prices.price_2025,
            maxima.price_2025,
            format_currency,
        ),
        price_change: comparison_bar(
            "Price change since 1995",
            PRICE_CHANGE_COLOR,
            prices.change_pct,
            maxima.change_pct,
            |v| format_percent(v, 1),
        ),
    }
}

/// Info-panel summary for a postcode marker, with its constituency when
/// one is known.
#[must_use]
pub fn postcode_summary(
    props: &PostcodeProperties,
    constituency: Option<&ConstituencyProperties>,
    maxima: &GlobalMaxima,
) -> PostcodeSummary {
    PostcodeSummary {
        label: props.display_name().unwrap_or("Postcode").to_string(),
        postcode: props.postcode_clean.clone(),
        properties: postcode_bars(props),
        constituency: constituency.map(|c| constituency_summary(c, maxima, false)),
    }
}
