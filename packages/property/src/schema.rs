//! Single-pass conversion of raw GeoJSON property bags into typed records.
//!
//! Runs once per feature at load time. Downstream code reads the typed
//! records and never touches the raw bag again.

use mansion_map_property_models::{
    ConstituencyProperties, CouncilTaxBand, PostcodeProperties, TransactionCounts, TxTier,
};
use serde_json::{Map, Value};

use crate::numeric::{field, to_number_or_zero};

/// Parses a constituency feature's properties.
#[must_use]
pub fn constituency_properties(props: &Map<String, Value>) -> ConstituencyProperties {
    let bands = CouncilTaxBand::ALL.map(|band| props.get(band.key()).map_or(0.0, to_number_or_zero));

    ConstituencyProperties {
        pcon_code: text(props, "pcon_code"),
        name: text(props, "name"),
        bands,
        median_price_2025: field(props, "median_price_2025"),
        median_price_1995: field(props, "median_price_1995"),
        median_price_change_pct: field(props, "median_price_change_pct"),
        transactions: TransactionCounts {
            tiers: TxTier::ALL.map(|tier| field(props, tier.count_key())),
            two_million_plus: field(props, "tx_2m_plus_count"),
            total: field(props, "tx_total_count"),
            rejected: field(props, "tx_rejected_count"),
        },
    }
}

/// Parses a postcode feature's properties.
#[must_use]
pub fn postcode_properties(props: &Map<String, Value>) -> PostcodeProperties {
    PostcodeProperties {
        postcode_label: text(props, "postcode_label"),
        postcode_clean: text(props, "postcode_clean"),
        pcon_code: text(props, "pcon_code"),
        hv_count: field(props, "hv_count"),
        tiers: TxTier::ALL.map(|tier| field(props, tier.postcode_key())),
        under_two_million: field(props, "£0 - £2m"),
        total_sales: field(props, "Total Sales"),
        rejected: field(props, "rejected_multiple_transactions"),
    }
}

/// Reads an identifier-like field as trimmed text. Numbers are accepted
/// and rendered as written; blanks are `None`.
fn text(props: &Map<String, Value>, key: &str) -> Option<String> {
    let raw = match props.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if raw.is_empty() { None } else { Some(raw) }
}
