//! The data manifest written alongside the generated GeoJSON files.
//!
//! The map reads it before fetching the datasets so that byte-level load
//! progress can be reported against a known total.

use serde::{Deserialize, Serialize};

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "map_data_manifest.json";

/// Default constituency polygon file name.
pub const CONSTITUENCY_FILE: &str = "constituency_council_tax_bands.geojson";

/// Default postcode point file name.
pub const POSTCODE_FILE: &str = "postcode_sales_by_bracket.geojson";

/// Size and availability of one generated dataset file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub available: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDatasets {
    #[serde(default)]
    pub constituency: ManifestEntry,
    #[serde(default)]
    pub postcode: ManifestEntry,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataManifest {
    #[serde(default)]
    pub datasets: ManifestDatasets,
}

impl DataManifest {
    /// Sum of all known dataset sizes, saturating.
    #[must_use]
    pub const fn total_bytes(&self) -> u64 {
        self.datasets
            .constituency
            .bytes
            .saturating_add(self.datasets.postcode.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerates_missing_entries() {
        let manifest: DataManifest = serde_json::from_str(
            r#"{"datasets": {"constituency": {"file": "c.geojson", "bytes": 120, "available": true}}}"#,
        )
        .unwrap();
        assert_eq!(manifest.datasets.constituency.bytes, 120);
        assert_eq!(manifest.datasets.postcode, ManifestEntry::default());
        assert_eq!(manifest.total_bytes(), 120);
    }

    #[test]
    fn total_saturates() {
        let mut manifest = DataManifest::default();
        manifest.datasets.constituency.bytes = u64::MAX;
        manifest.datasets.postcode.bytes = 10;
        assert_eq!(manifest.total_bytes(), u64::MAX);
    }
}
