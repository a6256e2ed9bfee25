//! Reading and writing the data manifest.

use std::path::Path;

use mansion_map_property_models::manifest::{DataManifest, ManifestDatasets, ManifestEntry};

use crate::PropertyError;

/// Describes `path` as it currently exists on disk. A missing file yields
/// `bytes: 0, available: false` rather than an error.
#[must_use]
pub fn build_manifest_entry(path: &Path) -> ManifestEntry {
    let file = path.to_string_lossy().into_owned();
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => ManifestEntry {
            file,
            bytes: meta.len(),
            available: true,
        },
        _ => ManifestEntry {
            file,
            bytes: 0,
            available: false,
        },
    }
}

#[must_use]
pub fn build_manifest(constituency: &Path, postcode: &Path) -> DataManifest {
    DataManifest {
        datasets: ManifestDatasets {
            constituency: build_manifest_entry(constituency),
            postcode: build_manifest_entry(postcode),
        },
    }
}

/// Reads a manifest, returning `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn read_manifest(path: &Path) -> Result<Option<DataManifest>, PropertyError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Writes `manifest` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_manifest(path: &Path, manifest: &DataManifest) -> Result<(), PropertyError> {
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(path, json)?;
    log::info!("Data manifest written to {}", path.display());
    Ok(())
}
