//! Loaded map data: typed features plus the derived state shared by every
//! view (global maxima, code index, break-set cache).

use std::{
    collections::BTreeMap,
    io::Read,
    path::Path,
    sync::{Mutex, PoisonError},
};

use geojson::{GeoJson, Geometry, JsonObject};
use mansion_map_property_models::{
    ConstituencyProperties, GlobalMaxima, PostcodeProperties, ViewState,
    manifest::{CONSTITUENCY_FILE, DataManifest, MANIFEST_FILE, POSTCODE_FILE},
};

use crate::{
    PropertyError,
    classify::{BreakSet, compute_breaks},
    manifest::read_manifest,
    maxima::global_maxima,
    progress::ProgressCallback,
    resolve::MetricSelector,
    schema::{constituency_properties, postcode_properties},
};

const READ_CHUNK: usize = 64 * 1024;
const MAX_PREALLOC: usize = 64 * 1024 * 1024;

/// One feature with its typed properties. The geometry and the raw
/// property object are kept untouched for pass-through to the map.
#[derive(Debug, Clone)]
pub struct PropertyFeature<P> {
    pub geometry: Option<Geometry>,
    pub properties: P,
    pub raw: JsonObject,
}

pub type ConstituencyFeature = PropertyFeature<ConstituencyProperties>;
pub type PostcodeFeature = PropertyFeature<PostcodeProperties>;

impl PostcodeFeature {
    /// `(lat, lon)` of a point geometry with at least two coordinates.
    #[must_use]
    pub fn lat_lon(&self) -> Option<(f64, f64)> {
        match &self.geometry.as_ref()?.value {
            geojson::Value::Point(coords) if coords.len() >= 2 => {
                let (lon, lat) = (coords[0], coords[1]);
                (lat.is_finite() && lon.is_finite()).then_some((lat, lon))
            }
            _ => None,
        }
    }
}

fn parse_features<P>(
    source: &str,
    label: &str,
    parse: impl Fn(&JsonObject) -> P,
) -> Result<Vec<PropertyFeature<P>>, PropertyError> {
    let GeoJson::FeatureCollection(collection) = source.parse::<GeoJson>()? else {
        return Err(PropertyError::NotFeatureCollection(label.to_string()));
    };

    let features = collection
        .features
        .into_iter()
        .map(|feature| {
            let raw = feature.properties.unwrap_or_default();
            PropertyFeature {
                geometry: feature.geometry,
                properties: parse(&raw),
                raw,
            }
        })
        .collect::<Vec<_>>();

    log::debug!("parsed {} {label} features", features.len());
    Ok(features)
}

/// Parses a constituency `FeatureCollection`.
///
/// # Errors
///
/// Returns an error if `source` is not valid GeoJSON or is not a
/// `FeatureCollection`.
pub fn load_constituencies(source: &str) -> Result<Vec<ConstituencyFeature>, PropertyError> {
    parse_features(source, "constituency", constituency_properties)
}

/// Parses a postcode `FeatureCollection`.
///
/// # Errors
///
/// Returns an error if `source` is not valid GeoJSON or is not a
/// `FeatureCollection`.
pub fn load_postcodes(source: &str) -> Result<Vec<PostcodeFeature>, PropertyError> {
    parse_features(source, "postcode", postcode_properties)
}

/// Reads `reader` to a string in fixed-size chunks, reporting bytes as
/// they arrive. The progress total is left to the caller. At most
/// [`MAX_PREALLOC`] bytes are reserved up front whatever `size_hint` says.
fn read_with_progress(
    mut reader: impl Read,
    size_hint: Option<u64>,
    progress: &dyn ProgressCallback,
) -> Result<String, PropertyError> {
    let capacity = size_hint
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(READ_CHUNK)
        .min(MAX_PREALLOC);
    let mut bytes = Vec::with_capacity(capacity);
    let mut chunk = vec![0_u8; READ_CHUNK];
    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);
        progress.inc(n as u64);
    }
    String::from_utf8(bytes).map_err(|e| {
        PropertyError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

fn read_file(path: &Path, progress: &dyn ProgressCallback) -> Result<String, PropertyError> {
    let file = std::fs::File::open(path)?;
    let len = file.metadata().ok().map(|m| m.len());
    progress.set_message(format!("Loading {}", path.display()));
    read_with_progress(std::io::BufReader::new(file), len, progress)
}

fn file_len(path: &Path) -> u64 {
    std::fs::metadata(path)
        .ok()
        .filter(std::fs::Metadata::is_file)
        .map_or(0, |m| m.len())
}

/// Everything the map needs after load. Immutable apart from the
/// break-set cache, so one instance is shared across server workers.
#[derive(Debug)]
pub struct MapData {
    constituencies: Vec<ConstituencyFeature>,
    postcodes: Vec<PostcodeFeature>,
    maxima: GlobalMaxima,
    by_code: BTreeMap<String, usize>,
    by_postcode: BTreeMap<String, usize>,
    breaks: Mutex<BTreeMap<ViewState, BreakSet>>,
}

/// Upper-cases and strips whitespace: `sw1a 1aa` -> `SW1A1AA`.
#[must_use]
pub fn normalize_postcode(postcode: &str) -> String {
    postcode
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

impl MapData {
    #[must_use]
    pub fn new(constituencies: Vec<ConstituencyFeature>, postcodes: Vec<PostcodeFeature>) -> Self {
        let maxima = global_maxima(constituencies.iter().map(|f| &f.properties));

        let mut by_code = BTreeMap::new();
        for (i, feature) in constituencies.iter().enumerate() {
            if let Some(code) = feature.properties.pcon_code.as_deref() {
                by_code.entry(code.to_string()).or_insert(i);
            }
        }

        let mut by_postcode = BTreeMap::new();
        for (i, feature) in postcodes.iter().enumerate() {
            let props = &feature.properties;
            if let Some(key) = props.postcode_clean.as_deref().or(props.display_name()) {
                by_postcode.entry(normalize_postcode(key)).or_insert(i);
            }
        }

        log::info!(
            "map data ready: {} constituencies, {} postcodes",
            constituencies.len(),
            postcodes.len()
        );

        Self {
            constituencies,
            postcodes,
            maxima,
            by_code,
            by_postcode,
            breaks: Mutex::new(BTreeMap::new()),
        }
    }

    /// Loads both datasets from `data_dir`, using the manifest for file
    /// names and the progress total when one is present. An unreadable
    /// manifest is ignored. A missing postcode file leaves the postcode
    /// layer empty.
    ///
    /// Both files count against one progress total: the manifest's
    /// combined size, or the files' sizes on disk without one.
    ///
    /// # Errors
    ///
    /// Returns an error if the constituency file is missing or malformed,
    /// or if an existing postcode file cannot be parsed.
    pub fn load_dir(data_dir: &Path, progress: &dyn ProgressCallback) -> Result<Self, PropertyError> {
        let manifest_path = data_dir.join(MANIFEST_FILE);
        let manifest = match read_manifest(&manifest_path) {
            Ok(manifest) => manifest.unwrap_or_default(),
            Err(e) => {
                log::warn!("Data manifest load failed ({}): {e}", manifest_path.display());
                DataManifest::default()
            }
        };
        let datasets = &manifest.datasets;

        let resolve = |file: &str, fallback: &str| {
            let named = Path::new(file)
                .file_name()
                .map(|name| data_dir.join(name))
                .filter(|path| path.is_file());
            named.unwrap_or_else(|| data_dir.join(fallback))
        };
        let constituency_path = resolve(&datasets.constituency.file, CONSTITUENCY_FILE);
        let postcode_path = resolve(&datasets.postcode.file, POSTCODE_FILE);

        let total = match manifest.total_bytes() {
            0 => file_len(&constituency_path) + file_len(&postcode_path),
            total => total,
        };
        if total > 0 {
            progress.set_total(total);
        }

        let constituencies = load_constituencies(&read_file(&constituency_path, progress)?)?;

        let postcodes = if postcode_path.is_file() {
            load_postcodes(&read_file(&postcode_path, progress)?)?
        } else {
            log::warn!(
                "postcode data not found at {}; postcode layer will be empty",
                postcode_path.display()
            );
            vec![]
        };

        progress.finish("Map data loaded".to_string());
        Ok(Self::new(constituencies, postcodes))
    }

    #[must_use]
    pub fn constituencies(&self) -> &[ConstituencyFeature] {
        &self.constituencies
    }

    #[must_use]
    pub fn postcodes(&self) -> &[PostcodeFeature] {
        &self.postcodes
    }

    #[must_use]
    pub const fn maxima(&self) -> &GlobalMaxima {
        &self.maxima
    }

    /// Looks up a constituency by its trimmed code.
    #[must_use]
    pub fn constituency(&self, code: &str) -> Option<&ConstituencyFeature> {
        self.by_code
            .get(code.trim())
            .map(|i| &self.constituencies[*i])
    }

    /// Looks up a postcode regardless of spacing or case.
    #[must_use]
    pub fn postcode(&self, postcode: &str) -> Option<&PostcodeFeature> {
        self.by_postcode
            .get(&normalize_postcode(postcode))
            .map(|i| &self.postcodes[*i])
    }

    /// Break set for `view`, computed on first request and cached.
    pub fn breaks(&self, view: &ViewState) -> BreakSet {
        let mut cache = self.breaks.lock().unwrap_or_else(PoisonError::into_inner);
        cache
            .entry(*view)
            .or_insert_with(|| {
                log::debug!("computing breaks for {view:?}");
                compute_breaks(
                    MetricSelector::from(view),
                    self.constituencies.iter().map(|f| &f.properties),
                )
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;
    use mansion_map_property_models::Dataset;
    use std::sync::{
        Mutex,
        atomic::{AtomicU64, Ordering},
    };

    const CONSTITUENCIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": null,
             "properties": {"pcon_code": "E1", "name": "Alpha", "median_price_2025": "500,000", "band_H": 5}},
            {"type": "Feature", "geometry": null,
             "properties": {"pcon_code": " E2 ", "name": "Beta", "median_price_2025": 750000, "band_A": 10}},
            {"type": "Feature", "geometry": null,
             "properties": {"pcon_code": "E3", "name": "Gamma", "median_price_2025": null}}
        ]
    }"#;

    const POSTCODES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-0.14, 51.5]},
             "properties": {"postcode_label": "SW1A 1AA", "postcode_clean": "SW1A1AA", "pcon_code": "E1", "£5m+": 2}}
        ]
    }"#;

    #[test]
    fn loads_and_indexes_features() {
        let data = MapData::new(
            load_constituencies(CONSTITUENCIES).unwrap(),
            load_postcodes(POSTCODES).unwrap(),
        );
        assert_eq!(data.constituencies().len(), 3);
        assert!((data.maxima().price_2025 - 750_000.0).abs() < f64::EPSILON);
        assert_eq!(
            data.constituency("E2").unwrap().properties.name.as_deref(),
            Some("Beta")
        );
        assert!(data.constituency("E9").is_none());

        let postcode = data.postcode("sw1a 1aa").unwrap();
        assert_eq!(postcode.lat_lon(), Some((51.5, -0.14)));
        assert_eq!(postcode.raw.get("£5m+"), Some(&serde_json::json!(2)));
    }

    #[test]
    fn rejects_non_collections() {
        let err = load_constituencies(r#"{"type": "Point", "coordinates": [0, 0]}"#).unwrap_err();
        assert!(matches!(err, PropertyError::NotFeatureCollection(_)));
        assert!(load_postcodes("not json").is_err());
    }

    #[test]
    fn caches_breaks_per_view() {
        let data = MapData::new(load_constituencies(CONSTITUENCIES).unwrap(), vec![]);
        let view = ViewState::default().with_dataset(Dataset::HousePrice);
        let first = data.breaks(&view);
        assert_eq!(first.as_slice(), &[500_000.0, 750_000.0]);
        assert_eq!(data.breaks(&view), first);

        let bands = data.breaks(&ViewState::default().with_dataset(Dataset::CouncilTax));
        assert_eq!(bands.as_slice(), &[0.0, 100.0]);
    }

    struct CountingProgress {
        total: AtomicU64,
        seen: AtomicU64,
    }

    impl ProgressCallback for CountingProgress {
        fn set_total(&self, total: u64) {
            self.total.store(total, Ordering::SeqCst);
        }
        fn inc(&self, delta: u64) {
            self.seen.fetch_add(delta, Ordering::SeqCst);
        }
        fn set_message(&self, _msg: String) {}
        fn finish(&self, _msg: String) {}
    }

    #[test]
    fn reports_bytes_read() {
        let progress = CountingProgress {
            total: AtomicU64::new(0),
            seen: AtomicU64::new(0),
        };
        let text = read_with_progress(POSTCODES.as_bytes(), Some(4_096), &progress).unwrap();
        assert_eq!(text, POSTCODES);
        assert_eq!(progress.total.load(Ordering::SeqCst), 0);
        assert_eq!(
            progress.seen.load(Ordering::SeqCst),
            POSTCODES.len() as u64
        );
    }

    #[test]
    fn huge_size_hint_is_not_preallocated() {
        let progress = CountingProgress {
            total: AtomicU64::new(0),
            seen: AtomicU64::new(0),
        };
        let text = read_with_progress(CONSTITUENCIES.as_bytes(), Some(1 << 50), &progress).unwrap();
        assert_eq!(text, CONSTITUENCIES);
        assert_eq!(
            progress.seen.load(Ordering::SeqCst),
            CONSTITUENCIES.len() as u64
        );
    }

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "mansion_map_load_{name}_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[derive(Default)]
    struct RecordingProgress {
        totals: Mutex<Vec<u64>>,
        seen: AtomicU64,
    }

    impl ProgressCallback for RecordingProgress {
        fn set_total(&self, total: u64) {
            self.totals.lock().unwrap().push(total);
        }
        fn inc(&self, delta: u64) {
            self.seen.fetch_add(delta, Ordering::SeqCst);
        }
        fn set_message(&self, _msg: String) {}
        fn finish(&self, _msg: String) {}
    }

    #[test]
    fn loads_from_directory_without_manifest() {
        let dir = scratch_dir("plain");
        std::fs::write(dir.join(CONSTITUENCY_FILE), CONSTITUENCIES).unwrap();

        let progress = RecordingProgress::default();
        let data = MapData::load_dir(&dir, &progress).unwrap();
        assert_eq!(data.constituencies().len(), 3);
        assert!(data.postcodes().is_empty());
        assert_eq!(
            *progress.totals.lock().unwrap(),
            vec![CONSTITUENCIES.len() as u64]
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn one_total_across_both_files() {
        let dir = scratch_dir("combined");
        std::fs::write(dir.join(CONSTITUENCY_FILE), CONSTITUENCIES).unwrap();
        std::fs::write(dir.join(POSTCODE_FILE), POSTCODES).unwrap();
        let manifest = crate::manifest::build_manifest(
            &dir.join(CONSTITUENCY_FILE),
            &dir.join(POSTCODE_FILE),
        );
        crate::manifest::write_manifest(&dir.join(MANIFEST_FILE), &manifest).unwrap();

        let progress = RecordingProgress::default();
        let data = MapData::load_dir(&dir, &progress).unwrap();
        assert_eq!(data.postcodes().len(), 1);

        let combined = (CONSTITUENCIES.len() + POSTCODES.len()) as u64;
        assert_eq!(*progress.totals.lock().unwrap(), vec![combined]);
        assert_eq!(progress.seen.load(Ordering::SeqCst), combined);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn malformed_manifest_is_ignored() {
        let dir = scratch_dir("bad_manifest");
        std::fs::write(dir.join(CONSTITUENCY_FILE), CONSTITUENCIES).unwrap();
        std::fs::write(
            dir.join(MANIFEST_FILE),
            r#"{"datasets":{"constituency":{"bytes":-1}}}"#,
        )
        .unwrap();

        let data = MapData::load_dir(&dir, &NullProgress).unwrap();
        assert_eq!(data.constituencies().len(), 3);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn stale_manifest_file_names_fall_back() {
        let dir = scratch_dir("stale_manifest");
        std::fs::write(dir.join(CONSTITUENCY_FILE), CONSTITUENCIES).unwrap();
        std::fs::write(
            dir.join(MANIFEST_FILE),
            r#"{"datasets":{"constituency":{"file":"old/renamed.geojson","bytes":999999999999,"available":true}}}"#,
        )
        .unwrap();

        let data = MapData::load_dir(&dir, &NullProgress).unwrap();
        assert_eq!(data.constituencies().len(), 3);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
