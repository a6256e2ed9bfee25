//! Local search over loaded constituencies and postcodes.
//!
//! Both indexes match by case-insensitive substring against a precomputed
//! key. Postcode search may end with [`PostcodeLookup::NoLocalMatch`], at
//! which point callers fall back to an external geocoder.

use serde::Serialize;

use crate::collection::{ConstituencyFeature, MapData, PostcodeFeature};

pub const MAX_SEARCH_RESULTS: usize = 8;
pub const POSTCODE_MIN_QUERY_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstituencyEntry {
    pub name: String,
    pub code: String,
    #[serde(skip)]
    search_key: String,
}

/// Constituencies with both a name and a code, sorted by name.
#[derive(Debug, Clone, Default)]
pub struct ConstituencyIndex {
    entries: Vec<ConstituencyEntry>,
}

impl ConstituencyIndex {
    #[must_use]
    pub fn build(features: &[ConstituencyFeature]) -> Self {
        let mut entries: Vec<ConstituencyEntry> = features
            .iter()
            .filter_map(|feature| {
                let props = &feature.properties;
                let code = props.pcon_code.clone()?;
                let name = props.name.clone().unwrap_or_else(|| code.clone());
                Some(ConstituencyEntry {
                    search_key: format!("{name} {code}").to_lowercase(),
                    name,
                    code,
                })
            })
            .collect();
        entries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to [`MAX_SEARCH_RESULTS`] entries whose name or code contains
    /// `term`. A blank term matches nothing.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&ConstituencyEntry> {
        let query = term.trim().to_lowercase();
        if query.is_empty() {
            return vec![];
        }
        self.entries
            .iter()
            .filter(|entry| entry.search_key.contains(&query))
            .take(MAX_SEARCH_RESULTS)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostcodeEntry {
    pub label: String,
    pub clean: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip)]
    search_key: String,
}

/// Postcodes that have a label and a point location, in source order.
#[derive(Debug, Clone, Default)]
pub struct PostcodeIndex {
    entries: Vec<PostcodeEntry>,
}

/// Outcome of a postcode query.
#[derive(Debug, Clone, PartialEq)]
pub enum PostcodeLookup<'a> {
    /// Blank query.
    Empty,
    /// Query shorter than [`POSTCODE_MIN_QUERY_LEN`] characters.
    TooShort,
    /// The query is exactly a known postcode.
    Exact(&'a PostcodeEntry),
    /// Substring matches, at most [`MAX_SEARCH_RESULTS`].
    Matches(Vec<&'a PostcodeEntry>),
    /// Nothing local matched; try an external geocoder with this query.
    NoLocalMatch(String),
}

impl PostcodeLookup<'_> {
    /// Text shown in place of results, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::TooShort => Some(format!(
                "Type at least {POSTCODE_MIN_QUERY_LEN} characters"
            )),
            Self::Empty | Self::Exact(_) | Self::Matches(_) | Self::NoLocalMatch(_) => None,
        }
    }
}

impl PostcodeIndex {
    #[must_use]
    pub fn build(features: &[PostcodeFeature]) -> Self {
        let entries = features
            .iter()
            .filter_map(|feature| {
                let props = &feature.properties;
                let label = props.display_name()?.trim().to_string();
                if label.is_empty() {
                    return None;
                }
                let clean = props
                    .postcode_clean
                    .as_deref()
                    .map_or_else(|| label.clone(), |c| c.trim().to_string());
                let (lat, lon) = feature.lat_lon()?;
                Some(PostcodeEntry {
                    search_key: format!("{label} {clean}").to_lowercase(),
                    label,
                    clean,
                    lat,
                    lon,
                })
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn lookup(&self, term: &str) -> PostcodeLookup<'_> {
        let query = term.trim().to_lowercase();
        if query.is_empty() {
            return PostcodeLookup::Empty;
        }
        if query.chars().count() < POSTCODE_MIN_QUERY_LEN {
            return PostcodeLookup::TooShort;
        }

        if let Some(exact) = self
            .entries
            .iter()
            .find(|e| e.clean.to_lowercase() == query || e.label.to_lowercase() == query)
        {
            return PostcodeLookup::Exact(exact);
        }

        let matches: Vec<&PostcodeEntry> = self
            .entries
            .iter()
            .filter(|e| e.search_key.contains(&query))
            .take(MAX_SEARCH_RESULTS)
            .collect();

        if matches.is_empty() {
            PostcodeLookup::NoLocalMatch(query)
        } else {
            PostcodeLookup::Matches(matches)
        }
    }
}

/// Both indexes, built once from loaded data.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    pub constituencies: ConstituencyIndex,
    pub postcodes: PostcodeIndex,
}

impl SearchIndex {
    #[must_use]
    pub fn build(data: &MapData) -> Self {
        let index = Self {
            constituencies: ConstituencyIndex::build(data.constituencies()),
            postcodes: PostcodeIndex::build(data.postcodes()),
        };
        log::debug!(
            "search index: {} constituencies, {} postcodes",
            index.constituencies.len(),
            index.postcodes.len()
        );
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{load_constituencies, load_postcodes};

    fn constituencies() -> Vec<ConstituencyFeature> {
        let names: Vec<String> = (0..12)
            .map(|i| {
                format!(
                    r#"{{"type": "Feature", "geometry": null,
                         "properties": {{"pcon_code": "E140000{i:02}", "name": "Kensington {i:02}"}}}}"#
                )
            })
            .collect();
        let extra = r#"{"type": "Feature", "geometry": null, "properties": {"pcon_code": "E14000999", "name": "Bath"}},
            {"type": "Feature", "geometry": null, "properties": {"name": "No Code"}}"#;
        let source = format!(
            r#"{{"type": "FeatureCollection", "features": [{}, {extra}]}}"#,
            names.join(",")
        );
        load_constituencies(&source).unwrap()
    }

    fn postcodes() -> Vec<PostcodeFeature> {
        load_postcodes(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-0.14, 51.50]},
                 "properties": {"postcode_label": "SW1A 1AA", "postcode_clean": "SW1A1AA"}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-0.15, 51.51]},
                 "properties": {"postcode_label": "SW1A 2AA", "postcode_clean": "SW1A2AA"}},
                {"type": "Feature", "geometry": null,
                 "properties": {"postcode_label": "W8 4PT", "postcode_clean": "W84PT"}}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn constituency_search_caps_results_and_sorts_by_name() {
        let index = ConstituencyIndex::build(&constituencies());
        assert_eq!(index.len(), 13);

        let results = index.search("kensington");
        assert_eq!(results.len(), MAX_SEARCH_RESULTS);
        assert_eq!(results[0].name, "Kensington 00");

        let by_code = index.search(" e14000999 ");
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].name, "Bath");

        assert!(index.search("   ").is_empty());
    }

    #[test]
    fn short_postcode_queries_ask_for_more() {
        let index = PostcodeIndex::build(&postcodes());
        let lookup = index.lookup("sw");
        assert_eq!(lookup, PostcodeLookup::TooShort);
        assert_eq!(lookup.message().as_deref(), Some("Type at least 3 characters"));
        assert_eq!(index.lookup(""), PostcodeLookup::Empty);
    }

    #[test]
    fn exact_postcode_short_circuits() {
        let index = PostcodeIndex::build(&postcodes());
        let PostcodeLookup::Exact(entry) = index.lookup("sw1a1aa") else {
            panic!("expected exact match");
        };
        assert_eq!(entry.label, "SW1A 1AA");
        assert!(matches!(index.lookup("SW1A 2AA"), PostcodeLookup::Exact(_)));
    }

    #[test]
    fn partial_postcode_lists_matches() {
        let index = PostcodeIndex::build(&postcodes());
        let PostcodeLookup::Matches(matches) = index.lookup("sw1a") else {
            panic!("expected matches");
        };
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn postcodes_without_location_are_not_indexed() {
        let index = PostcodeIndex::build(&postcodes());
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.lookup("W8 4PT"),
            PostcodeLookup::NoLocalMatch("w8 4pt".to_string())
        );
    }
}
