//! Suggested map zoom for a place result.

use serde::{Deserialize, Serialize};

use crate::place::Place;

/// Zoom used when nothing about the place is recognised.
pub const FALLBACK_ZOOM: i32 = 15;

const TYPE_ZOOMS: &[(&str, i32)] = &[
    ("continent", 4),
    ("ocean", 4),
    ("sea", 5),
    ("archipelago", 7),
    ("country", 6),
    ("state", 8),
    ("province", 8),
    ("region", 8),
    ("state_district", 9),
    ("district", 10),
    ("county", 10),
    ("municipality", 11),
    ("borough", 12),
    ("city", 12),
    ("city_district", 13),
    ("town", 13),
    ("village", 14),
    ("hamlet", 15),
    ("suburb", 15),
    ("neighbourhood", 16),
    ("neighborhood", 16),
    ("locality", 16),
    ("quarter", 15),
    ("postcode", 16),
    ("postal_code", 16),
    ("road", 17),
    ("street", 17),
    ("residential", 17),
    ("track", 17),
    ("footway", 17),
    ("path", 17),
    ("service", 17),
    ("motorway", 15),
    ("trunk", 15),
    ("primary", 15),
    ("secondary", 16),
    ("tertiary", 16),
    ("airport", 13),
    ("aerodrome", 13),
    ("railway", 16),
    ("station", 16),
    ("platform", 17),
    ("bus_stop", 17),
    ("tram_stop", 17),
    ("industrial", 17),
    ("commercial", 17),
    ("retail", 17),
    ("park", 14),
    ("forest", 12),
    ("island", 10),
    ("lake", 10),
    ("harbour", 14),
    ("address", 18),
    ("building", 18),
    ("house", 18),
    ("apartments", 18),
];

const CLASS_ZOOMS: &[(&str, i32)] = &[
    ("boundary", 9),
    ("place", 12),
    ("natural", 10),
    ("landuse", 13),
    ("leisure", 14),
    ("waterway", 12),
    ("aeroway", 13),
    ("highway", 17),
    ("railway", 16),
    ("amenity", 17),
    ("tourism", 16),
    ("shop", 17),
    ("office", 17),
];

/// Minimum `place_rank` for each zoom, most detailed first.
const RANK_LADDER: &[(f64, i32)] = &[
    (28.0, 17),
    (26.0, 16),
    (24.0, 15),
    (22.0, 13),
    (20.0, 12),
    (18.0, 11),
    (16.0, 10),
    (14.0, 9),
    (12.0, 8),
    (10.0, 7),
    (8.0, 6),
    (6.0, 5),
];

const LOWEST_RANK_ZOOM: i32 = 4;

fn lookup(table: &[(&str, i32)], key: &str) -> Option<i32> {
    table.iter().find(|(k, _)| *k == key).map(|(_, z)| *z)
}

/// Picks a zoom for `place`, most specific evidence first:
/// bounding box span, then type, then class, then rank.
///
/// The result is not clamped; see [`ZoomLimits::clamp`].
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn suggested_zoom(place: &Place) -> i32 {
    if let Some(bounds) = place.bounds() {
        let span = bounds.span();
        if span > 0.0 {
            let zoom = (360.0 / span).log2().floor();
            if zoom.is_finite() {
                return zoom as i32;
            }
        }
    }

    if let Some(zoom) = place.type_key().and_then(|t| lookup(TYPE_ZOOMS, &t)) {
        return zoom;
    }
    if let Some(zoom) = place.class_key().and_then(|c| lookup(CLASS_ZOOMS, &c)) {
        return zoom;
    }

    if let Some(rank) = place.rank() {
        return RANK_LADDER
            .iter()
            .find(|(min_rank, _)| rank >= *min_rank)
            .map_or(LOWEST_RANK_ZOOM, |(_, zoom)| *zoom);
    }

    FALLBACK_ZOOM
}

/// The map's allowed zoom range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomLimits {
    pub min: i32,
    pub max: i32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self { min: 2, max: 18 }
    }
}

impl ZoomLimits {
    #[must_use]
    pub fn clamp(&self, zoom: i32) -> i32 {
        zoom.clamp(self.min, self.max.max(self.min))
    }
}
