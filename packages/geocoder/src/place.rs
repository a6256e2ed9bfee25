//! Place results as returned by Nominatim's `jsonv2` format.
//!
//! Nominatim sends coordinates, bounding boxes and ranks as strings or
//! numbers depending on the field, so those are kept as raw JSON and read
//! through the shared numeric sanitizer.

use mansion_map_property::numeric::to_number;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One search result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub lat: Value,
    #[serde(default)]
    pub lon: Value,
    /// `[south, north, west, east]`.
    #[serde(default)]
    pub boundingbox: Option<Vec<Value>>,
    #[serde(default, rename = "type")]
    pub place_type: Option<String>,
    #[serde(default)]
    pub addresstype: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub place_rank: Value,
    #[serde(default)]
    pub address: Option<Map<String, Value>>,
}

/// A normalised bounding box (south <= north, west <= east).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl Bounds {
    /// Larger of the latitude and longitude extents, in degrees.
    #[must_use]
    pub fn span(&self) -> f64 {
        (self.north - self.south)
            .abs()
            .max((self.east - self.west).abs())
    }
}

fn first_non_empty<'a>(a: Option<&'a str>, b: Option<&'a str>) -> Option<String> {
    [a, b]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .map(str::to_lowercase)
}

impl Place {
    /// `(lat, lon)` when both are finite.
    #[must_use]
    pub fn lat_lon(&self) -> Option<(f64, f64)> {
        Some((to_number(&self.lat)?, to_number(&self.lon)?))
    }

    /// The bounding box, when it has exactly four finite edges.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let edges = self.boundingbox.as_ref()?;
        let [south, north, west, east] = edges.as_slice() else {
            return None;
        };
        let (south, north, west, east) = (
            to_number(south)?,
            to_number(north)?,
            to_number(west)?,
            to_number(east)?,
        );
        Some(Bounds {
            south: south.min(north),
            north: south.max(north),
            west: west.min(east),
            east: west.max(east),
        })
    }

    /// Lower-cased `type`, else `addresstype`.
    #[must_use]
    pub fn type_key(&self) -> Option<String> {
        first_non_empty(self.place_type.as_deref(), self.addresstype.as_deref())
    }

    /// Lower-cased `class`, else `category`.
    #[must_use]
    pub fn class_key(&self) -> Option<String> {
        first_non_empty(self.class.as_deref(), self.category.as_deref())
    }

    #[must_use]
    pub fn rank(&self) -> Option<f64> {
        to_number(&self.place_rank)
    }

    /// Short locality for a result's secondary line: city, town or village,
    /// else the place type.
    #[must_use]
    pub fn locality(&self) -> String {
        let address = self.address.as_ref();
        ["city", "town", "village"]
            .iter()
            .find_map(|key| {
                address?
                    .get(*key)?
                    .as_str()
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .or_else(|| self.place_type.clone())
            .unwrap_or_default()
    }
}
