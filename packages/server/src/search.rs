//! Turns index lookups and place search results into API responses.
//!
//! Shared by the `/api/search` handler and the CLI `search` command.

use mansion_map_geocoder::{GeocodeError, place::Place, zoom::{ZoomLimits, suggested_zoom}};
use mansion_map_property::search::{PostcodeEntry, PostcodeLookup, SearchIndex};
use mansion_map_server_models::{
    ApiBounds, ApiSearchResponse, ApiSearchResult, EXACT_POSTCODE_ZOOM, NO_PLACES_MESSAGE,
    POSTCODE_ZOOM, SEARCH_UNAVAILABLE_MESSAGE,
};

/// Result of the local half of a postcode search.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalSearch {
    /// Answered from the postcode index.
    Done(ApiSearchResponse),
    /// Nothing local matched; ask the place search for this query.
    External(String),
}

/// Constituencies whose name or code contains `query`.
#[must_use]
pub fn constituency_response(index: &SearchIndex, query: &str) -> ApiSearchResponse {
    let results = index
        .constituencies
        .search(query)
        .into_iter()
        .map(|entry| ApiSearchResult::Constituency {
            name: entry.name.clone(),
            code: entry.code.clone(),
        })
        .collect();
    ApiSearchResponse {
        results,
        ..Default::default()
    }
}

fn postcode_result(entry: &PostcodeEntry, zoom: i32) -> ApiSearchResult {
    ApiSearchResult::Postcode {
        label: entry.label.clone(),
        clean: entry.clean.clone(),
        lat: entry.lat,
        lon: entry.lon,
        zoom,
    }
}

#[must_use]
pub fn postcode_search(index: &SearchIndex, query: &str) -> LocalSearch {
    let lookup = index.postcodes.lookup(query);
    let message = lookup.message();
    let response = match lookup {
        PostcodeLookup::Empty => ApiSearchResponse::default(),
        PostcodeLookup::TooShort => ApiSearchResponse {
            message,
            ..Default::default()
        },
        PostcodeLookup::Exact(entry) => ApiSearchResponse {
            results: vec![postcode_result(entry, EXACT_POSTCODE_ZOOM)],
            message: None,
            exact: true,
        },
        PostcodeLookup::Matches(entries) => ApiSearchResponse {
            results: entries
                .into_iter()
                .map(|entry| postcode_result(entry, POSTCODE_ZOOM))
                .collect(),
            ..Default::default()
        },
        PostcodeLookup::NoLocalMatch(query) => return LocalSearch::External(query),
    };
    LocalSearch::Done(response)
}

/// A place as a search result, with its zoom clamped to `limits`. `None`
/// when the place has no usable coordinates.
#[must_use]
pub fn place_result(place: &Place, query: &str, limits: ZoomLimits) -> Option<ApiSearchResult> {
    let (lat, lon) = place.lat_lon()?;
    Some(ApiSearchResult::External {
        name: place
            .display_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| query.to_string()),
        locality: place.locality(),
        lat,
        lon,
        zoom: limits.clamp(suggested_zoom(place)),
        bounds: place.bounds().map(|b| ApiBounds {
            south: b.south,
            north: b.north,
            west: b.west,
            east: b.east,
        }),
    })
}

/// The response for a finished place search.
#[must_use]
pub fn place_response(
    outcome: Result<Vec<Place>, GeocodeError>,
    query: &str,
    limits: ZoomLimits,
) -> ApiSearchResponse {
    match outcome {
        Ok(places) => {
            let results: Vec<ApiSearchResult> = places
                .iter()
                .filter_map(|place| place_result(place, query, limits))
                .collect();
            if results.is_empty() {
                ApiSearchResponse::message(NO_PLACES_MESSAGE)
            } else {
                ApiSearchResponse {
                    results,
                    ..Default::default()
                }
            }
        }
        Err(e) => {
            log::error!("Place search failed for {query:?}: {e}");
            ApiSearchResponse::message(SEARCH_UNAVAILABLE_MESSAGE)
        }
    }
}
