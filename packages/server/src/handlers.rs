//! HTTP handler functions for the mansion map API.

use actix_web::{HttpResponse, web};
use mansion_map_property::{display, resolve::MetricSelector};
use mansion_map_property_models::Dataset;
use mansion_map_server_models::{
    ApiConstituency, ApiDataset, ApiFeatureStyle, ApiHealth, ApiLegend, ApiPostcode, ApiStyles,
    SearchQueryParams, ViewQueryParams,
};

use crate::{
    AppState,
    search::{self, LocalSearch},
};

fn not_found(message: String) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": message }))
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        constituencies: state.data.constituencies().len(),
        postcodes: state.data.postcodes().len(),
    })
}

/// `GET /api/datasets`
///
/// Returns the dataset selector with each dataset's sub-metrics.
pub async fn datasets() -> HttpResponse {
    HttpResponse::Ok().json(ApiDataset::all())
}

/// `GET /api/legend`
pub async fn legend(
    state: web::Data<AppState>,
    params: web::Query<ViewQueryParams>,
) -> HttpResponse {
    let view = params.view();
    let breaks = state.data.breaks(&view);

    HttpResponse::Ok().json(ApiLegend {
        view,
        legend: display::legend(&view, &breaks),
        breaks: breaks.as_slice().to_vec(),
    })
}

/// `GET /api/styles`
///
/// Returns the fill for every constituency that has a code. Under the
/// postcode view every polygon is a no-data outline.
pub async fn styles(
    state: web::Data<AppState>,
    params: web::Query<ViewQueryParams>,
) -> HttpResponse {
    let view = params.view();
    let selector = MetricSelector::from(&view);
    let breaks = state.data.breaks(&view);

    let features = state
        .data
        .constituencies()
        .iter()
        .filter_map(|feature| {
            let props = &feature.properties;
            Some(ApiFeatureStyle {
                code: props.pcon_code.clone()?,
                value: selector.value(props),
                style: display::feature_style(selector, &breaks, props),
            })
        })
        .collect();

    HttpResponse::Ok().json(ApiStyles {
        view,
        breaks: breaks.as_slice().to_vec(),
        features,
    })
}

/// `GET /api/maxima`
pub async fn maxima(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.data.maxima())
}

/// `GET /api/constituencies/{code}`
///
/// Tooltip, style and info-panel summary for one constituency under the
/// requested view.
pub async fn constituency(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<ViewQueryParams>,
) -> HttpResponse {
    let code = path.into_inner();
    let Some(feature) = state.data.constituency(&code) else {
        return not_found(format!("Unknown constituency: {code}"));
    };

    let view = params.view();
    let selector = MetricSelector::from(&view);
    let breaks = state.data.breaks(&view);
    let props = &feature.properties;

    HttpResponse::Ok().json(ApiConstituency {
        view,
        value: selector.value(props),
        style: display::feature_style(selector, &breaks, props),
        tooltip: display::tooltip(&view, props),
        summary: display::constituency_summary(props, state.data.maxima(), true),
    })
}

/// `GET /api/postcodes/{postcode}`
///
/// Accepts the postcode with or without its space, in any case.
pub async fn postcode(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let postcode = path.into_inner();
    let Some(feature) = state.data.postcode(&postcode) else {
        return not_found(format!("Unknown postcode: {postcode}"));
    };

    let constituency = feature
        .properties
        .pcon_code
        .as_deref()
        .and_then(|code| state.data.constituency(code))
        .map(|c| &c.properties);
    let lat_lon = feature.lat_lon();

    HttpResponse::Ok().json(ApiPostcode {
        lat: lat_lon.map(|(lat, _)| lat),
        lon: lat_lon.map(|(_, lon)| lon),
        summary: display::postcode_summary(&feature.properties, constituency, state.data.maxima()),
    })
}

/// `GET /api/search`
///
/// Constituency names and codes for polygon datasets. For the postcode
/// dataset, local postcodes first, then the external place search when
/// nothing local matches.
pub async fn search(
    state: web::Data<AppState>,
    params: web::Query<SearchQueryParams>,
) -> HttpResponse {
    if !params.dataset.is_none_or(Dataset::is_postcode) {
        return HttpResponse::Ok().json(search::constituency_response(&state.search, &params.q));
    }

    let response = match search::postcode_search(&state.search, &params.q) {
        LocalSearch::Done(response) => response,
        LocalSearch::External(query) => {
            let outcome = state.places.search(&query).await;
            search::place_response(outcome, &query, state.zoom_limits)
        }
    };

    HttpResponse::Ok().json(response)
}
