//! HTTP handler functions for the relief map API.

use actix_web::{HttpResponse, web};
use relief_map_analytics::{
    FilteredSet, RegionScope, build_choropleth, map_bucket_width, subset_term_frequencies,
    summarize, trend_bucket_width,
};
use relief_map_request_models::CategoryField;
use relief_map_server_models::{
    ApiChoropleth, ApiFilters, ApiHealth, ApiRequestRow, ApiTrend, FilterQueryParams, MapView,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/filters`
///
/// Returns the observed category domains offered as filter choices.
pub async fn filters(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiFilters {
        levels: state
            .dataset
            .domain(CategoryField::Level)
            .values()
            .to_vec(),
        kinds: state.dataset.domain(CategoryField::Kind).values().to_vec(),
    })
}

/// `GET /api/choropleth`
///
/// Builds the animated choropleth series for the current filter selection.
pub async fn choropleth(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let rows = FilteredSet::apply(&state.dataset, &params.filter_params());

    let scope = if params.include_empty_regions.unwrap_or(false) {
        RegionScope::Catalog(&state.catalog)
    } else {
        RegionScope::Observed
    };

    let series = build_choropleth(&rows, map_bucket_width(), scope);

    HttpResponse::Ok().json(ApiChoropleth {
        series,
        map_view: MapView::default(),
    })
}

/// `GET /api/requests`
///
/// Returns the filtered records in display form for the record table.
pub async fn requests(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let rows = FilteredSet::apply(&state.dataset, &params.filter_params());
    let table: Vec<ApiRequestRow> = rows.requests().map(ApiRequestRow::from).collect();
    HttpResponse::Ok().json(table)
}

/// `GET /api/trend`
///
/// Returns the trend-panel summaries and term frequencies for the current
/// filter selection.
pub async fn trend(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let rows = FilteredSet::apply(&state.dataset, &params.filter_params());
    HttpResponse::Ok().json(ApiTrend {
        summary: summarize(&rows, trend_bucket_width()),
        terms: subset_term_frequencies(&rows),
    })
}

/// `GET /api/boundaries`
///
/// Serves the boundary feature collection for the choropleth renderer.
pub async fn boundaries(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.boundaries.as_ref())
}
