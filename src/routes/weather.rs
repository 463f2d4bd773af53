//! Weather HTTP endpoints.
//!
//! - POST /weather/probability
//! - POST /weather/compare
//! - GET  /weather/current?lat=&lon=

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::ApiJson;
use crate::models::{CompareRequest, CompareResponse, ProbabilityRequest, WeatherResponse};
use crate::routes::AppState;
use crate::services::assembler::{build_comparison, build_weather_response, AssembleOptions};
use crate::services::openweather::WeatherReport;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CurrentWeatherQuery {
    /// Latitude in decimal degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub lon: f64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Estimate condition probabilities for one location and date range.
///
/// Coordinates win over a name; a name alone is geocoded through the
/// built-in city table.
#[utoipa::path(
    post,
    path = "/weather/probability",
    tag = "Weather",
    request_body = ProbabilityRequest,
    responses(
        (status = 200, description = "Probability estimates", body = WeatherResponse),
        (status = 400, description = "Missing or invalid location / date range", body = ErrorResponse),
    )
)]
pub async fn weather_probability(
    ApiJson(request): ApiJson<ProbabilityRequest>,
) -> Result<Json<WeatherResponse>, AppError> {
    let options = AssembleOptions::new(request.dataset_mode, request.include_ai_insights);
    let mut rng = rand::rng();
    let response = build_weather_response(
        request.location.as_ref(),
        request.date_range.as_ref(),
        options,
        &mut rng,
    )?;

    tracing::debug!(
        "Probability estimate for {} ({}, {})",
        response.location.city_name,
        response.location.latitude,
        response.location.longitude
    );

    Ok(Json(response))
}

/// Compare up to three locations over the same date range.
#[utoipa::path(
    post,
    path = "/weather/compare",
    tag = "Weather",
    request_body = CompareRequest,
    responses(
        (status = 200, description = "One result per location, in request order", body = CompareResponse),
        (status = 400, description = "Empty location list or an invalid location", body = ErrorResponse),
    )
)]
pub async fn weather_compare(
    ApiJson(request): ApiJson<CompareRequest>,
) -> Result<Json<CompareResponse>, AppError> {
    let mut rng = rand::rng();
    let comparison_results = build_comparison(&request, &mut rng)?;
    Ok(Json(CompareResponse { comparison_results }))
}

/// Live conditions and a 5-day forecast from OpenWeatherMap.
#[utoipa::path(
    get,
    path = "/weather/current",
    tag = "Weather",
    params(CurrentWeatherQuery),
    responses(
        (status = 200, description = "Current conditions and daily forecast", body = WeatherReport),
        (status = 400, description = "Missing or out-of-range coordinates", body = ErrorResponse),
        (status = 502, description = "OpenWeatherMap unavailable or not configured", body = ErrorResponse),
    )
)]
pub async fn current_weather(
    State(state): State<AppState>,
    query: Result<Query<CurrentWeatherQuery>, QueryRejection>,
) -> Result<Json<WeatherReport>, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;

    if !(-90.0..=90.0).contains(&query.lat) || !(-180.0..=180.0).contains(&query.lon) {
        return Err(AppError::BadRequest(format!(
            "Coordinates out of range: ({}, {})",
            query.lat, query.lon
        )));
    }

    let report = state.openweather.report_by_coords(query.lat, query.lon).await?;
    Ok(Json(report))
}
