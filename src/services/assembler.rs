//! Request validation and `WeatherResponse` assembly.
//!
//! Turns a validated location + date range into the fixed response shape the
//! dashboard renders. All randomness comes from the caller's RNG.

use chrono::NaiveDate;
use rand::Rng;

use crate::errors::AppError;
use crate::models::{
    CompareRequest, ConditionEstimate, DatasetMode, DateRangeInput, LocationInput, Probabilities,
    ProbabilitySummary, ResolvedDateRange, ResolvedLocation, WeatherResponse,
};
use crate::services::geocode::lookup_city;
use crate::services::insights::{generate_insights, risk_level};
use crate::services::probability::{compute_probabilities, ConditionProbabilities};

/// Maximum number of locations processed by one comparison request.
pub const MAX_COMPARE_LOCATIONS: usize = 3;

/// Advertised size of the (fictitious) historical sample.
const SUMMARY_DATA_POINTS: u32 = 3650;
const SUMMARY_HISTORY_SPAN: &str = "2005-2024";
const SUMMARY_DATA_QUALITY: &str = "High";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Everything the assembler needs for one location.
#[derive(Debug, Clone, Copy)]
pub struct AssembleOptions {
    pub dataset_mode: DatasetMode,
    pub include_ai_insights: bool,
}

impl AssembleOptions {
    pub fn new(dataset_mode: Option<DatasetMode>, include_ai_insights: Option<bool>) -> Self {
        Self {
            dataset_mode: dataset_mode.unwrap_or_default(),
            include_ai_insights: include_ai_insights.unwrap_or(true),
        }
    }
}

fn non_empty(s: Option<&String>) -> Option<&str> {
    s.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Resolve coordinates and a display name, geocoding by name when coordinates are absent.
pub fn resolve_location(location: Option<&LocationInput>) -> Result<ResolvedLocation, AppError> {
    let missing =
        || AppError::BadRequest("Missing required parameters: location is required.".to_string());

    let location = location.ok_or_else(missing)?;
    let lookup_name = non_empty(location.name.as_ref()).or(non_empty(location.city_name.as_ref()));
    let display_name = non_empty(location.city_name.as_ref()).or(non_empty(location.name.as_ref()));

    // A geocoded location is named after the city it was looked up as
    let (latitude, longitude, geocoded_name) = match (location.latitude, location.longitude) {
        (Some(lat), Some(lon)) => (lat, lon, None),
        _ => {
            let name = lookup_name.ok_or_else(missing)?;
            let coords = lookup_city(name).ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Location \"{}\" not found. Please provide coordinates or use a supported city name.",
                    name
                ))
            })?;
            tracing::debug!("Geocoded '{}' to ({}, {})", name, coords.latitude, coords.longitude);
            (coords.latitude, coords.longitude, Some(name))
        }
    };

    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(AppError::BadRequest(format!(
            "latitude must be between -90 and 90, got {}",
            latitude
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::BadRequest(format!(
            "longitude must be between -180 and 180, got {}",
            longitude
        )));
    }

    let city_name = geocoded_name
        .or(display_name)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Location ({}, {})", latitude, longitude));

    Ok(ResolvedLocation {
        latitude,
        longitude,
        city_name,
    })
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        AppError::BadRequest(format!("Invalid {} '{}' (expected YYYY-MM-DD): {}", field, value, e))
    })
}

/// Validate the date range, defaulting `end_date` to `start_date`.
pub fn resolve_date_range(date_range: Option<&DateRangeInput>) -> Result<ResolvedDateRange, AppError> {
    let start_raw = date_range
        .and_then(|d| non_empty(d.start_date.as_ref()))
        .ok_or_else(|| {
            AppError::BadRequest(
                "Missing required parameters: date_range with start_date required.".to_string(),
            )
        })?;
    let start = parse_date("start_date", start_raw)?;

    let end = match date_range.and_then(|d| non_empty(d.end_date.as_ref())) {
        Some(raw) => parse_date("end_date", raw)?,
        None => start,
    };

    if end < start {
        return Err(AppError::BadRequest(format!(
            "end_date {} is before start_date {}",
            end, start
        )));
    }

    Ok(ResolvedDateRange {
        start_date: start.format(DATE_FORMAT).to_string(),
        end_date: end.format(DATE_FORMAT).to_string(),
    })
}

fn estimate(probability: f64, label: &str, threshold: &str, description: &str) -> ConditionEstimate {
    ConditionEstimate {
        probability,
        label: label.to_string(),
        threshold: threshold.to_string(),
        description: description.to_string(),
    }
}

/// Package computed probabilities into the response shape.
pub fn assemble_response(
    location: ResolvedLocation,
    date_range: ResolvedDateRange,
    p: &ConditionProbabilities,
    options: AssembleOptions,
) -> WeatherResponse {
    let risk = risk_level(p.rain, p.extreme_heat, p.high_wind, p.cloudy);
    let ai_insights = options
        .include_ai_insights
        .then(|| generate_insights(&location.city_name, p));
    let analysis_period = format!("{} to {}", date_range.start_date, date_range.end_date);

    WeatherResponse {
        probabilities: Probabilities {
            rain: estimate(
                p.rain,
                "Rain Probability",
                "≥ 1 mm/day",
                "Chance of precipitation exceeding 1 mm/day",
            ),
            extreme_heat: estimate(
                p.extreme_heat,
                "Extreme Heat",
                "40°C",
                "Probability of daily max temperature exceeding threshold",
            ),
            high_wind: estimate(
                p.high_wind,
                "High Wind",
                "> 20 km/h",
                "Probability of wind speeds above 20 km/h",
            ),
            cloudy: estimate(
                p.cloudy,
                "Cloudy",
                "> 70% cloud cover",
                "Probability of high cloud cover conditions",
            ),
            good_weather: estimate(
                p.good_weather,
                "Good Weather",
                "Composite score",
                "Overall chance of favorable conditions",
            ),
            summary: ProbabilitySummary {
                data_points: SUMMARY_DATA_POINTS,
                date_range: SUMMARY_HISTORY_SPAN.to_string(),
                location: location.city_name.clone(),
                risk_level: risk.to_string(),
                data_quality: SUMMARY_DATA_QUALITY.to_string(),
            },
        },
        location,
        date_range,
        ai_insights,
        data_sources: options.dataset_mode.data_sources(),
        analysis_period,
        dataset_mode: options.dataset_mode,
    }
}

/// Validate one location + date range and build its response.
pub fn build_weather_response<R: Rng>(
    location: Option<&LocationInput>,
    date_range: Option<&DateRangeInput>,
    options: AssembleOptions,
    rng: &mut R,
) -> Result<WeatherResponse, AppError> {
    let location = resolve_location(location)?;
    let date_range = resolve_date_range(date_range)?;

    let p = compute_probabilities(
        &location.city_name,
        location.latitude,
        location.longitude,
        options.dataset_mode,
        rng,
    );

    Ok(assemble_response(location, date_range, &p, options))
}

/// Build responses for up to `MAX_COMPARE_LOCATIONS` locations. Any failure fails the batch.
pub fn build_comparison<R: Rng>(
    request: &CompareRequest,
    rng: &mut R,
) -> Result<Vec<WeatherResponse>, AppError> {
    if request.locations.is_empty() {
        return Err(AppError::BadRequest(
            "Missing required parameters: at least one location is required.".to_string(),
        ));
    }
    if request.locations.len() > MAX_COMPARE_LOCATIONS {
        tracing::debug!(
            "Comparison truncated from {} to {} locations",
            request.locations.len(),
            MAX_COMPARE_LOCATIONS
        );
    }

    let options = AssembleOptions::new(request.dataset_mode, request.include_ai_insights);
    request
        .locations
        .iter()
        .take(MAX_COMPARE_LOCATIONS)
        .map(|loc| build_weather_response(Some(loc), request.date_range.as_ref(), options, rng))
        .collect()
}
