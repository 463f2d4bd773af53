//! OpenWeatherMap client (current weather + 5-day/3-hour forecast).
//!
//! See: https://openweathermap.org/current and https://openweathermap.org/forecast5
//!
//! The key is optional at start-up; every call fails with an
//! `ExternalServiceError` while it is unset.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::helpers::round_dp;

/// Upstream request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 8;
/// Days kept from the 3-hourly forecast.
const FORECAST_DAYS: usize = 5;

/// Client for the OpenWeatherMap REST API.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

// --- Public response types ---

/// Where the upstream says the reading was taken.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportLocation {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentConditions {
    /// °C
    pub temperature: f64,
    /// %
    pub humidity: f64,
    /// hPa
    pub pressure: f64,
    /// m/s
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
}

/// One day aggregated from 3-hourly forecast entries.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ForecastDay {
    /// YYYY-MM-DD
    pub date: String,
    pub icon: String,
    pub description: String,
    pub temperature_max: f64,
    pub temperature_min: f64,
    /// Mean probability of precipitation over the day's entries, 0-1
    pub rain_probability: f64,
}

/// Current conditions plus a short daily forecast.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeatherReport {
    pub location: ReportLocation,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
}

// --- OpenWeatherMap JSON response types ---

#[derive(Debug, Deserialize)]
struct OwmCurrent {
    name: Option<String>,
    coord: OwmCoord,
    sys: Option<OwmSys>,
    main: OwmMain,
    wind: Option<OwmWind>,
    #[serde(default)]
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmForecast {
    #[serde(default)]
    list: Vec<OwmForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastEntry {
    dt_txt: Option<String>,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    pop: Option<f64>,
}

fn first_condition(weather: &[OwmCondition]) -> (String, String) {
    let first = weather.first();
    (
        first
            .and_then(|w| w.description.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        first
            .and_then(|w| w.icon.clone())
            .unwrap_or_else(|| "01d".to_string()),
    )
}

fn to_current(raw: &OwmCurrent) -> CurrentConditions {
    let (description, icon) = first_condition(&raw.weather);
    CurrentConditions {
        temperature: raw.main.temp,
        humidity: raw.main.humidity.unwrap_or(0.0),
        pressure: raw.main.pressure.unwrap_or(0.0),
        wind_speed: raw.wind.as_ref().and_then(|w| w.speed).unwrap_or(0.0),
        description,
        icon,
    }
}

/// Group 3-hourly entries by calendar date and keep the first `FORECAST_DAYS` days.
fn aggregate_forecast(entries: &[OwmForecastEntry]) -> Vec<ForecastDay> {
    let mut by_date: BTreeMap<&str, Vec<&OwmForecastEntry>> = BTreeMap::new();
    for entry in entries {
        let Some(date) = entry.dt_txt.as_deref().and_then(|t| t.split(' ').next()) else {
            continue;
        };
        by_date.entry(date).or_default().push(entry);
    }

    by_date
        .into_iter()
        .take(FORECAST_DAYS)
        .map(|(date, day)| {
            let temps = day.iter().map(|e| e.main.temp);
            let max = temps.clone().fold(f64::NEG_INFINITY, f64::max);
            let min = temps.fold(f64::INFINITY, f64::min);
            let pops: Vec<f64> = day.iter().map(|e| e.pop.unwrap_or(0.0)).collect();
            let avg_pop = pops.iter().sum::<f64>() / pops.len() as f64;
            let (description, icon) = first_condition(&day[0].weather);
            ForecastDay {
                date: date.to_string(),
                icon,
                description,
                temperature_max: max,
                temperature_min: min,
                rain_probability: round_dp(avg_pop, 2),
            }
        })
        .collect()
}

impl OpenWeatherClient {
    pub fn new(api_key: Option<String>, base_url: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn key(&self) -> Result<&str, AppError> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::ExternalServiceError("OpenWeatherMap API key not configured".to_string())
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let key = self.key()?;
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("appid", key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("OpenWeatherMap {} request failed: {}", endpoint, e);
                AppError::ExternalServiceError(format!("OpenWeatherMap request failed: {}", e))
            })?;

        if !response.status().is_success() {
            tracing::warn!("OpenWeatherMap {} returned HTTP {}", endpoint, response.status());
            return Err(AppError::ExternalServiceError(format!(
                "OpenWeatherMap returned HTTP {}",
                response.status()
            )));
        }

        Ok(response.json::<T>().await?)
    }

    /// Current conditions for a city name (`q=` lookup).
    pub async fn current_by_city(&self, city: &str) -> Result<CurrentConditions, AppError> {
        let raw: OwmCurrent = self.get_json("weather", &[("q", city.to_string())]).await?;
        Ok(to_current(&raw))
    }

    /// Current conditions plus a daily forecast for coordinates.
    ///
    /// Both requests run concurrently. A failed forecast yields an empty
    /// forecast list; a failed current-conditions request fails the report.
    pub async fn report_by_coords(&self, lat: f64, lon: f64) -> Result<WeatherReport, AppError> {
        let coords = [("lat", format!("{:.4}", lat)), ("lon", format!("{:.4}", lon))];

        let (current, forecast) = futures::future::join(
            self.get_json::<OwmCurrent>("weather", &coords),
            self.get_json::<OwmForecast>("forecast", &coords),
        )
        .await;

        let current = current?;
        let forecast = match forecast {
            Ok(f) => aggregate_forecast(&f.list),
            Err(e) => {
                tracing::warn!("Forecast unavailable for ({}, {}): {}", lat, lon, e);
                Vec::new()
            }
        };

        Ok(WeatherReport {
            location: ReportLocation {
                name: current.name.clone().unwrap_or_default(),
                country: current
                    .sys
                    .as_ref()
                    .and_then(|s| s.country.clone())
                    .unwrap_or_default(),
                lat: current.coord.lat,
                lon: current.coord.lon,
            },
            current: to_current(&current),
            forecast,
        })
    }
}
