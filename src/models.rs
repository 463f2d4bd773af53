//! Request and response shapes shared by the weather endpoints.
//!
//! Request bodies use `deny_unknown_fields` so a misspelled key is a 400
//! instead of a silently ignored default.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Location as sent by the dashboard: coordinates, a name, or both.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LocationInput {
    /// Latitude in degrees (-90..=90)
    pub latitude: Option<f64>,
    /// Longitude in degrees (-180..=180)
    pub longitude: Option<f64>,
    /// City name to geocode when coordinates are absent
    pub name: Option<String>,
    /// Display name (also used for geocoding when `name` is absent)
    pub city_name: Option<String>,
}

/// Requested date range. `end_date` defaults to `start_date`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct DateRangeInput {
    /// Start date (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// End date (YYYY-MM-DD)
    pub end_date: Option<String>,
}

/// Which data-source label set to attach to a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DatasetMode {
    #[serde(rename = "IMD")]
    Imd,
    Global,
    #[default]
    Combined,
}

impl DatasetMode {
    /// Data-source names advertised for this mode.
    pub fn data_sources(self) -> Vec<String> {
        let names: &[&str] = match self {
            DatasetMode::Imd => &["IMD"],
            DatasetMode::Global => &["NASA", "NOAA"],
            DatasetMode::Combined => &["IMD", "NASA", "NOAA"],
        };
        names.iter().map(|s| s.to_string()).collect()
    }
}

/// Body of `POST /weather/probability`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ProbabilityRequest {
    pub location: Option<LocationInput>,
    pub date_range: Option<DateRangeInput>,
    pub dataset_mode: Option<DatasetMode>,
    /// Attach the insight text (default true)
    pub include_ai_insights: Option<bool>,
}

/// Body of `POST /weather/compare`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CompareRequest {
    #[serde(default)]
    pub locations: Vec<LocationInput>,
    pub date_range: Option<DateRangeInput>,
    pub dataset_mode: Option<DatasetMode>,
    pub include_ai_insights: Option<bool>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Resolved location echoed back in the response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub city_name: String,
}

/// Resolved date range echoed back in the response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResolvedDateRange {
    pub start_date: String,
    pub end_date: String,
}

/// One condition's synthetic probability and its display strings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConditionEstimate {
    /// Probability in percent, 0-100, two decimals
    pub probability: f64,
    pub label: String,
    pub threshold: String,
    pub description: String,
}

/// Summary block attached to the probabilities.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProbabilitySummary {
    pub data_points: u32,
    pub date_range: String,
    pub location: String,
    pub risk_level: String,
    pub data_quality: String,
}

/// The five conditions plus summary.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Probabilities {
    pub rain: ConditionEstimate,
    pub extreme_heat: ConditionEstimate,
    pub high_wind: ConditionEstimate,
    pub cloudy: ConditionEstimate,
    pub good_weather: ConditionEstimate,
    pub summary: ProbabilitySummary,
}

/// Response of `POST /weather/probability` (and each element of a comparison).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeatherResponse {
    pub location: ResolvedLocation,
    pub date_range: ResolvedDateRange,
    pub probabilities: Probabilities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_insights: Option<String>,
    pub data_sources: Vec<String>,
    pub analysis_period: String,
    pub dataset_mode: DatasetMode,
}

/// Response of `POST /weather/compare`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompareResponse {
    pub comparison_results: Vec<WeatherResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_mode_wire_names() {
        let mode: DatasetMode = serde_json::from_str("\"IMD\"").unwrap();
        assert_eq!(mode, DatasetMode::Imd);
        assert_eq!(serde_json::to_string(&DatasetMode::Global).unwrap(), "\"Global\"");
        assert_eq!(DatasetMode::default(), DatasetMode::Combined);
    }

    #[test]
    fn test_data_sources_per_mode() {
        assert_eq!(DatasetMode::Imd.data_sources(), vec!["IMD"]);
        assert_eq!(DatasetMode::Global.data_sources(), vec!["NASA", "NOAA"]);
        assert_eq!(DatasetMode::Combined.data_sources(), vec!["IMD", "NASA", "NOAA"]);
    }

    #[test]
    fn test_unknown_request_field_rejected() {
        let result: Result<ProbabilityRequest, _> = serde_json::from_value(serde_json::json!({
            "location": { "name": "Delhi" },
            "date_range": { "start_date": "2024-06-15" },
            "unexpected": true
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_dataset_mode_rejected() {
        let result: Result<DatasetMode, _> = serde_json::from_str("\"Martian\"");
        assert!(result.is_err());
    }
}
