//! Simulated weather "prediction" chatbot.
//!
//! Independent of the probability engine: values come from a sinusoidal
//! seasonal curve over the current month plus uniform noise. The HTTP
//! handler adds an artificial latency drawn from `random_delay`.

use std::f64::consts::PI;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::helpers::round_dp;

/// Words that mark a query as weather-related (matched case-insensitively).
const WEATHER_KEYWORDS: &[&str] = &[
    "weather",
    "temperature",
    "rain",
    "wind",
    "humidity",
    "pressure",
    "forecast",
    "climate",
];

const NORTHERN_BASE_TEMP_C: f64 = 25.0;
const SOUTHERN_BASE_TEMP_C: f64 = 15.0;
const SEASONAL_AMPLITUDE_C: f64 = 5.0;

/// Precipitation below this is left out of the reply text.
const PRECIPITATION_MENTION_MM: f64 = 0.5;
/// Confidence below this adds a caveat to the reply.
const LOW_CONFIDENCE: f64 = 0.8;

const DATA_SOURCE: &str = "Simulated seasonal model";

/// Optional location context sent with a chatbot query.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ChatbotLocation {
    pub city_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Body of `POST /api/chatbot`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ChatbotRequest {
    pub user_query: String,
    pub location: Option<ChatbotLocation>,
    /// Client-side ISO 8601 timestamp (informational)
    pub timestamp: Option<String>,
}

/// Simulated measurements.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Predictions {
    /// Degrees Celsius, one decimal
    pub temperature: f64,
    /// Percent, 60-90
    pub humidity: u32,
    /// hPa, 1000-1020
    pub pressure: u32,
    /// km/h, one decimal
    pub wind_speed: f64,
    /// mm, two decimals
    pub precipitation: f64,
}

/// Response of `POST /api/chatbot`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotResponse {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predictions: Option<Predictions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Forecast date (YYYY-MM-DD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    pub suggestions: Vec<String>,
}

pub fn is_weather_related(query: &str) -> bool {
    let lower = query.to_lowercase();
    WEATHER_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Seasonal offset in °C for a zero-based month.
pub fn seasonal_variation(month0: u32) -> f64 {
    (f64::from(month0) / 12.0 * 2.0 * PI).sin() * SEASONAL_AMPLITUDE_C
}

/// Uniformly random latency in `[min_ms, max_ms]`.
pub fn random_delay<R: Rng>(min_ms: u64, max_ms: u64, rng: &mut R) -> Duration {
    let max_ms = max_ms.max(min_ms);
    Duration::from_millis(rng.random_range(min_ms..=max_ms))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn off_topic_reply() -> ChatbotResponse {
    ChatbotResponse {
        reply: "I'm a weather prediction assistant. Please ask me about weather forecasts, \
                climate data, or meteorological conditions. For example: 'What will the \
                temperature be tomorrow?' or 'Will it rain this weekend?'"
            .to_string(),
        predictions: None,
        location: None,
        date: None,
        confidence: None,
        data_source: None,
        suggestions: strings(&[
            "Ask about temperature predictions",
            "Inquire about precipitation chances",
            "Request wind speed forecasts",
            "Get humidity level predictions",
        ]),
    }
}

/// Draw a set of simulated measurements.
pub fn simulate_predictions<R: Rng>(latitude: Option<f64>, month0: u32, rng: &mut R) -> Predictions {
    let base = match latitude {
        Some(lat) if lat > 0.0 => NORTHERN_BASE_TEMP_C,
        _ => SOUTHERN_BASE_TEMP_C,
    };
    let noise: f64 = rng.random::<f64>() - 0.5;

    Predictions {
        temperature: round_dp(base + seasonal_variation(month0) + noise * 10.0, 1),
        humidity: (60.0 + rng.random::<f64>() * 30.0).round() as u32,
        pressure: (1010.0 + (rng.random::<f64>() - 0.5) * 20.0).round() as u32,
        wind_speed: round_dp(rng.random::<f64>() * 20.0, 1),
        precipitation: round_dp(rng.random::<f64>() * 5.0, 2),
    }
}

/// Answer a chatbot query. `today` fixes the clock for the month and forecast date.
pub fn respond<R: Rng>(request: &ChatbotRequest, today: NaiveDate, rng: &mut R) -> ChatbotResponse {
    if !is_weather_related(&request.user_query) {
        return off_topic_reply();
    }

    let location = request.location.clone().unwrap_or_default();
    let location_name = location
        .city_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("this location")
        .to_string();

    let predictions = simulate_predictions(location.latitude, today.month0(), rng);
    let confidence = 0.7 + rng.random::<f64>() * 0.2;

    let mut reply = format!("Based on simulated seasonal patterns, {} shows:", location_name);
    reply.push_str(&format!("\n• Temperature: {}°C", predictions.temperature));
    reply.push_str(&format!("\n• Humidity: {}%", predictions.humidity));
    if predictions.precipitation > PRECIPITATION_MENTION_MM {
        reply.push_str(&format!("\n• Precipitation: {}mm", predictions.precipitation));
    }
    reply.push_str(&format!("\n• Wind Speed: {} km/h", predictions.wind_speed));
    reply.push_str(&format!("\n• Pressure: {} hPa", predictions.pressure));
    if confidence < LOW_CONFIDENCE {
        reply.push_str(&format!(
            "\n\nNote: This prediction has moderate confidence ({}%). Weather conditions can be highly variable.",
            (confidence * 100.0).round()
        ));
    }

    let tomorrow = today.succ_opt().unwrap_or(today);

    ChatbotResponse {
        reply,
        predictions: Some(predictions),
        location: Some(location_name),
        date: Some(tomorrow.format("%Y-%m-%d").to_string()),
        confidence: Some(round_dp(confidence, 2)),
        data_source: Some(DATA_SOURCE.to_string()),
        suggestions: strings(&[
            "Ask about specific weather conditions",
            "Request a longer forecast period",
            "Compare with other locations",
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn request(query: &str, location: Option<ChatbotLocation>) -> ChatbotRequest {
        ChatbotRequest {
            user_query: query.to_string(),
            location,
            timestamp: None,
        }
    }

    fn june_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_weather_keywords() {
        assert!(is_weather_related("Will it RAIN tomorrow?"));
        assert!(is_weather_related("forecast for Pune"));
        assert!(!is_weather_related("Tell me a joke"));
    }

    #[test]
    fn test_off_topic_has_no_predictions() {
        let mut rng = StdRng::seed_from_u64(1);
        let resp = respond(&request("who won the match", None), june_15(), &mut rng);
        assert!(resp.predictions.is_none());
        assert_eq!(resp.suggestions.len(), 4);
        assert!(resp.reply.contains("weather prediction assistant"));
    }

    #[test]
    fn test_predictions_within_bands() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            let p = simulate_predictions(Some(19.0), 5, &mut rng);
            let seasonal = seasonal_variation(5);
            assert!(p.temperature >= 25.0 + seasonal - 5.05 && p.temperature <= 25.0 + seasonal + 5.05);
            assert!((60..=90).contains(&p.humidity));
            assert!((1000..=1020).contains(&p.pressure));
            assert!((0.0..=20.0).contains(&p.wind_speed));
            assert!((0.0..=5.0).contains(&p.precipitation));
        }
    }

    #[test]
    fn test_southern_base_is_cooler() {
        let mut north = StdRng::seed_from_u64(9);
        let mut south = StdRng::seed_from_u64(9);
        let n = simulate_predictions(Some(10.0), 0, &mut north);
        let s = simulate_predictions(Some(-10.0), 0, &mut south);
        assert!((n.temperature - s.temperature - 10.0).abs() < 0.11);
    }

    #[test]
    fn test_seasonal_variation_curve() {
        assert!(seasonal_variation(0).abs() < 1e-9);
        assert!((seasonal_variation(3) - 5.0).abs() < 1e-9);
        assert!((seasonal_variation(9) + 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_weather_reply_shape() {
        let mut rng = StdRng::seed_from_u64(3);
        let loc = ChatbotLocation {
            city_name: Some("Pune".to_string()),
            latitude: Some(18.52),
            longitude: Some(73.85),
        };
        let resp = respond(&request("weather tomorrow?", Some(loc)), june_15(), &mut rng);
        assert_eq!(resp.location.as_deref(), Some("Pune"));
        assert_eq!(resp.date.as_deref(), Some("2024-06-16"));
        let confidence = resp.confidence.unwrap();
        assert!((0.7..=0.9).contains(&confidence));
        assert!(resp.reply.starts_with("Based on simulated seasonal patterns, Pune shows:"));
        assert!(resp.reply.contains("• Pressure:"));
    }

    #[test]
    fn test_default_location_name() {
        let mut rng = StdRng::seed_from_u64(4);
        let resp = respond(&request("temperature?", None), june_15(), &mut rng);
        assert_eq!(resp.location.as_deref(), Some("this location"));
    }

    #[test]
    fn test_random_delay_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let d = random_delay(1000, 3000, &mut rng);
            assert!(d >= Duration::from_millis(1000) && d <= Duration::from_millis(3000));
        }
        assert_eq!(random_delay(0, 0, &mut rng), Duration::ZERO);
        // Inverted bounds collapse to min
        assert_eq!(random_delay(50, 10, &mut rng), Duration::from_millis(50));
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let req: ChatbotRequest =
            serde_json::from_value(serde_json::json!({ "userQuery": "rain?" })).unwrap();
        assert_eq!(req.user_query, "rain?");

        let mut rng = StdRng::seed_from_u64(6);
        let json = serde_json::to_value(respond(&req, june_15(), &mut rng)).unwrap();
        assert!(json["predictions"]["windSpeed"].is_number());
        assert!(json["dataSource"].is_string());
    }
}
