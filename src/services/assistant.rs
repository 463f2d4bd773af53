//! Rule-based chat assistant behind `/api/message`.
//!
//! Messages are routed by keyword: capability questions, live weather
//! lookups through OpenWeatherMap, probability questions answered by the
//! local engine, and a fallback hint. Every exchange is kept in a bounded
//! in-memory history.

use std::collections::VecDeque;
use std::sync::{Arc, LazyLock};

use rand::Rng;
use regex::Regex;
use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::models::DatasetMode;
use crate::services::geocode::{find_city_in_text, CityCoordinates};
use crate::services::openweather::OpenWeatherClient;
use crate::services::probability::compute_probabilities;

const CAPABILITY_PHRASES: &[&str] = &["what can you do", "capabilities", "help", "what do you do"];
const WEATHER_TERMS: &[&str] = &["weather", "temp", "temperature", "forecast", "humidity"];
const PROBABILITY_TERMS: &[&str] = &["rain", "heat", "wind", "cloud", "probability"];
const PLACE_TRIM: [char; 4] = [' ', '.', ',', '-'];

static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:in|at|for)\s+([A-Za-z\s.,-]+)$").expect("valid location regex")
});
static TIME_WORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:today|tonight|tomorrow|yesterday|now|this week|this weekend)\b")
        .expect("valid time-word regex")
});

pub const EMPTY_MESSAGE_REPLY: &str = "Please enter a message.";
pub const MISSING_KEY_REPLY: &str = "Weather unavailable (API key missing).";
pub const MISSING_CITY_REPLY: &str = "Please specify a city, e.g., 'weather in Pune'.";
pub const FALLBACK_REPLY: &str = "I can look up live weather (e.g., 'weather in Pune') or estimate \
     condition probabilities for a supported city (e.g., 'chance of rain in Mumbai').";

pub const CAPABILITIES_REPLY: &str = "I can help with:\n\
     - Live weather lookups by city (OpenWeatherMap).\n\
     - Probability estimates for rain, extreme heat, high wind and cloud cover in supported cities.\n\
     - Good-weather scores for planning outdoor events.";

/// Who wrote a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Ai,
}

/// One stored chat message.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Bounded, shared, in-memory chat history. Oldest entries are evicted first.
#[derive(Debug, Clone)]
pub struct ChatHistory {
    messages: Arc<RwLock<VecDeque<ChatMessage>>>,
    limit: usize,
}

impl ChatHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            messages: Arc::new(RwLock::new(VecDeque::new())),
            limit,
        }
    }

    pub async fn push(&self, role: ChatRole, content: impl Into<String>) {
        if self.limit == 0 {
            return;
        }
        let mut messages = self.messages.write().await;
        while messages.len() >= self.limit {
            messages.pop_front();
        }
        messages.push_back(ChatMessage {
            role,
            content: content.into(),
        });
    }

    /// All retained messages, oldest first.
    pub async fn recent(&self) -> Vec<ChatMessage> {
        self.messages.read().await.iter().cloned().collect()
    }

    pub async fn clear(&self) {
        self.messages.write().await.clear();
    }
}

/// What a message is asking for.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Empty,
    Capabilities,
    /// Live weather, with the extracted city if any
    Weather(Option<String>),
    /// Probability question about a supported city
    Probability(&'static str, CityCoordinates),
    Unknown,
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

pub fn classify(text: &str) -> Intent {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return Intent::Empty;
    }
    if contains_any(&lower, CAPABILITY_PHRASES) {
        return Intent::Capabilities;
    }
    if contains_any(&lower, WEATHER_TERMS) {
        return Intent::Weather(extract_location(text));
    }
    if contains_any(&lower, PROBABILITY_TERMS) {
        if let Some((name, coords)) = find_city_in_text(text) {
            return Intent::Probability(name, coords);
        }
    }
    Intent::Unknown
}

/// City named after the first `in`/`at`/`for` whose tail is a plain place name.
///
/// "forecast for New Delhi?" → "New Delhi"
pub fn extract_location(text: &str) -> Option<String> {
    let cleaned = text.trim().trim_end_matches(['?', '.', '!']);
    let captures = LOCATION_RE.captures(cleaned)?;
    let city = captures[1].trim_matches(PLACE_TRIM);
    (!city.is_empty()).then(|| city.to_string())
}

/// Drop time expressions so "Bengaluru tomorrow" looks up "Bengaluru".
pub fn strip_time_words(city: &str) -> String {
    let stripped = TIME_WORDS_RE.replace_all(city, "");
    let cleaned = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let cleaned = cleaned.trim_matches(PLACE_TRIM);
    if cleaned.is_empty() {
        city.trim_matches(PLACE_TRIM).to_string()
    } else {
        cleaned.to_string()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// One-line engine summary for a supported city.
pub fn probability_summary<R: Rng>(city: &str, coords: CityCoordinates, rng: &mut R) -> String {
    let p = compute_probabilities(
        city,
        coords.latitude,
        coords.longitude,
        DatasetMode::default(),
        rng,
    );
    format!(
        "Estimated probabilities for {} (synthetic): rain {:.1}%, extreme heat {:.1}%, \
         high wind {:.1}%, cloudy {:.1}%, good weather {:.1}%.",
        capitalize(city),
        p.rain,
        p.extreme_heat,
        p.high_wind,
        p.cloudy,
        p.good_weather,
    )
}

async fn weather_reply(client: &OpenWeatherClient, city: &str) -> String {
    if !client.is_configured() {
        return MISSING_KEY_REPLY.to_string();
    }
    let city = strip_time_words(city);
    match client.current_by_city(&city).await {
        Ok(current) => format!(
            "Weather in {}: {}, {}°C, humidity {}%.",
            city,
            capitalize(&current.description),
            current.temperature,
            current.humidity,
        ),
        Err(e) => {
            tracing::warn!("Weather lookup for '{}' failed: {}", city, e);
            format!("Couldn't fetch weather for {}.", city)
        }
    }
}

/// Answer one message. Does not touch the history.
pub async fn answer(text: &str, client: &OpenWeatherClient) -> String {
    match classify(text) {
        Intent::Empty => EMPTY_MESSAGE_REPLY.to_string(),
        Intent::Capabilities => CAPABILITIES_REPLY.to_string(),
        Intent::Weather(None) => MISSING_CITY_REPLY.to_string(),
        Intent::Weather(Some(city)) => weather_reply(client, &city).await,
        Intent::Probability(name, coords) => {
            let mut rng = rand::rng();
            probability_summary(name, coords, &mut rng)
        }
        Intent::Unknown => FALLBACK_REPLY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_extract_location() {
        assert_eq!(extract_location("weather in Pune?").as_deref(), Some("Pune"));
        assert_eq!(
            extract_location("forecast for New Delhi!").as_deref(),
            Some("New Delhi")
        );
        assert_eq!(
            extract_location("temperature at Bengaluru tomorrow").as_deref(),
            Some("Bengaluru tomorrow")
        );
        assert_eq!(extract_location("what's the weather"), None);
        // Digits after the preposition are not a place
        assert_eq!(extract_location("weather in 2024"), None);
    }

    #[test]
    fn test_strip_time_words() {
        assert_eq!(strip_time_words("Bengaluru tomorrow"), "Bengaluru");
        assert_eq!(strip_time_words("Pune this weekend"), "Pune");
        assert_eq!(strip_time_words("New Delhi, today"), "New Delhi");
        // Nothing left: keep the original
        assert_eq!(strip_time_words("tomorrow"), "tomorrow");
        // Whole words only
        assert_eq!(strip_time_words("Nowgong"), "Nowgong");
        assert_eq!(strip_time_words("Mumbai TONIGHT"), "Mumbai");
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("   "), Intent::Empty);
        assert_eq!(classify("What can you do?"), Intent::Capabilities);
        assert_eq!(
            classify("weather in Pune"),
            Intent::Weather(Some("Pune".to_string()))
        );
        assert_eq!(classify("what's the temperature"), Intent::Weather(None));
        assert!(matches!(classify("Will it rain in Mumbai?"), Intent::Probability("mumbai", _)));
        assert_eq!(classify("rain in Gotham"), Intent::Unknown);
        assert_eq!(classify("tell me a joke"), Intent::Unknown);
    }

    #[test]
    fn test_probability_summary() {
        let mut rng = StdRng::seed_from_u64(11);
        let (name, coords) = find_city_in_text("rain in pune").unwrap();
        let text = probability_summary(name, coords, &mut rng);
        assert!(text.starts_with("Estimated probabilities for Pune (synthetic): rain "));
        assert!(text.contains("good weather"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("scattered CLOUDS"), "Scattered clouds");
        assert_eq!(capitalize(""), "");
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let history = ChatHistory::new(3);
        for i in 0..5 {
            history.push(ChatRole::User, format!("m{}", i)).await;
        }
        let recent = history.recent().await;
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].content, "m2");
        assert_eq!(recent[2].content, "m4");

        history.clear().await;
        assert!(history.recent().await.is_empty());
    }

    #[tokio::test]
    async fn test_history_with_huge_limit_allocates_lazily() {
        let history = ChatHistory::new(usize::MAX);
        history.push(ChatRole::User, "hello").await;
        assert_eq!(history.recent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_history_role_wire_names() {
        let history = ChatHistory::new(2);
        history.push(ChatRole::Ai, "hi").await;
        let json = serde_json::to_value(history.recent().await).unwrap();
        assert_eq!(json[0]["role"], "ai");
        assert_eq!(json[0]["content"], "hi");
    }

    #[tokio::test]
    async fn test_answer_without_key() {
        let client = OpenWeatherClient::new(None, "http://127.0.0.1:9").unwrap();
        assert_eq!(answer("weather in Pune", &client).await, MISSING_KEY_REPLY);
        assert_eq!(answer("weather", &client).await, MISSING_CITY_REPLY);
        assert_eq!(answer("", &client).await, EMPTY_MESSAGE_REPLY);
    }

    #[tokio::test]
    async fn test_answer_live_weather() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Bengaluru"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Bengaluru",
                "coord": { "lat": 12.97, "lon": 77.59 },
                "main": { "temp": 24.5, "humidity": 70 },
                "weather": [ { "description": "light rain", "icon": "10d" } ]
            })))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::new(Some("k".to_string()), &server.uri()).unwrap();
        let reply = answer("weather in Bengaluru tomorrow?", &client).await;
        assert_eq!(reply, "Weather in Bengaluru: Light rain, 24.5°C, humidity 70%.");
    }

    #[tokio::test]
    async fn test_answer_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::new(Some("k".to_string()), &server.uri()).unwrap();
        let reply = answer("weather in Atlantis", &client).await;
        assert_eq!(reply, "Couldn't fetch weather for Atlantis.");
    }
}
