/// Default OpenWeatherMap REST base URL.
pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// OpenWeatherMap API key. `None` disables the weather proxy.
    pub openweather_api_key: Option<String>,
    pub openweather_base_url: String,
    /// Lower bound of the simulated chatbot latency, in milliseconds.
    pub chatbot_min_delay_ms: u64,
    /// Upper bound of the simulated chatbot latency, in milliseconds.
    pub chatbot_max_delay_ms: u64,
    /// Messages retained by the in-memory assistant history.
    pub chat_history_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            openweather_api_key: None,
            openweather_base_url: DEFAULT_OPENWEATHER_BASE_URL.to_string(),
            chatbot_min_delay_ms: 1000,
            chatbot_max_delay_ms: 3000,
            chat_history_limit: 20,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let openweather_api_key = std::env::var("OPENWEATHER_API_KEY")
            .or_else(|_| std::env::var("OPENWEATHER_API"))
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let chatbot_min_delay_ms = parse_var("CHATBOT_MIN_DELAY_MS", defaults.chatbot_min_delay_ms);
        // Max below min would make the delay range empty
        let chatbot_max_delay_ms =
            parse_var("CHATBOT_MAX_DELAY_MS", defaults.chatbot_max_delay_ms).max(chatbot_min_delay_ms);

        Self {
            port: parse_var("PORT", defaults.port),
            openweather_api_key,
            openweather_base_url: std::env::var("OPENWEATHER_BASE_URL")
                .unwrap_or(defaults.openweather_base_url),
            chatbot_min_delay_ms,
            chatbot_max_delay_ms,
            chat_history_limit: parse_var("CHAT_HISTORY_LIMIT", defaults.chat_history_limit),
        }
    }
}

/// Read and parse an env var, falling back to `default` when unset or invalid.
fn parse_var<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("{} has invalid value '{}', using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
