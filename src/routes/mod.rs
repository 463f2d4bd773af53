use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::services::assistant::ChatHistory;
use crate::services::openweather::OpenWeatherClient;

pub mod chat;
pub mod health;
pub mod weather;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub openweather: OpenWeatherClient,
    pub history: ChatHistory,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let openweather =
            OpenWeatherClient::new(config.openweather_api_key.clone(), &config.openweather_base_url)?;
        let history = ChatHistory::new(config.chat_history_limit);
        Ok(Self {
            config: Arc::new(config),
            openweather,
            history,
        })
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
