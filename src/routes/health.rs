use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::routes::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "healthy" while the process serves requests
    pub status: String,
    /// API version
    pub version: String,
    /// Whether an OpenWeatherMap key is configured
    pub weather_api: bool,
    /// RFC 3339 server time
    pub timestamp: String,
}

/// Health check endpoint.
///
/// Reports whether the live-weather proxy is usable without calling it.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        weather_api: state.openweather.is_configured(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
