// PastCast API v0.1
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod extractors;
mod helpers;
mod models;
mod routes;
mod services;

use config::AppConfig;
use routes::AppState;

/// PastCast API OpenAPI document.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PastCast API",
        version = "0.1.0",
        description = "Weather-probability backend for planning outdoor events. \
            Produces deterministic-looking synthetic probabilities of rain, extreme heat, \
            high wind and cloud cover for a location, compares locations side by side, \
            proxies live conditions from OpenWeatherMap and serves two simple chat assistants.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Weather", description = "Probability estimates, comparisons and live conditions"),
        (name = "Chat", description = "Chat assistants and conversation history"),
    ),
    paths(
        routes::health::health_check,
        routes::weather::weather_probability,
        routes::weather::weather_compare,
        routes::weather::current_weather,
        routes::chat::ai_chat,
        routes::chat::chatbot,
        routes::chat::message,
        routes::chat::history,
        routes::chat::clear,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            models::LocationInput,
            models::DateRangeInput,
            models::DatasetMode,
            models::ProbabilityRequest,
            models::CompareRequest,
            models::ResolvedLocation,
            models::ResolvedDateRange,
            models::ConditionEstimate,
            models::ProbabilitySummary,
            models::Probabilities,
            models::WeatherResponse,
            models::CompareResponse,
            services::openweather::WeatherReport,
            services::openweather::ReportLocation,
            services::openweather::CurrentConditions,
            services::openweather::ForecastDay,
            services::chatbot::ChatbotLocation,
            services::chatbot::ChatbotRequest,
            services::chatbot::Predictions,
            services::chatbot::ChatbotResponse,
            services::assistant::ChatRole,
            services::assistant::ChatMessage,
            routes::chat::AiChatRequest,
            routes::chat::AiChatResponse,
            routes::chat::MessageRequest,
            routes::chat::MessageResponse,
            routes::chat::ClearResponse,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

/// Assemble all routes, CORS and request tracing around `state`.
fn build_router(state: AppState) -> Router {
    // Browser dashboard on another origin; GET and POST only
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/weather/probability", post(routes::weather::weather_probability))
        .route("/weather/compare", post(routes::weather::weather_compare))
        .route("/weather/current", get(routes::weather::current_weather))
        .route("/ai/chat", post(routes::chat::ai_chat))
        .route("/api/chatbot", post(routes::chat::chatbot))
        .route("/api/message", post(routes::chat::message))
        .route("/api/history", get(routes::chat::history))
        .route("/api/clear", post(routes::chat::clear))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[tokio::main]
async fn main() {
    // Initialize tracing; LOG_FORMAT=json switches to structured output
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pastcast_api=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    let config = AppConfig::from_env();
    if config.openweather_api_key.is_none() {
        tracing::warn!("OPENWEATHER_API_KEY not set; live weather lookups are disabled");
    }

    let port = config.port;
    let state = AppState::new(config).expect("Failed to build application state");
    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!("Swagger UI available at http://localhost:{}/swagger-ui/", port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
