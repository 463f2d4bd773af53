//! Chat HTTP endpoints.
//!
//! - POST /ai/chat
//! - POST /api/chatbot
//! - POST /api/message
//! - GET  /api/history
//! - POST /api/clear

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::ApiJson;
use crate::routes::AppState;
use crate::services::assistant::{self, ChatMessage, ChatRole};
use crate::services::chatbot::{self, ChatbotRequest, ChatbotResponse};

const INVALID_CHATBOT_REQUEST: &str = "Invalid request: userQuery is required and must be a string";
const HISTORY_CLEARED: &str = "Chat memory cleared.";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct AiChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AiChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MessageRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub reply: String,
    /// Always "success"
    pub status: String,
    /// RFC 3339 server time
    pub timestamp: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Canned answer for the dashboard's quick-ask box.
#[utoipa::path(
    post,
    path = "/ai/chat",
    tag = "Chat",
    request_body = AiChatRequest,
    responses(
        (status = 200, description = "Canned answer", body = AiChatResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
    )
)]
pub async fn ai_chat(ApiJson(request): ApiJson<AiChatRequest>) -> Json<AiChatResponse> {
    let message = request.message.unwrap_or_default();
    let response = if message.trim().is_empty() {
        "Please provide a location, date, and metric (e.g., rain %, temp °C).".to_string()
    } else {
        format!(
            "For your query: \"{}\", typical rain probability is 35–50% and max temp around 28–34°C. \
             (Simulated response)",
            message
        )
    };
    Json(AiChatResponse { response })
}

/// Simulated weather-prediction chatbot.
///
/// Replies after an artificial delay. Weather-related queries get a set of
/// simulated measurements; anything else gets suggestions.
#[utoipa::path(
    post,
    path = "/api/chatbot",
    tag = "Chat",
    request_body = ChatbotRequest,
    responses(
        (status = 200, description = "Chatbot reply", body = ChatbotResponse),
        (status = 400, description = "Missing or non-string userQuery", body = ErrorResponse),
    )
)]
pub async fn chatbot(
    State(state): State<AppState>,
    payload: Result<Json<ChatbotRequest>, JsonRejection>,
) -> Result<Json<ChatbotResponse>, AppError> {
    let request = match payload {
        Ok(Json(request)) if !request.user_query.trim().is_empty() => request,
        Ok(_) => return Err(AppError::BadRequest(INVALID_CHATBOT_REQUEST.to_string())),
        Err(rejection) => {
            tracing::debug!("Chatbot body rejected: {}", rejection.body_text());
            return Err(AppError::BadRequest(INVALID_CHATBOT_REQUEST.to_string()));
        }
    };

    let location = request.location.as_ref();
    tracing::info!(
        "Chatbot query: {:?} at ({:?}, {:?}), client time {:?}",
        request.user_query,
        location.and_then(|l| l.latitude),
        location.and_then(|l| l.longitude),
        request.timestamp
    );

    let delay = {
        let mut rng = rand::rng();
        chatbot::random_delay(
            state.config.chatbot_min_delay_ms,
            state.config.chatbot_max_delay_ms,
            &mut rng,
        )
    };
    tokio::time::sleep(delay).await;

    let response = {
        let mut rng = rand::rng();
        chatbot::respond(&request, Utc::now().date_naive(), &mut rng)
    };
    Ok(Json(response))
}

/// Rule-based assistant with a bounded conversation history.
#[utoipa::path(
    post,
    path = "/api/message",
    tag = "Chat",
    request_body = MessageRequest,
    responses(
        (status = 200, description = "Assistant reply", body = MessageResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
    )
)]
pub async fn message(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<MessageRequest>,
) -> Json<MessageResponse> {
    let text = request.text.unwrap_or_default();
    let text = text.trim();

    let reply = if text.is_empty() {
        assistant::EMPTY_MESSAGE_REPLY.to_string()
    } else {
        state.history.push(ChatRole::User, text).await;
        let reply = assistant::answer(text, &state.openweather).await;
        state.history.push(ChatRole::Ai, reply.clone()).await;
        reply
    };

    Json(MessageResponse {
        reply,
        status: "success".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Conversation history, oldest first.
#[utoipa::path(
    get,
    path = "/api/history",
    tag = "Chat",
    responses(
        (status = 200, description = "Retained messages", body = [ChatMessage]),
    )
)]
pub async fn history(State(state): State<AppState>) -> Json<Vec<ChatMessage>> {
    Json(state.history.recent().await)
}

/// Forget the conversation history.
#[utoipa::path(
    post,
    path = "/api/clear",
    tag = "Chat",
    responses(
        (status = 200, description = "History cleared", body = ClearResponse),
    )
)]
pub async fn clear(State(state): State<AppState>) -> Json<ClearResponse> {
    state.history.clear().await;
    tracing::debug!("Chat history cleared");
    Json(ClearResponse {
        message: HISTORY_CLEARED.to_string(),
    })
}
