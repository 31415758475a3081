use super::state::AppState;
use crate::session::{ChatSession, SessionConfig, SessionStats, VoiceToggle};
use crate::transcript::TranscriptEntry;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartChatRequest {
    /// Optional chat ID (if not provided, generate UUID)
    pub chat_id: Option<String>,

    /// Optional greeting overriding the configured one
    pub greeting: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartChatResponse {
    pub chat_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub chat_id: String,

    /// The rendered bot reply; `null` when the input was empty and ignored
    pub reply: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ToggleVoiceResponse {
    pub chat_id: String,
    pub listening: bool,
    pub status_line: String,
}

#[derive(Debug, Serialize)]
pub struct ChatStatusResponse {
    #[serde(flatten)]
    pub stats: SessionStats,
    pub status_line: String,
    pub draft: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /chats/start
/// Create a new chat session
pub async fn start_chat(
    State(state): State<AppState>,
    Json(req): Json<StartChatRequest>,
) -> impl IntoResponse {
    // Generate or use provided chat ID
    let chat_id = req
        .chat_id
        .unwrap_or_else(|| format!("chat-{}", uuid::Uuid::new_v4()));

    info!("Starting chat session: {}", chat_id);

    // Check for an existing session under this ID
    {
        let sessions = state.sessions.read().await;
        if sessions.contains_key(&chat_id) {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("Chat {} already exists", chat_id),
                }),
            )
                .into_response();
        }
    }

    let speech_source = match state.config.speech_source() {
        Ok(source) => source,
        Err(e) => {
            error!("Invalid speech configuration: {:#}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Invalid speech configuration: {}", e),
                }),
            )
                .into_response();
        }
    };

    let config = SessionConfig {
        session_id: chat_id.clone(),
        greeting: req.greeting.or_else(|| state.config.chat.greeting.clone()),
        inference: state.config.inference_config(),
        recognizer: state.config.recognizer_config(),
        speech_source,
    };

    let session = match ChatSession::new(config) {
        Ok(session) => Arc::new(session),
        Err(e) => {
            error!("Failed to create session: {:#}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to create session: {}", e),
                }),
            )
                .into_response();
        }
    };

    // Store session
    {
        let mut sessions = state.sessions.write().await;
        sessions.insert(chat_id.clone(), session);
    }

    info!("Chat session created: {}", chat_id);

    (
        StatusCode::OK,
        Json(StartChatResponse {
            chat_id: chat_id.clone(),
            status: "ready".to_string(),
            message: format!("Chat {} created", chat_id),
        }),
    )
        .into_response()
}

/// POST /chats/:chat_id/message
/// Submit user text and return the rendered bot reply
pub async fn send_message(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> impl IntoResponse {
    let session = {
        let sessions = state.sessions.read().await;
        sessions.get(&chat_id).cloned()
    };

    match session {
        Some(session) => {
            let reply = session.submit(&req.text).await;
            (
                StatusCode::OK,
                Json(SendMessageResponse { chat_id, reply }),
            )
                .into_response()
        }
        None => chat_not_found(&chat_id),
    }
}

/// POST /chats/:chat_id/voice/toggle
/// Toggle the voice-input state machine
pub async fn toggle_voice(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> impl IntoResponse {
    let session = {
        let sessions = state.sessions.read().await;
        sessions.get(&chat_id).cloned()
    };

    match session {
        Some(session) => match session.toggle_voice().await {
            VoiceToggle::Started | VoiceToggle::StopRequested => (
                StatusCode::OK,
                Json(ToggleVoiceResponse {
                    chat_id,
                    listening: session.is_listening(),
                    status_line: session.status(),
                }),
            )
                .into_response(),
            VoiceToggle::Unavailable(notice) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse { error: notice }),
            )
                .into_response(),
        },
        None => chat_not_found(&chat_id),
    }
}

/// GET /chats/:chat_id/transcript
/// Get the transcript in append order
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> impl IntoResponse {
    let session = {
        let sessions = state.sessions.read().await;
        sessions.get(&chat_id).cloned()
    };

    match session {
        Some(session) => {
            let transcript: Vec<TranscriptEntry> = session.transcript().await;
            (StatusCode::OK, Json(transcript)).into_response()
        }
        None => chat_not_found(&chat_id),
    }
}

/// GET /chats/:chat_id/status
/// Get session statistics, the status line, and any pending draft
pub async fn get_status(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> impl IntoResponse {
    let session = {
        let sessions = state.sessions.read().await;
        sessions.get(&chat_id).cloned()
    };

    match session {
        Some(session) => {
            let stats = session.stats().await;
            (
                StatusCode::OK,
                Json(ChatStatusResponse {
                    stats,
                    status_line: session.status(),
                    draft: session.draft().await,
                }),
            )
                .into_response()
        }
        None => chat_not_found(&chat_id),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn chat_not_found(chat_id: &str) -> axum::response::Response {
    error!("Chat {} not found", chat_id);
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Chat {} not found", chat_id),
        }),
    )
        .into_response()
}
