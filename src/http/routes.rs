use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session control
        .route("/chats/start", post(handlers::start_chat))
        .route("/chats/:chat_id/message", post(handlers::send_message))
        .route(
            "/chats/:chat_id/voice/toggle",
            post(handlers::toggle_voice),
        )
        // Session queries
        .route(
            "/chats/:chat_id/transcript",
            get(handlers::get_transcript),
        )
        .route("/chats/:chat_id/status", get(handlers::get_status))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
