//! HTTP API server for external control (widget frontends)
//!
//! This module provides a REST API for driving chat sessions:
//! - POST /chats/start - Create a new chat session
//! - POST /chats/:id/message - Submit user text, get the bot reply
//! - POST /chats/:id/voice/toggle - Toggle voice input
//! - GET /chats/:id/transcript - Get the ordered transcript
//! - GET /chats/:id/status - Query session status
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
