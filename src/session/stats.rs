use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics about a chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Session identifier
    pub session_id: String,

    /// When the session was created
    pub started_at: DateTime<Utc>,

    /// Total session age in seconds
    pub duration_secs: f64,

    /// Number of transcript entries (user and bot)
    pub message_count: usize,

    /// Whether a recognition session is currently active
    pub listening: bool,
}
