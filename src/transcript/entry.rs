use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The human side of the conversation
    User,
    /// The inference service's reply (including synthetic error replies)
    Bot,
}

/// A single message in the chat transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Message text as rendered
    pub text: String,

    /// Which side of the conversation produced it
    pub sender: Sender,

    /// When the entry was appended
    pub timestamp: DateTime<Utc>,
}
