use crate::reply::InferenceConfig;
use crate::speech::{RecognizerConfig, SpeechSource};

/// Configuration for a chat session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "chat-2026-08-28-support")
    pub session_id: String,

    /// Optional bot greeting seeded into the transcript at creation
    pub greeting: Option<String>,

    /// Inference endpoint and retry policy for the reply pipeline
    pub inference: InferenceConfig,

    /// Recognition session settings (language, one final result)
    pub recognizer: RecognizerConfig,

    /// Where voice input comes from
    pub speech_source: SpeechSource,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("chat-{}", uuid::Uuid::new_v4()),
            greeting: None,
            inference: InferenceConfig::default(),
            recognizer: RecognizerConfig::default(),
            speech_source: SpeechSource::Native,
        }
    }
}
