pub mod config;
pub mod http;
pub mod reply;
pub mod session;
pub mod speech;
pub mod transcript;

pub use config::Config;
pub use http::{create_router, AppState};
pub use reply::{InferenceConfig, ReplyDecoder, ReplyPipeline, RequestShape, UNREACHABLE_REPLY};
pub use session::{ChatSession, SessionConfig, SessionEvent, SessionStats, VoiceToggle};
pub use speech::{
    RecognitionEvent, RecognizerConfig, SpeechBackend, SpeechBackendFactory, SpeechSource,
};
pub use transcript::{Sender, Transcript, TranscriptEntry};
