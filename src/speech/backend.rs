use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// One event out of an active recognition session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// A finalized (non-interim) transcript
    Transcript { text: String },
    /// Recognition failed; `code` is the backend's error code
    Error { code: String },
    /// The session ended; always the last event of a session
    End,
}

/// Configuration for one recognition session
#[derive(Debug, Clone)]
pub struct RecognizerConfig {
    /// BCP-47 language tag
    pub language: String,
    /// Whether interim (non-final) results are delivered
    pub interim_results: bool,
    /// Number of alternatives requested per result
    pub max_alternatives: u8,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            interim_results: false,
            max_alternatives: 1,
        }
    }
}

/// Speech-recognition backend trait
///
/// One backend instance drives at most one recognition session at a time.
/// `start` yields the session's event stream; the stream always terminates
/// with [`RecognitionEvent::End`], including after `stop` is requested, so
/// consumers have a single reset path.
#[async_trait::async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Begin a recognition session
    ///
    /// Returns a channel receiver that will receive recognition events.
    async fn start(&mut self, config: &RecognizerConfig) -> Result<mpsc::Receiver<RecognitionEvent>>;

    /// Request cancellation of the active session
    ///
    /// The session's own `End` event still fires on the stream returned by
    /// `start`; `stop` never performs the reset itself.
    async fn stop(&mut self) -> Result<()>;

    /// Whether a session is currently active
    fn is_listening(&self) -> bool;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Recognition source type
#[derive(Debug, Clone)]
pub enum SpeechSource {
    /// Platform speech engine (unavailable in this build)
    Native,
    /// Read one line of text from a file (demos / batch runs)
    Fixture(PathBuf),
    /// Scripted events fed by the given channel (tests)
    Scripted(Arc<Mutex<mpsc::Receiver<RecognitionEvent>>>),
}

/// Speech backend factory
pub struct SpeechBackendFactory;

impl SpeechBackendFactory {
    /// Create a backend for the given source
    ///
    /// An `Err` here is the capability-missing condition: no state changes,
    /// the caller surfaces a blocking notice.
    pub fn create(source: SpeechSource) -> Result<Box<dyn SpeechBackend>> {
        match source {
            SpeechSource::Native => {
                anyhow::bail!("Speech recognition is not available on this system")
            }
            SpeechSource::Fixture(path) => Ok(Box::new(super::FixtureBackend::new(path))),
            SpeechSource::Scripted(events) => Ok(Box::new(super::ScriptedBackend::new(events))),
        }
    }
}
