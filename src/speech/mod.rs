//! Speech-recognition capability
//!
//! A recognition session is one activation of a speech-to-text backend,
//! bounded by start/result/error/end events. The backend is a trait object
//! behind a factory so the session controller never depends on a concrete
//! engine:
//! - `Native`: the platform speech engine (not linked in this build; the
//!   factory reports the capability as unavailable)
//! - `Fixture`: reads one line from a text file and emits it as the final
//!   transcript (for demos and batch runs)
//! - `Scripted`: events fed from a channel (for tests)

mod backend;
mod fixture;
mod scripted;

pub use backend::{
    RecognitionEvent, RecognizerConfig, SpeechBackend, SpeechBackendFactory, SpeechSource,
};
pub use fixture::FixtureBackend;
pub use scripted::ScriptedBackend;
