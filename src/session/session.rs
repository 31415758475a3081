use super::config::SessionConfig;
use super::stats::SessionStats;
use crate::reply::ReplyPipeline;
use crate::speech::{RecognitionEvent, SpeechBackend, SpeechBackendFactory};
use crate::transcript::{Sender, Transcript, TranscriptEntry};
use anyhow::Result;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Events broadcast to attached views
///
/// Every transcript append made through the session is broadcast as a
/// `Message`, so a view that follows the stream always holds the newest
/// entry.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A new transcript entry was rendered
    Message(TranscriptEntry),
    /// The status line changed
    Status(String),
    /// Recognized speech was placed into the input draft
    Draft(String),
    /// A blocking notice to the user (e.g., capability missing)
    Notice(String),
}

/// Outcome of a voice toggle action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceToggle {
    /// A recognition session is now active
    Started,
    /// Cancellation of the active session was requested
    StopRequested,
    /// The capability is absent or failed to start; state is unchanged
    Unavailable(String),
}

/// A chat session that manages the transcript, the reply pipeline, and the
/// voice-input state machine
///
/// At most one recognition session is active at a time: toggling while
/// listening requests cancellation instead of starting a second session.
/// Concurrent text submissions are not serialized; each one independently
/// renders one user entry and exactly one bot entry.
pub struct ChatSession {
    /// Session configuration
    config: SessionConfig,

    /// When the session was created
    started_at: chrono::DateTime<Utc>,

    /// Append-only message log
    transcript: Arc<Mutex<Transcript>>,

    /// Request-retry-extract pipeline for bot replies
    pipeline: ReplyPipeline,

    /// Whether a recognition session is currently active
    listening: Arc<AtomicBool>,

    /// Handle to the active recognition backend, if any
    speech: Arc<Mutex<Option<Box<dyn SpeechBackend>>>>,

    /// Identity of the current recognition session; a session's event task
    /// may only touch the shared listening state while this still matches
    /// the generation it was spawned with
    voice_generation: Arc<AtomicU64>,

    /// Handle for the voice event-consuming task
    voice_task: Arc<Mutex<Option<JoinHandle<()>>>>,

    /// Recognized text awaiting submission (the "input field")
    draft: Arc<Mutex<Option<String>>>,

    /// Status line ("", "Thinking...", "Listening...", ...)
    status_tx: watch::Sender<String>,
    status_rx: watch::Receiver<String>,

    /// Event stream for attached views
    events: broadcast::Sender<SessionEvent>,
}

impl ChatSession {
    /// Create a new chat session
    pub fn new(config: SessionConfig) -> Result<Self> {
        info!("Creating chat session: {}", config.session_id);

        let pipeline = ReplyPipeline::new(config.inference.clone())?;

        let transcript = match &config.greeting {
            Some(greeting) => Transcript::with_greeting(greeting),
            None => Transcript::new(),
        };

        let (status_tx, status_rx) = watch::channel(String::new());
        let (events, _) = broadcast::channel(64);

        Ok(Self {
            config,
            started_at: Utc::now(),
            transcript: Arc::new(Mutex::new(transcript)),
            pipeline,
            listening: Arc::new(AtomicBool::new(false)),
            speech: Arc::new(Mutex::new(None)),
            voice_generation: Arc::new(AtomicU64::new(0)),
            voice_task: Arc::new(Mutex::new(None)),
            draft: Arc::new(Mutex::new(None)),
            status_tx,
            status_rx,
            events,
        })
    }

    /// Submit user text
    ///
    /// Empty or whitespace-only text is silently ignored: no entry, no
    /// network call, `None` returned. Otherwise the text is echoed as one
    /// user entry, the draft is cleared, and the reply pipeline renders
    /// exactly one bot entry whose text is returned.
    pub async fn submit(&self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let entry = self.transcript.lock().await.append(text, Sender::User);
        let _ = self.events.send(SessionEvent::Message(entry));

        // Submitting consumes the input draft
        self.draft.lock().await.take();

        set_status(&self.status_tx, &self.events, "Thinking...");

        let reply = self.pipeline.reply(text).await;

        let entry = self
            .transcript
            .lock()
            .await
            .append(reply.as_str(), Sender::Bot);
        let _ = self.events.send(SessionEvent::Message(entry));

        // Cleared regardless of success or synthetic error reply
        set_status(&self.status_tx, &self.events, "");

        Some(reply)
    }

    /// Toggle voice input
    ///
    /// Idle: starts a recognition session, or surfaces a blocking notice if
    /// the capability is absent (state unchanged). Listening: requests
    /// cancellation through the active handle; the session's own `End`
    /// event performs the reset, so no double-reset race exists.
    pub async fn toggle_voice(&self) -> VoiceToggle {
        if self.listening.load(Ordering::SeqCst) {
            let mut speech = self.speech.lock().await;
            if let Some(backend) = speech.as_mut() {
                if let Err(e) = backend.stop().await {
                    warn!("Failed to stop recognition session: {:#}", e);
                }
            }
            return VoiceToggle::StopRequested;
        }

        let mut backend = match SpeechBackendFactory::create(self.config.speech_source.clone()) {
            Ok(backend) => backend,
            Err(e) => return self.voice_unavailable(e),
        };

        let mut recognition_rx = match backend.start(&self.config.recognizer).await {
            Ok(rx) => rx,
            Err(e) => return self.voice_unavailable(e),
        };

        info!(
            "Recognition session started (backend={}, lang={})",
            backend.name(),
            self.config.recognizer.language
        );

        // This session's identity; a later toggle bumps the generation and
        // thereby fences off this session's trailing events.
        let generation = self.voice_generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.listening.store(true, Ordering::SeqCst);
        {
            let mut speech = self.speech.lock().await;
            *speech = Some(backend);
        }
        set_status(&self.status_tx, &self.events, "Listening...");

        // Consume recognition events until the session ends. Result, error,
        // and silent end all leave the listening flag at the baseline. Every
        // touch of the shared state is gated on the generation still being
        // ours: a result can drop the flag before the session's End arrives,
        // and a re-toggle in that window starts a new session whose state a
        // stale End must not clobber.
        let listening = Arc::clone(&self.listening);
        let speech = Arc::clone(&self.speech);
        let voice_generation = Arc::clone(&self.voice_generation);
        let draft = Arc::clone(&self.draft);
        let status_tx = self.status_tx.clone();
        let events = self.events.clone();

        let task = tokio::spawn(async move {
            while let Some(event) = recognition_rx.recv().await {
                if voice_generation.load(Ordering::SeqCst) != generation {
                    info!("Recognition session superseded, discarding trailing events");
                    return;
                }

                match event {
                    RecognitionEvent::Transcript { text } => {
                        info!("Recognized speech: {}", text);
                        *draft.lock().await = Some(text.clone());
                        let _ = events.send(SessionEvent::Draft(text.clone()));
                        set_status(&status_tx, &events, &format!("You said: {}", text));
                        listening.store(false, Ordering::SeqCst);
                    }
                    RecognitionEvent::Error { code } => {
                        warn!("Recognition error: {}", code);
                        set_status(&status_tx, &events, &format!("Mic error: {}", code));
                        listening.store(false, Ordering::SeqCst);
                    }
                    RecognitionEvent::End => break,
                }
            }

            // End of stream: reset to the non-listening baseline, unless a
            // newer session owns the shared state by now
            if voice_generation.load(Ordering::SeqCst) == generation {
                listening.store(false, Ordering::SeqCst);
                speech.lock().await.take();
            }
            info!("Recognition session ended");
        });

        {
            let mut handle = self.voice_task.lock().await;
            // A previous session's task can only be waiting on trailing
            // events it is fenced off from; don't let it linger
            if let Some(old) = handle.replace(task) {
                old.abort();
            }
        }

        VoiceToggle::Started
    }

    fn voice_unavailable(&self, e: anyhow::Error) -> VoiceToggle {
        warn!("Speech recognition unavailable: {:#}", e);
        let notice = e.to_string();
        let _ = self.events.send(SessionEvent::Notice(notice.clone()));
        VoiceToggle::Unavailable(notice)
    }

    /// Recognized text awaiting submission, if any
    pub async fn draft(&self) -> Option<String> {
        self.draft.lock().await.clone()
    }

    /// Snapshot of the transcript in append order
    pub async fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.lock().await.entries().to_vec()
    }

    /// Current status line
    pub fn status(&self) -> String {
        self.status_rx.borrow().clone()
    }

    /// Watch the status line for changes
    pub fn watch_status(&self) -> watch::Receiver<String> {
        self.status_tx.subscribe()
    }

    /// Whether a recognition session is currently active
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Session identifier
    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    /// Current session statistics
    pub async fn stats(&self) -> SessionStats {
        let duration = Utc::now().signed_duration_since(self.started_at);
        let message_count = self.transcript.lock().await.len();

        SessionStats {
            session_id: self.config.session_id.clone(),
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            message_count,
            listening: self.is_listening(),
        }
    }

    /// Wait for the active recognition session's event task to finish
    ///
    /// Used by callers that need the post-session state (tests, shutdown).
    pub async fn join_voice(&self) {
        let task = {
            let mut handle = self.voice_task.lock().await;
            handle.take()
        };
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("Voice task panicked: {}", e);
            }
        }
    }
}

/// Update the status line on both the watch channel and the event stream
fn set_status(
    status_tx: &watch::Sender<String>,
    events: &broadcast::Sender<SessionEvent>,
    text: &str,
) {
    let _ = status_tx.send(text.to_string());
    let _ = events.send(SessionEvent::Status(text.to_string()));
}
