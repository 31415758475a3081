use super::backend::{RecognitionEvent, RecognizerConfig, SpeechBackend};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// File-driven speech backend
///
/// "Recognizes" the first non-empty line of a text file as one finalized
/// transcript, then ends the session. A read failure surfaces as a
/// recognition error with code `audio-capture`, matching how an engine
/// reports an unusable input device.
pub struct FixtureBackend {
    path: PathBuf,
    listening: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
}

impl FixtureBackend {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            listening: Arc::new(AtomicBool::new(false)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait::async_trait]
impl SpeechBackend for FixtureBackend {
    async fn start(&mut self, config: &RecognizerConfig) -> Result<mpsc::Receiver<RecognitionEvent>> {
        info!(
            "Starting fixture recognition from {:?} (lang={})",
            self.path, config.language
        );

        let (tx, rx) = mpsc::channel(4);
        let path = self.path.clone();
        let listening = Arc::clone(&self.listening);
        let cancelled = Arc::clone(&self.cancelled);

        listening.store(true, Ordering::SeqCst);
        cancelled.store(false, Ordering::SeqCst);

        tokio::spawn(async move {
            let event = match tokio::fs::read_to_string(&path).await {
                Ok(contents) => contents
                    .lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .map(|line| RecognitionEvent::Transcript {
                        text: line.to_string(),
                    }),
                Err(_) => Some(RecognitionEvent::Error {
                    code: "audio-capture".to_string(),
                }),
            };

            // A cancelled session ends without a result; an empty file is
            // the no-speech case and also ends silently.
            if !cancelled.load(Ordering::SeqCst) {
                if let Some(event) = event {
                    let _ = tx.send(event).await;
                }
            }

            listening.store(false, Ordering::SeqCst);
            let _ = tx.send(RecognitionEvent::End).await;
        });

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.cancelled.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "fixture"
    }
}
