use super::backend::{RecognitionEvent, RecognizerConfig, SpeechBackend};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::info;

/// Scripted speech backend fed from an external event channel
///
/// Each `start` call drains events from the shared source channel until an
/// `End` marker (or the source closes), so one script can drive several
/// consecutive recognition sessions. Used by tests to exercise the full
/// listening state machine without a speech engine.
pub struct ScriptedBackend {
    source: Arc<Mutex<mpsc::Receiver<RecognitionEvent>>>,
    listening: Arc<AtomicBool>,
    cancel: Option<oneshot::Sender<()>>,
}

impl ScriptedBackend {
    pub fn new(source: Arc<Mutex<mpsc::Receiver<RecognitionEvent>>>) -> Self {
        Self {
            source,
            listening: Arc::new(AtomicBool::new(false)),
            cancel: None,
        }
    }
}

#[async_trait::async_trait]
impl SpeechBackend for ScriptedBackend {
    async fn start(&mut self, config: &RecognizerConfig) -> Result<mpsc::Receiver<RecognitionEvent>> {
        info!("Starting scripted recognition session (lang={})", config.language);

        let (tx, rx) = mpsc::channel(8);
        let (cancel_tx, mut cancel_rx) = oneshot::channel();
        self.cancel = Some(cancel_tx);

        let source = Arc::clone(&self.source);
        let listening = Arc::clone(&self.listening);
        listening.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            let mut source = source.lock().await;

            loop {
                tokio::select! {
                    _ = &mut cancel_rx => break,
                    event = source.recv() => match event {
                        Some(RecognitionEvent::End) | None => break,
                        Some(event) => {
                            if tx.send(event).await.is_err() {
                                break;
                            }
                        }
                    },
                }
            }

            listening.store(false, Ordering::SeqCst);
            let _ = tx.send(RecognitionEvent::End).await;
        });

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        Ok(())
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
