// Integration tests for the chat session controller
//
// Covers the submission contract (one user entry then exactly one bot entry,
// empty input dropped), the voice state machine (capability missing, result,
// error, silent end, cancellation), and the status line transitions.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use voxchat::{
    ChatSession, InferenceConfig, RecognitionEvent, Sender, SessionConfig, SpeechSource,
    UNREACHABLE_REPLY,
};

async fn echo_generate(
    State(calls): State<Arc<AtomicUsize>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    calls.fetch_add(1, Ordering::SeqCst);
    let text = body["inputs"].as_str().unwrap_or("").to_string();
    Json(json!({ "generated_text": format!("you said {}", text) }))
}

/// Serve a mock inference endpoint that echoes the input back
async fn serve_echo() -> (SocketAddr, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/generate", post(echo_generate))
        .with_state(Arc::clone(&calls));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (addr, calls)
}

fn session_config(addr: SocketAddr, speech_source: SpeechSource) -> SessionConfig {
    SessionConfig {
        inference: InferenceConfig {
            url: format!("http://{}/generate", addr),
            backoff: Duration::from_millis(10),
            request_timeout: Duration::from_secs(5),
            ..InferenceConfig::default()
        },
        speech_source,
        ..SessionConfig::default()
    }
}

async fn wait_until<F: Fn() -> bool>(condition: F, what: &str) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("timed out waiting for {}", what);
}

fn scripted_source(events: Vec<RecognitionEvent>) -> SpeechSource {
    let (tx, rx) = mpsc::channel(16);
    for event in events {
        tx.try_send(event).unwrap();
    }
    drop(tx);
    SpeechSource::Scripted(Arc::new(Mutex::new(rx)))
}

#[tokio::test]
async fn test_submit_renders_one_user_and_one_bot_entry() {
    let (addr, calls) = serve_echo().await;
    let session = ChatSession::new(session_config(addr, SpeechSource::Native)).unwrap();

    let reply = session.submit("hello").await;

    assert_eq!(reply, Some("you said hello".to_string()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let transcript = session.transcript().await;
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].sender, Sender::User);
    assert_eq!(transcript[0].text, "hello");
    assert_eq!(transcript[1].sender, Sender::Bot);
    assert_eq!(transcript[1].text, "you said hello");
}

#[tokio::test]
async fn test_submitted_text_is_trimmed() {
    let (addr, _calls) = serve_echo().await;
    let session = ChatSession::new(session_config(addr, SpeechSource::Native)).unwrap();

    session.submit("  hello  ").await;

    let transcript = session.transcript().await;
    assert_eq!(transcript[0].text, "hello");
}

#[tokio::test]
async fn test_empty_input_is_silently_dropped() {
    let (addr, calls) = serve_echo().await;
    let session = ChatSession::new(session_config(addr, SpeechSource::Native)).unwrap();

    assert_eq!(session.submit("").await, None);
    assert_eq!(session.submit("   \t\n").await, None);

    assert!(session.transcript().await.is_empty(), "no entries rendered");
    assert_eq!(calls.load(Ordering::SeqCst), 0, "no network call issued");
}

#[tokio::test]
async fn test_status_is_cleared_after_reply() {
    let (addr, _calls) = serve_echo().await;
    let session = ChatSession::new(session_config(addr, SpeechSource::Native)).unwrap();

    session.submit("hello").await;

    assert_eq!(session.status(), "");
}

#[tokio::test]
async fn test_unreachable_endpoint_yields_one_synthetic_bot_entry() {
    let config = SessionConfig {
        inference: InferenceConfig {
            url: "http://127.0.0.1:1/generate".to_string(),
            backoff: Duration::from_millis(10),
            request_timeout: Duration::from_secs(1),
            ..InferenceConfig::default()
        },
        ..SessionConfig::default()
    };
    let session = ChatSession::new(config).unwrap();

    let reply = session.submit("hello").await;

    assert_eq!(reply, Some(UNREACHABLE_REPLY.to_string()));

    let transcript = session.transcript().await;
    assert_eq!(transcript.len(), 2, "exactly one bot entry, even on failure");
    assert_eq!(transcript[1].sender, Sender::Bot);
    assert_eq!(transcript[1].text, UNREACHABLE_REPLY);
    assert_eq!(session.status(), "", "status cleared after the error reply");
}

#[tokio::test]
async fn test_greeting_seeds_the_transcript() {
    let (addr, _calls) = serve_echo().await;
    let config = SessionConfig {
        greeting: Some("Hi! How can I help?".to_string()),
        ..session_config(addr, SpeechSource::Native)
    };
    let session = ChatSession::new(config).unwrap();

    let transcript = session.transcript().await;
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].sender, Sender::Bot);
}

#[tokio::test]
async fn test_voice_toggle_without_capability() {
    let (addr, calls) = serve_echo().await;
    let session = ChatSession::new(session_config(addr, SpeechSource::Native)).unwrap();

    let outcome = session.toggle_voice().await;

    assert!(matches!(outcome, voxchat::VoiceToggle::Unavailable(_)));
    assert!(!session.is_listening(), "state unchanged");
    assert!(session.transcript().await.is_empty(), "no transcript side effects");
    assert_eq!(calls.load(Ordering::SeqCst), 0, "no network side effects");
}

#[tokio::test]
async fn test_voice_result_lands_in_draft() {
    let (addr, _calls) = serve_echo().await;
    let source = scripted_source(vec![
        RecognitionEvent::Transcript {
            text: "turn on the lights".to_string(),
        },
        RecognitionEvent::End,
    ]);
    let session = ChatSession::new(session_config(addr, source)).unwrap();

    let outcome = session.toggle_voice().await;
    assert_eq!(outcome, voxchat::VoiceToggle::Started);

    session.join_voice().await;

    assert!(!session.is_listening(), "reset to the non-listening baseline");
    assert_eq!(session.draft().await, Some("turn on the lights".to_string()));
    assert_eq!(session.status(), "You said: turn on the lights");
    assert!(session.transcript().await.is_empty(), "recognition does not submit");
}

#[tokio::test]
async fn test_voice_error_shows_mic_error_status() {
    let (addr, _calls) = serve_echo().await;
    let source = scripted_source(vec![
        RecognitionEvent::Error {
            code: "no-speech".to_string(),
        },
        RecognitionEvent::End,
    ]);
    let session = ChatSession::new(session_config(addr, source)).unwrap();

    session.toggle_voice().await;
    session.join_voice().await;

    assert!(!session.is_listening());
    assert_eq!(session.status(), "Mic error: no-speech");
    assert_eq!(session.draft().await, None);
}

#[tokio::test]
async fn test_voice_session_ending_without_result_resets_flag() {
    let (addr, _calls) = serve_echo().await;
    let source = scripted_source(vec![RecognitionEvent::End]);
    let session = ChatSession::new(session_config(addr, source)).unwrap();

    session.toggle_voice().await;
    session.join_voice().await;

    assert!(!session.is_listening());
    assert_eq!(session.draft().await, None);
}

#[tokio::test]
async fn test_retoggle_cancels_the_active_session() {
    let (addr, _calls) = serve_echo().await;

    // A source that never produces events; only cancellation ends it
    let (_tx, rx) = mpsc::channel::<RecognitionEvent>(1);
    let source = SpeechSource::Scripted(Arc::new(Mutex::new(rx)));
    let session = ChatSession::new(session_config(addr, source)).unwrap();

    assert_eq!(session.toggle_voice().await, voxchat::VoiceToggle::Started);
    assert!(session.is_listening());
    assert_eq!(session.status(), "Listening...");

    let outcome = session.toggle_voice().await;
    assert_eq!(outcome, voxchat::VoiceToggle::StopRequested);

    session.join_voice().await;
    assert!(!session.is_listening(), "End event performed the reset");
}

#[tokio::test]
async fn test_stale_end_does_not_clobber_a_new_session() {
    let (addr, _calls) = serve_echo().await;

    // Events delivered by hand so the End of the first session can arrive
    // after a second one has started
    let (tx, rx) = mpsc::channel::<RecognitionEvent>(4);
    let source = SpeechSource::Scripted(Arc::new(Mutex::new(rx)));
    let session = ChatSession::new(session_config(addr, source)).unwrap();

    // First session: a result drops the listening flag before End arrives
    assert_eq!(session.toggle_voice().await, voxchat::VoiceToggle::Started);
    tx.send(RecognitionEvent::Transcript {
        text: "first".to_string(),
    })
    .await
    .unwrap();
    wait_until(|| !session.is_listening(), "the first result to be processed").await;

    // Re-toggling in the result-to-End window starts a second session
    assert_eq!(session.toggle_voice().await, voxchat::VoiceToggle::Started);
    assert!(session.is_listening());

    // The first session's End is still in flight; it must not reset the
    // second session's listening state or steal its backend handle
    tx.send(RecognitionEvent::End).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(
        session.is_listening(),
        "only one recognition session may own the listening state"
    );

    // The second session is still cancellable through its own handle
    assert_eq!(
        session.toggle_voice().await,
        voxchat::VoiceToggle::StopRequested
    );
    session.join_voice().await;
    assert!(!session.is_listening());
}

#[tokio::test]
async fn test_submit_clears_the_draft() {
    let (addr, _calls) = serve_echo().await;
    let source = scripted_source(vec![
        RecognitionEvent::Transcript {
            text: "what time is it".to_string(),
        },
        RecognitionEvent::End,
    ]);
    let session = ChatSession::new(session_config(addr, source)).unwrap();

    session.toggle_voice().await;
    session.join_voice().await;
    let draft = session.draft().await.unwrap();

    session.submit(&draft).await;

    assert_eq!(session.draft().await, None);
    assert_eq!(session.transcript().await.len(), 2);
}

#[tokio::test]
async fn test_stats_reflect_transcript_and_listening_state() {
    let (addr, _calls) = serve_echo().await;
    let session = ChatSession::new(session_config(addr, SpeechSource::Native)).unwrap();

    session.submit("hello").await;
    let stats = session.stats().await;

    assert_eq!(stats.message_count, 2);
    assert!(!stats.listening);
    assert!(stats.duration_secs >= 0.0);
}
