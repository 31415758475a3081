// Unit tests for the transcript data model
//
// The transcript is append-only: one append call produces exactly one new
// entry, entries appear in call order, and no edit/removal API exists.

use voxchat::{Sender, Transcript};

#[test]
fn test_transcript_starts_empty() {
    let transcript = Transcript::new();

    assert!(transcript.is_empty());
    assert_eq!(transcript.len(), 0);
}

#[test]
fn test_transcript_greeting_seed() {
    let transcript = Transcript::with_greeting("Hi! How can I help?");

    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript.entries()[0].sender, Sender::Bot);
    assert_eq!(transcript.entries()[0].text, "Hi! How can I help?");
}

#[test]
fn test_append_returns_the_new_entry() {
    let mut transcript = Transcript::new();

    let entry = transcript.append("hello", Sender::User);

    assert_eq!(entry.text, "hello");
    assert_eq!(entry.sender, Sender::User);
    assert_eq!(transcript.len(), 1);
}

#[test]
fn test_entries_preserve_call_order() {
    let mut transcript = Transcript::new();

    transcript.append("first", Sender::User);
    transcript.append("second", Sender::Bot);
    transcript.append("third", Sender::User);

    let texts: Vec<&str> = transcript
        .entries()
        .iter()
        .map(|e| e.text.as_str())
        .collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[test]
fn test_sender_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
    assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
}

#[test]
fn test_entry_round_trips_through_json() {
    let mut transcript = Transcript::new();
    let entry = transcript.append("hello there", Sender::Bot);

    let json = serde_json::to_string(&entry).unwrap();
    let parsed: voxchat::TranscriptEntry = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.text, entry.text);
    assert_eq!(parsed.sender, entry.sender);
}
