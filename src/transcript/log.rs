use super::entry::{Sender, TranscriptEntry};
use chrono::Utc;

/// Append-only, ordered log of chat messages
///
/// There is deliberately no edit or removal operation: one `append` call
/// produces exactly one new entry, and entries appear in call order.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transcript seeded with a single bot greeting
    pub fn with_greeting(greeting: &str) -> Self {
        let mut transcript = Self::new();
        transcript.append(greeting, Sender::Bot);
        transcript
    }

    /// Append one entry and return a copy of it
    pub fn append(&mut self, text: impl Into<String>, sender: Sender) -> TranscriptEntry {
        let entry = TranscriptEntry {
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        };
        self.entries.push(entry.clone());
        entry
    }

    /// All entries in append order
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript has no entries yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
