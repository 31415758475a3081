//! Chat transcript data model
//!
//! The transcript is the only durable entity of a chat session: an
//! append-only, ordered log of user and bot messages. Entries are never
//! edited, reordered, or removed, and the log lives only as long as the
//! session that owns it.

mod entry;
mod log;

pub use entry::{Sender, TranscriptEntry};
pub use log::Transcript;
