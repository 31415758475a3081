//! Chat session management
//!
//! This module provides the `ChatSession` abstraction that manages:
//! - Text submission (trim, echo, reply pipeline, render)
//! - The voice-input state machine (idle <-> listening)
//! - The append-only transcript and its event stream
//! - The status line and session statistics

mod config;
mod session;
mod stats;

pub use config::SessionConfig;
pub use session::{ChatSession, SessionEvent, VoiceToggle};
pub use stats::SessionStats;
