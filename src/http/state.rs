use crate::config::Config;
use crate::session::ChatSession;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Active chat sessions (chat_id -> session)
    pub sessions: Arc<RwLock<HashMap<String, Arc<ChatSession>>>>,

    /// Service configuration new sessions are built from
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config: Arc::new(config),
        }
    }
}
