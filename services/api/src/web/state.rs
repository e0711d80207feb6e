//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the registry of open study sessions.

use crate::config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;
use vocabulary_core::ports::{ItemStore, TranslationService};
use vocabulary_core::session::StudySession;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
    pub translator: Arc<dyn TranslationService>,
    pub config: Arc<Config>,
    /// Open study sessions. Every response is written to the store as it
    /// happens, so losing this map on restart loses only queue positions.
    /// The map lock is only held to look a session up; each session has its own.
    sessions: Mutex<HashMap<Uuid, Arc<Mutex<StudySession>>>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ItemStore>,
        translator: Arc<dyn TranslationService>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            store,
            translator,
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub async fn insert_session(&self, session_id: Uuid, session: StudySession) {
        self.sessions
            .lock()
            .await
            .insert(session_id, Arc::new(Mutex::new(session)));
    }

    pub async fn session(&self, session_id: Uuid) -> Option<Arc<Mutex<StudySession>>> {
        self.sessions.lock().await.get(&session_id).cloned()
    }
}
