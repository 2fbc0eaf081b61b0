use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use futures_channel::mpsc::UnboundedSender;
use tungstenite::protocol::Message;

use crate::{config::ServerConfig, quiz::session::QuizSession, storage::result_store::ResultStore};

pub type Tx = UnboundedSender<Message>;
pub type PeerMap = Arc<Mutex<HashMap<String, Tx>>>;
pub type SharedSession = Arc<Mutex<QuizSession>>;
pub type SessionList = Arc<Mutex<HashMap<String, SessionEntry>>>;

/// A running session and the connection currently driving it.
#[derive(Clone)]
pub struct SessionEntry {
    pub session: SharedSession,
    pub connection_id: String,
}

/// Everything the handlers share.
#[derive(Clone)]
pub struct Lists {
    pub peers: PeerMap,
    pub sessions: SessionList,
    pub store: Arc<dyn ResultStore>,
    pub config: Arc<ServerConfig>,
}

impl Lists {
    pub fn new(store: Arc<dyn ResultStore>, config: ServerConfig) -> Lists {
        Lists {
            peers: PeerMap::new(Mutex::new(HashMap::new())),
            sessions: SessionList::new(Mutex::new(HashMap::new())),
            store,
            config: Arc::new(config),
        }
    }

    pub fn session_entry(&self, session_id: &str) -> Option<SessionEntry> {
        self.sessions
            .lock()
            .ok()
            .and_then(|sessions| sessions.get(session_id).cloned())
    }

    /// Sessions bound to `connection_id`.
    pub fn sessions_of(&self, connection_id: &str) -> Vec<String> {
        match self.sessions.lock() {
            Ok(sessions) => sessions
                .iter()
                .filter(|(_, entry)| entry.connection_id == connection_id)
                .map(|(id, _)| id.clone())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn remove_session(&self, session_id: &str) -> Option<SessionEntry> {
        self.sessions
            .lock()
            .ok()
            .and_then(|mut sessions| sessions.remove(session_id))
    }
}
