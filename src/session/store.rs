use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::state::NoteSession;

pub type SharedSession = Arc<Mutex<NoteSession>>;

const SESSION_TIME_TO_IDLE: Duration = Duration::from_secs(60 * 60);
const MAX_SESSIONS: u64 = 10_000;

/// In-memory session registry. Idle sessions expire; all are lost on restart.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, SharedSession>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SESSION_TIME_TO_IDLE, MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new(time_to_idle: Duration, max_capacity: u64) -> Self {
        let sessions = Cache::builder()
            .time_to_idle(time_to_idle)
            .max_capacity(max_capacity)
            .build();
        Self { sessions }
    }

    pub async fn create(&self) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(NoteSession::new()));
        self.sessions.insert(id, session.clone()).await;
        log::debug!("Created session {}", id);
        (id, session)
    }

    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.get(id).await
    }

    pub async fn remove(&self, id: &Uuid) {
        self.sessions.invalidate(id).await;
    }
}
