use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::{SessionHandle, SessionRepository};
use crate::domain::{DomainError, Session};

struct Entry {
    session: SessionHandle,
    last_access: Instant,
}

/// Process-local session storage. Everything is lost on restart.
pub struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<String, Entry>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert(&self, session: Session) -> Result<SessionHandle, DomainError> {
        let mut sessions = self.sessions.lock().await;
        debug!("Storing session {}", session.id());
        let id = session.id().to_string();
        let handle = Arc::new(Mutex::new(session));
        sessions.insert(
            id,
            Entry {
                session: handle.clone(),
                last_access: Instant::now(),
            },
        );
        Ok(handle)
    }

    async fn find(&self, id: &str) -> Result<Option<SessionHandle>, DomainError> {
        let mut sessions = self.sessions.lock().await;
        Ok(sessions.get_mut(id).map(|entry| {
            entry.last_access = Instant::now();
            entry.session.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut sessions = self.sessions.lock().await;
        let removed = sessions.remove(id).is_some();
        if removed {
            debug!("Dropped session {}", id);
        }
        Ok(removed)
    }

    async fn evict_idle(&self, max_idle: Duration) -> Result<usize, DomainError> {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            // A held lock means a request is still running against it.
            let busy = entry.session.try_lock().is_err();
            let keep = busy || entry.last_access.elapsed() <= max_idle;
            if !keep {
                debug!("Evicting idle session {}", id);
            }
            keep
        });
        Ok(before - sessions.len())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.sessions.lock().await.len())
    }
}
