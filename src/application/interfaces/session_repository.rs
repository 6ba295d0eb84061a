use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DomainError, Session};

/// Shared handle to a stored session. Holding the lock for a whole
/// interaction serializes requests against the same session.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Keeps sessions alive between interactions of a front end that cannot hold
/// them itself (e.g. the web server, keyed by session id).
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, session: Session) -> Result<SessionHandle, DomainError>;

    /// Looks up a session and marks it as active.
    async fn find(&self, id: &str) -> Result<Option<SessionHandle>, DomainError>;

    /// Returns whether a session was removed.
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;

    /// Drops sessions untouched for longer than `max_idle`. Sessions with a
    /// request in flight are kept. Returns how many were dropped.
    async fn evict_idle(&self, max_idle: Duration) -> Result<usize, DomainError>;

    async fn count(&self) -> Result<usize, DomainError>;
}
