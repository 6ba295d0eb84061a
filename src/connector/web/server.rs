use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::SessionRepository;
use crate::connector::api::Container;

use super::handlers::{
    create_session, delete_session, index, list_messages, reset_session, send_message,
};

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
const MIN_SWEEP_PERIOD: Duration = Duration::from_secs(1);

/// Browser chat front end. Each page load opens its own session; sessions
/// whose page has gone away are evicted once idle for `idle_timeout`.
pub struct WebServer {
    container: Arc<Container>,
    addr: SocketAddr,
    idle_timeout: Duration,
}

impl WebServer {
    pub fn new(container: Arc<Container>, port: u16, public: bool) -> Self {
        let host = if public { [0, 0, 0, 0] } else { [127, 0, 0, 1] };
        Self {
            container,
            addr: SocketAddr::from((host, port)),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/api/sessions", post(create_session))
            .route(
                "/api/sessions/{id}",
                axum::routing::delete(delete_session),
            )
            .route(
                "/api/sessions/{id}/messages",
                get(list_messages).post(send_message),
            )
            .route("/api/sessions/{id}/reset", post(reset_session))
            .with_state(self.container.clone())
    }

    /// Serve until Ctrl-C.
    pub async fn run(&self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!("Chat UI listening on http://{}", listener.local_addr()?);

        let sweeper = spawn_idle_sweeper(self.container.session_repository(), self.idle_timeout);

        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await;
        sweeper.abort();
        served?;

        info!("Chat UI stopped");
        Ok(())
    }
}

/// Periodically drops sessions that have not been touched for `idle_timeout`.
pub fn spawn_idle_sweeper(
    repo: Arc<dyn SessionRepository>,
    idle_timeout: Duration,
) -> JoinHandle<()> {
    let period = (idle_timeout / 4).max(MIN_SWEEP_PERIOD);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match repo.evict_idle(idle_timeout).await {
                Ok(0) => {}
                Ok(evicted) => {
                    let remaining = repo.count().await.unwrap_or_default();
                    info!("Evicted {evicted} idle session(s), {remaining} active");
                }
                Err(e) => warn!("Idle session sweep failed: {}", e),
            }
            debug!("Idle session sweep done");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::api::ContainerConfig;
    use crate::connector::MockCompletionClient;

    fn container() -> Arc<Container> {
        Arc::new(Container::with_client(
            ContainerConfig::default(),
            Arc::new(MockCompletionClient::echo()),
        ))
    }

    #[test]
    fn binds_loopback_unless_public() {
        assert_eq!(
            WebServer::new(container(), 8080, false).addr().to_string(),
            "127.0.0.1:8080"
        );
        assert_eq!(
            WebServer::new(container(), 9000, true).addr().to_string(),
            "0.0.0.0:9000"
        );
    }

    #[tokio::test]
    async fn sweeper_evicts_abandoned_sessions() {
        let container = container();
        let repo = container.session_repository();
        for _ in 0..5 {
            repo.insert(container.new_session()).await.unwrap();
        }

        let sweeper = spawn_idle_sweeper(repo.clone(), Duration::from_millis(100));
        // The first tick fires immediately, before anything is idle.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(repo.count().await.unwrap(), 5);

        // The next tick runs after MIN_SWEEP_PERIOD.
        tokio::time::sleep(Duration::from_millis(1300)).await;
        sweeper.abort();

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[test]
    fn default_idle_timeout_is_applied() {
        let server = WebServer::new(container(), 8080, false);
        assert_eq!(server.idle_timeout(), DEFAULT_IDLE_TIMEOUT);
        let server = server.with_idle_timeout(Duration::from_secs(60));
        assert_eq!(server.idle_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn router_builds() {
        let _router = WebServer::new(container(), 0, false).router();
    }
}
