//! desk-mock: in-memory support desk backend
//!
//! Serves the same REST interface as the production backend from process
//! memory. Used by integration tests through [`MockBackend`] and runnable
//! standalone for local development.

pub mod api;
pub mod auth;
pub mod error;
pub mod state;

pub use error::{AppError, AppResult};
pub use state::{AppState, MockStore, demo};

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Default signing secret when none is configured
pub const DEFAULT_JWT_SECRET: &str = "desk-mock-development-secret-at-least-32-bytes";

/// A running mock server bound to an ephemeral local port
///
/// The server task is aborted on drop.
pub struct MockBackend {
    addr: SocketAddr,
    state: AppState,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Start with the demo accounts seeded.
    pub async fn spawn() -> std::io::Result<Self> {
        Self::spawn_with(AppState::new(MockStore::seed_demo(), DEFAULT_JWT_SECRET)).await
    }

    pub async fn spawn_with(state: AppState) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = api::router(state.clone());
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Mock server error: {e}");
            }
        });
        tracing::debug!(%addr, "Mock backend started");
        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// API base URL including the `/api` prefix
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Reject every token issued so far.
    pub fn revoke_sessions(&self) -> AppResult<()> {
        self.state.store()?.revoke_sessions();
        Ok(())
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
