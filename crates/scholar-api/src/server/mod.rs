//! HTTP server.
//!
//! [`ScholarServer`] is constructed explicitly with its search capability and
//! owns the router; there is no process-global application object.

pub mod handlers;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::client::{GoogleScholarClient, SearchCapability};

pub use handlers::{AppState, create_router};

/// Scholar lookup server.
pub struct ScholarServer {
    /// Search capability shared (read-only) by all requests.
    search: Arc<dyn SearchCapability>,
}

impl ScholarServer {
    /// Create a server around any search capability.
    #[must_use]
    pub fn new(search: Arc<dyn SearchCapability>) -> Self {
        Self { search }
    }

    /// Create a server backed by Google Scholar.
    #[must_use]
    pub fn with_client(client: GoogleScholarClient) -> Self {
        Self::new(Arc::new(client))
    }

    /// Build the router.
    #[must_use]
    pub fn router(&self) -> Router {
        create_router(Arc::clone(&self.search))
    }

    /// Bind `addr` and serve until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns error if binding fails or the server stops abnormally.
    pub async fn run_http(self, addr: SocketAddr) -> anyhow::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("HTTP server listening on http://{}", listener.local_addr()?);

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns error if the server stops abnormally.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router()).with_graceful_shutdown(shutdown).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for ScholarServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScholarServer").finish_non_exhaustive()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
