//! HTTP API Adapter
//!
//! Serves the simulator and listing use cases over axum 0.7, plus the
//! liveness, readiness and Prometheus endpoints.
//!
//! Sub-modules:
//! - `error`: `ServiceError` to status code mapping
//! - `routes`: router and handlers
//!
//! The API server is the whole service: if it stops on its own (bind
//! failure, accept error), `serve_until` returns an error so the process
//! exits and can be restarted.

pub mod error;
pub mod routes;

use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use crate::ports::listing_store::ListingStore;

pub use error::ApiError;
pub use routes::{AppState, router};

/// Time allowed for in-flight requests after shutdown is requested.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Axum HTTP server for the simulator API.
pub struct ApiServer<S: ListingStore> {
    /// Handler state shared by every route.
    state: AppState<S>,
    /// Socket address, e.g. `0.0.0.0:8080`.
    bind_address: String,
}

impl<S: ListingStore> ApiServer<S> {
    pub const fn new(state: AppState<S>, bind_address: String) -> Self {
        Self {
            state,
            bind_address,
        }
    }

    /// Serve until a shutdown signal is broadcast.
    #[instrument(skip(self, shutdown_rx), fields(address = %self.bind_address))]
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let app = router(self.state);
        let listener = tokio::net::TcpListener::bind(&self.bind_address).await?;

        info!(address = %self.bind_address, "API server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }

    /// Serve until `shutdown` resolves, then stop gracefully.
    ///
    /// Returns an error if the server stops before `shutdown` does.
    pub async fn serve_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
        let mut handle = tokio::spawn(self.run(shutdown_rx));

        let stopped_early = tokio::select! {
            () = shutdown => None,
            joined = &mut handle => Some(joined),
        };

        if let Some(joined) = stopped_early {
            joined
                .context("API server task panicked")?
                .context("API server failed")?;
            anyhow::bail!("API server stopped unexpectedly");
        }

        let _ = shutdown_tx.send(());
        match tokio::time::timeout(SHUTDOWN_GRACE, handle).await {
            Ok(joined) => joined.context("API server task panicked")?,
            Err(_) => {
                warn!(grace_secs = SHUTDOWN_GRACE.as_secs(), "API server did not stop in time");
                Ok(())
            }
        }
    }
}
