//! HTTP control surface
//!
//! Exposes the enumerated plugin parameter for reading and setting, the
//! scanned plugin records, and liveness.

pub mod health;
pub mod parameters;
pub mod plugins;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::plugins::PluginRecord;
use crate::selector::{EnumParameter, SelectorState};

/// Shared state for API handlers
pub struct ApiState {
    /// The `frei0r` choice parameter
    pub parameter: Arc<EnumParameter>,
    /// Records offered as choices
    pub plugins: Arc<Vec<PluginRecord>>,
    /// Selector state, for status reporting
    pub selector_state: watch::Receiver<SelectorState>,
}

/// Build the router with all routes
pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/parameters", parameters::router(state.clone()))
        .nest("/api/plugins", plugins::router(state.plugins.clone()))
        .merge(health::router())
        .merge(health::status_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
}

impl ApiServer {
    /// Create a server for `state`
    #[must_use]
    pub const fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }

    /// Serve on `listener` until `shutdown` resolves
    ///
    /// # Errors
    ///
    /// Returns error if the server fails while running
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let local = listener.local_addr()?;
        tracing::info!(addr = %local, "control surface listening");

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| crate::Error::Server(format!("control surface error: {e}")))?;

        Ok(())
    }
}
