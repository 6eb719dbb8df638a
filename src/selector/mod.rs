//! Selector front-end
//!
//! Watches the `frei0r` parameter and asks the loader service to load the
//! chosen path. One request per change, in order; when the loader is not
//! reachable within the wait bound the request is dropped, not retried.

pub mod parameter;

use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch};

use crate::loader::{LoadPluginRequest, LoadService};
use crate::{Error, Result};

pub use parameter::{EnumParameter, FREI0R_PARAMETER, ParameterDescription, Selection};

/// Default wait for the loader to become reachable
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(100);

/// Whether a load request is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorState {
    Idle,
    Sending,
}

/// Forwards parameter changes to a [`LoadService`]
pub struct Selector<S> {
    service: S,
    wait_timeout: Duration,
    state: watch::Sender<SelectorState>,
}

impl<S: LoadService> Selector<S> {
    /// Create a selector using the default wait bound
    #[must_use]
    pub fn new(service: S) -> Self {
        let (state, _) = watch::channel(SelectorState::Idle);
        Self {
            service,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            state,
        }
    }

    /// Override how long to wait for the loader before dropping a request
    #[must_use]
    pub const fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> SelectorState {
        *self.state.borrow()
    }

    /// Observe state transitions
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<SelectorState> {
        self.state.subscribe()
    }

    /// Handle one change: ask the loader to load `path`
    ///
    /// Always returns to [`SelectorState::Idle`], whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndpointUnreachable`] if the loader did not answer in
    /// time, or the transport error of the call itself.
    pub async fn on_select(&self, path: &str) -> Result<()> {
        self.state.send_replace(SelectorState::Sending);
        let result = self.forward(path).await;
        self.state.send_replace(SelectorState::Idle);

        if let Err(e) = &result {
            tracing::error!(
                endpoint = %self.service.endpoint(),
                plugin_path = %path,
                error = %e,
                "plugin selection not delivered"
            );
        }
        result
    }

    async fn forward(&self, path: &str) -> Result<()> {
        let request = LoadPluginRequest {
            plugin_path: path.to_string(),
        };

        if !self.service.wait_for_service(self.wait_timeout).await {
            return Err(Error::EndpointUnreachable(self.service.endpoint().to_string()));
        }

        let response = self.service.load_plugin(&request).await?;
        tracing::debug!(plugin_path = %path, ?response, "loader replied");
        Ok(())
    }

    /// Handle changes from `changes` in order until the parameter is dropped
    pub async fn run(self, mut changes: mpsc::UnboundedReceiver<Selection>) {
        while let Some(selection) = changes.recv().await {
            tracing::info!(choice = %selection.name, plugin_path = %selection.value, "plugin selected");
            // Failures are logged in on_select; nothing is retried
            let _ = self.on_select(&selection.value).await;
        }
        tracing::debug!("parameter closed, selector stopping");
    }
}
