//! Selector node - wires discovery, the parameter and the loader client

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::api::{ApiServer, ApiState};
use crate::config::Config;
use crate::loader::{LoadService, LoaderClient};
use crate::plugins::{LibraryProbe, PluginProbe, PluginRecord, Scanner, SelectionMap};
use crate::selector::{EnumParameter, FREI0R_PARAMETER, Selector};
use crate::Result;

/// Result of the start-up scan
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Choices offered by the parameter
    pub choices: SelectionMap,
    /// Records behind the non-sentinel choices
    pub records: Vec<PluginRecord>,
}

impl Catalog {
    /// Scan the configured directories with `scanner`
    #[must_use]
    pub fn scan<P: PluginProbe>(scanner: &Scanner<P>, config: &Config) -> Self {
        let dirs = config.plugins.search_dirs();
        for dir in &dirs {
            tracing::info!(path = %dir.display(), "plugin search path");
        }

        let mut records = scanner.discover(&dirs);
        let choices = SelectionMap::from_records(&records);
        // Drop records shadowed by a later plugin with the same name
        records.retain(|r| choices.holds(r));

        tracing::info!(count = records.len(), "plugin scan complete");
        Self { choices, records }
    }
}

/// The running selector node
pub struct Node<S> {
    parameter: Arc<EnumParameter>,
    plugins: Arc<Vec<PluginRecord>>,
    selector: Selector<S>,
    addr: SocketAddr,
}

impl Node<LoaderClient> {
    /// Scan plugins and build the node from configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let scanner = Scanner::new(LibraryProbe).with_excluded(config.plugins.exclude.clone());
        let catalog = Catalog::scan(&scanner, config);
        let loader = LoaderClient::new(&config.loader.url);
        Self::with_parts(config, catalog, loader)
    }
}

impl<S: LoadService + 'static> Node<S> {
    /// Build the node from an existing scan and loader
    #[must_use]
    pub fn with_parts(config: &Config, catalog: Catalog, loader: S) -> Self {
        let parameter = EnumParameter::new(FREI0R_PARAMETER, Arc::new(catalog.choices))
            .with_description("frei0r plugin to load");
        let selector = Selector::new(loader).with_wait_timeout(config.loader.wait_timeout);

        Self {
            parameter: Arc::new(parameter),
            plugins: Arc::new(catalog.records),
            selector,
            addr: SocketAddr::new(config.server.bind, config.server.port),
        }
    }

    /// The `frei0r` parameter
    #[must_use]
    pub fn parameter(&self) -> Arc<EnumParameter> {
        self.parameter.clone()
    }

    /// Run until `shutdown` resolves, binding the configured address
    ///
    /// # Errors
    ///
    /// Returns error if the control surface fails to bind or run
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| crate::Error::Server(format!("failed to bind {}: {e}", self.addr)))?;
        self.run_on(listener, shutdown).await
    }

    /// Run on an already bound listener until `shutdown` resolves
    ///
    /// # Errors
    ///
    /// Returns error if the control surface fails while running
    pub async fn run_on(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let state = Arc::new(ApiState {
            parameter: self.parameter.clone(),
            plugins: self.plugins.clone(),
            selector_state: self.selector.subscribe_state(),
        });

        let changes = self.parameter.subscribe();
        let selector_task = tokio::spawn(self.selector.run(changes));

        let result = ApiServer::new(state)
            .serve(listener, shutdown)
            .await;

        selector_task.abort();
        tracing::info!("selector node stopped");
        result
    }
}

/// Resolves on Ctrl-C
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::plugins::{PluginType, ProbeError};

    /// Every file declares the same name
    struct SameName;

    impl PluginProbe for SameName {
        fn probe(&self, path: &Path) -> std::result::Result<PluginRecord, ProbeError> {
            Ok(PluginRecord::new("Same", PluginType::Filter, path))
        }
    }

    #[test]
    fn catalog_drops_shadowed_records() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.so"), b"").unwrap();
        std::fs::write(dir.path().join("b.so"), b"").unwrap();

        let mut config = Config::default();
        config.plugins.path = dir.path().to_path_buf();

        let catalog = Catalog::scan(&Scanner::new(SameName), &config);
        assert_eq!(catalog.records.len(), 1);
        assert!(catalog.records[0].path.ends_with("b.so"));
        assert_eq!(catalog.choices.len(), 2);
    }
}
