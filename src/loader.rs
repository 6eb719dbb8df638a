//! Client for the remote `load_plugin` service
//!
//! The loader is a separate process that actually instantiates frei0r
//! plugins. This node only tells it which path to load.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::{Error, Result};

/// Name of the remote service
pub const LOAD_PLUGIN_SERVICE: &str = "load_plugin";

/// Delay between reachability attempts while waiting for the service
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Request carrying the chosen plugin path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadPluginRequest {
    pub plugin_path: String,
}

/// Loader reply; its content is informational only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadPluginResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Remote endpoint that loads a plugin by path
#[async_trait]
pub trait LoadService: Send + Sync {
    /// Human-readable endpoint identifier for logs
    fn endpoint(&self) -> &str;

    /// Wait up to `timeout` for the service to become reachable
    async fn wait_for_service(&self, timeout: Duration) -> bool;

    /// Send one request and wait for the reply
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or an error status
    async fn load_plugin(&self, request: &LoadPluginRequest) -> Result<LoadPluginResponse>;
}

/// HTTP client for the loader service
#[derive(Debug, Clone)]
pub struct LoaderClient {
    /// HTTP client
    client: Client,
    /// Base URL of the loader (e.g. `http://127.0.0.1:18790`)
    base_url: String,
    /// Full URL of the service endpoint
    service_url: String,
}

impl LoaderClient {
    /// Create a client for the loader at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let service_url = format!("{base_url}/{LOAD_PLUGIN_SERVICE}");
        Self {
            client: Client::new(),
            base_url,
            service_url,
        }
    }

    /// Base URL of the loader
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Single reachability check bounded by `timeout`
    async fn is_reachable(&self, timeout: Duration) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).timeout(timeout).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::trace!(url = %url, error = %e, "loader not reachable");
                false
            }
        }
    }
}

#[async_trait]
impl LoadService for LoaderClient {
    fn endpoint(&self) -> &str {
        &self.service_url
    }

    async fn wait_for_service(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            if self.is_reachable(remaining).await {
                return true;
            }
            tokio::time::sleep(POLL_INTERVAL.min(deadline.saturating_duration_since(Instant::now())))
                .await;
        }
    }

    async fn load_plugin(&self, request: &LoadPluginRequest) -> Result<LoadPluginResponse> {
        let response = self.client.post(&self.service_url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Loader(format!("{status} - {body}")));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_url_joins_base() {
        let client = LoaderClient::new("http://127.0.0.1:18790/");
        assert_eq!(client.base_url(), "http://127.0.0.1:18790");
        assert_eq!(client.endpoint(), "http://127.0.0.1:18790/load_plugin");
    }

    #[test]
    fn request_wire_format() {
        let request = LoadPluginRequest {
            plugin_path: "/usr/lib/frei0r-1/nois0r.so".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"plugin_path": "/usr/lib/frei0r-1/nois0r.so"}));
    }

    #[test]
    fn response_fields_are_optional() {
        let response: LoadPluginResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response, LoadPluginResponse::default());
    }

    #[tokio::test]
    async fn unreachable_loader_times_out() {
        // Port 9 (discard) is not served in test environments
        let client = LoaderClient::new("http://127.0.0.1:9");
        let started = std::time::Instant::now();
        assert!(!client.wait_for_service(Duration::from_millis(100)).await);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
