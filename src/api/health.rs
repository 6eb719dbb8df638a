//! Health and status endpoints

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use super::ApiState;
use crate::selector::{Selection, SelectorState};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Node status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub parameter: String,
    pub selection: Selection,
    pub selector: SelectorState,
    pub plugin_count: usize,
}

/// Liveness probe - is the node running?
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Current selection and whether a load request is in flight
async fn status(State(state): State<Arc<ApiState>>) -> Json<StatusResponse> {
    let selector = *state.selector_state.borrow();
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        parameter: state.parameter.name().to_string(),
        selection: state.parameter.current(),
        selector,
        plugin_count: state.plugins.len(),
    })
}

/// Build health router (liveness only, no state needed)
pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

/// Build status router
pub fn status_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/status", get(status))
        .with_state(state)
}
