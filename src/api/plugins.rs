//! Plugin listing endpoint

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};

use crate::plugins::PluginRecord;

/// Shared plugin list
pub type SharedPlugins = Arc<Vec<PluginRecord>>;

/// Build plugin routes
pub fn router(plugins: SharedPlugins) -> Router {
    Router::new()
        .route("/", get(list_plugins))
        .with_state(plugins)
}

/// List the plugins offered as choices
async fn list_plugins(State(plugins): State<SharedPlugins>) -> Json<Vec<PluginRecord>> {
    Json(plugins.as_ref().clone())
}
