//! Parameter endpoints
//!
//! `GET /` lists every parameter, `GET /{name}` describes one and
//! `PUT /{name}` sets it by display name or path.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::Error;
use crate::selector::{ParameterDescription, Selection};

/// Body of a set request
#[derive(Debug, Deserialize)]
pub struct SetParameterRequest {
    pub value: String,
}

/// Error body returned to the caller
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: &Error) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Build parameter routes
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(list_parameters))
        .route("/{name}", get(get_parameter).put(set_parameter))
        .with_state(state)
}

/// List all parameters
async fn list_parameters(State(state): State<Arc<ApiState>>) -> Json<Vec<ParameterDescription>> {
    Json(vec![state.parameter.describe()])
}

/// Describe one parameter
async fn get_parameter(
    State(state): State<Arc<ApiState>>,
    Path(name): Path<String>,
) -> Result<Json<ParameterDescription>, ApiError> {
    if name != state.parameter.name() {
        return Err(api_error(StatusCode::NOT_FOUND, &Error::UnknownParameter(name)));
    }
    Ok(Json(state.parameter.describe()))
}

/// Set one parameter
async fn set_parameter(
    State(state): State<Arc<ApiState>>,
    Path(name): Path<String>,
    Json(request): Json<SetParameterRequest>,
) -> Result<Json<Selection>, ApiError> {
    if name != state.parameter.name() {
        return Err(api_error(StatusCode::NOT_FOUND, &Error::UnknownParameter(name)));
    }

    match state.parameter.set(&request.value) {
        Ok(selection) => Ok(Json(selection)),
        Err(e) => {
            tracing::warn!(parameter = %name, value = %request.value, error = %e, "rejected parameter value");
            Err(api_error(StatusCode::BAD_REQUEST, &e))
        }
    }
}
