//! Error types for the frei0r selector

use thiserror::Error;

use crate::plugins::ProbeError;

/// Result type alias for selector operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the frei0r selector
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Plugin probe failed
    #[error("probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Requested value is not one of the parameter's choices
    #[error("invalid choice for parameter {parameter}: {value}")]
    InvalidChoice {
        /// Parameter name
        parameter: String,
        /// Rejected value
        value: String,
    },

    /// Parameter does not exist
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Loader service did not become reachable within the wait bound
    #[error("loader service unreachable: {0}")]
    EndpointUnreachable(String),

    /// Loader service answered with an error status
    #[error("loader error: {0}")]
    Loader(String),

    /// Control surface server error
    #[error("server error: {0}")]
    Server(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
