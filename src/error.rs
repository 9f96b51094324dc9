//! Error types for plate-finder

use thiserror::Error;

/// Main error type for plate-finder operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0} API key not configured")]
    MissingApiKey(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{service} API error: {status}")]
    Upstream {
        service: &'static str,
        status: String,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Location error: {0}")]
    Location(String),

    #[error("Model error: {0}")]
    Model(String),
}

/// Result type alias for plate-finder operations
pub type Result<T> = std::result::Result<T, Error>;
