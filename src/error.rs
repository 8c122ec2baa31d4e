use std::io;
use thiserror::Error;
use serde::{Serialize, Deserialize};

#[derive(Error, Debug, Serialize, Deserialize)]
pub enum FeedtuiError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Anyhow error: {0}")]
    Anyhow(String),
}

impl From<Box<dyn std::error::Error>> for FeedtuiError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        FeedtuiError::Network(err.to_string())
    }
}

impl From<reqwest::Error> for FeedtuiError {
    fn from(err: reqwest::Error) -> Self {
        FeedtuiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FeedtuiError {
    fn from(err: serde_json::Error) -> Self {
        FeedtuiError::Json(err.to_string())
    }
}

impl From<io::Error> for FeedtuiError {
    fn from(err: io::Error) -> Self {
        FeedtuiError::Io(err.to_string())
    }
}

impl From<anyhow::Error> for FeedtuiError {
    fn from(err: anyhow::Error) -> Self {
        FeedtuiError::Anyhow(err.to_string())
    }
}
