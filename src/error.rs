use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatusError {
    #[error("Failed to read sample data {}: {source}", .path.display())]
    SampleAsset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid sample data: {0}")]
    InvalidSample(String),

    #[error("Job record {index} is missing field {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StatusError>;
