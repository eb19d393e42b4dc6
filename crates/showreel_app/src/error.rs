//! Error types for showreel_app

use showreel_core::SceneError;
use thiserror::Error;

/// Failures while fetching or decoding the catalog
#[derive(Error, Debug)]
pub enum LoadError {
    /// Request could not be sent or the body could not be read
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),

    /// Local catalog file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Body is not a valid products document
    #[error("invalid products document: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors that can occur in the showreel application
#[derive(Error, Debug)]
pub enum ShowreelError {
    /// The render container is missing from the host document
    #[error("render container #{0} not found")]
    MissingContainer(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Catalog loading failed
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A scene mutation failed
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    /// The animation scheduler went away mid-cycle
    #[error("animation scheduler stopped before cycle {0} completed")]
    SchedulerStopped(u64),
}

/// Result type for showreel_app operations
pub type Result<T> = std::result::Result<T, ShowreelError>;
