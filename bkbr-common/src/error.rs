//! Common error types for Backburner

use thiserror::Error;

/// Common result type for Backburner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Backburner crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Recipe document could not be written; the previous document is intact
    #[error("Failed to save recipes: {0}")]
    Save(String),
}
