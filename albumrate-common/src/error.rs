//! Common error types for albumrate

use thiserror::Error;

/// Common result type for albumrate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the stores and the gateway
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error, including pool timeouts)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
