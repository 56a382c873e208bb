//! Error types for flakeloop
//!
//! Centralized error handling using thiserror. Run failures are data
//! (`RunOutcome::Failed`), never one of these errors.

use thiserror::Error;

/// All error types that can occur in flakeloop
#[derive(Debug, Error)]
pub enum FlakeloopError {
    /// A termination threshold was out of range
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Config error: {0}")]
    Config(String),

    /// Desktop or terminal notification could not be delivered
    #[error("Notification error: {0}")]
    Notification(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for flakeloop operations
pub type Result<T> = std::result::Result<T, FlakeloopError>;
