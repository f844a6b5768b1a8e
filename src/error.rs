//! Error types for Synheart Mudra
//!
//! The per-frame core never fails; these errors only surface at the
//! boundaries (wire parsing, configuration, payload encoding).

use thiserror::Error;

/// Errors that can occur while feeding or reading a session
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Failed to parse frame record: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid frame record: {0}")]
    InvalidFrame(#[from] crate::schema::ValidationError),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
