//! Error types for the Tycoon client
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using TycoonError
pub type Result<T> = std::result::Result<T, TycoonError>;

/// Unified error type for Tycoon client operations
#[derive(Debug, Error)]
pub enum TycoonError {
    // -------------------------------------------------------------------------
    // Endpoint Errors
    // -------------------------------------------------------------------------
    /// Every candidate endpoint failed its health check (or the pool was
    /// already empty). Fatal for the current call.
    #[error("No healthy endpoint available")]
    NoHealthyEndpoint,

    // -------------------------------------------------------------------------
    // Remote Errors
    // -------------------------------------------------------------------------
    /// The server answered with a status other than 200 or 450.
    #[error("Remote error (status {status}): {}", String::from_utf8_lossy(.body))]
    Remote { status: u16, body: Vec<u8> },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    // -------------------------------------------------------------------------
    // I/O and Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration '{0}' is already registered")]
    DuplicateRegistration(String),

    #[error("Undefined configuration: '{0}'")]
    UnknownRegistration(String),
}
