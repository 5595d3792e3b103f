//! Domain error types
//!
//! This module defines the error hierarchy for the collector.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main collector error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and maps each kind to a process exit code.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// Configuration-related errors (missing variables, invalid values)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Notion API errors
    #[error("Notion API error: {0}")]
    Notion(#[from] NotionError),

    /// Output file could not be written
    #[error("Write error: {0}")]
    Write(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors outside of export writes
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl CollectorError {
    /// Process exit code for this error
    ///
    /// 2 = configuration, 3 = authentication, 4 = network, 5 = fatal.
    pub fn exit_code(&self) -> i32 {
        match self {
            CollectorError::Configuration(_) | CollectorError::Validation(_) => 2,
            CollectorError::Notion(NotionError::Auth(_)) => 3,
            CollectorError::Notion(e) if e.is_transient() => 4,
            _ => 5,
        }
    }
}

/// Notion API errors
///
/// Errors that occur when talking to the Notion REST API.
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum NotionError {
    /// Token missing, invalid, expired, or lacking access (401/403)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Database or page does not exist or is not shared with the integration (404)
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Connection failure or timeout before a response arrived
    #[error("Network error: {0}")]
    TransientNetwork(String),

    /// Rate limit exceeded (429)
    #[error("Rate limited, retry after: {0}")]
    RateLimited(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    /// Other client error (4xx)
    #[error("Client error: {status} {code} - {message}")]
    Client {
        status: u16,
        code: String,
        message: String,
    },

    /// Response body could not be decoded
    #[error("Invalid response from Notion: {0}")]
    InvalidResponse(String),
}

impl NotionError {
    /// Whether rerunning later could succeed without configuration changes
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            NotionError::TransientNetwork(_)
                | NotionError::RateLimited(_)
                | NotionError::Server { .. }
        )
    }
}

impl From<std::io::Error> for CollectorError {
    fn from(err: std::io::Error) -> Self {
        CollectorError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CollectorError {
    fn from(err: serde_json::Error) -> Self {
        CollectorError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CollectorError {
    fn from(err: toml::de::Error) -> Self {
        CollectorError::Configuration(format!("TOML parse error: {err}"))
    }
}
