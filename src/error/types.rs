//! Error type definitions
//!
//! Defines the main error types used throughout the automation client.

use thiserror::Error;

/// Main error type for the automation client
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential token parsing errors
    #[error("Credential error: {0}")]
    Credential(String),

    /// Proxy configuration errors
    #[error("Proxy error: {0}")]
    Proxy(String),

    /// Sign-in / session errors
    #[error("Sign-in failed: {0}")]
    SignIn(String),

    /// Remote API errors carrying the HTTP status and the server-supplied
    /// message when one was present in the response body
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Server message, or the transport error text when absent
        message: String,
    },

    /// Transient server-side errors (5xx), consumed by the retry wrapper
    #[error("Server error ({status}), retrying")]
    ServerBusy {
        /// HTTP status code
        status: u16,
    },

    /// Unexpected response shapes from the server
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Network/HTTP client errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new credential parsing error
    pub fn credential(msg: impl Into<String>) -> Self {
        Self::Credential(msg.into())
    }

    /// Create a new proxy error
    pub fn proxy(msg: impl Into<String>) -> Self {
        Self::Proxy(msg.into())
    }

    /// Create a new sign-in error
    pub fn sign_in(msg: impl Into<String>) -> Self {
        Self::SignIn(msg.into())
    }

    /// Create an API error from a status code and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid-response error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error represents a transient server-side failure
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ServerBusy { .. } | Self::Network(_))
    }
}
