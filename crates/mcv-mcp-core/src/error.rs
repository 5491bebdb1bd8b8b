//! Error types for the MCV MCP Server.

use thiserror::Error;

/// Maximum number of body characters kept in an [`Error::UnexpectedFormat`] snippet.
pub const SNIPPET_LEN: usize = 200;

/// Main error type for MCV MCP operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing cookie, invalid config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The portal rejected the session cookie
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Connection, timeout or body read failure
    #[error("Network error: {0}")]
    Network(String),

    /// The portal answered with a shape we do not understand
    #[error("Unexpected response format (status {status}): {message}")]
    UnexpectedFormat {
        /// HTTP status of the offending response
        status: u16,
        /// What was expected
        message: String,
        /// Leading part of the response body
        snippet: String,
    },

    /// Caller supplied malformed parameters
    #[error("Invalid parameters: {0}")]
    Validation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build an [`Error::UnexpectedFormat`], truncating the body to a snippet.
    pub fn unexpected_format(status: u16, message: impl Into<String>, body: &str) -> Self {
        Self::UnexpectedFormat {
            status,
            message: message.into(),
            snippet: snippet(body),
        }
    }

    /// Stable snake_case identifier of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration_error",
            Self::Authentication(_) => "authentication_error",
            Self::Network(_) => "network_error",
            Self::UnexpectedFormat { .. } | Self::Serialization(_) => "unexpected_format_error",
            Self::Validation(_) => "validation_error",
            Self::Io(_) => "io_error",
        }
    }
}

/// Cut a response body down to at most [`SNIPPET_LEN`] characters.
pub fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_LEN).collect()
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
