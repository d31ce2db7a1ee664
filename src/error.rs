//! Error types for sqlview.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for sqlview operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// The engine could not be reached (connection refused, DNS failure, etc.)
    #[error("{0}")]
    Transport(String),

    /// The engine answered with a structured failure (non-2xx or `status: "error"`).
    #[error("{message}")]
    Application {
        /// Summary message taken from the response body.
        message: String,
        /// Raw diagnostic shown verbatim beneath the summary.
        detail: Option<String>,
    },

    /// The response body could not be understood.
    #[error("{0}")]
    MalformedResponse(String),

    /// The request did not settle within the configured timeout.
    #[error("{0}")]
    Timeout(String),

    /// The attempt was cancelled before it settled.
    #[error("Query cancelled")]
    Cancelled,

    /// Configuration errors (invalid config file, bad API URL, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConsoleError {
    /// Creates the fixed "engine unreachable" guidance error for the given API URL.
    pub fn unreachable(api_url: &str) -> Self {
        Self::Transport(format!(
            "Could not reach the query engine at {api_url}. Make sure the backend server is running."
        ))
    }

    /// Creates an application error without a raw diagnostic.
    pub fn application(msg: impl Into<String>) -> Self {
        Self::Application {
            message: msg.into(),
            detail: None,
        }
    }

    /// Creates the generic error used when a response body is unparseable.
    pub fn malformed(status_code: u16) -> Self {
        Self::MalformedResponse(format!("Request failed with status code {status_code}"))
    }

    /// Creates the error for a record whose width does not match the columns.
    pub fn ragged_record(row: usize, width: usize, expected: usize) -> Self {
        Self::MalformedResponse(format!(
            "Row {} has {width} values but {expected} columns were returned",
            row + 1
        ))
    }

    /// Creates a timeout error with the given message.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the raw diagnostic attached to an application error, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Application { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport(_) => "Connection Error",
            Self::Application { .. } => "Query Error",
            Self::MalformedResponse(_) => "Response Error",
            Self::Timeout(_) => "Timeout",
            Self::Cancelled => "Cancelled",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using ConsoleError.
pub type Result<T> = std::result::Result<T, ConsoleError>;
