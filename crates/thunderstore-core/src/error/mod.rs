//! Error types and result aliases for Thunderstore operations.
//!
//! Every failure a registry call can produce maps to exactly one variant of
//! [`ThunderstoreError`]. Variants derived from an HTTP response carry the
//! status code and an excerpt of the response body.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::types::ValidationError;

/// Number of body characters kept on HTTP-derived errors
pub const BODY_EXCERPT_LEN: usize = 500;

/// Unified error type for all registry operations
#[derive(Error, Debug)]
pub enum ThunderstoreError {
    // Transport errors
    #[error("Connection failed: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Request timed out: {message}")]
    Timeout {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Status errors
    #[error("Authentication failed (HTTP {status}): {message}")]
    Authentication {
        status: u16,
        message: String,
        body: String,
    },

    #[error("Not found (HTTP 404): {message}")]
    NotFound { message: String, body: String },

    #[error("Rate limit exceeded (HTTP 429): {message}")]
    RateLimit {
        message: String,
        retry_after: Option<Duration>,
        body: String,
    },

    #[error("Server error (HTTP {status}): {message}")]
    Server {
        status: u16,
        message: String,
        body: String,
    },

    #[error("API request failed (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        body: String,
    },

    // Payload and argument errors
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Discriminant of [`ThunderstoreError`] for matching without the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Connection,
    Timeout,
    Authentication,
    NotFound,
    RateLimit,
    Server,
    Validation,
    Api,
}

/// Result type alias for registry operations
pub type ThunderstoreResult<T> = Result<T, ThunderstoreError>;

impl ThunderstoreError {
    /// Create a connection error from any error type
    pub fn connection<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create a timeout error from any error type
    pub fn timeout<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Timeout {
            message,
            source: Some(Box::new(source)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection { .. } => ErrorKind::Connection,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Server { .. } => ErrorKind::Server,
            Self::Api { .. } => ErrorKind::Api,
            Self::Validation(_) => ErrorKind::Validation,
        }
    }

    /// HTTP status that produced this error, if a response was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. }
            | Self::Server { status, .. }
            | Self::Api { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::RateLimit { .. } => Some(429),
            Self::Connection { .. } | Self::Timeout { .. } | Self::Validation(_) => None,
        }
    }

    /// Leading part of the response body, if a response was received
    pub fn body_excerpt(&self) -> Option<&str> {
        match self {
            Self::Authentication { body, .. }
            | Self::NotFound { body, .. }
            | Self::RateLimit { body, .. }
            | Self::Server { body, .. }
            | Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Server-provided hint for when to try again
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// The validation details, for payload and argument errors
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }

    /// Whether repeating the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::Timeout { .. } | Self::RateLimit { .. } | Self::Server { .. }
        )
    }

    /// Process exit code for command-line front ends
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::NotFound => 1,
            ErrorKind::Validation => 2,
            ErrorKind::Authentication => 3,
            ErrorKind::Connection | ErrorKind::Timeout | ErrorKind::RateLimit => 4,
            ErrorKind::Server | ErrorKind::Api => 5,
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self.kind() {
            ErrorKind::Connection => Some("Check your internet connection and the registry URL"),
            ErrorKind::Timeout => Some("Try again or raise the request timeout"),
            ErrorKind::Authentication => Some("Check that the API token is valid and not expired"),
            ErrorKind::RateLimit => Some("Wait before retrying, or enable a retry policy"),
            ErrorKind::NotFound => Some("Check the owner, package or community spelling"),
            ErrorKind::Server => Some("The registry is having trouble; try again later"),
            ErrorKind::Validation | ErrorKind::Api => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connection => "connection",
            Self::Timeout => "timeout",
            Self::Authentication => "authentication",
            Self::NotFound => "not-found",
            Self::RateLimit => "rate-limit",
            Self::Server => "server",
            Self::Validation => "validation",
            Self::Api => "api",
        };
        f.write_str(name)
    }
}

/// Keep the first [`BODY_EXCERPT_LEN`] characters of a response body
pub fn body_excerpt(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(BODY_EXCERPT_LEN)
        .collect()
}
