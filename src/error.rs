//! Error handling for the parkly client

use parkly_domain::{DomainError, Violations};
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// What kind of failure the backend reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// The backend rejected the payload (400, 422)
    Validation,
    /// The resource does not exist (404)
    NotFound,
    /// The request clashes with current state, e.g. a slot already taken (409)
    Conflict,
    Unknown,
}

impl ApiErrorKind {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::Validation,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::Conflict,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "notFound",
            Self::Conflict => "conflict",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error body shapes the backend is known to send
#[derive(Deserialize, Debug, Default)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// A non-success response from the backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} error (status {status}): {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: u16,
    pub message: String,
}

impl ApiError {
    /// Classifies a failed response by its status and extracts a message
    /// from a JSON `message`/`error` field, falling back to the raw body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .message
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    body.trim().to_string()
                }
            });

        Self {
            kind: ApiErrorKind::from_status(status),
            status: status.as_u16(),
            message,
        }
    }
}

/// Unified error type for the parkly client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The backend answered with a failure status
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Form input broke one or more rules; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(#[from] Violations),

    /// A domain invariant was violated by the caller
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// The backend error kind, if this error came from the backend
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Error::Api(api) => Some(api.kind),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.api_kind() == Some(ApiErrorKind::NotFound)
    }

    pub fn is_conflict(&self) -> bool {
        self.api_kind() == Some(ApiErrorKind::Conflict)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
