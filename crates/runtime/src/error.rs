//! Error types for remote API calls
//!
//! Every failed request is reported as an [`ApiError`] carrying a kind, the
//! HTTP status when one was received, and a human-readable cause. Callers
//! branch on [`ApiErrorKind`] rather than matching on message text.

use std::fmt;

use reqwest::StatusCode;

/// Classification of a failed API call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The remote answered 404 for the addressed item
    NotFound,
    /// The remote answered with any other non-success status
    Rejected,
    /// The request never produced a response (connection, timeout, TLS)
    Transport,
    /// A success response whose body could not be decoded
    Decode,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not found",
            Self::Rejected => "rejected",
            Self::Transport => "transport error",
            Self::Decode => "decode error",
        };
        f.write_str(label)
    }
}

/// A failed call against the remote API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.describe())]
pub struct ApiError {
    /// What went wrong
    pub kind: ApiErrorKind,
    /// HTTP status code, if a response was received
    pub status: Option<u16>,
    /// Response body or underlying error message
    pub cause: String,
}

impl ApiError {
    /// Build an error from a non-success HTTP response
    pub fn from_status(status: StatusCode, body: impl Into<String>) -> Self {
        Self::with_status(status.as_u16(), body)
    }

    /// Build an error from a raw non-success status code
    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        let kind = if status == StatusCode::NOT_FOUND.as_u16() {
            ApiErrorKind::NotFound
        } else {
            ApiErrorKind::Rejected
        };
        Self {
            kind,
            status: Some(status),
            cause: body.into(),
        }
    }

    /// Build an error for a request that produced no response
    pub fn transport(cause: impl fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            status: None,
            cause: cause.to_string(),
        }
    }

    /// Build an error for an undecodable success response
    pub fn decode(status: StatusCode, cause: impl fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            status: Some(status.as_u16()),
            cause: cause.to_string(),
        }
    }

    /// Whether the remote reported the item as missing
    pub fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::NotFound
    }

    fn describe(&self) -> String {
        let cause = self.cause.trim();
        match (self.status, cause.is_empty()) {
            (Some(status), false) => format!("{} (HTTP {status}): {cause}", self.kind),
            (Some(status), true) => format!("{} (HTTP {status})", self.kind),
            (None, _) => format!("{}: {cause}", self.kind),
        }
    }
}
