//! Upstream failure taxonomy
//!
//! Every failure the backend client surfaces is one of four kinds. Callers
//! branch on [`FailureKind`]; the [`UpstreamError`] carries the message and
//! the original cause for diagnostics.

pub mod classification;

use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub use classification::{classify_status, AttemptFailure};

/// Boxed underlying cause of an upstream failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The closed set of upstream failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The upstream kept answering "too many requests" until retries ran out.
    RateLimited,
    /// The upstream reported the targeted resource does not exist.
    NotFound,
    /// Any other client-side error reported by the upstream.
    Malformed,
    /// Network errors, server errors, undecodable payloads.
    Unexpected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::RateLimited => write!(f, "rate_limited"),
            FailureKind::NotFound => write!(f, "not_found"),
            FailureKind::Malformed => write!(f, "malformed"),
            FailureKind::Unexpected => write!(f, "unexpected"),
        }
    }
}

/// A failed call against the upstream employee service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Retries were exhausted on a rate-limited upstream.
    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
    /// The upstream answered "not found".
    #[error("not found: {message}")]
    NotFound {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
    /// The upstream rejected the request shape.
    #[error("malformed request: {message}")]
    Malformed {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
    /// Anything that could not be classified as one of the above.
    #[error("unexpected upstream failure: {message}")]
    Unexpected {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl UpstreamError {
    /// Build an error of the given kind with no underlying cause.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::build(kind, message.into(), None)
    }

    /// Build an error of the given kind, keeping the original failure as its source.
    pub fn with_source(
        kind: FailureKind,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::build(kind, message.into(), Some(source.into()))
    }

    fn build(kind: FailureKind, message: String, source: Option<BoxError>) -> Self {
        match kind {
            FailureKind::RateLimited => UpstreamError::RateLimited { message, source },
            FailureKind::NotFound => UpstreamError::NotFound { message, source },
            FailureKind::Malformed => UpstreamError::Malformed { message, source },
            FailureKind::Unexpected => UpstreamError::Unexpected { message, source },
        }
    }

    /// The kind of this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            UpstreamError::RateLimited { .. } => FailureKind::RateLimited,
            UpstreamError::NotFound { .. } => FailureKind::NotFound,
            UpstreamError::Malformed { .. } => FailureKind::Malformed,
            UpstreamError::Unexpected { .. } => FailureKind::Unexpected,
        }
    }

    /// The diagnostic message, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            UpstreamError::RateLimited { message, .. }
            | UpstreamError::NotFound { message, .. }
            | UpstreamError::Malformed { message, .. }
            | UpstreamError::Unexpected { message, .. } => message,
        }
    }

    /// Returns true if this failure came from rate-limit exhaustion.
    pub fn is_rate_limited(&self) -> bool {
        self.kind() == FailureKind::RateLimited
    }
}

/// Result type for upstream operations
pub type UpstreamResult<T> = Result<T, UpstreamError>;
