//! Classification of single upstream attempts
//!
//! An [`AttemptFailure`] records what went wrong on one HTTP exchange with the
//! upstream. The retry policy looks at its [`FailureKind`] to decide whether
//! another attempt is worthwhile, and the client converts it into an
//! [`UpstreamError`] once the call is settled.

use reqwest::StatusCode;
use thiserror::Error;

use super::{FailureKind, UpstreamError};

/// Map an upstream HTTP status onto a failure kind.
///
/// 429 is the only retryable signal; 404 means absence; any other 4xx is a
/// malformed request and everything else (5xx, unexpected codes) is unexpected.
pub fn classify_status(status: StatusCode) -> FailureKind {
    if status == StatusCode::TOO_MANY_REQUESTS {
        FailureKind::RateLimited
    } else if status == StatusCode::NOT_FOUND {
        FailureKind::NotFound
    } else if status.is_client_error() {
        FailureKind::Malformed
    } else {
        FailureKind::Unexpected
    }
}

/// One failed HTTP exchange with the upstream.
#[derive(Debug, Error)]
pub enum AttemptFailure {
    /// The upstream answered with a non-success status.
    #[error("upstream responded {status}: {body}")]
    Status { status: StatusCode, body: String },
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl AttemptFailure {
    /// The failure kind this attempt falls under.
    pub fn kind(&self) -> FailureKind {
        match self {
            AttemptFailure::Status { status, .. } => classify_status(*status),
            AttemptFailure::Transport(_) | AttemptFailure::Decode(_) => FailureKind::Unexpected,
        }
    }

    /// Translate into the error surfaced to callers, keeping this attempt as the source.
    pub fn into_upstream_error(self) -> UpstreamError {
        let kind = self.kind();
        let message = self.to_string();
        UpstreamError::with_source(kind, message, self)
    }

    /// Translate a rate-limit failure that ran out of retries.
    pub fn into_exhausted(self) -> UpstreamError {
        UpstreamError::with_source(
            FailureKind::RateLimited,
            "retries exhausted on rate-limited employee service",
            self,
        )
    }
}
