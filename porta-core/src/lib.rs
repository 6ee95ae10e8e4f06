pub mod decode;
pub mod envelope;
pub mod gateway;
pub mod models;
pub mod session;

pub use envelope::Envelope;
pub use gateway::PortalGateway;
pub use session::SessionState;

use std::fmt;

/// Retry-eligible business conditions the portal signals via envelope codes.
///
/// Closed set on purpose: callers pattern-match on the kind to decide whether
/// to re-derive the request and try again. Every other non-success code is
/// fatal for the current attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryKind {
    /// Request frequency limit hit; worth re-attempting after a pause.
    RateLimited,
    /// Cart contents changed since the last check; re-project and retry.
    CartChanged,
}

impl fmt::Display for RetryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryKind::RateLimited => write!(f, "rate limited"),
            RetryKind::CartChanged => write!(f, "cart changed"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// Network/IO failure before an HTTP status was obtained.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Non-200 response; the body is kept verbatim for diagnostics.
    #[error("[{status}] {body}")]
    Http { status: u16, body: String },

    /// Named business condition eligible for a bounded retry.
    #[error("{kind}: {message}")]
    Retryable { kind: RetryKind, message: String },

    /// Any other non-success envelope code.
    #[error("{0}")]
    Rejected(String),
}

impl StageError {
    /// The retry kind, if this error is one of the retry-eligible conditions.
    pub fn retry_kind(&self) -> Option<RetryKind> {
        match self {
            StageError::Retryable { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

pub type StageResult<T> = Result<T, StageError>;
