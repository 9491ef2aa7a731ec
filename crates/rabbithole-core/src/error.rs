//! Error types for Rabbithole.

use std::time::Duration;

use thiserror::Error;

/// Classified failure of a single port call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    /// Credentials were rejected. Never retried.
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// The backend throttled the request.
    #[error("Rate limit error: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("Transient transport error: {0}")]
    Transport(String),

    /// The response could not be interpreted. Scoped to one node.
    #[error("Malformed response error: {0}")]
    Malformed(String),
}

impl PortError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Transport(_))
    }

    /// Whether the traversal must stop. Malformed responses only void the
    /// node they belong to.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Malformed(_))
    }

    /// Short class name used in user-facing messages.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Authorization(_) => "AuthorizationError",
            Self::RateLimited { .. } => "RateLimitError",
            Self::Transport(_) => "TransientTransportError",
            Self::Malformed(_) => "MalformedResponseError",
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid ruleset: {0}")]
    InvalidRuleset(String),

    #[error("Broken path: {0}")]
    BrokenPath(String),

    #[error(transparent)]
    Port(#[from] PortError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classes() {
        assert!(PortError::Transport("reset".into()).is_retryable());
        assert!(PortError::RateLimited {
            message: "quota".into(),
            retry_after: None
        }
        .is_retryable());
        assert!(!PortError::Authorization("denied".into()).is_retryable());
        assert!(!PortError::Malformed("bad json".into()).is_retryable());
    }

    #[test]
    fn test_only_malformed_is_non_fatal() {
        assert!(!PortError::Malformed("x".into()).is_fatal());
        assert!(PortError::Authorization("x".into()).is_fatal());
        assert!(PortError::Transport("x".into()).is_fatal());
    }

    #[test]
    fn test_port_error_display_is_transparent() {
        let err: Error = PortError::Authorization("token expired".into()).into();
        assert_eq!(err.to_string(), "Authorization error: token expired");
    }
}
