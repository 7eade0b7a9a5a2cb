//! Error types for wiki core operations.
//!
//! Every failure the client can surface is one variant of [`WikiError`].
//! The variant alone decides whether the request engine retries and which
//! exit code the CLI reports, so the set is closed on purpose.

use thiserror::Error;

/// Result type alias for wiki operations.
pub type Result<T> = std::result::Result<T, WikiError>;

/// Core error type for wiki operations.
#[derive(Debug, Error)]
pub enum WikiError {
    /// Invalid caller input (unknown key, bad identifier, conflicting flags)
    #[error("{0}")]
    Usage(String),

    /// Bad numeric or configuration value
    #[error("{0}")]
    Validation(String),

    /// Caller-side precondition not met (network opt-in, user agent)
    #[error("{0}")]
    Policy(String),

    /// Missing or unusable stored credential
    #[error("{0}")]
    Auth(String),

    /// The call did not complete within the configured timeout
    #[error("Request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// The transport could not establish or keep the connection
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The remote answered with a 4xx status
    #[error("HTTP {status}: {message}")]
    Client { status: u16, message: String },

    /// The remote answered with a 5xx status
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// The response could not be parsed into the expected shape
    #[error("Unexpected response: {0}")]
    Protocol(String),

    /// Anything else (unreadable storage, runtime setup)
    #[error("{0}")]
    Internal(String),
}

/// Coarse classification of a [`WikiError`], independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Validation,
    Policy,
    Auth,
    Timeout,
    Connection,
    Client,
    Server,
    Protocol,
    Internal,
}

impl WikiError {
    pub fn usage(message: impl Into<String>) -> Self {
        WikiError::Usage(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        WikiError::Validation(message.into())
    }

    pub fn policy(message: impl Into<String>) -> Self {
        WikiError::Policy(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        WikiError::Auth(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        WikiError::Internal(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WikiError::Usage(_) => ErrorKind::Usage,
            WikiError::Validation(_) => ErrorKind::Validation,
            WikiError::Policy(_) => ErrorKind::Policy,
            WikiError::Auth(_) => ErrorKind::Auth,
            WikiError::Timeout { .. } => ErrorKind::Timeout,
            WikiError::Connection(_) => ErrorKind::Connection,
            WikiError::Client { .. } => ErrorKind::Client,
            WikiError::Server { .. } => ErrorKind::Server,
            WikiError::Protocol(_) => ErrorKind::Protocol,
            WikiError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code, used in the JSON error envelope.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Usage => "E_USAGE",
            ErrorKind::Validation => "E_VALIDATION",
            ErrorKind::Policy => "E_POLICY",
            ErrorKind::Auth => "E_AUTH",
            ErrorKind::Timeout => "E_TIMEOUT",
            ErrorKind::Connection => "E_CONNECTION",
            ErrorKind::Client => "E_HTTP_CLIENT",
            ErrorKind::Server => "E_HTTP_SERVER",
            ErrorKind::Protocol => "E_PROTOCOL",
            ErrorKind::Internal => "E_INTERNAL",
        }
    }

    /// Whether another attempt of the same request could succeed.
    ///
    /// Only transport trouble and 5xx answers qualify. A 4xx or a local
    /// misconfiguration fails the same way every time.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Timeout | ErrorKind::Connection | ErrorKind::Server
        )
    }

    /// HTTP status carried by the error, if the remote answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            WikiError::Client { status, .. } | WikiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WikiError {
    fn from(err: std::io::Error) -> Self {
        WikiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(WikiError::Timeout { timeout_ms: 10 }.is_retryable());
        assert!(WikiError::Connection("refused".into()).is_retryable());
        assert!(WikiError::Server {
            status: 503,
            message: "unavailable".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_non_retryable_kinds() {
        let errors = [
            WikiError::Client {
                status: 404,
                message: "missing".into(),
            },
            WikiError::Protocol("bad json".into()),
            WikiError::policy("no network"),
            WikiError::auth("no token"),
            WikiError::usage("bad id"),
            WikiError::validation("bad number"),
            WikiError::internal("disk"),
        ];
        for err in errors {
            assert!(!err.is_retryable(), "{:?} should not retry", err);
        }
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(WikiError::usage("x").code(), "E_USAGE");
        assert_eq!(WikiError::policy("x").code(), "E_POLICY");
        assert_eq!(WikiError::auth("x").code(), "E_AUTH");
        assert_eq!(
            WikiError::Client {
                status: 400,
                message: String::new()
            }
            .code(),
            "E_HTTP_CLIENT"
        );
        assert_eq!(WikiError::Timeout { timeout_ms: 1 }.code(), "E_TIMEOUT");
    }

    #[test]
    fn test_io_error_is_internal() {
        let err: WikiError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
