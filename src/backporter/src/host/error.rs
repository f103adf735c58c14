//! Code host error types.

use std::fmt;
use thiserror::Error;

/// Classification of a failed collaborator call.
///
/// The engine switches on this instead of inspecting wrapped errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The write could not be applied on top of the current state (HTTP 409).
    Conflict,
    /// The requested object does not exist.
    NotFound,
    /// The API rate limit was exhausted.
    RateLimited,
    /// Network fault, timeout or server-side error.
    Transient,
    /// Anything else.
    Other,
}

impl ErrorKind {
    /// Classifies an HTTP status code returned by the code host.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            409 => Self::Conflict,
            429 => Self::RateLimited,
            500..=599 => Self::Transient,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Conflict => "conflict",
            Self::NotFound => "not found",
            Self::RateLimited => "rate limited",
            Self::Transient => "transient",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Error returned by [`CodeHost`](super::CodeHost) operations.
#[derive(Debug, Error)]
#[error("{operation} failed ({kind}): {message}")]
pub struct HostError {
    kind: ErrorKind,
    operation: String,
    message: String,
}

impl HostError {
    /// Creates a new error of the given kind.
    pub fn new(kind: ErrorKind, operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`ErrorKind::Conflict`] error.
    pub fn conflict(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, operation, message)
    }

    /// Shorthand for a [`ErrorKind::NotFound`] error.
    pub fn not_found(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, operation, message)
    }

    /// Converts an octocrab error, classifying it by HTTP status where available.
    pub fn from_octocrab(operation: impl Into<String>, error: octocrab::Error) -> Self {
        let (kind, message) = match &error {
            octocrab::Error::GitHub { source, .. } => {
                let status = source.status_code.as_u16();
                let message = source.message.clone();
                let kind = if status == 403 && message.to_lowercase().contains("rate limit") {
                    ErrorKind::RateLimited
                } else {
                    ErrorKind::from_status(status)
                };
                (kind, format!("{status}: {message}"))
            }
            other => (ErrorKind::Transient, other.to_string()),
        };
        Self::new(kind, operation, message)
    }

    /// Returns the error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns true if this is a [`ErrorKind::Conflict`] error.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.kind == ErrorKind::Conflict
    }

    /// Returns true if this is a [`ErrorKind::NotFound`] error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_status_codes() {
        assert_eq!(ErrorKind::from_status(409), ErrorKind::Conflict);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(429), ErrorKind::RateLimited);
        assert_eq!(ErrorKind::from_status(502), ErrorKind::Transient);
        assert_eq!(ErrorKind::from_status(422), ErrorKind::Other);
    }

    #[test]
    fn formats_operation_and_kind() {
        let error = HostError::conflict("create commit", "409: Merge conflict");
        assert!(error.is_conflict());
        assert_eq!(
            error.to_string(),
            "create commit failed (conflict): 409: Merge conflict"
        );
    }
}
