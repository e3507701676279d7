//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Brief cannot be empty")]
    EmptyBrief,

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    #[error("Invalid session setting: {0}")]
    InvalidSetting(String),

    #[error("Session aborted: {0}")]
    SessionAborted(String),

    #[error("Session stopped by user")]
    SessionStopped,

    #[error("Invalid transition from {from}: {action}")]
    InvalidTransition { from: String, action: String },
}

impl DomainError {
    /// Check if this error means the session can no longer run rounds
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DomainError::SessionAborted(_) | DomainError::SessionStopped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aborted_error_display() {
        let error = DomainError::SessionAborted("too many empty rounds".to_string());
        assert_eq!(error.to_string(), "Session aborted: too many empty rounds");
    }

    #[test]
    fn test_is_terminal_check() {
        assert!(DomainError::SessionStopped.is_terminal());
        assert!(DomainError::SessionAborted("x".to_string()).is_terminal());
        assert!(!DomainError::EmptyBrief.is_terminal());
        assert!(!DomainError::InvalidDomainName("x".to_string()).is_terminal());
    }
}
