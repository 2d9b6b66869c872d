//! Common state machine error types
//!
//! Shared by domain crates that model lifecycle transitions.

use thiserror::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Guard condition failed: {0}")]
    GuardFailed(String),

    #[error("Terminal state: {0} is a terminal state and cannot transition")]
    TerminalState(String),
}

impl From<StateError> for crate::Error {
    fn from(err: StateError) -> Self {
        crate::Error::Validation(err.to_string())
    }
}
