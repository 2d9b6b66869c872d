//! State machine for per-message read state
//!
//! Message states: Unread → Read (terminal). Only the addressee, the
//! participant who did not send the message, may trigger the transition.

pub use swapshop_common::StateError;
use serde::{Deserialize, Serialize};

/// Read state of a single message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadState {
    Unread,
    Read,
}

impl ReadState {
    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [ReadState] {
        match self {
            Self::Unread => &[Self::Read],
            Self::Read => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Read)
    }
}

impl std::fmt::Display for ReadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unread => write!(f, "unread"),
            Self::Read => write!(f, "read"),
        }
    }
}

/// Events that trigger read state transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadEvent {
    /// The addressee retrieved the conversation
    MarkRead,
}

impl std::fmt::Display for ReadEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MarkRead => write!(f, "mark_read"),
        }
    }
}

/// Read state machine
pub struct ReadStateMachine;

impl ReadStateMachine {
    /// Attempt a state transition
    pub fn transition(current: ReadState, event: ReadEvent) -> Result<ReadState, StateError> {
        match (current, event) {
            (ReadState::Unread, ReadEvent::MarkRead) => Ok(ReadState::Read),
            (ReadState::Read, _) => Err(StateError::TerminalState(current.to_string())),
        }
    }

    /// Transition triggered by `viewer_id` viewing a message sent by `sender_id`
    pub fn transition_for_viewer(
        current: ReadState,
        event: ReadEvent,
        sender_id: uuid::Uuid,
        viewer_id: uuid::Uuid,
    ) -> Result<ReadState, StateError> {
        if sender_id == viewer_id {
            return Err(StateError::GuardFailed(
                "A sender cannot mark their own message read".to_string(),
            ));
        }
        Self::transition(current, event)
    }
}
