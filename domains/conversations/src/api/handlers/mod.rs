//! HTTP handlers for the Conversations domain

pub mod conversations;
pub mod messages;

use crate::domain::entities::MAX_MESSAGE_LENGTH;

/// Request-level content limit, in the integer type `validator` expects
pub(crate) const MAX_CONTENT_LENGTH: u64 = MAX_MESSAGE_LENGTH as u64;
