//! API endpoint integration tests
//!
//! Exercises the conversations routes through the composed application
//! router: contacting a seller, messaging, read state and unread badges.

mod common;
mod conversations;
mod messages;
mod unread;
