//! Messages module — proxied message records
//!
//! Stores one row per re-sent message and serves the public lookup endpoint
//! that decodes the snowflake id back into a timestamp and attributes the
//! message to its member and system.

pub mod handler;
pub mod store;
pub mod types;

pub use handler::{messages_router, MessagesState};
pub use store::MessageStore;
pub use types::{Message, MessageResponse};
