//! HTTP handler for message lookups
//!
//! GET /messages/:message_id returns the delivery metadata of a proxied
//! message: the creation timestamp decoded from the snowflake id, the
//! channel and sender ids as opaque strings, and cards for the member (and
//! their system) the message was attributed to. Public, no token required.

use crate::error::{Error, Result};
use crate::ids::MessageId;
use crate::messages::store::MessageStore;
use crate::messages::types::MessageResponse;
use crate::snowflake;
use crate::systems::SystemStore;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

/// Shared state for message handlers
#[derive(Clone)]
pub struct MessagesState {
    pub systems: Arc<SystemStore>,
    pub messages: Arc<MessageStore>,
}

/// Create the message lookup router
pub fn messages_router(state: MessagesState) -> Router {
    Router::new()
        .route("/messages/:message_id", get(get_message))
        .with_state(state)
}

/// GET /messages/:message_id
async fn get_message(
    State(state): State<MessagesState>,
    Path(message_id): Path<u64>,
) -> Result<Json<MessageResponse>> {
    let message = state
        .messages
        .get(MessageId(message_id))
        .await
        .ok_or(Error::MessageNotFound)?;

    // The attributed member may be gone; the lookup degrades to null cards
    // rather than failing.
    let member = match message.member {
        Some(id) => state.systems.get_member(id).await,
        None => None,
    };
    let system = match &member {
        Some(member) => state.systems.get_system(member.system).await,
        None => None,
    };

    let decoded = snowflake::decode(message.mid.0);
    Ok(Json(message.to_response(
        decoded.timestamp,
        system.map(|s| s.to_card()),
        member.map(|m| m.to_card()),
    )))
}
