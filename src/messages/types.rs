//! Proxied message records
//!
//! A message row is written whenever the proxy re-sends a user's message
//! under a member's identity. The row itself is small; everything
//! time-related is recovered from the snowflake ids at read time.

use crate::ids::{ChannelId, MemberId, MessageId, UserId};
use crate::systems::{MemberCard, SystemCard};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A proxied message, keyed by the re-sent message's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Id of the message the proxy sent.
    pub mid: MessageId,
    pub channel: ChannelId,
    /// The platform account that triggered the proxy.
    pub sender: UserId,
    /// The member the message was attributed to. May point at a member that
    /// has since been deleted.
    pub member: Option<MemberId>,
    /// Id of the user's original message, when this was a re-send.
    pub original_mid: Option<MessageId>,
}

impl Message {
    /// Wire form. The timestamp comes from the snowflake decode and the
    /// author cards from store lookups; both are supplied by the caller.
    pub fn to_response(
        &self,
        timestamp: DateTime<Utc>,
        system: Option<SystemCard>,
        member: Option<MemberCard>,
    ) -> MessageResponse {
        MessageResponse {
            timestamp,
            id: self.mid,
            channel: self.channel,
            sender: self.sender,
            system,
            member,
            original: self.original_mid,
        }
    }
}

/// Response body for a message lookup. Platform ids render as strings.
/// Response-only: the embedded cards have no wire-to-row direction.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub timestamp: DateTime<Utc>,
    pub id: MessageId,
    pub channel: ChannelId,
    pub sender: UserId,
    pub system: Option<SystemCard>,
    pub member: Option<MemberCard>,
    pub original: Option<MessageId>,
}
