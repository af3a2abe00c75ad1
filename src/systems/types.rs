//! System and member records plus their public wire cards
//!
//! A system is a user's identity container; members are the personas inside
//! it. Stored rows carry the API token; the wire cards never do, and they
//! expose the five-letter short code as the public id instead of the
//! internal counter.

use crate::ids::{MemberId, SystemId};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of the public short code ("hid") on systems and members.
pub const HID_LENGTH: usize = 5;

/// Random bytes behind an API token; encodes to 64 base64url characters.
const TOKEN_BYTES: usize = 48;

/// A stored system row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct System {
    pub id: SystemId,
    /// Public short code, always lowercase
    pub hid: String,
    pub name: Option<String>,
    /// Global tag appended to proxied names (guild settings may override)
    pub tag: Option<String>,
    /// API token; never serialized onto the wire, only to the store file
    pub token: Option<String>,
    pub created: DateTime<Utc>,
}

impl System {
    pub fn to_card(&self) -> SystemCard {
        SystemCard {
            id: self.hid.clone(),
            name: self.name.clone(),
            tag: self.tag.clone(),
            created: self.created,
        }
    }
}

/// A stored member row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    /// Public short code, always lowercase
    pub hid: String,
    /// Owning system
    pub system: SystemId,
    pub name: String,
    pub display_name: Option<String>,
    pub created: DateTime<Utc>,
}

impl Member {
    pub fn to_card(&self) -> MemberCard {
        MemberCard {
            id: self.hid.clone(),
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            created: self.created,
        }
    }
}

/// Public system card (no token, short code as id)
#[derive(Debug, Clone, Serialize)]
pub struct SystemCard {
    pub id: String,
    pub name: Option<String>,
    pub tag: Option<String>,
    pub created: DateTime<Utc>,
}

/// Public member card
#[derive(Debug, Clone, Serialize)]
pub struct MemberCard {
    pub id: String,
    pub name: String,
    pub display_name: Option<String>,
    pub created: DateTime<Utc>,
}

/// Generate a candidate short code: five random lowercase ASCII letters.
/// Callers retry on collision.
pub fn generate_hid(rng: &mut impl Rng) -> String {
    (0..HID_LENGTH)
        .map(|_| rng.gen_range(b'a'..=b'z') as char)
        .collect()
}

/// Generate a fresh API token.
pub fn generate_token(rng: &mut impl Rng) -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rng.fill(&mut bytes[..]);
    URL_SAFE_NO_PAD.encode(bytes)
}
