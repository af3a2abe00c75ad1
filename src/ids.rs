//! Typed identifiers
//!
//! Internal ids (`SystemId`, `MemberId`) are small counters assigned by the
//! stores at creation and never reused. Platform ids (`GuildId`, `ChannelId`,
//! `MessageId`, `UserId`) are 64-bit snowflakes supplied by the chat platform;
//! they serialize as strings on the wire so JavaScript clients do not lose
//! precision, but deserialize from either form.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Internal id of a system. Assigned by the store, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemId(pub u32);

impl std::fmt::Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Internal id of a member. Assigned by the store, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u32);

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accepts both JSON string and integer forms for 64-bit platform ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawU64 {
    Num(u64),
    Str(String),
}

macro_rules! platform_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match RawU64::deserialize(deserializer)? {
                    RawU64::Num(raw) => Ok($name(raw)),
                    RawU64::Str(s) => s
                        .parse::<u64>()
                        .map($name)
                        .map_err(serde::de::Error::custom),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<u64>().map($name)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                $name(raw)
            }
        }
    };
}

platform_id! {
    /// A guild (scoping context) on the chat platform. Not owned by this
    /// service; any 64-bit value is accepted.
    GuildId
}

platform_id! {
    /// A channel on the chat platform.
    ChannelId
}

platform_id! {
    /// A proxied message on the chat platform.
    MessageId
}

platform_id! {
    /// A platform user account (the human behind a system).
    UserId
}
