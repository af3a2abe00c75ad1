//! Guild settings types
//!
//! Per-guild overrides for systems and members. A settings row exists per
//! (system, guild) or (member, guild) pair; fields left at their defaults
//! behave as if no override was set. All wire types use snake_case JSON and
//! render guild ids as strings.

use crate::ids::{GuildId, MemberId, SystemId};
use serde::{Deserialize, Serialize};

/// Longest guild-specific tag override accepted by the patch path.
pub const MAX_TAG_LENGTH: usize = 79;
/// Longest guild display name override.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 100;
/// Longest avatar URL, which must also parse as a URL.
pub const MAX_AVATAR_URL_LENGTH: usize = 256;

// =============================================================================
// Autoproxy mode
// =============================================================================

/// How messages in a guild get attributed to a member without explicit tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoproxyMode {
    /// No automatic attribution
    #[default]
    Off,
    /// Attribute to whichever member is currently fronting
    Front,
    /// Attribute to the last member who spoke in the guild
    Latch,
    /// Attribute to one pinned member; requires `autoproxy_member` to be set
    Member,
}

impl std::fmt::Display for AutoproxyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Front => write!(f, "front"),
            Self::Latch => write!(f, "latch"),
            Self::Member => write!(f, "member"),
        }
    }
}

impl std::str::FromStr for AutoproxyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "front" => Ok(Self::Front),
            "latch" => Ok(Self::Latch),
            "member" => Ok(Self::Member),
            other => Err(format!("unknown autoproxy mode: {}", other)),
        }
    }
}

// =============================================================================
// Stored rows
// =============================================================================

/// Per-(system, guild) settings row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemGuildSettings {
    pub system: SystemId,
    pub guild: GuildId,
    pub proxying_enabled: bool,
    pub tag: Option<String>,
    pub tag_enabled: bool,
    pub autoproxy_mode: AutoproxyMode,
    pub autoproxy_member: Option<MemberId>,
}

impl SystemGuildSettings {
    /// Default row for a (system, guild) pair: proxying on, global tag, no
    /// autoproxy.
    pub fn new(system: SystemId, guild: GuildId) -> Self {
        Self {
            system,
            guild,
            proxying_enabled: true,
            tag: None,
            tag_enabled: true,
            autoproxy_mode: AutoproxyMode::Off,
            autoproxy_member: None,
        }
    }

    /// Wire form. The autoproxy member is rendered by short code, supplied
    /// by the caller after a store lookup.
    pub fn to_response(&self, autoproxy_member_hid: Option<String>) -> SystemGuildSettingsResponse {
        SystemGuildSettingsResponse {
            guild_id: self.guild,
            proxying_enabled: self.proxying_enabled,
            autoproxy_mode: self.autoproxy_mode,
            autoproxy_member: autoproxy_member_hid,
            tag: self.tag.clone(),
            tag_enabled: self.tag_enabled,
        }
    }
}

/// Per-(member, guild) settings row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberGuildSettings {
    pub member: MemberId,
    pub guild: GuildId,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl MemberGuildSettings {
    /// Default row for a (member, guild) pair: no overrides.
    pub fn new(member: MemberId, guild: GuildId) -> Self {
        Self {
            member,
            guild,
            display_name: None,
            avatar_url: None,
        }
    }

    /// Wire form.
    pub fn to_response(&self) -> MemberGuildSettingsResponse {
        MemberGuildSettingsResponse {
            guild_id: self.guild,
            display_name: self.display_name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

// =============================================================================
// Wire responses
// =============================================================================

/// Response body for system guild settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemGuildSettingsResponse {
    pub guild_id: GuildId,
    pub proxying_enabled: bool,
    pub autoproxy_mode: AutoproxyMode,
    pub autoproxy_member: Option<String>,
    pub tag: Option<String>,
    pub tag_enabled: bool,
}

/// Response body for member guild settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberGuildSettingsResponse {
    pub guild_id: GuildId,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}
