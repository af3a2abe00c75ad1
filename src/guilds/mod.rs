//! Guilds module — per-guild settings overrides
//!
//! The settings-patch engine: tri-state partial updates over per-(system,
//! guild) and per-(member, guild) rows, with aggregated field validation and
//! the member-mode autoproxy cross-field rule. Parsing and validation live
//! in [`patch`], row storage in [`store`], request orchestration in
//! [`service`], and the REST surface in [`handler`].

pub mod handler;
pub mod patch;
pub mod service;
pub mod store;
pub mod types;

pub use handler::{guilds_router, GuildsState};
pub use service::SettingsService;
pub use store::GuildSettingsStore;
pub use types::{
    AutoproxyMode, MemberGuildSettings, MemberGuildSettingsResponse, SystemGuildSettings,
    SystemGuildSettingsResponse,
};
