//! switchkit - Guild settings service for plural identity proxying
//!
//! switchkit manages per-guild configuration for systems (identity
//! containers) and their members (personas): which member a message gets
//! attributed to, guild-specific tags and display overrides, and the lookup
//! of proxied messages back to their authors.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        HTTP (axum)                         │
//! │   systems_router      guilds_router      messages_router   │
//! └──────────┬───────────────────┬──────────────────┬──────────┘
//!            │                   │                  │
//!   ┌────────▼────────┐ ┌────────▼────────┐ ┌───────▼────────┐
//!   │ auth / resolver │ │ SettingsService │ │ SnowflakeCodec │
//!   │  @me / hid /    │ │ resolve → load  │ │ id → timestamp │
//!   │  raw id lookup  │ │ → patch → apply │ │   + routing    │
//!   └────────┬────────┘ └────────┬────────┘ └───────┬────────┘
//!            │                   │                  │
//! ┌──────────▼───────────────────▼──────────────────▼──────────┐
//! │     SystemStore      GuildSettingsStore      MessageStore  │
//! │          (RwLock maps, JSON write-through files)           │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The patch engine
//!
//! PATCH bodies are tri-state: a key can be absent (no-op), null (reset to
//! default), or set. [`patch::PatchField`] keeps the three states apart, and
//! per-field coercion failures aggregate into one response. The one
//! cross-field rule (member-mode autoproxy needs a pinned member) is checked
//! against the *effective* post-patch state, with absent fields carrying
//! their stored values.
//!
//! ## Modules
//!
//! - [`api`]: merged router, health probe, CORS
//! - [`systems`]: system/member registry and public lookups
//! - [`guilds`]: guild settings rows, the patch engine, settings endpoints
//! - [`messages`]: proxied message records and lookup
//! - [`snowflake`]: 64-bit id → timestamp decoding
//! - [`resolver`]: `@me` / short code / raw id resolution
//! - [`auth`]: API token authentication
//! - [`config`]: TOML configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod guilds;
pub mod ids;
pub mod messages;
pub mod patch;
mod persist;
pub mod resolver;
pub mod snowflake;
pub mod systems;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use patch::PatchField;
