//! Settings orchestration
//!
//! Glue between resolution, parsing, validation, and the stores. Each
//! operation is one request-scoped pass: resolve the caller and target, load
//! the current row, parse and validate the patch against it, apply, and
//! render the response (resolving the pinned autoproxy member back into its
//! short code). Failure order on the system-guild patch path: missing row,
//! then an unresolvable `autoproxy_member` token, then aggregated field
//! errors, then the cross-field member-mode rule.

use crate::error::{Error, Result};
use crate::guilds::patch::{MemberGuildPatch, SystemGuildPatch};
use crate::guilds::store::GuildSettingsStore;
use crate::guilds::types::{
    MemberGuildSettingsResponse, SystemGuildSettings, SystemGuildSettingsResponse,
};
use crate::ids::{GuildId, MemberId};
use crate::patch::PatchField;
use crate::resolver::resolve_member;
use crate::systems::{Member, System, SystemStore};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Orchestrates guild settings reads and patches
#[derive(Clone)]
pub struct SettingsService {
    systems: Arc<SystemStore>,
    guilds: Arc<GuildSettingsStore>,
}

impl SettingsService {
    pub fn new(systems: Arc<SystemStore>, guilds: Arc<GuildSettingsStore>) -> Self {
        Self { systems, guilds }
    }

    // =========================================================================
    // System guild settings
    // =========================================================================

    /// Current settings for the caller's system in a guild. A row must
    /// already exist; this read never default-inserts.
    pub async fn system_guild(
        &self,
        caller: &System,
        guild: GuildId,
    ) -> Result<SystemGuildSettingsResponse> {
        let settings = self
            .guilds
            .system_guild(caller.id, guild, false)
            .await
            .ok_or(Error::SystemGuildNotFound)?;
        Ok(self.render_system_guild(&settings).await)
    }

    /// Patch the caller's settings in a guild.
    pub async fn patch_system_guild(
        &self,
        caller: &System,
        guild: GuildId,
        body: &Map<String, Value>,
    ) -> Result<SystemGuildSettingsResponse> {
        let settings = self
            .guilds
            .system_guild(caller.id, guild, false)
            .await
            .ok_or(Error::SystemGuildNotFound)?;

        // The reference field resolves before anything else; it needs a
        // store lookup while every other field coerces in place.
        let member_field = self.resolve_member_field(body).await?;
        let patch = SystemGuildPatch::from_json(body, member_field);
        if !patch.is_valid() {
            return Err(Error::InvalidPatch(patch.errors().to_vec()));
        }
        if patch.missing_autoproxy_member(&settings) {
            return Err(Error::MissingAutoproxyMember);
        }

        let updated = self.guilds.update_system_guild(caller.id, guild, &patch).await;
        Ok(self.render_system_guild(&updated).await)
    }

    /// Turn the raw `autoproxy_member` key into a resolved patch field.
    /// A token that is present but resolves to nothing aborts the whole
    /// request; a carried-over stored value is handled downstream by the
    /// effective-state logic, so an absent key simply stays absent.
    async fn resolve_member_field(&self, body: &Map<String, Value>) -> Result<PatchField<MemberId>> {
        let value = match body.get("autoproxy_member") {
            None => return Ok(PatchField::Absent),
            Some(Value::Null) => return Ok(PatchField::Clear),
            Some(value) => value,
        };
        let token = match value {
            Value::String(token) => token.clone(),
            Value::Number(raw) => raw.to_string(),
            _ => return Err(Error::MemberNotFound),
        };
        let member = resolve_member(&self.systems, &token).await?;
        Ok(PatchField::Set(member.id))
    }

    async fn render_system_guild(
        &self,
        settings: &SystemGuildSettings,
    ) -> SystemGuildSettingsResponse {
        let member_hid = match settings.autoproxy_member {
            Some(id) => self.systems.get_member(id).await.map(|m| m.hid),
            None => None,
        };
        settings.to_response(member_hid)
    }

    // =========================================================================
    // Member guild settings
    // =========================================================================

    /// Current settings for one of the caller's members in a guild.
    pub async fn member_guild(
        &self,
        caller: &System,
        member_ref: &str,
        guild: GuildId,
    ) -> Result<MemberGuildSettingsResponse> {
        let member = self.owned_member(caller, member_ref).await?;
        let settings = self
            .guilds
            .member_guild(member.id, guild, false)
            .await
            .ok_or(Error::MemberGuildNotFound)?;
        Ok(settings.to_response())
    }

    /// Patch one of the caller's members' settings in a guild.
    pub async fn patch_member_guild(
        &self,
        caller: &System,
        member_ref: &str,
        guild: GuildId,
        body: &Map<String, Value>,
    ) -> Result<MemberGuildSettingsResponse> {
        let member = self.owned_member(caller, member_ref).await?;
        self.guilds
            .member_guild(member.id, guild, false)
            .await
            .ok_or(Error::MemberGuildNotFound)?;

        let patch = MemberGuildPatch::from_json(body);
        if !patch.is_valid() {
            return Err(Error::InvalidPatch(patch.errors().to_vec()));
        }

        let updated = self.guilds.update_member_guild(member.id, guild, &patch).await;
        Ok(updated.to_response())
    }

    /// Resolve a member reference and enforce that it belongs to the caller.
    /// A member of another system is a distinct error from an unknown one.
    async fn owned_member(&self, caller: &System, member_ref: &str) -> Result<Member> {
        let member = resolve_member(&self.systems, member_ref).await?;
        if member.system != caller.id {
            return Err(Error::NotOwnMember);
        }
        Ok(member)
    }
}
