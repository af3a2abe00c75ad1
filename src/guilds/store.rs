//! Guild settings store with JSON file persistence
//!
//! One row per (system, guild) and per (member, guild) pair, kept in memory
//! behind `RwLock`ed maps and written through to `system_guilds.json` /
//! `member_guilds.json` after each mutation. Reads take an explicit
//! `default_insert` flag: the REST read paths pass `false` and treat a
//! missing row as not found, while create-on-read callers (seeding, proxy
//! bookkeeping) pass `true` to lazily insert the default row.

use crate::guilds::patch::{MemberGuildPatch, SystemGuildPatch};
use crate::guilds::types::{MemberGuildSettings, SystemGuildSettings};
use crate::ids::{GuildId, MemberId, SystemId};
use crate::persist;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

const SYSTEM_GUILDS_FILE: &str = "system_guilds.json";
const MEMBER_GUILDS_FILE: &str = "member_guilds.json";

/// Store of per-guild settings rows
pub struct GuildSettingsStore {
    data_dir: PathBuf,
    system_guilds: Arc<RwLock<HashMap<(SystemId, GuildId), SystemGuildSettings>>>,
    member_guilds: Arc<RwLock<HashMap<(MemberId, GuildId), MemberGuildSettings>>>,
}

impl GuildSettingsStore {
    /// Create a store, loading both collections from disk.
    pub async fn new(data_dir: PathBuf) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let system_guilds: Vec<SystemGuildSettings> =
            persist::load_collection(&data_dir.join(SYSTEM_GUILDS_FILE));
        let member_guilds: Vec<MemberGuildSettings> =
            persist::load_collection(&data_dir.join(MEMBER_GUILDS_FILE));

        Ok(Self {
            data_dir,
            system_guilds: Arc::new(RwLock::new(
                system_guilds
                    .into_iter()
                    .map(|row| ((row.system, row.guild), row))
                    .collect(),
            )),
            member_guilds: Arc::new(RwLock::new(
                member_guilds
                    .into_iter()
                    .map(|row| ((row.member, row.guild), row))
                    .collect(),
            )),
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Settings for a (system, guild) pair. With `default_insert`, a missing
    /// row is created from defaults and returned; without, `None`.
    pub async fn system_guild(
        &self,
        system: SystemId,
        guild: GuildId,
        default_insert: bool,
    ) -> Option<SystemGuildSettings> {
        if let Some(row) = self.system_guilds.read().await.get(&(system, guild)) {
            return Some(row.clone());
        }
        if !default_insert {
            return None;
        }

        let mut rows = self.system_guilds.write().await;
        let row = rows
            .entry((system, guild))
            .or_insert_with(|| SystemGuildSettings::new(system, guild))
            .clone();
        drop(rows);

        self.persist_system_guilds();
        Some(row)
    }

    /// Settings for a (member, guild) pair; same `default_insert` contract.
    pub async fn member_guild(
        &self,
        member: MemberId,
        guild: GuildId,
        default_insert: bool,
    ) -> Option<MemberGuildSettings> {
        if let Some(row) = self.member_guilds.read().await.get(&(member, guild)) {
            return Some(row.clone());
        }
        if !default_insert {
            return None;
        }

        let mut rows = self.member_guilds.write().await;
        let row = rows
            .entry((member, guild))
            .or_insert_with(|| MemberGuildSettings::new(member, guild))
            .clone();
        drop(rows);

        self.persist_member_guilds();
        Some(row)
    }

    // =========================================================================
    // Patches
    // =========================================================================

    /// Apply a validated patch to a (system, guild) row, upserting a default
    /// row first if none exists. The write guard makes read-apply-write
    /// atomic with respect to other patches on the same row.
    pub async fn update_system_guild(
        &self,
        system: SystemId,
        guild: GuildId,
        patch: &SystemGuildPatch,
    ) -> SystemGuildSettings {
        let mut rows = self.system_guilds.write().await;
        let row = rows
            .entry((system, guild))
            .or_insert_with(|| SystemGuildSettings::new(system, guild));
        patch.apply_to(row);
        let updated = row.clone();
        drop(rows);

        self.persist_system_guilds();
        tracing::info!(system = %system, guild = %guild, "updated system guild settings");
        updated
    }

    /// Apply a validated patch to a (member, guild) row, upserting as above.
    pub async fn update_member_guild(
        &self,
        member: MemberId,
        guild: GuildId,
        patch: &MemberGuildPatch,
    ) -> MemberGuildSettings {
        let mut rows = self.member_guilds.write().await;
        let row = rows
            .entry((member, guild))
            .or_insert_with(|| MemberGuildSettings::new(member, guild));
        patch.apply_to(row);
        let updated = row.clone();
        drop(rows);

        self.persist_member_guilds();
        tracing::info!(member = %member, guild = %guild, "updated member guild settings");
        updated
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write both collections now, awaiting the result.
    pub async fn flush(&self) -> std::io::Result<()> {
        let mut rows: Vec<SystemGuildSettings> =
            self.system_guilds.read().await.values().cloned().collect();
        rows.sort_by_key(|r| (r.system, r.guild));
        persist::write_collection(&self.data_dir.join(SYSTEM_GUILDS_FILE), &rows).await?;

        let mut rows: Vec<MemberGuildSettings> =
            self.member_guilds.read().await.values().cloned().collect();
        rows.sort_by_key(|r| (r.member, r.guild));
        persist::write_collection(&self.data_dir.join(MEMBER_GUILDS_FILE), &rows).await
    }

    fn persist_system_guilds(&self) {
        let path = self.data_dir.join(SYSTEM_GUILDS_FILE);
        let rows = self.system_guilds.clone();
        tokio::spawn(async move {
            let mut rows: Vec<SystemGuildSettings> = rows.read().await.values().cloned().collect();
            rows.sort_by_key(|r| (r.system, r.guild));
            if let Err(e) = persist::write_collection(&path, &rows).await {
                tracing::warn!("Failed to persist system guild settings: {}", e);
            }
        });
    }

    fn persist_member_guilds(&self) {
        let path = self.data_dir.join(MEMBER_GUILDS_FILE);
        let rows = self.member_guilds.clone();
        tokio::spawn(async move {
            let mut rows: Vec<MemberGuildSettings> = rows.read().await.values().cloned().collect();
            rows.sort_by_key(|r| (r.member, r.guild));
            if let Err(e) = persist::write_collection(&path, &rows).await {
                tracing::warn!("Failed to persist member guild settings: {}", e);
            }
        });
    }
}
