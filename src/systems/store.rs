//! System and member store with JSON file persistence
//!
//! Rows live in memory behind `RwLock`ed maps and are written through to
//! `systems.json` / `members.json` under the data directory after each
//! mutation. Lookups by short code are case-insensitive; short codes and
//! tokens are generated here, retrying on collision.

use crate::ids::{MemberId, SystemId};
use crate::persist;
use crate::systems::types::{generate_hid, generate_token, Member, System};
use chrono::Utc;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

const SYSTEMS_FILE: &str = "systems.json";
const MEMBERS_FILE: &str = "members.json";

/// Store of systems and their members
pub struct SystemStore {
    data_dir: PathBuf,
    systems: Arc<RwLock<HashMap<SystemId, System>>>,
    members: Arc<RwLock<HashMap<MemberId, Member>>>,
}

impl SystemStore {
    /// Create a store, loading both collections from disk.
    pub async fn new(data_dir: PathBuf) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let systems: Vec<System> = persist::load_collection(&data_dir.join(SYSTEMS_FILE));
        let members: Vec<Member> = persist::load_collection(&data_dir.join(MEMBERS_FILE));

        Ok(Self {
            data_dir,
            systems: Arc::new(RwLock::new(
                systems.into_iter().map(|s| (s.id, s)).collect(),
            )),
            members: Arc::new(RwLock::new(
                members.into_iter().map(|m| (m.id, m)).collect(),
            )),
        })
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub async fn get_system(&self, id: SystemId) -> Option<System> {
        self.systems.read().await.get(&id).cloned()
    }

    /// Find a system by short code, case-insensitively.
    pub async fn system_by_hid(&self, hid: &str) -> Option<System> {
        let hid = hid.to_ascii_lowercase();
        self.systems
            .read()
            .await
            .values()
            .find(|s| s.hid == hid)
            .cloned()
    }

    /// Find the system owning an API token. Exact match on the stored value.
    pub async fn system_by_token(&self, token: &str) -> Option<System> {
        self.systems
            .read()
            .await
            .values()
            .find(|s| s.token.as_deref() == Some(token))
            .cloned()
    }

    pub async fn get_member(&self, id: MemberId) -> Option<Member> {
        self.members.read().await.get(&id).cloned()
    }

    /// Find a member by short code, case-insensitively.
    pub async fn member_by_hid(&self, hid: &str) -> Option<Member> {
        let hid = hid.to_ascii_lowercase();
        self.members
            .read()
            .await
            .values()
            .find(|m| m.hid == hid)
            .cloned()
    }

    /// All members of a system, in creation order.
    pub async fn members_of(&self, system: SystemId) -> Vec<Member> {
        let mut members: Vec<Member> = self
            .members
            .read()
            .await
            .values()
            .filter(|m| m.system == system)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.id);
        members
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create a system with a fresh short code and API token.
    pub async fn create_system(&self, name: Option<String>, tag: Option<String>) -> System {
        let mut systems = self.systems.write().await;

        let id = SystemId(systems.keys().map(|k| k.0).max().unwrap_or(0) + 1);
        let (hid, token) = {
            let mut rng = rand::thread_rng();
            let hid = loop {
                let candidate = generate_hid(&mut rng);
                if !systems.values().any(|s| s.hid == candidate) {
                    break candidate;
                }
            };
            (hid, generate_token(&mut rng))
        };

        let system = System {
            id,
            hid,
            name,
            tag,
            token: Some(token),
            created: Utc::now(),
        };
        systems.insert(id, system.clone());
        drop(systems);

        self.persist_systems();
        tracing::info!(system = %system.id, hid = %system.hid, "created system");
        system
    }

    /// Create a member inside a system.
    pub async fn create_member(&self, system: SystemId, name: impl Into<String>) -> Member {
        let mut members = self.members.write().await;

        let id = MemberId(members.keys().map(|k| k.0).max().unwrap_or(0) + 1);
        let hid = {
            let mut rng = rand::thread_rng();
            loop {
                let candidate = generate_hid(&mut rng);
                if !members.values().any(|m| m.hid == candidate) {
                    break candidate;
                }
            }
        };

        let member = Member {
            id,
            hid,
            system,
            name: name.into(),
            display_name: None,
            created: Utc::now(),
        };
        members.insert(id, member.clone());
        drop(members);

        self.persist_members();
        tracing::info!(member = %member.id, hid = %member.hid, "created member");
        member
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write both collections now, awaiting the result. Mutations persist in
    /// the background; seeding wants the files on disk before returning.
    pub async fn flush(&self) -> std::io::Result<()> {
        let mut systems: Vec<System> = self.systems.read().await.values().cloned().collect();
        systems.sort_by_key(|s| s.id);
        persist::write_collection(&self.data_dir.join(SYSTEMS_FILE), &systems).await?;

        let mut members: Vec<Member> = self.members.read().await.values().cloned().collect();
        members.sort_by_key(|m| m.id);
        persist::write_collection(&self.data_dir.join(MEMBERS_FILE), &members).await
    }

    fn persist_systems(&self) {
        let path = self.data_dir.join(SYSTEMS_FILE);
        let systems = self.systems.clone();
        tokio::spawn(async move {
            let mut rows: Vec<System> = systems.read().await.values().cloned().collect();
            rows.sort_by_key(|s| s.id);
            if let Err(e) = persist::write_collection(&path, &rows).await {
                tracing::warn!("Failed to persist systems: {}", e);
            }
        });
    }

    fn persist_members(&self) {
        let path = self.data_dir.join(MEMBERS_FILE);
        let members = self.members.clone();
        tokio::spawn(async move {
            let mut rows: Vec<Member> = members.read().await.values().cloned().collect();
            rows.sort_by_key(|m| m.id);
            if let Err(e) = persist::write_collection(&path, &rows).await {
                tracing::warn!("Failed to persist members: {}", e);
            }
        });
    }
}
