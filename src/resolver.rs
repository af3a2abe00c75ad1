//! Reference token resolution
//!
//! Callers refer to systems and members loosely: `@me`, a five-letter short
//! code, or a raw internal id. The same grammar backs path parameters and
//! reference fields inside patch bodies (`autoproxy_member`), which is why
//! resolution lives here rather than inline in each handler. Resolution is
//! stateless; each call reads its inputs plus one store lookup.

use crate::error::{Error, Result};
use crate::ids::{MemberId, SystemId};
use crate::systems::{Member, System, SystemStore};

/// Resolve a system reference. `caller` backs the `@me` form and comes from
/// the Authorization token; short codes match case-insensitively, and a
/// numeric token falls back to a raw id lookup.
pub async fn resolve_system(
    store: &SystemStore,
    token: &str,
    caller: Option<&System>,
) -> Result<System> {
    if token == "@me" {
        return caller.cloned().ok_or(Error::Unauthorized);
    }
    if let Some(system) = store.system_by_hid(token).await {
        return Ok(system);
    }
    if let Ok(id) = token.parse::<u32>() {
        if let Some(system) = store.get_system(SystemId(id)).await {
            return Ok(system);
        }
    }
    Err(Error::SystemNotFound)
}

/// Resolve a member reference. Members have no `@me` form; the grammar is
/// short code first, then raw id.
pub async fn resolve_member(store: &SystemStore, token: &str) -> Result<Member> {
    if let Some(member) = store.member_by_hid(token).await {
        return Ok(member);
    }
    if let Ok(id) = token.parse::<u32>() {
        if let Some(member) = store.get_member(MemberId(id)).await {
            return Ok(member);
        }
    }
    Err(Error::MemberNotFound)
}
