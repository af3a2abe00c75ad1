//! HTTP handlers for system and member lookups
//!
//! Provides 3 public read endpoints:
//! - GET /systems/:system_ref          — system card
//! - GET /systems/:system_ref/members  — members of a system
//! - GET /members/:member_ref          — member card
//!
//! `system_ref` accepts `@me` (Authorization token required), a short code,
//! or a raw id; `member_ref` accepts everything except `@me`.

use crate::auth::maybe_authed_system;
use crate::error::Result;
use crate::resolver::{resolve_member, resolve_system};
use crate::systems::store::SystemStore;
use crate::systems::types::{MemberCard, SystemCard};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

/// Shared state for system handlers
#[derive(Clone)]
pub struct SystemsState {
    pub store: Arc<SystemStore>,
}

/// Create the systems + members lookup router
pub fn systems_router(state: SystemsState) -> Router {
    Router::new()
        .route("/systems/:system_ref", get(get_system))
        .route("/systems/:system_ref/members", get(list_system_members))
        .route("/members/:member_ref", get(get_member))
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /systems/:system_ref
async fn get_system(
    State(state): State<SystemsState>,
    Path(system_ref): Path<String>,
    headers: HeaderMap,
) -> Result<Json<SystemCard>> {
    let caller = maybe_authed_system(&headers, &state.store).await?;
    let system = resolve_system(&state.store, &system_ref, caller.as_ref()).await?;
    Ok(Json(system.to_card()))
}

/// GET /systems/:system_ref/members
async fn list_system_members(
    State(state): State<SystemsState>,
    Path(system_ref): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<MemberCard>>> {
    let caller = maybe_authed_system(&headers, &state.store).await?;
    let system = resolve_system(&state.store, &system_ref, caller.as_ref()).await?;
    let members = state.store.members_of(system.id).await;
    Ok(Json(members.iter().map(|m| m.to_card()).collect()))
}

/// GET /members/:member_ref
async fn get_member(
    State(state): State<SystemsState>,
    Path(member_ref): Path<String>,
) -> Result<Json<MemberCard>> {
    let member = resolve_member(&state.store, &member_ref).await?;
    Ok(Json(member.to_card()))
}
