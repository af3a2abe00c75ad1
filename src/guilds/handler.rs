//! HTTP handlers for guild settings
//!
//! Provides 4 endpoints:
//! - GET   /systems/@me/guilds/:guild_id           — caller's settings in a guild
//! - PATCH /systems/@me/guilds/:guild_id           — update them
//! - GET   /members/:member_ref/guilds/:guild_id   — a member's settings in a guild
//! - PATCH /members/:member_ref/guilds/:guild_id   — update them
//!
//! All four require the caller's API token. Bodies are accepted as raw JSON
//! objects and parsed by the patch engine so absent keys, explicit nulls,
//! and values stay distinguishable; a non-object body is rejected by the
//! extractor before any handler runs.

use crate::auth::authed_system;
use crate::error::Result;
use crate::guilds::service::SettingsService;
use crate::guilds::types::{MemberGuildSettingsResponse, SystemGuildSettingsResponse};
use crate::ids::GuildId;
use crate::systems::SystemStore;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Shared state for guild settings handlers
#[derive(Clone)]
pub struct GuildsState {
    pub systems: Arc<SystemStore>,
    pub service: SettingsService,
}

/// Create the guild settings router
pub fn guilds_router(state: GuildsState) -> Router {
    Router::new()
        .route(
            "/systems/@me/guilds/:guild_id",
            get(get_system_guild).patch(patch_system_guild),
        )
        .route(
            "/members/:member_ref/guilds/:guild_id",
            get(get_member_guild).patch(patch_member_guild),
        )
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /systems/@me/guilds/:guild_id
async fn get_system_guild(
    State(state): State<GuildsState>,
    Path(guild_id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<SystemGuildSettingsResponse>> {
    let system = authed_system(&headers, &state.systems).await?;
    let response = state.service.system_guild(&system, GuildId(guild_id)).await?;
    Ok(Json(response))
}

/// PATCH /systems/@me/guilds/:guild_id
async fn patch_system_guild(
    State(state): State<GuildsState>,
    Path(guild_id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<SystemGuildSettingsResponse>> {
    let system = authed_system(&headers, &state.systems).await?;
    let response = state
        .service
        .patch_system_guild(&system, GuildId(guild_id), &body)
        .await?;
    Ok(Json(response))
}

/// GET /members/:member_ref/guilds/:guild_id
async fn get_member_guild(
    State(state): State<GuildsState>,
    Path((member_ref, guild_id)): Path<(String, u64)>,
    headers: HeaderMap,
) -> Result<Json<MemberGuildSettingsResponse>> {
    let system = authed_system(&headers, &state.systems).await?;
    let response = state
        .service
        .member_guild(&system, &member_ref, GuildId(guild_id))
        .await?;
    Ok(Json(response))
}

/// PATCH /members/:member_ref/guilds/:guild_id
async fn patch_member_guild(
    State(state): State<GuildsState>,
    Path((member_ref, guild_id)): Path<(String, u64)>,
    headers: HeaderMap,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<MemberGuildSettingsResponse>> {
    let system = authed_system(&headers, &state.systems).await?;
    let response = state
        .service
        .patch_member_guild(&system, &member_ref, GuildId(guild_id), &body)
        .await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guilds::store::GuildSettingsStore;
    use crate::systems::types::Member;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const GUILD: u64 = 466707357099884544;

    struct Fixture {
        app: Router,
        systems: Arc<SystemStore>,
        guilds: Arc<GuildSettingsStore>,
        member: Member,
        token: String,
        _dir: TempDir,
    }

    async fn make_fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let systems = Arc::new(SystemStore::new(dir.path().to_path_buf()).await.unwrap());
        let guilds = Arc::new(
            GuildSettingsStore::new(dir.path().to_path_buf())
                .await
                .unwrap(),
        );
        let system = systems
            .create_system(Some("Demo system".to_string()), None)
            .await;
        let member = systems.create_member(system.id, "Ruby").await;
        let token = system.token.clone().unwrap();

        guilds.system_guild(system.id, GuildId(GUILD), true).await;
        guilds.member_guild(member.id, GuildId(GUILD), true).await;

        let app = guilds_router(GuildsState {
            systems: systems.clone(),
            service: SettingsService::new(systems.clone(), guilds.clone()),
        });

        Fixture {
            app,
            systems,
            guilds,
            member,
            token,
            _dir: dir,
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn get_request(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("authorization", token)
            .body(Body::empty())
            .unwrap()
    }

    fn patch_request(uri: &str, token: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("PATCH")
            .uri(uri)
            .header("authorization", token)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn system_guild_uri() -> String {
        format!("/systems/@me/guilds/{}", GUILD)
    }

    // -------------------------------------------------------------------------
    // System guild settings
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_get_requires_token() {
        let fx = make_fixture().await;
        let request = Request::builder()
            .uri(system_guild_uri())
            .body(Body::empty())
            .unwrap();
        let resp = fx.app.oneshot(request).await.unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_get_system_guild_settings() {
        let fx = make_fixture().await;
        let resp = fx
            .app
            .oneshot(get_request(&system_guild_uri(), &fx.token))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["guild_id"], GUILD.to_string());
        assert_eq!(json["proxying_enabled"], true);
        assert_eq!(json["autoproxy_mode"], "off");
        assert_eq!(json["autoproxy_member"], Value::Null);
        assert_eq!(json["tag_enabled"], true);
    }

    #[tokio::test]
    async fn test_get_unconfigured_guild_is_not_found() {
        let fx = make_fixture().await;
        let resp = fx
            .app
            .oneshot(get_request("/systems/@me/guilds/999", &fx.token))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "SYSTEM_GUILD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_patch_member_mode_without_member() {
        let fx = make_fixture().await;
        let resp = fx
            .app
            .oneshot(patch_request(
                &system_guild_uri(),
                &fx.token,
                json!({"autoproxy_mode": "member"}),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "MISSING_AUTOPROXY_MEMBER");
    }

    #[tokio::test]
    async fn test_patch_member_mode_with_member() {
        let fx = make_fixture().await;
        let resp = fx
            .app
            .clone()
            .oneshot(patch_request(
                &system_guild_uri(),
                &fx.token,
                json!({"autoproxy_mode": "member", "autoproxy_member": fx.member.hid}),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["autoproxy_mode"], "member");
        assert_eq!(json["autoproxy_member"], fx.member.hid);

        // The update round-trips through a plain read.
        let resp = fx
            .app
            .oneshot(get_request(&system_guild_uri(), &fx.token))
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["autoproxy_member"], fx.member.hid);
    }

    #[tokio::test]
    async fn test_patch_clearing_member_under_member_mode() {
        let fx = make_fixture().await;
        fx.app
            .clone()
            .oneshot(patch_request(
                &system_guild_uri(),
                &fx.token,
                json!({"autoproxy_mode": "member", "autoproxy_member": fx.member.hid}),
            ))
            .await
            .unwrap();

        let resp = fx
            .app
            .oneshot(patch_request(
                &system_guild_uri(),
                &fx.token,
                json!({"autoproxy_member": null}),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "MISSING_AUTOPROXY_MEMBER");
    }

    #[tokio::test]
    async fn test_patch_unknown_member_token() {
        let fx = make_fixture().await;
        let resp = fx
            .app
            .oneshot(patch_request(
                &system_guild_uri(),
                &fx.token,
                json!({"autoproxy_member": "zzzzz"}),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "MEMBER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_patch_aggregates_field_errors() {
        let fx = make_fixture().await;
        let resp = fx
            .app
            .oneshot(patch_request(
                &system_guild_uri(),
                &fx.token,
                json!({"proxying_enabled": "yes", "tag_enabled": 5}),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "VALIDATION_FAILED");
        let fields = json["error"]["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["field"], "proxying_enabled");
        assert_eq!(fields[1]["field"], "tag_enabled");
    }

    #[tokio::test]
    async fn test_patch_rejects_non_object_body() {
        let fx = make_fixture().await;
        let resp = fx
            .app
            .oneshot(patch_request(&system_guild_uri(), &fx.token, json!([1, 2])))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_patch_tag_and_toggles() {
        let fx = make_fixture().await;
        let resp = fx
            .app
            .clone()
            .oneshot(patch_request(
                &system_guild_uri(),
                &fx.token,
                json!({"tag": "| rby", "proxying_enabled": false}),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["tag"], "| rby");
        assert_eq!(json["proxying_enabled"], false);

        // Null reset puts the toggle back to its default.
        let resp = fx
            .app
            .oneshot(patch_request(
                &system_guild_uri(),
                &fx.token,
                json!({"proxying_enabled": null, "tag": null}),
            ))
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["proxying_enabled"], true);
        assert_eq!(json["tag"], Value::Null);
    }

    // -------------------------------------------------------------------------
    // Member guild settings
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_member_guild_get_and_patch() {
        let fx = make_fixture().await;
        let uri = format!("/members/{}/guilds/{}", fx.member.hid, GUILD);

        let resp = fx
            .app
            .clone()
            .oneshot(patch_request(
                &uri,
                &fx.token,
                json!({"display_name": "Ruby (guild)"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["display_name"], "Ruby (guild)");
        assert_eq!(json["guild_id"], GUILD.to_string());

        let resp = fx.app.oneshot(get_request(&uri, &fx.token)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["display_name"], "Ruby (guild)");
    }

    #[tokio::test]
    async fn test_member_guild_rejects_other_systems_member() {
        let fx = make_fixture().await;
        let other_system = fx.systems.create_system(None, None).await;
        let other_member = fx.systems.create_member(other_system.id, "Intruder").await;
        fx.guilds
            .member_guild(other_member.id, GuildId(GUILD), true)
            .await;

        let uri = format!("/members/{}/guilds/{}", other_member.hid, GUILD);
        let resp = fx.app.oneshot(get_request(&uri, &fx.token)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "NOT_OWN_MEMBER");
    }

    #[tokio::test]
    async fn test_member_guild_unknown_member() {
        let fx = make_fixture().await;
        let uri = format!("/members/zzzzz/guilds/{}", GUILD);
        let resp = fx.app.oneshot(get_request(&uri, &fx.token)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "MEMBER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_member_guild_unconfigured_guild() {
        let fx = make_fixture().await;
        let uri = format!("/members/{}/guilds/999", fx.member.hid);
        let resp = fx.app.oneshot(get_request(&uri, &fx.token)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "MEMBER_GUILD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_member_guild_avatar_validation() {
        let fx = make_fixture().await;
        let uri = format!("/members/{}/guilds/{}", fx.member.hid, GUILD);
        let resp = fx
            .app
            .oneshot(patch_request(&uri, &fx.token, json!({"avatar_url": "not a url"})))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(json["error"]["fields"][0]["field"], "avatar_url");
    }
}
