//! Unified API router
//!
//! Merges all module routers into a single axum `Router` with CORS, request
//! tracing, and per-module shared state.
//!
//! ## Endpoint Map
//!
//! | Route                                              | Module   | Description              |
//! |----------------------------------------------------|----------|--------------------------|
//! | `GET /health`                                      | —        | Liveness probe           |
//! | `GET /systems/:system_ref`                         | systems  | Public system card       |
//! | `GET /systems/:system_ref/members`                 | systems  | Members of a system      |
//! | `GET /members/:member_ref`                         | systems  | Public member card       |
//! | `GET/PATCH /systems/@me/guilds/:guild_id`          | guilds   | Caller's guild settings  |
//! | `GET/PATCH /members/:member_ref/guilds/:guild_id`  | guilds   | Member guild settings    |
//! | `GET /messages/:message_id`                        | messages | Decoded proxied message  |

use crate::guilds::{guilds_router, GuildsState};
use crate::messages::{messages_router, MessagesState};
use crate::systems::{systems_router, SystemsState};
use axum::{
    http::{header, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete HTTP application
///
/// Merges all module routers, adds CORS and request tracing, and returns a
/// single `Router` ready to be served by `axum::serve`.
pub fn build_app(
    systems_state: SystemsState,
    guilds_state: GuildsState,
    messages_state: MessagesState,
    cors_origins: &[String],
) -> Router {
    let cors = build_cors(cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .merge(systems_router(systems_state))
        .merge(guilds_router(guilds_state))
        .merge(messages_router(messages_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// =============================================================================
// Root handlers
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// CORS
// =============================================================================

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(parsed)
    }
}
