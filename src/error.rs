//! switchkit error types
//!
//! One taxonomy for the whole request path: not-found variants per resource,
//! the ownership denial, aggregated patch validation, and auth. Every variant
//! maps to an HTTP status and a stable SCREAMING_SNAKE wire code via
//! [`IntoResponse`], so handlers can return `Result<_, Error>` directly.

use crate::patch::FieldError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// switchkit error type
#[derive(Error, Debug)]
pub enum Error {
    /// Referenced system does not exist
    #[error("System not found.")]
    SystemNotFound,

    /// Referenced member does not exist
    #[error("Member not found.")]
    MemberNotFound,

    /// Referenced message does not exist
    #[error("Message not found.")]
    MessageNotFound,

    /// No system settings row for the target guild
    #[error("No guild settings found for target guild.")]
    SystemGuildNotFound,

    /// No member settings row for the target guild
    #[error("No guild member settings found for target guild.")]
    MemberGuildNotFound,

    /// Target member exists but belongs to another system
    #[error("Target member is not part of your system.")]
    NotOwnMember,

    /// Member-mode autoproxy with no effective member to pin
    #[error("Missing autoproxy member for member-mode autoproxy.")]
    MissingAutoproxyMember,

    /// Patch body rejected; every offending field is listed
    #[error("Error parsing patch body.")]
    InvalidPatch(Vec<FieldError>),

    /// Missing or unknown Authorization token
    #[error("Missing or invalid Authorization header.")]
    Unauthorized,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for switchkit operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status and wire code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Error::SystemNotFound => (StatusCode::NOT_FOUND, "SYSTEM_NOT_FOUND"),
            Error::MemberNotFound => (StatusCode::NOT_FOUND, "MEMBER_NOT_FOUND"),
            Error::MessageNotFound => (StatusCode::NOT_FOUND, "MESSAGE_NOT_FOUND"),
            Error::SystemGuildNotFound => (StatusCode::NOT_FOUND, "SYSTEM_GUILD_NOT_FOUND"),
            Error::MemberGuildNotFound => (StatusCode::NOT_FOUND, "MEMBER_GUILD_NOT_FOUND"),
            Error::NotOwnMember => (StatusCode::FORBIDDEN, "NOT_OWN_MEMBER"),
            Error::MissingAutoproxyMember => {
                (StatusCode::BAD_REQUEST, "MISSING_AUTOPROXY_MEMBER")
            }
            Error::InvalidPatch(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            Error::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let fields = match &self {
            Error::InvalidPatch(errors) => Some(errors.clone()),
            _ => None,
        };
        let body = ApiError {
            error: ApiErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                fields,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// API error response envelope
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

/// API error detail
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    /// Per-field diagnostics, present on aggregated validation failures only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}
