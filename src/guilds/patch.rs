//! Guild settings patches
//!
//! Parses untyped JSON objects into tri-state patch bundles, aggregating
//! coercion failures per field instead of failing fast. The system-guild
//! variant additionally carries the one cross-field rule in this service:
//! member-mode autoproxy requires a pinned member, judged against the
//! *effective* post-patch state (explicit new values where present, stored
//! values carried over where absent).
//!
//! The `autoproxy_member` reference field is resolved to a [`MemberId`]
//! before parsing, by the caller, since resolution needs a store lookup;
//! everything else coerces synchronously. Unknown keys are ignored.

use crate::guilds::types::{
    AutoproxyMode, MemberGuildSettings, SystemGuildSettings, MAX_AVATAR_URL_LENGTH,
    MAX_DISPLAY_NAME_LENGTH, MAX_TAG_LENGTH,
};
use crate::ids::MemberId;
use crate::patch::{FieldError, PatchField};
use serde_json::{Map, Value};
use url::Url;

// =============================================================================
// Field coercion helpers
// =============================================================================

fn bool_field(
    raw: &Map<String, Value>,
    key: &'static str,
    errors: &mut Vec<FieldError>,
) -> PatchField<bool> {
    match raw.get(key) {
        None => PatchField::Absent,
        Some(Value::Null) => PatchField::Clear,
        Some(Value::Bool(value)) => PatchField::Set(*value),
        Some(_) => {
            errors.push(FieldError::new(key, "Must be a boolean or null."));
            PatchField::Absent
        }
    }
}

/// Strings have a length cap, and an empty string clears the field just like
/// an explicit null.
fn string_field(
    raw: &Map<String, Value>,
    key: &'static str,
    max_length: usize,
    errors: &mut Vec<FieldError>,
) -> PatchField<String> {
    match raw.get(key) {
        None => PatchField::Absent,
        Some(Value::Null) => PatchField::Clear,
        Some(Value::String(value)) => {
            if value.is_empty() {
                PatchField::Clear
            } else if value.chars().count() > max_length {
                errors.push(FieldError::new(
                    key,
                    format!("Must be {} characters or shorter.", max_length),
                ));
                PatchField::Absent
            } else {
                PatchField::Set(value.clone())
            }
        }
        Some(_) => {
            errors.push(FieldError::new(key, "Must be a string or null."));
            PatchField::Absent
        }
    }
}

fn mode_field(raw: &Map<String, Value>, errors: &mut Vec<FieldError>) -> PatchField<AutoproxyMode> {
    const MESSAGE: &str = "Must be one of \"off\", \"front\", \"latch\" or \"member\".";
    match raw.get("autoproxy_mode") {
        None => PatchField::Absent,
        Some(Value::Null) => PatchField::Clear,
        Some(Value::String(value)) => match value.parse() {
            Ok(mode) => PatchField::Set(mode),
            Err(_) => {
                errors.push(FieldError::new("autoproxy_mode", MESSAGE));
                PatchField::Absent
            }
        },
        Some(_) => {
            errors.push(FieldError::new("autoproxy_mode", MESSAGE));
            PatchField::Absent
        }
    }
}

// =============================================================================
// System-guild patch
// =============================================================================

/// Partial update for a [`SystemGuildSettings`] row.
#[derive(Debug, Clone)]
pub struct SystemGuildPatch {
    pub proxying_enabled: PatchField<bool>,
    pub tag: PatchField<String>,
    pub tag_enabled: PatchField<bool>,
    pub autoproxy_mode: PatchField<AutoproxyMode>,
    pub autoproxy_member: PatchField<MemberId>,
    errors: Vec<FieldError>,
}

impl SystemGuildPatch {
    /// Coerce the scalar fields out of a raw JSON object. `autoproxy_member`
    /// arrives pre-resolved: `Set` when the body named a member that exists,
    /// `Clear` when the body carried null, `Absent` when the key was missing.
    pub fn from_json(raw: &Map<String, Value>, autoproxy_member: PatchField<MemberId>) -> Self {
        let mut errors = Vec::new();
        Self {
            proxying_enabled: bool_field(raw, "proxying_enabled", &mut errors),
            tag: string_field(raw, "tag", MAX_TAG_LENGTH, &mut errors),
            tag_enabled: bool_field(raw, "tag_enabled", &mut errors),
            autoproxy_mode: mode_field(raw, &mut errors),
            autoproxy_member,
            errors,
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The cross-field rule: would applying this patch leave the row in
    /// member-mode autoproxy with no pinned member? Both fields are judged
    /// by their effective post-patch values, so a patch touching only the
    /// mode is checked against the stored member and vice versa.
    pub fn missing_autoproxy_member(&self, current: &SystemGuildSettings) -> bool {
        let member = self.autoproxy_member.effective(current.autoproxy_member);
        let mode = self
            .autoproxy_mode
            .effective_or(current.autoproxy_mode, AutoproxyMode::Off);
        member.is_none() && mode == AutoproxyMode::Member
    }

    /// Write the patch into a settings row. Calling this with field errors
    /// outstanding is a bug in the caller, not a runtime condition.
    pub fn apply_to(&self, settings: &mut SystemGuildSettings) {
        assert!(
            self.errors.is_empty(),
            "applied a system guild patch that still has field errors"
        );
        self.proxying_enabled
            .apply_or(&mut settings.proxying_enabled, true);
        self.tag.apply_to(&mut settings.tag);
        self.tag_enabled.apply_or(&mut settings.tag_enabled, true);
        self.autoproxy_mode
            .apply_or(&mut settings.autoproxy_mode, AutoproxyMode::Off);
        self.autoproxy_member.apply_to(&mut settings.autoproxy_member);
    }
}

// =============================================================================
// Member-guild patch
// =============================================================================

/// Partial update for a [`MemberGuildSettings`] row. No reference fields and
/// no cross-field rule; everything coerces locally.
#[derive(Debug, Clone)]
pub struct MemberGuildPatch {
    pub display_name: PatchField<String>,
    pub avatar_url: PatchField<String>,
    errors: Vec<FieldError>,
}

impl MemberGuildPatch {
    pub fn from_json(raw: &Map<String, Value>) -> Self {
        let mut errors = Vec::new();
        let display_name = string_field(raw, "display_name", MAX_DISPLAY_NAME_LENGTH, &mut errors);
        let mut avatar_url = string_field(raw, "avatar_url", MAX_AVATAR_URL_LENGTH, &mut errors);
        if let PatchField::Set(ref value) = avatar_url {
            if Url::parse(value).is_err() {
                errors.push(FieldError::new("avatar_url", "Must be a valid URL."));
                avatar_url = PatchField::Absent;
            }
        }
        Self {
            display_name,
            avatar_url,
            errors,
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn apply_to(&self, settings: &mut MemberGuildSettings) {
        assert!(
            self.errors.is_empty(),
            "applied a member guild patch that still has field errors"
        );
        self.display_name.apply_to(&mut settings.display_name);
        self.avatar_url.apply_to(&mut settings.avatar_url);
    }
}
