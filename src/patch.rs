//! Tri-state patch fields
//!
//! PATCH bodies distinguish three states per key: absent (leave the stored
//! value alone), present with `null` (clear to the field's default), and
//! present with a value (set). A plain `Option<T>` collapses the first two,
//! so every patch type wraps its fields in [`PatchField`] and apply logic
//! branches on all three states.

use serde::Serialize;

/// One field of a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchField<T> {
    /// Key absent from the body. The stored value stays untouched.
    Absent,
    /// Key present as JSON null. Resets the field to its default.
    Clear,
    /// Key present with a value.
    Set(T),
}

impl<T> Default for PatchField<T> {
    fn default() -> Self {
        PatchField::Absent
    }
}

impl<T> PatchField<T> {
    /// True when the key appeared in the body at all, as null or as a value.
    pub fn is_present(&self) -> bool {
        !matches!(self, PatchField::Absent)
    }

    pub fn is_set(&self) -> bool {
        matches!(self, PatchField::Set(_))
    }

    /// The post-patch value of an optional field: the explicit new value when
    /// the key was present, otherwise the stored value carried over. This is
    /// what cross-field rules must look at, never the raw field alone.
    pub fn effective(&self, current: Option<T>) -> Option<T>
    where
        T: Clone,
    {
        match self {
            PatchField::Absent => current,
            PatchField::Clear => None,
            PatchField::Set(value) => Some(value.clone()),
        }
    }

    /// The post-patch value of a field with a non-null default.
    pub fn effective_or(&self, current: T, default: T) -> T
    where
        T: Clone,
    {
        match self {
            PatchField::Absent => current,
            PatchField::Clear => default,
            PatchField::Set(value) => value.clone(),
        }
    }

    /// Write this field into an optional slot.
    pub fn apply_to(&self, slot: &mut Option<T>)
    where
        T: Clone,
    {
        match self {
            PatchField::Absent => {}
            PatchField::Clear => *slot = None,
            PatchField::Set(value) => *slot = Some(value.clone()),
        }
    }

    /// Write this field into a slot whose cleared state is `default`.
    pub fn apply_or(&self, slot: &mut T, default: T)
    where
        T: Clone,
    {
        match self {
            PatchField::Absent => {}
            PatchField::Clear => *slot = default,
            PatchField::Set(value) => *slot = value.clone(),
        }
    }
}

/// A single rejected field in a patch body. Collected, not fail-fast, so a
/// client can fix every problem in one round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_absent() {
        let field: PatchField<String> = PatchField::default();
        assert_eq!(field, PatchField::Absent);
        assert!(!field.is_present());
    }

    #[test]
    fn test_presence() {
        assert!(!PatchField::<u32>::Absent.is_present());
        assert!(PatchField::<u32>::Clear.is_present());
        assert!(PatchField::Set(1).is_present());
        assert!(PatchField::Set(1).is_set());
        assert!(!PatchField::<u32>::Clear.is_set());
    }

    #[test]
    fn test_effective_carries_current_when_absent() {
        let field: PatchField<u32> = PatchField::Absent;
        assert_eq!(field.effective(Some(9)), Some(9));
        assert_eq!(field.effective(None), None);
    }

    #[test]
    fn test_effective_clear_and_set_override_current() {
        assert_eq!(PatchField::<u32>::Clear.effective(Some(9)), None);
        assert_eq!(PatchField::Set(3).effective(Some(9)), Some(3));
        assert_eq!(PatchField::Set(3).effective(None), Some(3));
    }

    #[test]
    fn test_effective_or_defaulted_field() {
        assert_eq!(PatchField::<bool>::Absent.effective_or(false, true), false);
        assert_eq!(PatchField::<bool>::Clear.effective_or(false, true), true);
        assert_eq!(PatchField::Set(false).effective_or(true, true), false);
    }

    #[test]
    fn test_apply_to_option() {
        let mut slot = Some("kept".to_string());
        PatchField::<String>::Absent.apply_to(&mut slot);
        assert_eq!(slot.as_deref(), Some("kept"));

        PatchField::Set("new".to_string()).apply_to(&mut slot);
        assert_eq!(slot.as_deref(), Some("new"));

        PatchField::<String>::Clear.apply_to(&mut slot);
        assert_eq!(slot, None);
    }

    #[test]
    fn test_apply_or_resets_to_default() {
        let mut enabled = false;
        PatchField::<bool>::Clear.apply_or(&mut enabled, true);
        assert!(enabled);

        PatchField::Set(false).apply_or(&mut enabled, true);
        assert!(!enabled);

        PatchField::<bool>::Absent.apply_or(&mut enabled, true);
        assert!(!enabled);
    }

    #[test]
    fn test_absent_and_clear_never_conflate() {
        // The two no-value states must stay distinguishable end to end.
        assert_ne!(PatchField::<u32>::Absent, PatchField::<u32>::Clear);
        assert_eq!(PatchField::<u32>::Absent.effective(Some(1)), Some(1));
        assert_eq!(PatchField::<u32>::Clear.effective(Some(1)), None);
    }

    #[test]
    fn test_field_error_display_and_json() {
        let err = FieldError::new("tag", "Must be 79 characters or shorter.");
        assert_eq!(err.to_string(), "tag: Must be 79 characters or shorter.");

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"field\":\"tag\""));
        assert!(json.contains("\"message\":\"Must be 79 characters or shorter.\""));
    }
}
