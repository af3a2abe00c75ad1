//! Systems module — system and member registry
//!
//! Owns the canonical records for systems and their members, plus the public
//! lookup endpoints. Short codes (5-letter ids) are the wire-facing identity;
//! internal numeric ids never leave the process except as opaque raw-id
//! lookup tokens.

pub mod handler;
pub mod store;
pub mod types;

pub use handler::{systems_router, SystemsState};
pub use store::SystemStore;
pub use types::{Member, MemberCard, System, SystemCard};
