//! Storage key conventions.
//!
//! Pure string functions. Local keys name entries in the on-device
//! key→JSON store; table names address the hosted backend.

use uuid::Uuid;

pub const TEMPLATES: &str = "dreamshape_templates";

pub const WORKOUTS: &str = "dreamshape_workouts";

pub const EXERCISES: &str = "dreamshape_exercises";

pub const PROFILE: &str = "dreamshape_profile";

pub const ACTIVE_WORKOUT: &str = "dreamshape_active_workout";

pub const SESSION: &str = "dreamshape_session";

pub const LAST_SYNC: &str = "dreamshape_last_sync";

/// Per-account marker recording that local data has been pushed once.
pub fn migration_marker(user_id: Uuid) -> String {
    format!("migration_completed_{user_id}")
}

/// Remote table names.
pub mod table {
    pub const PROFILES: &str = "profiles";
    pub const TEMPLATES: &str = "templates";
    pub const WORKOUTS: &str = "workouts";
    pub const CUSTOM_EXERCISES: &str = "custom_exercises";
}
