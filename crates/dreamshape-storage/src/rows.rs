//! Row shapes of the remote tables.
//!
//! Column names are snake_case and every row carries the owning user id.
//! Exercise lists are stored as JSON columns in the same camelCase shape
//! as local storage.

use dreamshape_core::models::exercise::{CatalogEntry, TemplateExercise};
use dreamshape_core::models::profile::{Role, UserProfile};
use dreamshape_core::models::template::WorkoutTemplate;
use dreamshape_core::models::workout::{ActivityType, ExerciseLog, WorkoutLog};
use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: Uuid,
    pub name: String,
    pub member_since: Date,
    #[serde(default)]
    pub role: Option<Role>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        UserProfile {
            name: row.name,
            member_since: row.member_since,
            role: row.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub exercises: Vec<TemplateExercise>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TemplateRow {
    pub fn new(user_id: Uuid, template: WorkoutTemplate) -> Self {
        Self {
            id: template.id,
            user_id,
            name: template.name,
            exercises: template.exercises,
            notes: template.notes,
        }
    }
}

impl From<TemplateRow> for WorkoutTemplate {
    fn from(row: TemplateRow) -> Self {
        WorkoutTemplate {
            id: row.id,
            name: row.name,
            exercises: row.exercises,
            notes: row.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub template_name: String,
    pub date: Timestamp,
    pub duration: u64,
    pub exercises: Vec<ExerciseLog>,
    pub activity_type: ActivityType,
}

impl WorkoutRow {
    /// Missing activity types are stored as plain workouts.
    pub fn new(user_id: Uuid, log: WorkoutLog) -> Self {
        Self {
            id: log.id,
            user_id,
            template_name: log.template_name,
            date: log.date,
            duration: log.duration,
            exercises: log.exercises,
            activity_type: log.activity_type.unwrap_or_default(),
        }
    }
}

impl From<WorkoutRow> for WorkoutLog {
    fn from(row: WorkoutRow) -> Self {
        WorkoutLog {
            id: row.id,
            template_name: row.template_name,
            date: row.date,
            exercises: row.exercises,
            duration: row.duration,
            activity_type: Some(row.activity_type),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomExerciseRow {
    pub user_id: Uuid,
    pub name: String,
    pub muscle_group: String,
    pub equipment: String,
}

impl CustomExerciseRow {
    pub fn new(user_id: Uuid, entry: CatalogEntry) -> Self {
        Self {
            user_id,
            name: entry.name,
            muscle_group: entry.muscle_group,
            equipment: entry.equipment,
        }
    }
}

impl From<CustomExerciseRow> for CatalogEntry {
    fn from(row: CustomExerciseRow) -> Self {
        CatalogEntry {
            name: row.name,
            muscle_group: row.muscle_group,
            equipment: row.equipment,
        }
    }
}
