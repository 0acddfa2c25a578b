use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::models::exercise::TemplateExercise;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTemplate {
    pub id: Uuid,
    pub name: String,
    pub exercises: Vec<TemplateExercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl WorkoutTemplate {
    /// Build a new template after validating its name and exercise list.
    /// The name is stored trimmed.
    pub fn new(
        name: &str,
        exercises: Vec<TemplateExercise>,
        notes: Option<String>,
    ) -> Result<Self, ValidationError> {
        validate(name, &exercises)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            exercises,
            notes,
        })
    }

    /// Replace name, exercises and notes in place. Leaves the template
    /// untouched when validation fails.
    pub fn replace(
        &mut self,
        name: &str,
        exercises: Vec<TemplateExercise>,
        notes: Option<String>,
    ) -> Result<(), ValidationError> {
        validate(name, &exercises)?;
        self.name = name.trim().to_string();
        self.exercises = exercises;
        self.notes = notes;
        Ok(())
    }
}

/// A template needs a non-blank name and at least one exercise.
pub fn validate(name: &str, exercises: &[TemplateExercise]) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if exercises.is_empty() {
        return Err(ValidationError::NoExercises);
    }
    Ok(())
}
