use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// User input rejected before any mutation took place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("a template needs at least one exercise")]
    NoExercises,

    #[error("exercise already exists in catalog: {name}")]
    DuplicateExercise { name: String },

    #[error("a template named {name} already exists")]
    TemplateNameTaken { name: String },
}

/// Addressing errors against the active workout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no exercise at position {index}")]
    ExerciseOutOfRange { index: usize },

    #[error("exercise {exercise} has no set at position {index}")]
    SetOutOfRange { exercise: usize, index: usize },

    #[error("cannot move exercise from {from} to {to}")]
    InvalidMove { from: usize, to: usize },
}
