use dreamshape_core::error::{SessionError, ValidationError};
use dreamshape_storage::error::StorageError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("template not found: {0}")]
    TemplateNotFound(Uuid),

    #[error("workout not found: {0}")]
    WorkoutNotFound(Uuid),

    #[error("a workout is already in progress")]
    WorkoutInProgress,

    #[error("no workout in progress")]
    NoActiveWorkout,
}
