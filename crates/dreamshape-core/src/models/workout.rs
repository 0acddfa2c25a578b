use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rest between sets when neither the exercise nor the config says otherwise.
pub const DEFAULT_REST_SECONDS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetType {
    Warmup,
    Working,
}

/// One recorded attempt within an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    pub id: Uuid,
    pub weight: f64,
    pub reps: u32,
    pub completed: bool,
    /// Missing means a working set.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub set_type: Option<SetType>,
}

impl WorkoutSet {
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            weight: 0.0,
            reps: 0,
            completed: false,
            set_type: None,
        }
    }

    /// Fresh, uncompleted set carrying over weight, reps and type.
    pub fn carry_over(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            weight: self.weight,
            reps: self.reps,
            completed: false,
            set_type: self.set_type,
        }
    }

    pub fn is_warmup(&self) -> bool {
        self.set_type == Some(SetType::Warmup)
    }

    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub sets: Vec<WorkoutSet>,
    /// Rest override in seconds for this exercise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExerciseLog {
    pub fn has_completed_sets(&self) -> bool {
        self.sets.iter().any(|s| s.completed)
    }

    pub fn volume(&self) -> f64 {
        self.sets.iter().map(WorkoutSet::volume).sum()
    }

    pub fn max_weight(&self) -> Option<f64> {
        self.sets.iter().map(|s| s.weight).reduce(f64::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    #[default]
    Workout,
    Cardio,
    Stretching,
    Recovery,
}

/// Immutable record of a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: Uuid,
    pub template_name: String,
    pub date: Timestamp,
    pub exercises: Vec<ExerciseLog>,
    /// Seconds.
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityType>,
}

impl WorkoutLog {
    pub fn exercise(&self, name: &str) -> Option<&ExerciseLog> {
        self.exercises.iter().find(|e| e.exercise_name == name)
    }

    pub fn volume(&self) -> f64 {
        self.exercises.iter().map(ExerciseLog::volume).sum()
    }
}

/// The single in-progress session. State transitions live in
/// [`crate::session`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveWorkout {
    pub template_name: String,
    /// `None` when started empty.
    pub original_template_id: Option<Uuid>,
    pub exercises: Vec<ExerciseLog>,
    pub start_time: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default = "default_rest")]
    pub default_rest_seconds: u32,
}

fn default_rest() -> u32 {
    DEFAULT_REST_SECONDS
}
