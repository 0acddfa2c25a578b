//! The active workout state machine.
//!
//! An [`ActiveWorkout`] is created from a template or empty, mutated set by
//! set, and consumed by [`ActiveWorkout::finish`]. The "absent" state is the
//! owner holding `None`.

use jiff::Timestamp;
use uuid::Uuid;

use crate::catalog::ExerciseCatalog;
use crate::error::SessionError;
use crate::history;
use crate::models::exercise::TemplateExercise;
use crate::models::template::WorkoutTemplate;
use crate::models::workout::{
    ActiveWorkout, ActivityType, ExerciseLog, SetType, WorkoutLog, WorkoutSet,
};

pub const EMPTY_WORKOUT_NAME: &str = "Empty Workout";

/// A field edit on a single set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetField {
    Weight(f64),
    Reps(u32),
}

/// Emitted when a set is toggled to completed: start a rest countdown
/// scoped to `exercise`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestRequest {
    pub exercise: usize,
    pub seconds: u32,
}

/// Exercise names added to or removed from the source template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl ExerciseChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Sets for a new exercise log: a fresh copy of `previous`, or one empty set.
fn prefill(previous: Option<&ExerciseLog>) -> Vec<WorkoutSet> {
    match previous {
        Some(log) if !log.sets.is_empty() => log.sets.iter().map(WorkoutSet::carry_over).collect(),
        _ => vec![WorkoutSet::empty()],
    }
}

impl ActiveWorkout {
    /// Start from a template, pre-filling each exercise from the most recent
    /// session of the same template.
    pub fn from_template(
        template: &WorkoutTemplate,
        logs: &[WorkoutLog],
        now: Timestamp,
        default_rest_seconds: u32,
    ) -> Self {
        let exercises = template
            .exercises
            .iter()
            .map(|ex| ExerciseLog {
                exercise_id: ex.id,
                exercise_name: ex.name.clone(),
                sets: prefill(history::last_for_template(logs, &template.name, &ex.name)),
                rest_duration: None,
                notes: None,
            })
            .collect();

        Self {
            template_name: template.name.clone(),
            original_template_id: Some(template.id),
            exercises,
            start_time: now,
            notes: None,
            default_rest_seconds,
        }
    }

    pub fn empty(now: Timestamp, default_rest_seconds: u32) -> Self {
        Self {
            template_name: EMPTY_WORKOUT_NAME.to_string(),
            original_template_id: None,
            exercises: Vec::new(),
            start_time: now,
            notes: None,
            default_rest_seconds,
        }
    }

    fn exercise_mut(&mut self, exercise: usize) -> Result<&mut ExerciseLog, SessionError> {
        self.exercises
            .get_mut(exercise)
            .ok_or(SessionError::ExerciseOutOfRange { index: exercise })
    }

    fn set_mut(&mut self, exercise: usize, set: usize) -> Result<&mut WorkoutSet, SessionError> {
        self.exercise_mut(exercise)?
            .sets
            .get_mut(set)
            .ok_or(SessionError::SetOutOfRange {
                exercise,
                index: set,
            })
    }

    pub fn update_set(
        &mut self,
        exercise: usize,
        set: usize,
        field: SetField,
    ) -> Result<(), SessionError> {
        let target = self.set_mut(exercise, set)?;
        match field {
            SetField::Weight(w) => target.weight = w,
            SetField::Reps(r) => target.reps = r,
        }
        Ok(())
    }

    /// Flip the completed flag. Completing a set yields a [`RestRequest`].
    pub fn toggle_set_completed(
        &mut self,
        exercise: usize,
        set: usize,
    ) -> Result<Option<RestRequest>, SessionError> {
        let target = self.set_mut(exercise, set)?;
        target.completed = !target.completed;
        if !target.completed {
            return Ok(None);
        }
        Ok(Some(RestRequest {
            exercise,
            seconds: self.rest_duration_for(exercise)?,
        }))
    }

    /// Switch a set between warm-up and working.
    pub fn toggle_set_type(&mut self, exercise: usize, set: usize) -> Result<SetType, SessionError> {
        let target = self.set_mut(exercise, set)?;
        let next = if target.is_warmup() {
            SetType::Working
        } else {
            SetType::Warmup
        };
        target.set_type = Some(next);
        Ok(next)
    }

    /// Append a set copying the last set's weight and reps.
    pub fn add_set(&mut self, exercise: usize) -> Result<(), SessionError> {
        let log = self.exercise_mut(exercise)?;
        let next = log
            .sets
            .last()
            .map(WorkoutSet::carry_over)
            .unwrap_or_else(WorkoutSet::empty);
        log.sets.push(next);
        Ok(())
    }

    /// Remove a set. Returns `false` without touching anything when it is the
    /// exercise's only set.
    pub fn remove_set(&mut self, exercise: usize, set: usize) -> Result<bool, SessionError> {
        let log = self.exercise_mut(exercise)?;
        if set >= log.sets.len() {
            return Err(SessionError::SetOutOfRange {
                exercise,
                index: set,
            });
        }
        if log.sets.len() == 1 {
            return Ok(false);
        }
        log.sets.remove(set);
        Ok(true)
    }

    /// Append an exercise, pre-filled from its latest appearance in any log.
    pub fn add_exercise(&mut self, exercise: &TemplateExercise, logs: &[WorkoutLog]) {
        self.exercises.push(ExerciseLog {
            exercise_id: exercise.id,
            exercise_name: exercise.name.clone(),
            sets: prefill(history::last_for_exercise(logs, &exercise.name)),
            rest_duration: None,
            notes: None,
        });
    }

    /// Removal of an exercise with completed sets should be confirmed first.
    pub fn needs_confirmation_to_remove(&self, exercise: usize) -> Result<bool, SessionError> {
        self.exercises
            .get(exercise)
            .map(ExerciseLog::has_completed_sets)
            .ok_or(SessionError::ExerciseOutOfRange { index: exercise })
    }

    pub fn remove_exercise(&mut self, exercise: usize) -> Result<ExerciseLog, SessionError> {
        if exercise >= self.exercises.len() {
            return Err(SessionError::ExerciseOutOfRange { index: exercise });
        }
        Ok(self.exercises.remove(exercise))
    }

    pub fn move_exercise(&mut self, from: usize, to: usize) -> Result<(), SessionError> {
        let len = self.exercises.len();
        if from >= len || to >= len {
            return Err(SessionError::InvalidMove { from, to });
        }
        let item = self.exercises.remove(from);
        self.exercises.insert(to, item);
        Ok(())
    }

    /// `None` clears the override.
    pub fn set_exercise_rest(
        &mut self,
        exercise: usize,
        seconds: Option<u32>,
    ) -> Result<(), SessionError> {
        self.exercise_mut(exercise)?.rest_duration = seconds;
        Ok(())
    }

    pub fn set_default_rest(&mut self, seconds: u32) {
        self.default_rest_seconds = seconds;
    }

    pub fn rest_duration_for(&self, exercise: usize) -> Result<u32, SessionError> {
        self.exercises
            .get(exercise)
            .map(|log| log.rest_duration.unwrap_or(self.default_rest_seconds))
            .ok_or(SessionError::ExerciseOutOfRange { index: exercise })
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes.filter(|n| !n.trim().is_empty());
    }

    pub fn set_exercise_notes(
        &mut self,
        exercise: usize,
        notes: Option<String>,
    ) -> Result<(), SessionError> {
        self.exercise_mut(exercise)?.notes = notes.filter(|n| !n.trim().is_empty());
        Ok(())
    }

    /// Whole seconds since start; never negative.
    pub fn elapsed_seconds(&self, now: Timestamp) -> u64 {
        u64::try_from(now.as_second() - self.start_time.as_second()).unwrap_or(0)
    }

    /// The session's exercises as template entries, in session order.
    ///
    /// Equipment, muscle group and notes come from the matching entry of
    /// `source`, then from the catalog, then the free-form defaults.
    pub fn template_exercises(
        &self,
        source: Option<&WorkoutTemplate>,
        catalog: &ExerciseCatalog,
    ) -> Vec<TemplateExercise> {
        self.exercises
            .iter()
            .map(|log| {
                let from_source = source
                    .and_then(|t| t.exercises.iter().find(|ex| ex.name == log.exercise_name));
                let mut entry = match (from_source, catalog.find(&log.exercise_name)) {
                    (Some(ex), _) => ex.clone(),
                    (None, Some(known)) => TemplateExercise::from_catalog(known),
                    (None, None) => TemplateExercise::ad_hoc(&log.exercise_name),
                };
                entry.id = log.exercise_id;
                entry.name = log.exercise_name.clone();
                entry
            })
            .collect()
    }

    /// Names added or removed relative to `template`.
    pub fn changes_against(&self, template: &WorkoutTemplate) -> ExerciseChanges {
        let added = self
            .exercises
            .iter()
            .filter(|log| !template.exercises.iter().any(|ex| ex.name == log.exercise_name))
            .map(|log| log.exercise_name.clone())
            .collect();
        let removed = template
            .exercises
            .iter()
            .filter(|ex| !self.exercises.iter().any(|log| log.exercise_name == ex.name))
            .map(|ex| ex.name.clone())
            .collect();
        ExerciseChanges { added, removed }
    }

    /// Close the session into an immutable log.
    pub fn finish(self, now: Timestamp, activity_type: Option<ActivityType>) -> WorkoutLog {
        let duration = self.elapsed_seconds(now);
        WorkoutLog {
            id: Uuid::new_v4(),
            template_name: self.template_name,
            date: now,
            exercises: self.exercises,
            duration,
            activity_type,
        }
    }
}
