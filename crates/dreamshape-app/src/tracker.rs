//! The controller owning every piece of user state.
//!
//! Each mutation writes the affected collection to the local store first
//! (errors propagate) and then, when a remote session is attached, hands
//! the matching remote call to the [`RemoteWriter`]. Remote outcomes never
//! feed back into local state.

use dreamshape_core::catalog::{self, ExerciseCatalog};
use dreamshape_core::error::{SessionError, ValidationError};
use dreamshape_core::history;
use dreamshape_core::models::exercise::{CatalogEntry, TemplateExercise};
use dreamshape_core::models::profile::UserProfile;
use dreamshape_core::models::template::{self, WorkoutTemplate};
use dreamshape_core::models::workout::{ActiveWorkout, ActivityType, SetType, WorkoutLog};
use dreamshape_core::session::{ExerciseChanges, RestRequest, SetField};
use dreamshape_core::stats::{self, Summary};
use dreamshape_core::storage_keys;
use dreamshape_storage::local::LocalStore;
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};
use uuid::Uuid;

use crate::confirm::Confirm;
use crate::error::TrackerError;
use crate::export::ExportDocument;
use crate::timers::{SessionTimers, TimerEvent};
use crate::writer::{RemoteOp, RemoteWriter, SyncStatus};

/// What to do with the originating template when finishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishChoice {
    JustFinish,
    /// Overwrite the source template's exercise list with the session's.
    UpdateTemplate,
    SaveAsNew { name: String },
}

/// Everything pulled from the backend during sync.
#[derive(Debug, Clone, Default)]
pub struct RemoteSnapshot {
    pub profile: Option<UserProfile>,
    pub templates: Vec<WorkoutTemplate>,
    pub workouts: Vec<WorkoutLog>,
    pub custom_exercises: Vec<CatalogEntry>,
}

pub struct Tracker {
    store: LocalStore,
    templates: Vec<WorkoutTemplate>,
    /// Newest first.
    workouts: Vec<WorkoutLog>,
    catalog: ExerciseCatalog,
    profile: UserProfile,
    active: Option<ActiveWorkout>,
    selected_workout: Option<Uuid>,
    default_rest_seconds: u32,
    remote: Option<RemoteWriter>,
    timers: SessionTimers,
    last_synced: Option<Timestamp>,
}

fn sort_newest_first(logs: &mut [WorkoutLog]) {
    logs.sort_by(|a, b| b.date.cmp(&a.date));
}

impl Tracker {
    /// Load every collection from `store`. Missing or malformed entries
    /// fall back to their defaults.
    pub fn open(store: LocalStore, default_rest_seconds: u32) -> Self {
        let templates: Vec<WorkoutTemplate> = store.load_or_default(storage_keys::TEMPLATES);
        let mut workouts: Vec<WorkoutLog> = store.load_or_default(storage_keys::WORKOUTS);
        sort_newest_first(&mut workouts);
        let catalog: ExerciseCatalog = store.load_or_default(storage_keys::EXERCISES);
        let profile = store
            .load(storage_keys::PROFILE)
            .unwrap_or_else(|| UserProfile::new_default(Zoned::now().date()));
        let active: Option<ActiveWorkout> = store.load(storage_keys::ACTIVE_WORKOUT);
        let last_synced = store.load(storage_keys::LAST_SYNC);

        let mut timers = SessionTimers::new();
        if let Some(active) = &active {
            timers.start_elapsed(active.start_time);
        }

        tracing::info!(
            root = %store.root().display(),
            templates = templates.len(),
            workouts = workouts.len(),
            exercises = catalog.len(),
            active = active.is_some(),
            "tracker opened"
        );

        Self {
            store,
            templates,
            workouts,
            catalog,
            profile,
            active,
            selected_workout: None,
            default_rest_seconds,
            remote: None,
            timers,
            last_synced,
        }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn templates(&self) -> &[WorkoutTemplate] {
        &self.templates
    }

    pub fn template(&self, id: Uuid) -> Option<&WorkoutTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn workouts(&self) -> &[WorkoutLog] {
        &self.workouts
    }

    pub fn catalog(&self) -> &ExerciseCatalog {
        &self.catalog
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn active(&self) -> Option<&ActiveWorkout> {
        self.active.as_ref()
    }

    pub fn default_rest_seconds(&self) -> u32 {
        self.default_rest_seconds
    }

    // ── Remote ─────────────────────────────────────────────────────

    pub fn attach_remote(&mut self, writer: RemoteWriter) {
        if let Some(at) = self.last_synced {
            writer.mark_synced(at);
        }
        self.remote = Some(writer);
    }

    /// Drop the remote writer, e.g. on sign-out. Pending writes keep running.
    pub fn detach_remote(&mut self) -> Option<RemoteWriter> {
        self.remote.take()
    }

    pub fn is_remote_attached(&self) -> bool {
        self.remote.is_some()
    }

    pub fn sync_status(&self) -> SyncStatus {
        match &self.remote {
            Some(writer) => writer.status(),
            None => SyncStatus {
                last_synced: self.last_synced,
                ..SyncStatus::default()
            },
        }
    }

    pub fn last_synced(&self) -> Option<Timestamp> {
        self.last_synced
    }

    pub fn record_sync(&mut self, at: Timestamp) -> Result<(), TrackerError> {
        self.store.save(storage_keys::LAST_SYNC, &at)?;
        self.last_synced = Some(at);
        if let Some(writer) = &self.remote {
            writer.mark_synced(at);
        }
        Ok(())
    }

    /// Wait for in-flight remote writes.
    pub async fn settle(&mut self) {
        if let Some(writer) = &mut self.remote {
            writer.settle().await;
        }
    }

    fn push(&mut self, op: RemoteOp) {
        if let Some(writer) = &mut self.remote {
            writer.push(op);
        }
    }

    /// Replace local state with what the backend holds. Custom catalog
    /// entries are merged by name; the profile is kept when the backend
    /// has none.
    pub fn apply_remote_snapshot(&mut self, snapshot: RemoteSnapshot) -> Result<(), TrackerError> {
        let RemoteSnapshot {
            profile,
            templates,
            mut workouts,
            custom_exercises,
        } = snapshot;

        sort_newest_first(&mut workouts);
        self.templates = templates;
        self.workouts = workouts;
        let merged = self.catalog.merge(custom_exercises);
        if let Some(profile) = profile {
            self.profile = profile;
        }
        if let Some(id) = self.selected_workout {
            if !self.workouts.iter().any(|w| w.id == id) {
                self.selected_workout = None;
            }
        }

        self.persist_templates()?;
        self.persist_workouts()?;
        self.persist_catalog()?;
        self.persist_profile()?;
        tracing::info!(
            templates = self.templates.len(),
            workouts = self.workouts.len(),
            merged_exercises = merged,
            "applied remote snapshot"
        );
        Ok(())
    }

    // ── Persistence ────────────────────────────────────────────────

    fn persist_templates(&self) -> Result<(), TrackerError> {
        Ok(self.store.save(storage_keys::TEMPLATES, &self.templates)?)
    }

    fn persist_workouts(&self) -> Result<(), TrackerError> {
        Ok(self.store.save(storage_keys::WORKOUTS, &self.workouts)?)
    }

    fn persist_catalog(&self) -> Result<(), TrackerError> {
        Ok(self.store.save(storage_keys::EXERCISES, &self.catalog)?)
    }

    fn persist_profile(&self) -> Result<(), TrackerError> {
        Ok(self.store.save(storage_keys::PROFILE, &self.profile)?)
    }

    fn persist_active(&self) -> Result<(), TrackerError> {
        match &self.active {
            Some(active) => self.store.save(storage_keys::ACTIVE_WORKOUT, active)?,
            None => self.store.remove(storage_keys::ACTIVE_WORKOUT)?,
        }
        Ok(())
    }

    // ── Templates ──────────────────────────────────────────────────

    pub fn create_template(
        &mut self,
        name: &str,
        exercises: Vec<TemplateExercise>,
        notes: Option<String>,
    ) -> Result<WorkoutTemplate, TrackerError> {
        let template = WorkoutTemplate::new(name, exercises, notes)?;
        self.templates.insert(0, template.clone());
        self.persist_templates()?;
        tracing::info!(template_id = %template.id, name = %template.name, "template created");
        self.push(RemoteOp::InsertTemplate(template.clone()));
        Ok(template)
    }

    pub fn update_template(
        &mut self,
        id: Uuid,
        name: &str,
        exercises: Vec<TemplateExercise>,
        notes: Option<String>,
    ) -> Result<WorkoutTemplate, TrackerError> {
        let template = self
            .templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TrackerError::TemplateNotFound(id))?;
        template.replace(name, exercises, notes)?;
        let updated = template.clone();
        self.persist_templates()?;
        tracing::info!(template_id = %id, "template updated");
        self.push(RemoteOp::UpdateTemplate(updated.clone()));
        Ok(updated)
    }

    /// Returns `false` when the user declines.
    pub fn delete_template(
        &mut self,
        id: Uuid,
        confirm: &mut dyn Confirm,
    ) -> Result<bool, TrackerError> {
        let pos = self
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or(TrackerError::TemplateNotFound(id))?;
        let prompt = format!("Delete template \"{}\"?", self.templates[pos].name);
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }
        self.templates.remove(pos);
        self.persist_templates()?;
        tracing::info!(template_id = %id, "template deleted");
        self.push(RemoteOp::DeleteTemplate(id));
        Ok(true)
    }

    // ── Catalog ────────────────────────────────────────────────────

    pub fn add_catalog_entry(&mut self, mut entry: CatalogEntry) -> Result<(), TrackerError> {
        entry.name = entry.name.trim().to_string();
        self.catalog.add(entry.clone())?;
        self.persist_catalog()?;
        tracing::info!(name = %entry.name, "catalog entry added");
        if !catalog::is_builtin(&entry.name) {
            self.push(RemoteOp::InsertCustomExercise(entry));
        }
        Ok(())
    }

    /// Remove by exact name. Returns `false` when absent or declined.
    pub fn remove_catalog_entry(
        &mut self,
        name: &str,
        confirm: &mut dyn Confirm,
    ) -> Result<bool, TrackerError> {
        if !self.catalog.entries().iter().any(|e| e.name == name) {
            return Ok(false);
        }
        if !confirm.confirm(&format!("Remove \"{name}\" from the exercise list?")) {
            return Ok(false);
        }
        self.catalog.remove(name);
        self.persist_catalog()?;
        tracing::info!(name, "catalog entry removed");
        if !catalog::is_builtin(name) {
            self.push(RemoteOp::DeleteCustomExercise(name.to_string()));
        }
        Ok(true)
    }

    /// Turn a typed name into a template exercise. Unknown names get the
    /// free-form defaults and are added to the catalog.
    pub fn resolve_exercise(&mut self, name: &str) -> Result<TemplateExercise, TrackerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if let Some(entry) = self.catalog.find(name) {
            return Ok(TemplateExercise::from_catalog(entry));
        }
        let exercise = TemplateExercise::ad_hoc(name);
        self.add_catalog_entry(exercise.to_catalog_entry())?;
        Ok(exercise)
    }

    // ── Active workout ─────────────────────────────────────────────

    pub fn start_workout(&mut self, template_id: Uuid) -> Result<&ActiveWorkout, TrackerError> {
        if self.active.is_some() {
            return Err(TrackerError::WorkoutInProgress);
        }
        let template = self
            .template(template_id)
            .ok_or(TrackerError::TemplateNotFound(template_id))?;
        let active = ActiveWorkout::from_template(
            template,
            &self.workouts,
            Timestamp::now(),
            self.default_rest_seconds,
        );
        tracing::info!(template_id = %template_id, name = %active.template_name, "workout started");
        self.begin(active)
    }

    pub fn start_empty_workout(&mut self) -> Result<&ActiveWorkout, TrackerError> {
        if self.active.is_some() {
            return Err(TrackerError::WorkoutInProgress);
        }
        tracing::info!("empty workout started");
        self.begin(ActiveWorkout::empty(Timestamp::now(), self.default_rest_seconds))
    }

    fn begin(&mut self, active: ActiveWorkout) -> Result<&ActiveWorkout, TrackerError> {
        self.timers.start_elapsed(active.start_time);
        self.active = Some(active);
        self.persist_active()?;
        self.active.as_ref().ok_or(TrackerError::NoActiveWorkout)
    }

    fn with_active<T>(
        &mut self,
        f: impl FnOnce(&mut ActiveWorkout) -> Result<T, SessionError>,
    ) -> Result<T, TrackerError> {
        let active = self.active.as_mut().ok_or(TrackerError::NoActiveWorkout)?;
        let out = f(active)?;
        self.store.save(storage_keys::ACTIVE_WORKOUT, active)?;
        Ok(out)
    }

    pub fn update_set(
        &mut self,
        exercise: usize,
        set: usize,
        field: SetField,
    ) -> Result<(), TrackerError> {
        self.with_active(|a| a.update_set(exercise, set, field))
    }

    /// Completing a set starts that exercise's rest countdown.
    pub fn toggle_set_completed(
        &mut self,
        exercise: usize,
        set: usize,
    ) -> Result<Option<RestRequest>, TrackerError> {
        let rest = self.with_active(|a| a.toggle_set_completed(exercise, set))?;
        if let Some(req) = rest {
            self.timers.start_rest(req.exercise, req.seconds);
        }
        Ok(rest)
    }

    pub fn toggle_set_type(&mut self, exercise: usize, set: usize) -> Result<SetType, TrackerError> {
        self.with_active(|a| a.toggle_set_type(exercise, set))
    }

    pub fn add_set(&mut self, exercise: usize) -> Result<(), TrackerError> {
        self.with_active(|a| a.add_set(exercise))
    }

    /// `false` when the set was the exercise's last one and nothing changed.
    pub fn remove_set(&mut self, exercise: usize, set: usize) -> Result<bool, TrackerError> {
        self.with_active(|a| a.remove_set(exercise, set))
    }

    /// Add an exercise by name, resolving it through the catalog.
    pub fn add_exercise(&mut self, name: &str) -> Result<(), TrackerError> {
        if self.active.is_none() {
            return Err(TrackerError::NoActiveWorkout);
        }
        let exercise = self.resolve_exercise(name)?;
        let active = self.active.as_mut().ok_or(TrackerError::NoActiveWorkout)?;
        active.add_exercise(&exercise, &self.workouts);
        self.persist_active()
    }

    /// Removing an exercise with completed sets asks first. Returns `false`
    /// when declined.
    pub fn remove_exercise(
        &mut self,
        exercise: usize,
        confirm: &mut dyn Confirm,
    ) -> Result<bool, TrackerError> {
        let active = self.active.as_ref().ok_or(TrackerError::NoActiveWorkout)?;
        if active.needs_confirmation_to_remove(exercise)? {
            let name = &active.exercises[exercise].exercise_name;
            if !confirm.confirm(&format!("\"{name}\" has completed sets. Remove it?")) {
                return Ok(false);
            }
        }
        self.with_active(|a| a.remove_exercise(exercise))?;
        self.timers.exercise_removed(exercise);
        Ok(true)
    }

    pub fn move_exercise(&mut self, from: usize, to: usize) -> Result<(), TrackerError> {
        self.with_active(|a| a.move_exercise(from, to))?;
        self.timers.exercise_moved(from, to);
        Ok(())
    }

    pub fn set_exercise_rest(
        &mut self,
        exercise: usize,
        seconds: Option<u32>,
    ) -> Result<(), TrackerError> {
        self.with_active(|a| a.set_exercise_rest(exercise, seconds))
    }

    pub fn set_default_rest(&mut self, seconds: u32) -> Result<(), TrackerError> {
        self.with_active(|a| {
            a.set_default_rest(seconds);
            Ok(())
        })
    }

    pub fn set_notes(&mut self, notes: Option<String>) -> Result<(), TrackerError> {
        self.with_active(|a| {
            a.set_notes(notes);
            Ok(())
        })
    }

    pub fn set_exercise_notes(
        &mut self,
        exercise: usize,
        notes: Option<String>,
    ) -> Result<(), TrackerError> {
        self.with_active(|a| a.set_exercise_notes(exercise, notes))
    }

    /// Start (or restart) an exercise's rest countdown. Returns its length.
    pub fn start_rest_timer(&mut self, exercise: usize) -> Result<u32, TrackerError> {
        let active = self.active.as_ref().ok_or(TrackerError::NoActiveWorkout)?;
        let seconds = active.rest_duration_for(exercise)?;
        self.timers.start_rest(exercise, seconds);
        Ok(seconds)
    }

    pub fn rest_exercise(&self) -> Option<usize> {
        self.timers.rest_exercise()
    }

    pub fn skip_rest(&mut self) {
        self.timers.skip_rest();
    }

    pub fn take_timer_events(&mut self) -> Vec<TimerEvent> {
        self.timers.take_events()
    }

    /// Exercises added or removed relative to the source template. `None`
    /// for empty workouts or when the source template is gone.
    pub fn finish_changes(&self) -> Result<Option<ExerciseChanges>, TrackerError> {
        let active = self.active.as_ref().ok_or(TrackerError::NoActiveWorkout)?;
        Ok(active
            .original_template_id
            .and_then(|id| self.template(id))
            .map(|source| active.changes_against(source)))
    }

    /// Apply the template choice, then log the session and clear it.
    ///
    /// A rejected template change leaves the workout active and nothing
    /// persisted.
    pub fn finish_workout(
        &mut self,
        choice: FinishChoice,
        activity_type: Option<ActivityType>,
        confirm: &mut dyn Confirm,
    ) -> Result<WorkoutLog, TrackerError> {
        let active = self.active.as_ref().ok_or(TrackerError::NoActiveWorkout)?;
        let source = active.original_template_id.and_then(|id| self.template(id));
        let exercises = active.template_exercises(source, &self.catalog);
        let source = source.map(|t| (t.id, t.name.clone(), t.notes.clone()));

        let choice = if exercises.is_empty() && choice != FinishChoice::JustFinish {
            tracing::info!("no exercises to keep as a template; finishing without changes");
            FinishChoice::JustFinish
        } else {
            choice
        };

        match choice {
            FinishChoice::JustFinish => {}
            FinishChoice::UpdateTemplate => match source {
                Some((id, name, notes)) => {
                    self.update_template(id, &name, exercises, notes)?;
                }
                None => {
                    tracing::info!("no source template to update; finishing without changes");
                }
            },
            FinishChoice::SaveAsNew { name } => {
                template::validate(&name, &exercises)?;
                let trimmed = name.trim();
                let taken = self
                    .templates
                    .iter()
                    .find(|t| t.name.to_lowercase() == trimmed.to_lowercase())
                    .map(|t| (t.id, t.name.clone(), t.notes.clone()));
                match taken {
                    Some((id, existing, notes)) => {
                        let prompt =
                            format!("A template named \"{existing}\" exists. Replace its exercises?");
                        if !confirm.confirm(&prompt) {
                            return Err(ValidationError::TemplateNameTaken { name: existing }.into());
                        }
                        self.update_template(id, &existing, exercises, notes)?;
                    }
                    None => {
                        self.create_template(trimmed, exercises, None)?;
                    }
                }
            }
        }

        let active = self.active.take().ok_or(TrackerError::NoActiveWorkout)?;
        let log = active.finish(Timestamp::now(), activity_type);
        self.timers.clear();
        self.workouts.insert(0, log.clone());
        self.persist_workouts()?;
        self.persist_active()?;
        tracing::info!(
            workout_id = %log.id,
            name = %log.template_name,
            duration = log.duration,
            "workout finished"
        );
        self.push(RemoteOp::InsertWorkout(log.clone()));
        Ok(log)
    }

    /// Discard the active workout without a history record. Returns `false`
    /// when declined.
    pub fn cancel_workout(&mut self, confirm: &mut dyn Confirm) -> Result<bool, TrackerError> {
        if self.active.is_none() {
            return Err(TrackerError::NoActiveWorkout);
        }
        if !confirm.confirm("Discard the current workout?") {
            return Ok(false);
        }
        self.active = None;
        self.timers.clear();
        self.persist_active()?;
        tracing::info!("workout cancelled");
        Ok(true)
    }

    // ── History ────────────────────────────────────────────────────

    pub fn select_workout(&mut self, id: Uuid) -> Result<&WorkoutLog, TrackerError> {
        let log = self
            .workouts
            .iter()
            .find(|w| w.id == id)
            .ok_or(TrackerError::WorkoutNotFound(id))?;
        self.selected_workout = Some(id);
        Ok(log)
    }

    pub fn selected_workout(&self) -> Option<&WorkoutLog> {
        let id = self.selected_workout?;
        self.workouts.iter().find(|w| w.id == id)
    }

    pub fn clear_selection(&mut self) {
        self.selected_workout = None;
    }

    /// Deleting the selected log also clears the selection.
    pub fn delete_workout(
        &mut self,
        id: Uuid,
        confirm: &mut dyn Confirm,
    ) -> Result<bool, TrackerError> {
        let pos = self
            .workouts
            .iter()
            .position(|w| w.id == id)
            .ok_or(TrackerError::WorkoutNotFound(id))?;
        let prompt = format!("Delete workout \"{}\"?", self.workouts[pos].template_name);
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }
        self.workouts.remove(pos);
        if self.selected_workout == Some(id) {
            self.selected_workout = None;
        }
        self.persist_workouts()?;
        tracing::info!(workout_id = %id, "workout deleted");
        self.push(RemoteOp::DeleteWorkout(id));
        Ok(true)
    }

    pub fn personal_record(&self, exercise_name: &str) -> f64 {
        history::personal_record(&self.workouts, exercise_name)
    }

    pub fn top_personal_records(&self, n: usize) -> Vec<(String, f64)> {
        history::top_personal_records(&self.workouts, n)
    }

    pub fn summary(&self, now: Timestamp, tz: &TimeZone) -> Summary {
        stats::summarize(&self.workouts, now, tz)
    }

    // ── Profile ────────────────────────────────────────────────────

    pub fn update_profile_name(&mut self, name: &str) -> Result<(), TrackerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        self.profile.name = name.to_string();
        self.persist_profile()?;
        tracing::info!("profile updated");
        self.push(RemoteOp::UpdateProfile(self.profile.clone()));
        Ok(())
    }

    pub fn export_document(&self, now: Timestamp) -> ExportDocument {
        ExportDocument {
            workouts: self.workouts.clone(),
            profile: self.profile.clone(),
            exported_at: now,
        }
    }
}
