//! In-process [`RemoteStore`], used for offline dry runs and tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use dreamshape_core::models::exercise::CatalogEntry;
use dreamshape_core::models::profile::UserProfile;
use dreamshape_core::models::template::WorkoutTemplate;
use dreamshape_core::models::workout::WorkoutLog;
use uuid::Uuid;

use crate::error::StorageError;
use crate::remote::{BoxFuture, RemoteStore};

#[derive(Debug, Clone, Default)]
pub struct MemoryTables {
    pub profile: Option<UserProfile>,
    pub templates: Vec<WorkoutTemplate>,
    pub workouts: Vec<WorkoutLog>,
    pub custom_exercises: Vec<CatalogEntry>,
}

#[derive(Debug)]
pub struct MemoryStore {
    user_id: Uuid,
    tables: Mutex<MemoryTables>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new(user_id: Uuid) -> Self {
        Self::with_tables(user_id, MemoryTables::default())
    }

    pub fn with_tables(user_id: Uuid, tables: MemoryTables) -> Self {
        Self {
            user_id,
            tables: Mutex::new(tables),
            fail_writes: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent write fail with a request error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of write calls attempted so far, failed ones included.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> MemoryTables {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryTables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(
        &self,
        table: &str,
        f: impl FnOnce(&mut MemoryTables),
    ) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Request(format!("{table}: simulated outage")));
        }
        f(&mut self.lock());
        Ok(())
    }
}

impl RemoteStore for MemoryStore {
    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn fetch_profile(&self) -> BoxFuture<'_, Result<Option<UserProfile>, StorageError>> {
        Box::pin(async move { Ok(self.lock().profile.clone()) })
    }

    fn update_profile(&self, profile: UserProfile) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.write("profiles", |t| match &mut t.profile {
                Some(existing) => existing.name = profile.name,
                None => t.profile = Some(profile),
            })
        })
    }

    fn list_templates(&self) -> BoxFuture<'_, Result<Vec<WorkoutTemplate>, StorageError>> {
        Box::pin(async move { Ok(self.lock().templates.iter().rev().cloned().collect()) })
    }

    fn insert_template(
        &self,
        template: WorkoutTemplate,
    ) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.write("templates", |t| {
                if !t.templates.iter().any(|x| x.id == template.id) {
                    t.templates.push(template);
                }
            })
        })
    }

    fn update_template(
        &self,
        template: WorkoutTemplate,
    ) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.write("templates", |t| {
                if let Some(existing) = t.templates.iter_mut().find(|x| x.id == template.id) {
                    *existing = template;
                }
            })
        })
    }

    fn delete_template(&self, id: Uuid) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move { self.write("templates", |t| t.templates.retain(|x| x.id != id)) })
    }

    fn list_workouts(&self) -> BoxFuture<'_, Result<Vec<WorkoutLog>, StorageError>> {
        Box::pin(async move {
            let mut logs = self.lock().workouts.clone();
            logs.sort_by(|a, b| b.date.cmp(&a.date));
            Ok(logs)
        })
    }

    fn insert_workout(&self, log: WorkoutLog) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.write("workouts", |t| {
                if !t.workouts.iter().any(|x| x.id == log.id) {
                    t.workouts.push(log);
                }
            })
        })
    }

    fn delete_workout(&self, id: Uuid) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move { self.write("workouts", |t| t.workouts.retain(|x| x.id != id)) })
    }

    fn list_custom_exercises(&self) -> BoxFuture<'_, Result<Vec<CatalogEntry>, StorageError>> {
        Box::pin(async move {
            let mut entries = self.lock().custom_exercises.clone();
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(entries)
        })
    }

    fn insert_custom_exercise(
        &self,
        entry: CatalogEntry,
    ) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.write("custom_exercises", |t| {
                if !t.custom_exercises.iter().any(|x| x.name == entry.name) {
                    t.custom_exercises.push(entry);
                }
            })
        })
    }

    fn delete_custom_exercise(&self, name: String) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.write("custom_exercises", |t| {
                t.custom_exercises.retain(|x| x.name != name)
            })
        })
    }
}
