use std::sync::Arc;

use dreamshape_app::confirm::AssumeYes;
use dreamshape_app::sync;
use dreamshape_app::tracker::{FinishChoice, Tracker};
use dreamshape_app::writer::SyncState;
use dreamshape_core::models::exercise::{CatalogEntry, TemplateExercise};
use dreamshape_core::models::template::WorkoutTemplate;
use dreamshape_core::storage_keys;
use dreamshape_storage::local::LocalStore;
use dreamshape_storage::memory::{MemoryStore, MemoryTables};
use dreamshape_storage::remote::RemoteStore;
use tempfile::TempDir;
use uuid::Uuid;

fn open(dir: &TempDir) -> Tracker {
    Tracker::open(LocalStore::open(dir.path()).unwrap(), 90)
}

fn with_two_templates(dir: &TempDir) -> Tracker {
    let mut tracker = open(dir);
    for name in ["Push Day", "Pull Day"] {
        let ex = tracker.resolve_exercise("Plank").unwrap();
        tracker.create_template(name, vec![ex], None).unwrap();
    }
    tracker
}

#[tokio::test]
async fn first_sign_in_migrates_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = with_two_templates(&dir);
    let user = Uuid::new_v4();
    let memory = Arc::new(MemoryStore::new(user));
    let remote: Arc<dyn RemoteStore> = memory.clone();

    let report = sync::sign_in_sync(&mut tracker, Arc::clone(&remote))
        .await
        .unwrap();
    assert!(report.migrated);
    assert!(report.pulled);
    assert_eq!(report.push_failures, 0);
    assert_eq!(memory.snapshot().templates.len(), 2);
    assert!(tracker.store().flag(&storage_keys::migration_marker(user)));
    assert_eq!(tracker.templates().len(), 2);

    let writes = memory.write_count();
    let again = sync::sign_in_sync(&mut tracker, remote).await.unwrap();
    assert!(!again.migrated);
    assert!(again.pulled);
    assert_eq!(memory.write_count(), writes);
    assert_eq!(memory.snapshot().templates.len(), 2);
}

#[tokio::test]
async fn pull_overwrites_local_and_merges_custom_exercises() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = open(&dir);
    let user = Uuid::new_v4();
    tracker
        .store()
        .set_flag(&storage_keys::migration_marker(user))
        .unwrap();
    let ex = tracker.resolve_exercise("Plank").unwrap();
    tracker.create_template("Local Only", vec![ex], None).unwrap();

    let remote_template =
        WorkoutTemplate::new("Remote Day", vec![TemplateExercise::ad_hoc("Sled Push")], None)
            .unwrap();
    let memory = Arc::new(MemoryStore::with_tables(
        user,
        MemoryTables {
            templates: vec![remote_template.clone()],
            custom_exercises: vec![CatalogEntry::new("Sled Push", "Legs", "Sled")],
            ..MemoryTables::default()
        },
    ));

    let report = sync::sign_in_sync(&mut tracker, memory.clone()).await.unwrap();
    assert!(!report.migrated);
    assert!(report.synced_at.is_some());
    assert_eq!(tracker.templates(), &[remote_template]);
    assert!(tracker.catalog().contains("Sled Push"));
    assert!(tracker.catalog().contains("Bench Press (Barbell)"));
    assert_eq!(tracker.last_synced(), report.synced_at);

    drop(tracker);
    let reopened = open(&dir);
    assert_eq!(reopened.templates()[0].name, "Remote Day");
    assert!(reopened.last_synced().is_some());
}

#[tokio::test]
async fn failed_migration_keeps_local_data_and_retries_later() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = with_two_templates(&dir);
    let user = Uuid::new_v4();
    let memory = Arc::new(MemoryStore::new(user));
    memory.set_fail_writes(true);

    let report = sync::sign_in_sync(&mut tracker, memory.clone()).await.unwrap();
    assert!(report.migrated);
    assert_eq!(report.push_failures, 2);
    assert!(!report.pulled);
    assert!(!tracker.store().flag(&storage_keys::migration_marker(user)));
    assert_eq!(tracker.templates().len(), 2);

    memory.set_fail_writes(false);
    let retry = sync::sign_in_sync(&mut tracker, memory.clone()).await.unwrap();
    assert!(retry.migrated);
    assert!(retry.pulled);
    assert_eq!(memory.snapshot().templates.len(), 2);
}

#[tokio::test]
async fn mutations_after_sign_in_are_pushed() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = open(&dir);
    let memory = Arc::new(MemoryStore::new(Uuid::new_v4()));
    sync::sign_in_sync(&mut tracker, memory.clone()).await.unwrap();

    let ex = tracker.resolve_exercise("Squat (Barbell)").unwrap();
    let template = tracker.create_template("Legs", vec![ex], None).unwrap();
    tracker.start_workout(template.id).unwrap();
    let log = tracker
        .finish_workout(FinishChoice::JustFinish, None, &mut AssumeYes)
        .unwrap();
    tracker.update_profile_name("Robin").unwrap();
    tracker.settle().await;

    let tables = memory.snapshot();
    assert_eq!(tables.templates.len(), 1);
    assert_eq!(tables.workouts[0].id, log.id);
    assert_eq!(tables.profile.unwrap().name, "Robin");
    assert_eq!(tracker.sync_status().state, SyncState::Idle);
    assert_eq!(tracker.sync_status().in_flight, 0);

    tracker.delete_template(template.id, &mut AssumeYes).unwrap();
    tracker.settle().await;
    assert!(memory.snapshot().templates.is_empty());
}

#[tokio::test]
async fn builtin_catalog_entries_are_not_pushed() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = open(&dir);
    let memory = Arc::new(MemoryStore::new(Uuid::new_v4()));
    sync::sign_in_sync(&mut tracker, memory.clone()).await.unwrap();

    tracker.remove_catalog_entry("Plank", &mut AssumeYes).unwrap();
    tracker
        .add_catalog_entry(CatalogEntry::new("Plank", "Core", "Bodyweight"))
        .unwrap();
    tracker.resolve_exercise("Farmer Carry").unwrap();
    tracker.settle().await;

    let names: Vec<_> = memory
        .snapshot()
        .custom_exercises
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["Farmer Carry"]);
}

#[tokio::test]
async fn remote_failure_is_best_effort() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = open(&dir);
    let memory = Arc::new(MemoryStore::new(Uuid::new_v4()));
    sync::sign_in_sync(&mut tracker, memory.clone()).await.unwrap();
    memory.set_fail_writes(true);

    let ex = tracker.resolve_exercise("Plank").unwrap();
    tracker.create_template("Core", vec![ex], None).unwrap();
    tracker.settle().await;

    assert_eq!(tracker.templates().len(), 1);
    assert!(memory.snapshot().templates.is_empty());
    assert!(matches!(
        tracker.sync_status().state,
        SyncState::Failed { .. }
    ));
    assert_eq!(open(&dir).templates().len(), 1);
}
