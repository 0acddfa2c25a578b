//! Sign-in sync: a one-time push of local data, then a full pull.
//!
//! Known gap: once the per-account marker is set, local data is never
//! pushed again as a batch, and every later pull overwrites local
//! templates and workouts wholesale. Changes made on another device
//! between a pull and a local mutation are therefore only as durable as
//! the last writer. Conflict resolution is not attempted.

use std::sync::Arc;

use dreamshape_core::models::profile::UserProfile;
use dreamshape_core::storage_keys;
use dreamshape_storage::error::StorageError;
use dreamshape_storage::remote::RemoteStore;
use jiff::Timestamp;
use tokio::runtime::Handle;

use crate::error::TrackerError;
use crate::tracker::{RemoteSnapshot, Tracker};
use crate::writer::RemoteWriter;

/// Outcome of one sign-in sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Whether the one-time push ran during this sync.
    pub migrated: bool,
    pub pushed: usize,
    pub push_failures: usize,
    /// Whether remote data replaced local state.
    pub pulled: bool,
    pub synced_at: Option<Timestamp>,
}

/// Push every local template, workout, custom catalog entry and stored
/// profile with individual create calls.
///
/// Skipped entirely once the account's marker is set. The marker is only
/// written when every push succeeded, so a partial failure retries the
/// whole batch on the next sign-in.
pub async fn migrate_local_data(
    tracker: &Tracker,
    remote: &dyn RemoteStore,
    report: &mut SyncReport,
) -> Result<(), TrackerError> {
    let marker = storage_keys::migration_marker(remote.user_id());
    let store = tracker.store();
    if store.flag(&marker) {
        tracing::debug!(user_id = %remote.user_id(), "local data already migrated");
        return Ok(());
    }

    tracing::info!(
        user_id = %remote.user_id(),
        templates = tracker.templates().len(),
        workouts = tracker.workouts().len(),
        "migrating local data"
    );

    let mut record = |label: &str, result: Result<(), StorageError>| match result {
        Ok(()) => report.pushed += 1,
        Err(e) => {
            tracing::warn!(op = label, error = %e, "migration push failed");
            report.push_failures += 1;
        }
    };

    if let Some(profile) = store.load::<UserProfile>(storage_keys::PROFILE) {
        record("update_profile", remote.update_profile(profile).await);
    }
    for template in tracker.templates() {
        record("insert_template", remote.insert_template(template.clone()).await);
    }
    for log in tracker.workouts() {
        record("insert_workout", remote.insert_workout(log.clone()).await);
    }
    for entry in tracker.catalog().custom_entries() {
        record("insert_custom_exercise", remote.insert_custom_exercise(entry.clone()).await);
    }

    report.migrated = true;
    if report.push_failures == 0 {
        store.set_flag(&marker)?;
        tracing::info!(pushed = report.pushed, "migration completed");
    } else {
        tracing::warn!(
            pushed = report.pushed,
            failed = report.push_failures,
            "migration incomplete; will retry on next sign-in"
        );
    }
    Ok(())
}

/// Fetch everything the backend holds for this account.
pub async fn fetch_snapshot(remote: &dyn RemoteStore) -> Result<RemoteSnapshot, StorageError> {
    Ok(RemoteSnapshot {
        profile: remote.fetch_profile().await?,
        templates: remote.list_templates().await?,
        workouts: remote.list_workouts().await?,
        custom_exercises: remote.list_custom_exercises().await?,
    })
}

/// Replace local state with the remote snapshot. A failed fetch keeps
/// local state and returns `false`.
pub async fn pull(tracker: &mut Tracker, remote: &dyn RemoteStore) -> Result<bool, TrackerError> {
    match fetch_snapshot(remote).await {
        Ok(snapshot) => {
            tracker.apply_remote_snapshot(snapshot)?;
            Ok(true)
        }
        Err(e) => {
            tracing::warn!(error = %e, "remote pull failed; keeping local data");
            Ok(false)
        }
    }
}

/// Run the full sign-in sequence and attach a remote writer so later
/// mutations are pushed.
pub async fn sign_in_sync(
    tracker: &mut Tracker,
    remote: Arc<dyn RemoteStore>,
) -> Result<SyncReport, TrackerError> {
    let mut report = SyncReport::default();
    migrate_local_data(tracker, remote.as_ref(), &mut report).await?;
    if report.push_failures > 0 {
        // Pulling now would replace local records the backend never received.
        tracing::warn!("skipping pull until local data is fully uploaded");
    } else {
        report.pulled = pull(tracker, remote.as_ref()).await?;
    }
    if report.pulled {
        let now = Timestamp::now();
        tracker.record_sync(now)?;
        report.synced_at = Some(now);
    }

    tracker.attach_remote(RemoteWriter::new(remote, Handle::current()));
    tracing::info!(
        migrated = report.migrated,
        pushed = report.pushed,
        pulled = report.pulled,
        "sign-in sync finished"
    );
    Ok(report)
}

/// Attach a writer without syncing, for invocations that resume an
/// existing session.
pub fn resume(tracker: &mut Tracker, remote: Arc<dyn RemoteStore>) {
    tracker.attach_remote(RemoteWriter::new(remote, Handle::current()));
}
