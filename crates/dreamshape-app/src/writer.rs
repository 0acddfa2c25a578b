//! Best-effort remote writes.
//!
//! Each mutation is pushed as a detached task after the local write has
//! already succeeded. Failures are logged and reflected in [`SyncStatus`];
//! nothing is retried, queued or rolled back.

use std::sync::{Arc, Mutex, MutexGuard};

use dreamshape_core::models::exercise::CatalogEntry;
use dreamshape_core::models::profile::UserProfile;
use dreamshape_core::models::template::WorkoutTemplate;
use dreamshape_core::models::workout::WorkoutLog;
use dreamshape_storage::error::StorageError;
use dreamshape_storage::remote::RemoteStore;
use jiff::Timestamp;
use jiff::tz::TimeZone;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// One remote call mirroring a local mutation.
#[derive(Debug, Clone)]
pub enum RemoteOp {
    UpdateProfile(UserProfile),
    InsertTemplate(WorkoutTemplate),
    UpdateTemplate(WorkoutTemplate),
    DeleteTemplate(Uuid),
    InsertWorkout(WorkoutLog),
    DeleteWorkout(Uuid),
    InsertCustomExercise(CatalogEntry),
    DeleteCustomExercise(String),
}

impl RemoteOp {
    pub fn label(&self) -> &'static str {
        match self {
            RemoteOp::UpdateProfile(_) => "update_profile",
            RemoteOp::InsertTemplate(_) => "insert_template",
            RemoteOp::UpdateTemplate(_) => "update_template",
            RemoteOp::DeleteTemplate(_) => "delete_template",
            RemoteOp::InsertWorkout(_) => "insert_workout",
            RemoteOp::DeleteWorkout(_) => "delete_workout",
            RemoteOp::InsertCustomExercise(_) => "insert_custom_exercise",
            RemoteOp::DeleteCustomExercise(_) => "delete_custom_exercise",
        }
    }

    pub async fn apply(self, remote: &dyn RemoteStore) -> Result<(), StorageError> {
        match self {
            RemoteOp::UpdateProfile(p) => remote.update_profile(p).await,
            RemoteOp::InsertTemplate(t) => remote.insert_template(t).await,
            RemoteOp::UpdateTemplate(t) => remote.update_template(t).await,
            RemoteOp::DeleteTemplate(id) => remote.delete_template(id).await,
            RemoteOp::InsertWorkout(w) => remote.insert_workout(w).await,
            RemoteOp::DeleteWorkout(id) => remote.delete_workout(id).await,
            RemoteOp::InsertCustomExercise(e) => remote.insert_custom_exercise(e).await,
            RemoteOp::DeleteCustomExercise(name) => remote.delete_custom_exercise(name).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    Syncing,
    Failed {
        message: String,
    },
}

/// What the sync indicator shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncStatus {
    pub state: SyncState,
    pub in_flight: usize,
    pub last_synced: Option<Timestamp>,
}

type SharedStatus = Arc<Mutex<SyncStatus>>;

fn lock(status: &SharedStatus) -> MutexGuard<'_, SyncStatus> {
    status.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct RemoteWriter {
    remote: Arc<dyn RemoteStore>,
    handle: Handle,
    status: SharedStatus,
    pending: Vec<JoinHandle<()>>,
}

impl RemoteWriter {
    pub fn new(remote: Arc<dyn RemoteStore>, handle: Handle) -> Self {
        Self {
            remote,
            handle,
            status: Arc::new(Mutex::new(SyncStatus::default())),
            pending: Vec::new(),
        }
    }

    pub fn remote(&self) -> &Arc<dyn RemoteStore> {
        &self.remote
    }

    pub fn status(&self) -> SyncStatus {
        lock(&self.status).clone()
    }

    pub fn set_state(&self, state: SyncState) {
        lock(&self.status).state = state;
    }

    pub fn mark_synced(&self, at: Timestamp) {
        let mut status = lock(&self.status);
        status.last_synced = Some(at);
        status.state = SyncState::Idle;
    }

    /// Spawn `op` and return immediately.
    pub fn push(&mut self, op: RemoteOp) {
        self.pending.retain(|task| !task.is_finished());
        {
            let mut status = lock(&self.status);
            status.in_flight += 1;
            status.state = SyncState::Syncing;
        }

        let remote = Arc::clone(&self.remote);
        let status = Arc::clone(&self.status);
        let task = self.handle.spawn(async move {
            let label = op.label();
            let result = op.apply(remote.as_ref()).await;

            let mut status = lock(&status);
            status.in_flight = status.in_flight.saturating_sub(1);
            match result {
                Ok(()) => {
                    tracing::debug!(op = label, "remote write succeeded");
                    status.last_synced = Some(Timestamp::now());
                    if status.in_flight == 0 && status.state == SyncState::Syncing {
                        status.state = SyncState::Idle;
                    }
                }
                Err(e) => {
                    tracing::warn!(op = label, error = %e, "remote write failed (local copy kept)");
                    status.state = SyncState::Failed {
                        message: format!("{label}: {e}"),
                    };
                }
            }
        });
        self.pending.push(task);
    }

    /// Wait for every write spawned so far. Used before the process exits.
    pub async fn settle(&mut self) {
        let tasks = std::mem::take(&mut self.pending);
        for result in futures::future::join_all(tasks).await {
            if let Err(e) = result {
                tracing::warn!(error = %e, "remote write task aborted");
            }
        }
    }
}

/// Relative "last synced" text for the status line.
pub fn last_sync_label(last: Option<Timestamp>, now: Timestamp, tz: &TimeZone) -> String {
    let Some(last) = last else {
        return "Never synced".to_string();
    };
    let minutes = (now.as_second() - last.as_second()) / 60;
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if minutes < 24 * 60 {
        format!("{}h ago", minutes / 60)
    } else {
        last.to_zoned(tz.clone()).date().to_string()
    }
}
