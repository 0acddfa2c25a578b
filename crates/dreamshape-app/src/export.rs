//! JSON backup of the workout history and profile.

use std::path::{Path, PathBuf};

use dreamshape_core::models::profile::UserProfile;
use dreamshape_core::models::workout::WorkoutLog;
use dreamshape_storage::error::StorageError;
use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub workouts: Vec<WorkoutLog>,
    pub profile: UserProfile,
    pub exported_at: Timestamp,
}

pub fn file_name(date: Date) -> String {
    format!("dreamshape-backup-{date}.json")
}

/// Write `doc` as pretty JSON into `dir`, named after the export date.
pub fn write(dir: &Path, doc: &ExportDocument, date: Date) -> Result<PathBuf, TrackerError> {
    std::fs::create_dir_all(dir).map_err(StorageError::from)?;
    let path = dir.join(file_name(date));
    let json = serde_json::to_string_pretty(doc).map_err(StorageError::from)?;
    std::fs::write(&path, json).map_err(StorageError::from)?;
    tracing::info!(path = %path.display(), workouts = doc.workouts.len(), "export written");
    Ok(path)
}
