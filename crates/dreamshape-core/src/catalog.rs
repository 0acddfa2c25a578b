//! The per-account exercise catalog.
//!
//! Seeded from a fixed built-in list and extended with custom entries.
//! Names are unique case-insensitively.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::exercise::CatalogEntry;

/// Built-in exercises as `(name, muscle group, equipment)`.
pub const DEFAULT_EXERCISES: &[(&str, &str, &str)] = &[
    // Chest
    ("Bench Press (Barbell)", "Chest", "Barbell"),
    ("Incline Bench Press (Barbell)", "Chest", "Barbell"),
    ("Decline Bench Press (Barbell)", "Chest", "Barbell"),
    ("Bench Press (Dumbbell)", "Chest", "Dumbbell"),
    ("Incline Bench Press (Dumbbell)", "Chest", "Dumbbell"),
    ("Chest Fly (Dumbbell)", "Chest", "Dumbbell"),
    ("Chest Fly (Cable)", "Chest", "Cable"),
    ("Chest Press (Machine)", "Chest", "Machine"),
    ("Dips (Chest)", "Chest", "Bodyweight"),
    ("Push-ups", "Chest", "Bodyweight"),
    // Back
    ("Deadlift (Barbell)", "Back", "Barbell"),
    ("Romanian Deadlift (Barbell)", "Back", "Barbell"),
    ("Bent Over Row (Barbell)", "Back", "Barbell"),
    ("Bent Over Row (Dumbbell)", "Back", "Dumbbell"),
    ("T-Bar Row", "Back", "Barbell"),
    ("Lat Pulldown (Cable)", "Back", "Cable"),
    ("Seated Row (Cable)", "Back", "Cable"),
    ("Pull-ups", "Back", "Bodyweight"),
    ("Chin-ups", "Back", "Bodyweight"),
    // Shoulders
    ("Overhead Press (Barbell)", "Shoulders", "Barbell"),
    ("Overhead Press (Dumbbell)", "Shoulders", "Dumbbell"),
    ("Lateral Raise (Dumbbell)", "Shoulders", "Dumbbell"),
    ("Front Raise (Dumbbell)", "Shoulders", "Dumbbell"),
    ("Rear Delt Fly (Dumbbell)", "Shoulders", "Dumbbell"),
    ("Face Pulls (Cable)", "Shoulders", "Cable"),
    ("Shrugs (Barbell)", "Shoulders", "Barbell"),
    ("Shrugs (Dumbbell)", "Shoulders", "Dumbbell"),
    // Arms
    ("Bicep Curl (Barbell)", "Arms", "Barbell"),
    ("Bicep Curl (Dumbbell)", "Arms", "Dumbbell"),
    ("Hammer Curl (Dumbbell)", "Arms", "Dumbbell"),
    ("Preacher Curl (Barbell)", "Arms", "Barbell"),
    ("Cable Curl", "Arms", "Cable"),
    ("Tricep Extension (Dumbbell)", "Arms", "Dumbbell"),
    ("Tricep Pushdown (Cable)", "Arms", "Cable"),
    ("Skullcrusher (Barbell)", "Arms", "Barbell"),
    ("Close Grip Bench Press", "Arms", "Barbell"),
    ("Dips (Triceps)", "Arms", "Bodyweight"),
    // Legs
    ("Squat (Barbell)", "Legs", "Barbell"),
    ("Front Squat (Barbell)", "Legs", "Barbell"),
    ("Leg Press (Machine)", "Legs", "Machine"),
    ("Leg Extension (Machine)", "Legs", "Machine"),
    ("Leg Curl (Machine)", "Legs", "Machine"),
    ("Lunges (Dumbbell)", "Legs", "Dumbbell"),
    ("Bulgarian Split Squat", "Legs", "Dumbbell"),
    ("Calf Raise (Machine)", "Legs", "Machine"),
    ("Hip Thrust (Barbell)", "Legs", "Barbell"),
    // Core
    ("Plank", "Core", "Bodyweight"),
    ("Crunches", "Core", "Bodyweight"),
    ("Russian Twists", "Core", "Bodyweight"),
    ("Hanging Leg Raise", "Core", "Bodyweight"),
    ("Cable Crunch", "Core", "Cable"),
];

pub fn default_entries() -> Vec<CatalogEntry> {
    DEFAULT_EXERCISES
        .iter()
        .map(|(name, muscle, equipment)| CatalogEntry::new(*name, *muscle, *equipment))
        .collect()
}

/// True if `name` matches a built-in exercise, ignoring case.
pub fn is_builtin(name: &str) -> bool {
    let lower = name.to_lowercase();
    DEFAULT_EXERCISES
        .iter()
        .any(|(builtin, _, _)| builtin.to_lowercase() == lower)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseCatalog {
    entries: Vec<CatalogEntry>,
}

impl Default for ExerciseCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

impl ExerciseCatalog {
    /// Catalog holding only the built-in list.
    pub fn seeded() -> Self {
        Self {
            entries: default_entries(),
        }
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.same_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Append an entry. Rejects blank names and case-insensitive duplicates.
    pub fn add(&mut self, mut entry: CatalogEntry) -> Result<(), ValidationError> {
        let trimmed = entry.name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.contains(trimmed) {
            return Err(ValidationError::DuplicateExercise {
                name: trimmed.to_string(),
            });
        }
        entry.name = trimmed.to_string();
        self.entries.push(entry);
        Ok(())
    }

    /// Remove by exact name.
    pub fn remove(&mut self, name: &str) -> Option<CatalogEntry> {
        let pos = self.entries.iter().position(|e| e.name == name)?;
        Some(self.entries.remove(pos))
    }

    /// Entries that are not part of the built-in list.
    pub fn custom_entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|e| !is_builtin(&e.name))
    }

    /// Append remote entries whose names are not already present.
    /// Returns how many were added.
    pub fn merge(&mut self, remote: impl IntoIterator<Item = CatalogEntry>) -> usize {
        let mut added = 0;
        for entry in remote {
            if !self.contains(&entry.name) {
                self.entries.push(entry);
                added += 1;
            }
        }
        added
    }

    /// Entries grouped by muscle group, groups in alphabetical order.
    pub fn by_muscle_group(&self) -> BTreeMap<&str, Vec<&CatalogEntry>> {
        let mut groups: BTreeMap<&str, Vec<&CatalogEntry>> = BTreeMap::new();
        for entry in &self.entries {
            groups.entry(entry.muscle_group.as_str()).or_default().push(entry);
        }
        groups
    }

    /// Case-insensitive substring match on names, catalog order.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<&CatalogEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&query))
            .take(limit)
            .collect()
    }
}
