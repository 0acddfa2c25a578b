use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Equipment assigned to exercises typed in free-form.
pub const DEFAULT_EQUIPMENT: &str = "Barbell";

/// Muscle group assigned to exercises typed in free-form.
pub const DEFAULT_MUSCLE_GROUP: &str = "Other";

/// An entry in the per-account exercise catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub name: String,
    pub muscle_group: String,
    pub equipment: String,
}

impl CatalogEntry {
    pub fn new(
        name: impl Into<String>,
        muscle_group: impl Into<String>,
        equipment: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            muscle_group: muscle_group.into(),
            equipment: equipment.into(),
        }
    }

    /// Case-insensitive name comparison used for catalog deduplication.
    pub fn same_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// An exercise embedded in a template. A copy, independent of the
/// catalog entry it may have been picked from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateExercise {
    pub id: Uuid,
    pub name: String,
    pub equipment: String,
    pub muscle_group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TemplateExercise {
    pub fn new(
        name: impl Into<String>,
        equipment: impl Into<String>,
        muscle_group: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            equipment: equipment.into(),
            muscle_group: muscle_group.into(),
            notes: None,
        }
    }

    pub fn from_catalog(entry: &CatalogEntry) -> Self {
        Self::new(&entry.name, &entry.equipment, &entry.muscle_group)
    }

    /// Exercise typed by name only, with the free-form defaults.
    pub fn ad_hoc(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_EQUIPMENT, DEFAULT_MUSCLE_GROUP)
    }

    pub fn to_catalog_entry(&self) -> CatalogEntry {
        CatalogEntry::new(&self.name, &self.muscle_group, &self.equipment)
    }
}
