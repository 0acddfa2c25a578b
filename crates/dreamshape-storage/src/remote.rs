use std::future::Future;
use std::pin::Pin;

use dreamshape_core::models::exercise::CatalogEntry;
use dreamshape_core::models::profile::UserProfile;
use dreamshape_core::models::template::WorkoutTemplate;
use dreamshape_core::models::workout::WorkoutLog;
use uuid::Uuid;

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Per-row access to the hosted backend.
///
/// Every call is implicitly scoped to the signed-in user. Methods take
/// owned values and return boxed futures so the trait stays dyn-compatible
/// and calls can be spawned as detached tasks.
pub trait RemoteStore: Send + Sync {
    /// The user every row is scoped to.
    fn user_id(&self) -> Uuid;

    fn fetch_profile(&self) -> BoxFuture<'_, Result<Option<UserProfile>, StorageError>>;

    fn update_profile(&self, profile: UserProfile) -> BoxFuture<'_, Result<(), StorageError>>;

    /// All templates, newest first.
    fn list_templates(&self) -> BoxFuture<'_, Result<Vec<WorkoutTemplate>, StorageError>>;

    fn insert_template(&self, template: WorkoutTemplate)
    -> BoxFuture<'_, Result<(), StorageError>>;

    fn update_template(&self, template: WorkoutTemplate)
    -> BoxFuture<'_, Result<(), StorageError>>;

    fn delete_template(&self, id: Uuid) -> BoxFuture<'_, Result<(), StorageError>>;

    /// All workout logs, newest first.
    fn list_workouts(&self) -> BoxFuture<'_, Result<Vec<WorkoutLog>, StorageError>>;

    fn insert_workout(&self, log: WorkoutLog) -> BoxFuture<'_, Result<(), StorageError>>;

    fn delete_workout(&self, id: Uuid) -> BoxFuture<'_, Result<(), StorageError>>;

    /// Custom catalog entries, ordered by name.
    fn list_custom_exercises(&self) -> BoxFuture<'_, Result<Vec<CatalogEntry>, StorageError>>;

    /// Inserting a name that already exists is not an error.
    fn insert_custom_exercise(&self, entry: CatalogEntry)
    -> BoxFuture<'_, Result<(), StorageError>>;

    fn delete_custom_exercise(&self, name: String) -> BoxFuture<'_, Result<(), StorageError>>;
}
