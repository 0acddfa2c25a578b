use dreamshape_core::models::exercise::{CatalogEntry, TemplateExercise};
use dreamshape_core::models::template::WorkoutTemplate;
use dreamshape_storage::error::StorageError;
use dreamshape_storage::memory::MemoryStore;
use dreamshape_storage::remote::RemoteStore;
use uuid::Uuid;

fn template(name: &str) -> WorkoutTemplate {
    WorkoutTemplate::new(name, vec![TemplateExercise::ad_hoc("Plank")], None).unwrap()
}

#[tokio::test]
async fn insert_is_idempotent_per_id() {
    let store = MemoryStore::new(Uuid::new_v4());
    let t = template("A");

    store.insert_template(t.clone()).await.unwrap();
    store.insert_template(t).await.unwrap();

    assert_eq!(store.list_templates().await.unwrap().len(), 1);
    assert_eq!(store.write_count(), 2);
}

#[tokio::test]
async fn failing_writes_leave_tables_untouched() {
    let store = MemoryStore::new(Uuid::new_v4());
    store.set_fail_writes(true);

    let err = store
        .insert_custom_exercise(CatalogEntry::new("Sled Push", "Legs", "Machine"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Request(_)));
    assert!(store.snapshot().custom_exercises.is_empty());
}

#[tokio::test]
async fn templates_list_newest_first() {
    let store = MemoryStore::new(Uuid::new_v4());
    store.insert_template(template("Old")).await.unwrap();
    store.insert_template(template("New")).await.unwrap();

    let names: Vec<_> = store
        .list_templates()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["New", "Old"]);
}
