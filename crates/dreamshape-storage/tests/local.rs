use dreamshape_storage::error::StorageError;
use dreamshape_storage::local::LocalStore;

#[test]
fn save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::open(dir.path()).unwrap();

    store.save("dreamshape_templates", &vec!["a", "b"]).unwrap();

    let loaded: Vec<String> = store.load_or_default("dreamshape_templates");
    assert_eq!(loaded, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn missing_key_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::open(dir.path()).unwrap();

    let loaded: Vec<u32> = store.load_or_default("dreamshape_workouts");
    assert!(loaded.is_empty());
    assert!(matches!(
        store.require::<Vec<u32>>("dreamshape_workouts"),
        Err(StorageError::NotFound { .. })
    ));
}

#[test]
fn malformed_json_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::open(dir.path()).unwrap();
    store.put_raw("dreamshape_workouts", "{not json").unwrap();

    let loaded: Vec<u32> = store.load_or_default("dreamshape_workouts");
    assert!(loaded.is_empty());
    assert!(store.load::<Vec<u32>>("dreamshape_workouts").is_none());
}

#[test]
fn overwrite_replaces_whole_value() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::open(dir.path()).unwrap();
    store.save("k", &vec![1, 2, 3]).unwrap();
    store.save("k", &vec![4]).unwrap();

    assert_eq!(store.get_raw("k").unwrap().as_deref(), Some("[4]"));
    assert!(!dir.path().join("k.json.tmp").exists());
}

#[test]
fn flags_default_to_false() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::open(dir.path()).unwrap();

    assert!(!store.flag("migration_completed_x"));
    store.set_flag("migration_completed_x").unwrap();
    assert!(store.flag("migration_completed_x"));

    store.remove("migration_completed_x").unwrap();
    assert!(!store.flag("migration_completed_x"));
    store.remove("migration_completed_x").unwrap();
}

#[test]
fn path_like_keys_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::open(dir.path()).unwrap();

    for key in ["../escape", "a/b", "", ".hidden"] {
        assert!(matches!(
            store.put_raw(key, "1"),
            Err(StorageError::InvalidKey { .. })
        ));
    }
}
