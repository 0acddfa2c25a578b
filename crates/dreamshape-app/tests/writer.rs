use std::sync::Arc;

use dreamshape_app::writer::{RemoteOp, RemoteWriter, SyncState, last_sync_label};
use dreamshape_core::models::exercise::CatalogEntry;
use dreamshape_storage::memory::MemoryStore;
use jiff::Timestamp;
use jiff::tz::TimeZone;
use tokio::runtime::Handle;
use uuid::Uuid;

fn at(s: &str) -> Timestamp {
    s.parse().unwrap()
}

#[test]
fn sync_label_is_relative_then_a_date() {
    let now = at("2026-10-16T12:00:00Z");
    let utc = TimeZone::UTC;

    assert_eq!(last_sync_label(None, now, &utc), "Never synced");
    assert_eq!(
        last_sync_label(Some(at("2026-10-16T11:59:30Z")), now, &utc),
        "Just now"
    );
    assert_eq!(
        last_sync_label(Some(at("2026-10-16T11:55:00Z")), now, &utc),
        "5m ago"
    );
    assert_eq!(
        last_sync_label(Some(at("2026-10-16T09:00:00Z")), now, &utc),
        "3h ago"
    );
    assert_eq!(
        last_sync_label(Some(at("2026-10-14T08:00:00Z")), now, &utc),
        "2026-10-14"
    );
}

#[tokio::test]
async fn failed_push_marks_status_failed() {
    let memory = Arc::new(MemoryStore::new(Uuid::new_v4()));
    memory.set_fail_writes(true);
    let mut writer = RemoteWriter::new(memory.clone(), Handle::current());

    writer.push(RemoteOp::InsertCustomExercise(CatalogEntry::new(
        "Sled Push", "Legs", "Sled",
    )));
    assert_eq!(writer.status().in_flight, 1);
    writer.settle().await;

    let status = writer.status();
    assert_eq!(status.in_flight, 0);
    assert!(matches!(status.state, SyncState::Failed { .. }));
    assert_eq!(memory.write_count(), 1);
}

#[tokio::test]
async fn successful_push_records_last_sync() {
    let memory = Arc::new(MemoryStore::new(Uuid::new_v4()));
    let mut writer = RemoteWriter::new(memory.clone(), Handle::current());

    writer.push(RemoteOp::DeleteWorkout(Uuid::new_v4()));
    writer.settle().await;

    let status = writer.status();
    assert_eq!(status.state, SyncState::Idle);
    assert!(status.last_synced.is_some());
}
