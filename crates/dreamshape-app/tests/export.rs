use dreamshape_app::confirm::AssumeYes;
use dreamshape_app::export::{self, ExportDocument};
use dreamshape_app::tracker::{FinishChoice, Tracker};
use dreamshape_core::models::workout::ActivityType;
use dreamshape_core::session::SetField;
use dreamshape_storage::local::LocalStore;
use jiff::Timestamp;
use jiff::civil::date;

#[test]
fn file_name_carries_the_export_date() {
    assert_eq!(
        export::file_name(date(2026, 10, 16)),
        "dreamshape-backup-2026-10-16.json"
    );
}

#[test]
fn export_contains_every_logged_workout() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = Tracker::open(LocalStore::open(dir.path().join("data")).unwrap(), 90);

    for (weight, activity) in [(50.0, None), (55.0, Some(ActivityType::Cardio))] {
        tracker.start_empty_workout().unwrap();
        tracker.add_exercise("Squat (Barbell)").unwrap();
        tracker.update_set(0, 0, SetField::Weight(weight)).unwrap();
        tracker.update_set(0, 0, SetField::Reps(5)).unwrap();
        tracker.toggle_set_type(0, 0).unwrap();
        tracker.toggle_set_completed(0, 0).unwrap();
        tracker
            .finish_workout(FinishChoice::JustFinish, activity, &mut AssumeYes)
            .unwrap();
    }

    let now: Timestamp = "2026-10-16T08:30:00Z".parse().unwrap();
    let doc = tracker.export_document(now);
    let out = dir.path().join("exports");
    let path = export::write(&out, &doc, date(2026, 10, 16)).unwrap();
    assert!(path.ends_with("dreamshape-backup-2026-10-16.json"));

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(json.get("exportedAt").is_some());
    assert_eq!(json["profile"]["name"], "User");
    assert_eq!(json["workouts"][0]["exercises"][0]["sets"][0]["type"], "warmup");

    let back: ExportDocument = serde_json::from_str(&raw).unwrap();
    assert_eq!(back.workouts, tracker.workouts());
    assert_eq!(back.exported_at, now);
}
