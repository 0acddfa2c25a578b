use dreamshape_core::models::exercise::TemplateExercise;
use dreamshape_core::models::template::WorkoutTemplate;
use dreamshape_core::models::workout::{ActivityType, WorkoutLog};
use dreamshape_storage::rows::{TemplateRow, WorkoutRow};
use uuid::Uuid;

#[test]
fn template_row_uses_snake_case_columns() {
    let user = Uuid::new_v4();
    let template = WorkoutTemplate::new(
        "Push Day",
        vec![TemplateExercise::new("Dips (Chest)", "Bodyweight", "Chest")],
        None,
    )
    .unwrap();

    let json = serde_json::to_value(TemplateRow::new(user, template.clone())).unwrap();

    assert_eq!(json["user_id"], user.to_string());
    assert_eq!(json["exercises"][0]["muscleGroup"], "Chest");

    let row: TemplateRow = serde_json::from_value(json).unwrap();
    assert_eq!(WorkoutTemplate::from(row), template);
}

#[test]
fn workout_row_defaults_activity_type() {
    let log = WorkoutLog {
        id: Uuid::new_v4(),
        template_name: "Legs".to_string(),
        date: "2024-06-01T10:00:00Z".parse().unwrap(),
        exercises: vec![],
        duration: 42,
        activity_type: None,
    };

    let row = WorkoutRow::new(Uuid::new_v4(), log);
    let json = serde_json::to_value(&row).unwrap();

    assert_eq!(json["activity_type"], "workout");
    assert_eq!(json["template_name"], "Legs");
    assert_eq!(WorkoutLog::from(row).activity_type, Some(ActivityType::Workout));
}
