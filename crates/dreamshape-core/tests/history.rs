use dreamshape_core::history;
use dreamshape_core::models::workout::{ExerciseLog, WorkoutLog, WorkoutSet};
use uuid::Uuid;

fn exercise(name: &str, weights: &[f64]) -> ExerciseLog {
    ExerciseLog {
        exercise_id: Uuid::new_v4(),
        exercise_name: name.to_string(),
        sets: weights
            .iter()
            .map(|w| WorkoutSet {
                weight: *w,
                reps: 5,
                ..WorkoutSet::empty()
            })
            .collect(),
        rest_duration: None,
        notes: None,
    }
}

fn log(template: &str, date: &str, exercises: Vec<ExerciseLog>) -> WorkoutLog {
    WorkoutLog {
        id: Uuid::new_v4(),
        template_name: template.to_string(),
        date: date.parse().unwrap(),
        exercises,
        duration: 0,
        activity_type: None,
    }
}

#[test]
fn personal_record_is_max_weight_over_all_logs() {
    let logs = vec![
        log("A", "2024-01-01T10:00:00Z", vec![exercise("Squat", &[80.0, 100.0])]),
        log("B", "2024-01-05T10:00:00Z", vec![exercise("Squat", &[95.0]), exercise("Plank", &[0.0])]),
    ];

    assert_eq!(history::personal_record(&logs, "Squat"), 100.0);
    assert_eq!(history::personal_record(&logs, "Deadlift"), 0.0);
    assert_eq!(history::personal_record(&[], "Squat"), 0.0);
}

#[test]
fn latest_template_log_is_the_only_one_consulted() {
    let logs = vec![
        log("A", "2024-01-01T10:00:00Z", vec![exercise("Squat", &[80.0])]),
        log("A", "2024-01-08T10:00:00Z", vec![exercise("Lunges", &[20.0])]),
    ];

    assert!(history::last_for_template(&logs, "A", "Squat").is_none());
    assert_eq!(
        history::last_for_template(&logs, "A", "Lunges").unwrap().sets[0].weight,
        20.0
    );
}

#[test]
fn latest_exercise_log_spans_templates() {
    let logs = vec![
        log("B", "2024-01-09T10:00:00Z", vec![exercise("Squat", &[90.0])]),
        log("A", "2024-01-01T10:00:00Z", vec![exercise("Squat", &[80.0])]),
        log("C", "2024-01-10T10:00:00Z", vec![exercise("Plank", &[0.0])]),
    ];

    assert_eq!(history::last_for_exercise(&logs, "Squat").unwrap().sets[0].weight, 90.0);
}

#[test]
fn top_records_are_sorted_heaviest_first() {
    let logs = vec![log(
        "A",
        "2024-01-01T10:00:00Z",
        vec![
            exercise("Squat", &[140.0]),
            exercise("Bench", &[100.0]),
            exercise("Deadlift", &[180.0]),
            exercise("Curl", &[20.0]),
        ],
    )];

    let top = history::top_personal_records(&logs, 3);
    let names: Vec<_> = top.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["Deadlift", "Squat", "Bench"]);
}
