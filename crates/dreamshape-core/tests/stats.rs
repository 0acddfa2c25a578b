use dreamshape_core::models::workout::{ExerciseLog, WorkoutLog, WorkoutSet};
use dreamshape_core::stats;
use jiff::civil::date;
use jiff::tz::TimeZone;
use uuid::Uuid;

fn log_on(day: &str, weight: f64, reps: u32) -> WorkoutLog {
    WorkoutLog {
        id: Uuid::new_v4(),
        template_name: "Any".to_string(),
        date: format!("{day}T12:00:00Z").parse().unwrap(),
        exercises: vec![ExerciseLog {
            exercise_id: Uuid::new_v4(),
            exercise_name: "Squat".to_string(),
            sets: vec![WorkoutSet {
                weight,
                reps,
                ..WorkoutSet::empty()
            }],
            rest_duration: None,
            notes: None,
        }],
        duration: 1800,
        activity_type: None,
    }
}

#[test]
fn streak_stops_at_a_gap() {
    let logs = vec![
        log_on("2024-06-10", 0.0, 0),
        log_on("2024-06-09", 0.0, 0),
        log_on("2024-06-07", 0.0, 0),
    ];
    assert_eq!(stats::current_streak(&logs, date(2024, 6, 10), &TimeZone::UTC), 2);
}

#[test]
fn streak_survives_no_workout_yet_today() {
    let logs = vec![log_on("2024-06-09", 0.0, 0), log_on("2024-06-08", 0.0, 0)];
    assert_eq!(stats::current_streak(&logs, date(2024, 6, 10), &TimeZone::UTC), 2);
}

#[test]
fn streak_breaks_after_two_missed_days() {
    let logs = vec![log_on("2024-06-08", 0.0, 0)];
    assert_eq!(stats::current_streak(&logs, date(2024, 6, 10), &TimeZone::UTC), 0);
    assert_eq!(stats::current_streak(&[], date(2024, 6, 10), &TimeZone::UTC), 0);
}

#[test]
fn weekly_buckets_cover_trailing_weeks() {
    let logs = vec![
        log_on("2024-06-10", 100.0, 5),
        log_on("2024-06-04", 50.0, 10),
        log_on("2024-06-03", 10.0, 10),
    ];

    let buckets = stats::weekly_buckets(&logs, date(2024, 6, 10), &TimeZone::UTC, 8);

    assert_eq!(buckets.len(), 8);
    let this_week = buckets.last().unwrap();
    assert_eq!(this_week.weeks_ago, 0);
    assert_eq!(this_week.start, date(2024, 6, 4));
    assert_eq!(this_week.workouts, 2);
    assert_eq!(this_week.volume, 1000.0);
    let last_week = &buckets[6];
    assert_eq!(last_week.workouts, 1);
    assert_eq!(last_week.volume, 100.0);
}

#[test]
fn heatmap_flags_active_days() {
    let logs = vec![log_on("2024-06-10", 0.0, 0), log_on("2024-06-01", 0.0, 0)];
    let days = stats::activity_heatmap(&logs, date(2024, 6, 10), &TimeZone::UTC, 84);

    assert_eq!(days.len(), 84);
    assert_eq!(days.last().unwrap().date, date(2024, 6, 10));
    assert!(days.last().unwrap().active);
    assert_eq!(days.iter().filter(|d| d.active).count(), 2);
}

#[test]
fn summary_aggregates() {
    let logs = vec![
        log_on("2024-06-10", 100.0, 5),
        log_on("2024-06-09", 100.0, 5),
        log_on("2024-05-13", 100.0, 5),
    ];
    let now = "2024-06-10T18:00:00Z".parse().unwrap();

    let summary = stats::summarize(&logs, now, &TimeZone::UTC);

    assert_eq!(summary.workout_count, 3);
    assert_eq!(summary.current_streak, 2);
    assert_eq!(summary.total_volume, 1500.0);
    assert_eq!(summary.total_duration_seconds, 5400);
    assert_eq!(summary.favorite_exercise.as_deref(), Some("Squat"));
    // Four whole weeks since 2024-05-13.
    assert_eq!(summary.average_per_week, 0.75);
    // 2024-06-10 is a Monday; the week began on Sunday the 9th.
    assert_eq!(summary.weekly_goal_progress, 50.0);
    assert_eq!(summary.consistency_score, 25.0);
}

#[test]
fn progress_is_reported_as_a_capped_percentage() {
    let now = "2024-06-10T18:00:00Z".parse().unwrap();
    let mut logs = vec![
        log_on("2024-06-10", 0.0, 0),
        log_on("2024-06-10", 0.0, 0),
        log_on("2024-06-10", 0.0, 0),
        log_on("2024-06-09", 0.0, 0),
    ];

    let summary = stats::summarize(&logs, now, &TimeZone::UTC);
    assert_eq!(summary.weekly_goal_progress, 100.0);
    assert!((summary.consistency_score - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(summary.volume_progress, 0.0);

    logs.push(log_on("2024-06-10", 1000.0, 100));
    let summary = stats::summarize(&logs, now, &TimeZone::UTC);
    assert_eq!(summary.weekly_goal_progress, 100.0);
    assert_eq!(summary.volume_progress, 100.0);
}
