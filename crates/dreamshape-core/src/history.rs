//! Read-only queries over the workout log collection.

use std::collections::BTreeMap;

use crate::models::workout::{ExerciseLog, WorkoutLog};

/// Most recent log (by date) satisfying `pred`.
fn most_recent<'a>(
    logs: &'a [WorkoutLog],
    pred: impl Fn(&WorkoutLog) -> bool,
) -> Option<&'a WorkoutLog> {
    logs.iter()
        .filter(|log| pred(log))
        .reduce(|best, log| if log.date > best.date { log } else { best })
}

/// Entry for `exercise_name` inside the most recent log of `template_name`.
///
/// Only that one log is consulted: if the latest session of the template
/// skipped the exercise, there is no pre-fill.
pub fn last_for_template<'a>(
    logs: &'a [WorkoutLog],
    template_name: &str,
    exercise_name: &str,
) -> Option<&'a ExerciseLog> {
    most_recent(logs, |log| log.template_name == template_name)?.exercise(exercise_name)
}

/// Entry for `exercise_name` in the most recent log of any template that
/// contains it.
pub fn last_for_exercise<'a>(
    logs: &'a [WorkoutLog],
    exercise_name: &str,
) -> Option<&'a ExerciseLog> {
    most_recent(logs, |log| log.exercise(exercise_name).is_some())?.exercise(exercise_name)
}

/// Maximum weight ever logged for `exercise_name`, or 0 if never logged.
pub fn personal_record(logs: &[WorkoutLog], exercise_name: &str) -> f64 {
    logs.iter()
        .flat_map(|log| &log.exercises)
        .filter(|ex| ex.exercise_name == exercise_name)
        .flat_map(|ex| &ex.sets)
        .map(|set| set.weight)
        .fold(0.0, f64::max)
}

/// Maximum weight per exercise name across all logs.
pub fn personal_records(logs: &[WorkoutLog]) -> BTreeMap<String, f64> {
    let mut records: BTreeMap<String, f64> = BTreeMap::new();
    for ex in logs.iter().flat_map(|log| &log.exercises) {
        let current = records.entry(ex.exercise_name.clone()).or_insert(0.0);
        if let Some(max) = ex.max_weight() {
            *current = current.max(max);
        }
    }
    records
}

/// The `n` heaviest personal records, heaviest first.
pub fn top_personal_records(logs: &[WorkoutLog], n: usize) -> Vec<(String, f64)> {
    let mut records: Vec<_> = personal_records(logs).into_iter().collect();
    records.sort_by(|a, b| b.1.total_cmp(&a.1));
    records.truncate(n);
    records
}

/// Logs ordered newest first.
pub fn newest_first(logs: &[WorkoutLog]) -> Vec<&WorkoutLog> {
    let mut sorted: Vec<_> = logs.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}
