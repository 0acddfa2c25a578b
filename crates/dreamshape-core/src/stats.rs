//! Aggregate statistics for the dashboard and profile screens.
//!
//! Everything here is computed on demand from the workout logs. Calendar
//! bucketing happens in the caller-supplied time zone.

use std::collections::{BTreeMap, HashSet};

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::{Timestamp, ToSpan};
use serde::Serialize;

use crate::models::workout::WorkoutLog;

pub const WEEKLY_GOAL: usize = 4;
pub const CONSISTENCY_WINDOW_DAYS: i64 = 30;
pub const CONSISTENCY_TARGET: usize = 12;
pub const VOLUME_GOAL: f64 = 50_000.0;
pub const CHART_WEEKS: u32 = 8;
pub const HEATMAP_DAYS: u32 = 84;
const MAX_STREAK_DAYS: u32 = 365;
const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekBucket {
    /// 0 is the window ending today.
    pub weeks_ago: u32,
    pub start: Date,
    pub end: Date,
    pub workouts: usize,
    /// Sum of weight × reps over every set, completed or not.
    pub volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayActivity {
    pub date: Date,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub workout_count: usize,
    pub current_streak: u32,
    pub average_per_week: f64,
    pub total_volume: f64,
    pub total_duration_seconds: u64,
    pub favorite_exercise: Option<String>,
    /// Percent of [`WEEKLY_GOAL`], 0 to 100.
    pub weekly_goal_progress: f64,
    /// Percent of [`CONSISTENCY_TARGET`] over the last 30 days, 0 to 100.
    pub consistency_score: f64,
    /// Percent of [`VOLUME_GOAL`], 0 to 100.
    pub volume_progress: f64,
}

fn local_date(ts: Timestamp, tz: &TimeZone) -> Date {
    ts.to_zoned(tz.clone()).date()
}

fn active_days(logs: &[WorkoutLog], tz: &TimeZone) -> HashSet<Date> {
    logs.iter().map(|log| local_date(log.date, tz)).collect()
}

pub fn total_volume(logs: &[WorkoutLog]) -> f64 {
    logs.iter().map(WorkoutLog::volume).sum()
}

/// Consecutive active days counted back from `today`.
///
/// A day without activity ends the streak, except `today` itself: a
/// workout not yet logged today does not break a streak that reaches
/// yesterday.
pub fn current_streak(logs: &[WorkoutLog], today: Date, tz: &TimeZone) -> u32 {
    let days = active_days(logs, tz);
    let mut day = today;
    if !days.contains(&day) {
        day = match day.yesterday() {
            Ok(d) => d,
            Err(_) => return 0,
        };
    }

    let mut streak = 0;
    while streak < MAX_STREAK_DAYS && days.contains(&day) {
        streak += 1;
        day = match day.yesterday() {
            Ok(d) => d,
            Err(_) => break,
        };
    }
    streak
}

/// `weeks` seven-day windows, oldest first, the newest ending on `today`.
pub fn weekly_buckets(
    logs: &[WorkoutLog],
    today: Date,
    tz: &TimeZone,
    weeks: u32,
) -> Vec<WeekBucket> {
    let dated: Vec<(Date, &WorkoutLog)> =
        logs.iter().map(|log| (local_date(log.date, tz), log)).collect();

    (0..weeks)
        .rev()
        .map(|weeks_ago| {
            let end = today.saturating_sub((i64::from(weeks_ago) * 7).days());
            let start = end.saturating_sub(6.days());
            let in_window = dated.iter().filter(|(d, _)| *d >= start && *d <= end);
            let (workouts, volume) = in_window.fold((0, 0.0), |(n, v), (_, log)| {
                (n + 1, v + log.volume())
            });
            WeekBucket {
                weeks_ago,
                start,
                end,
                workouts,
                volume,
            }
        })
        .collect()
}

/// Activity flag for each of the trailing `days` days, oldest first.
pub fn activity_heatmap(
    logs: &[WorkoutLog],
    today: Date,
    tz: &TimeZone,
    days: u32,
) -> Vec<DayActivity> {
    let active = active_days(logs, tz);
    (0..days)
        .rev()
        .map(|back| {
            let date = today.saturating_sub(i64::from(back).days());
            DayActivity {
                date,
                active: active.contains(&date),
            }
        })
        .collect()
}

/// Workouts divided by whole weeks since the oldest log (at least one).
pub fn average_per_week(logs: &[WorkoutLog], now: Timestamp) -> f64 {
    let Some(oldest) = logs.iter().map(|log| log.date).min() else {
        return 0.0;
    };
    let weeks = ((now.as_second() - oldest.as_second()) / (7 * SECONDS_PER_DAY)).max(1);
    logs.len() as f64 / weeks as f64
}

/// Exercise name appearing in the most logs. Ties go to the
/// alphabetically first name.
pub fn favorite_exercise(logs: &[WorkoutLog]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for ex in logs.iter().flat_map(|log| &log.exercises) {
        *counts.entry(ex.exercise_name.as_str()).or_default() += 1;
    }
    let mut best: Option<(&str, usize)> = None;
    for (name, count) in counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((name, count));
        }
    }
    best.map(|(name, _)| name.to_string())
}

/// Share of `target` as a percentage, capped at 100.
fn percent(value: f64, target: f64) -> f64 {
    (value / target * 100.0).min(100.0)
}

/// Progress toward [`WEEKLY_GOAL`] for the week starting last Sunday.
pub fn weekly_goal_progress(logs: &[WorkoutLog], today: Date, tz: &TimeZone) -> f64 {
    let offset = i64::from(today.weekday().to_sunday_zero_offset());
    let week_start = today.saturating_sub(offset.days());
    let this_week = logs
        .iter()
        .filter(|log| local_date(log.date, tz) >= week_start)
        .count();
    percent(this_week as f64, WEEKLY_GOAL as f64)
}

/// Workouts in the last 30 days against [`CONSISTENCY_TARGET`].
pub fn consistency_score(logs: &[WorkoutLog], now: Timestamp) -> f64 {
    let cutoff = now.as_second() - CONSISTENCY_WINDOW_DAYS * SECONDS_PER_DAY;
    let recent = logs
        .iter()
        .filter(|log| log.date.as_second() >= cutoff)
        .count();
    percent(recent as f64, CONSISTENCY_TARGET as f64)
}

pub fn summarize(logs: &[WorkoutLog], now: Timestamp, tz: &TimeZone) -> Summary {
    let today = local_date(now, tz);
    let volume = total_volume(logs);
    Summary {
        workout_count: logs.len(),
        current_streak: current_streak(logs, today, tz),
        average_per_week: average_per_week(logs, now),
        total_volume: volume,
        total_duration_seconds: logs.iter().map(|log| log.duration).sum(),
        favorite_exercise: favorite_exercise(logs),
        weekly_goal_progress: weekly_goal_progress(logs, today, tz),
        consistency_score: consistency_score(logs, now),
        volume_progress: percent(volume, VOLUME_GOAL),
    }
}
