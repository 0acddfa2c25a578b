use std::time::Duration;

use dreamshape_app::confirm::AssumeYes;
use dreamshape_app::timers::{SessionTimers, TimerEvent};
use dreamshape_app::tracker::{FinishChoice, Tracker};
use dreamshape_storage::local::LocalStore;
use jiff::Timestamp;

#[tokio::test(start_paused = true)]
async fn rest_countdown_ticks_then_finishes() {
    let mut timers = SessionTimers::new();
    timers.start_rest(2, 3);
    assert_eq!(timers.rest_exercise(), Some(2));

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert_eq!(
        timers.take_events(),
        vec![
            TimerEvent::RestTick {
                exercise: 2,
                remaining: 2
            },
            TimerEvent::RestTick {
                exercise: 2,
                remaining: 1
            },
            TimerEvent::RestFinished { exercise: 2 },
        ]
    );
    assert_eq!(timers.rest_exercise(), None);
}

#[tokio::test(start_paused = true)]
async fn a_new_rest_replaces_the_running_one() {
    let mut timers = SessionTimers::new();
    timers.start_rest(0, 10);
    tokio::time::sleep(Duration::from_millis(1500)).await;
    timers.start_rest(1, 2);
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(
        timers.take_events(),
        vec![
            TimerEvent::RestTick {
                exercise: 0,
                remaining: 9
            },
            TimerEvent::RestTick {
                exercise: 1,
                remaining: 1
            },
            TimerEvent::RestFinished { exercise: 1 },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn skipped_rest_emits_nothing_more() {
    let mut timers = SessionTimers::new();
    timers.start_rest(0, 5);
    timers.skip_rest();
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert!(timers.take_events().is_empty());
    assert_eq!(timers.rest_exercise(), None);
}

#[tokio::test(start_paused = true)]
async fn elapsed_ticks_every_second() {
    let mut timers = SessionTimers::new();
    timers.start_elapsed(Timestamp::now());
    tokio::time::sleep(Duration::from_millis(2500)).await;

    let seconds: Vec<u64> = timers
        .take_events()
        .into_iter()
        .map(|e| match e {
            TimerEvent::Elapsed { seconds } => seconds,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(seconds.len(), 3);
    assert_eq!(seconds[1], seconds[0] + 1);
    assert_eq!(seconds[2], seconds[0] + 2);
}

#[test]
fn timers_are_inert_without_a_runtime() {
    let mut timers = SessionTimers::new();
    assert!(!timers.is_live());
    timers.start_rest(0, 1);
    timers.start_elapsed(Timestamp::now());
    assert_eq!(timers.rest_exercise(), None);
    assert!(timers.take_events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn completing_a_set_starts_rest_and_finishing_stops_the_clock() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = Tracker::open(LocalStore::open(dir.path()).unwrap(), 90);
    tracker.start_empty_workout().unwrap();
    tracker.add_exercise("Plank").unwrap();
    tracker.set_exercise_rest(0, Some(2)).unwrap();

    tracker.toggle_set_completed(0, 0).unwrap();
    assert_eq!(tracker.rest_exercise(), Some(0));
    tokio::time::sleep(Duration::from_millis(2500)).await;

    let events = tracker.take_timer_events();
    assert!(events.contains(&TimerEvent::RestFinished { exercise: 0 }));
    assert!(events.iter().any(|e| matches!(e, TimerEvent::Elapsed { .. })));

    tracker
        .finish_workout(FinishChoice::JustFinish, None, &mut AssumeYes)
        .unwrap();
    tracker.take_timer_events();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(tracker.take_timer_events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn rest_countdown_follows_its_exercise_when_reordered() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = Tracker::open(LocalStore::open(dir.path()).unwrap(), 90);
    tracker.start_empty_workout().unwrap();
    tracker.add_exercise("Plank").unwrap();
    tracker.add_exercise("Squat (Barbell)").unwrap();
    tracker.set_exercise_rest(1, Some(2)).unwrap();

    tracker.toggle_set_completed(1, 0).unwrap();
    assert_eq!(tracker.rest_exercise(), Some(1));

    tracker.move_exercise(1, 0).unwrap();
    assert_eq!(tracker.rest_exercise(), Some(0));
    assert_eq!(tracker.active().unwrap().exercises[0].exercise_name, "Squat (Barbell)");

    tokio::time::sleep(Duration::from_millis(2500)).await;
    let events = tracker.take_timer_events();
    assert!(events.contains(&TimerEvent::RestFinished { exercise: 0 }));
    assert!(!events.contains(&TimerEvent::RestFinished { exercise: 1 }));
}

#[tokio::test(start_paused = true)]
async fn removing_the_resting_exercise_stops_its_countdown() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = Tracker::open(LocalStore::open(dir.path()).unwrap(), 90);
    tracker.start_empty_workout().unwrap();
    tracker.add_exercise("Plank").unwrap();
    tracker.add_exercise("Squat (Barbell)").unwrap();
    tracker.toggle_set_completed(1, 0).unwrap();
    tracker.move_exercise(1, 0).unwrap();

    assert!(tracker.remove_exercise(0, &mut AssumeYes).unwrap());
    assert_eq!(tracker.rest_exercise(), None);
    assert_eq!(tracker.active().unwrap().exercises.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn removing_an_earlier_exercise_shifts_the_countdown() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = Tracker::open(LocalStore::open(dir.path()).unwrap(), 90);
    tracker.start_empty_workout().unwrap();
    tracker.add_exercise("Plank").unwrap();
    tracker.add_exercise("Squat (Barbell)").unwrap();
    tracker.toggle_set_completed(1, 0).unwrap();

    assert!(tracker.remove_exercise(0, &mut AssumeYes).unwrap());
    assert_eq!(tracker.rest_exercise(), Some(0));
}

#[tokio::test(start_paused = true)]
async fn moves_that_skip_over_the_resting_exercise_shift_it() {
    let mut timers = SessionTimers::new();
    timers.start_rest(2, 30);

    timers.exercise_moved(0, 3);
    assert_eq!(timers.rest_exercise(), Some(1));
    timers.exercise_moved(3, 0);
    assert_eq!(timers.rest_exercise(), Some(2));
    timers.exercise_moved(4, 3);
    assert_eq!(timers.rest_exercise(), Some(2));
}
