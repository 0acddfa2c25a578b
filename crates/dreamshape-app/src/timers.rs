//! One-second tickers for the active workout.
//!
//! The elapsed-time ticker lives as long as the active workout; the rest
//! countdown lives until it reaches zero, is skipped, or is replaced by a
//! newer one. Both are plain tokio tasks that are aborted on teardown.
//! Without a runtime (synchronous callers) the timers are inert.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use jiff::Timestamp;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Elapsed { seconds: u64 },
    RestTick { exercise: usize, remaining: u32 },
    RestFinished { exercise: usize },
}

/// The countdown follows its exercise when the list is reordered, so the
/// position is shared with the running task.
struct RestTimer {
    exercise: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

pub struct SessionTimers {
    handle: Option<Handle>,
    tx: UnboundedSender<TimerEvent>,
    rx: UnboundedReceiver<TimerEvent>,
    elapsed: Option<JoinHandle<()>>,
    rest: Option<RestTimer>,
}

impl Default for SessionTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimers {
    /// Bind to the ambient runtime, if there is one.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            handle: Handle::try_current().ok(),
            tx,
            rx,
            elapsed: None,
            rest: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.handle.is_some()
    }

    /// Tick the workout clock once a second, starting from the time
    /// already elapsed since `start`.
    pub fn start_elapsed(&mut self, start: Timestamp) {
        self.stop_elapsed();
        let Some(handle) = &self.handle else {
            tracing::debug!("no runtime; elapsed timer not started");
            return;
        };
        let base = u64::try_from(Timestamp::now().as_second() - start.as_second()).unwrap_or(0);
        let tx = self.tx.clone();
        self.elapsed = Some(handle.spawn(async move {
            let mut ticker = tokio::time::interval(TICK);
            let mut ticks = 0u64;
            loop {
                ticker.tick().await;
                if tx.send(TimerEvent::Elapsed { seconds: base + ticks }).is_err() {
                    break;
                }
                ticks += 1;
            }
        }));
    }

    pub fn stop_elapsed(&mut self) {
        if let Some(task) = self.elapsed.take() {
            task.abort();
        }
    }

    /// Start a rest countdown for `exercise`, replacing any running one.
    pub fn start_rest(&mut self, exercise: usize, seconds: u32) {
        self.skip_rest();
        let Some(handle) = &self.handle else {
            tracing::debug!(exercise, "no runtime; rest timer not started");
            return;
        };
        let tx = self.tx.clone();
        let position = Arc::new(AtomicUsize::new(exercise));
        let shared = Arc::clone(&position);
        let task = handle.spawn(async move {
            if seconds == 0 {
                let exercise = shared.load(Ordering::Relaxed);
                let _ = tx.send(TimerEvent::RestFinished { exercise });
                return;
            }
            for remaining in (0..seconds).rev() {
                tokio::time::sleep(TICK).await;
                let exercise = shared.load(Ordering::Relaxed);
                let event = if remaining == 0 {
                    TimerEvent::RestFinished { exercise }
                } else {
                    TimerEvent::RestTick {
                        exercise,
                        remaining,
                    }
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });
        tracing::debug!(exercise, seconds, "rest timer started");
        self.rest = Some(RestTimer {
            exercise: position,
            task,
        });
    }

    pub fn skip_rest(&mut self) {
        if let Some(rest) = self.rest.take() {
            rest.task.abort();
        }
    }

    /// The exercise whose rest countdown is still running.
    pub fn rest_exercise(&self) -> Option<usize> {
        self.rest
            .as_ref()
            .filter(|rest| !rest.task.is_finished())
            .map(|rest| rest.exercise.load(Ordering::Relaxed))
    }

    /// Keep the countdown on its exercise after a move from `from` to `to`.
    pub fn exercise_moved(&mut self, from: usize, to: usize) {
        let Some(rest) = &self.rest else { return };
        let current = rest.exercise.load(Ordering::Relaxed);
        let shifted = if current == from {
            to
        } else if from < current && current <= to {
            current - 1
        } else if to <= current && current < from {
            current + 1
        } else {
            current
        };
        rest.exercise.store(shifted, Ordering::Relaxed);
    }

    /// Stop the countdown if its exercise was removed, otherwise shift it
    /// past the gap.
    pub fn exercise_removed(&mut self, index: usize) {
        let Some(rest) = &self.rest else { return };
        let current = rest.exercise.load(Ordering::Relaxed);
        if current == index {
            self.skip_rest();
        } else if current > index {
            rest.exercise.store(current - 1, Ordering::Relaxed);
        }
    }

    /// Tear everything down. Called when the active workout is cleared.
    pub fn clear(&mut self) {
        self.stop_elapsed();
        self.skip_rest();
    }

    /// Drain events delivered since the last call.
    pub fn take_events(&mut self) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Drop for SessionTimers {
    fn drop(&mut self) {
        self.clear();
    }
}
