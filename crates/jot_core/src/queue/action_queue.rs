//! Thread-safe action queue.

use super::action::{Action, ActionError, ActionOutcome, BoxedAction};
use super::discipline::{Discipline, Fifo};
use log::{debug, warn};
use parking_lot::Mutex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type QueueResult<T> = Result<T, QueueError>;

#[derive(Debug)]
pub enum QueueError {
    /// `run_next` was called with nothing pending.
    EmptyQueue,
    /// The discipline picked nothing, or an index past the end.
    NoSelectableAction { pending: usize },
    /// The action ran and reported an error. Its offspring were still queued.
    ActionFailed {
        action: String,
        queue_empty: bool,
        source: ActionError,
    },
}

impl QueueError {
    /// Whether the pending list was empty when this error was returned.
    pub fn is_queue_empty(&self) -> bool {
        match self {
            Self::EmptyQueue => true,
            Self::NoSelectableAction { .. } => false,
            Self::ActionFailed { queue_empty, .. } => *queue_empty,
        }
    }
}

impl Display for QueueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyQueue => write!(f, "run_next called on empty queue"),
            Self::NoSelectableAction { pending } => {
                write!(f, "unable to pick next action among {pending} pending")
            }
            Self::ActionFailed { action, source, .. } => {
                write!(f, "action `{action}` failed: {source}")
            }
        }
    }
}

impl Error for QueueError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ActionFailed { source, .. } => Some(source.as_ref()),
            Self::EmptyQueue | Self::NoSelectableAction { .. } => None,
        }
    }
}

/// Summary of `ActionQueue::run_until_empty`.
#[derive(Debug, Default)]
pub struct DrainReport {
    /// Actions that ran, successful or not.
    pub executed: usize,
    pub failures: Vec<QueueError>,
}

struct QueueState {
    discipline: Box<dyn Discipline>,
    pending: Vec<BoxedAction>,
}

/// Pending actions plus the discipline that orders them.
pub struct ActionQueue {
    state: Mutex<QueueState>,
}

impl ActionQueue {
    pub fn new(discipline: impl Discipline + 'static) -> Self {
        Self {
            state: Mutex::new(QueueState {
                discipline: Box::new(discipline),
                pending: Vec::new(),
            }),
        }
    }

    /// Appends `action` to the pending list.
    pub fn enqueue(&self, action: impl Action + 'static) {
        self.enqueue_boxed(Box::new(action));
    }

    pub fn enqueue_boxed(&self, action: BoxedAction) {
        self.state.lock().pending.push(action);
    }

    pub fn len(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().pending.is_empty()
    }

    /// Runs the action chosen by the discipline.
    ///
    /// Returns whether the pending list is empty afterwards. Offspring are
    /// queued before returning, including when the action failed; in that
    /// case the failure is returned as `QueueError::ActionFailed`.
    ///
    /// # Errors
    /// - `EmptyQueue` when nothing is pending. The queue is not modified.
    /// - `NoSelectableAction` when the discipline selects nothing valid.
    ///   The queue is not modified.
    /// - `ActionFailed` when the action itself reported an error.
    ///
    /// The queue lock is held while the action runs.
    pub fn run_next(&self) -> QueueResult<bool> {
        let mut state = self.state.lock();
        let pending = state.pending.len();
        if pending == 0 {
            return Err(QueueError::EmptyQueue);
        }

        let index = match state.discipline.select(&state.pending) {
            Some(index) if index < pending => index,
            selected => {
                warn!(
                    "event=action_select module=queue status=error pending={} selected={:?}",
                    pending, selected
                );
                return Err(QueueError::NoSelectableAction { pending });
            }
        };

        let action = state.pending.remove(index);
        let label = action.label().to_string();
        let started_at = Instant::now();
        let ActionOutcome { offspring, result } = action.run();

        let offspring_count = offspring.len();
        state.pending.extend(offspring);
        let queue_empty = state.pending.is_empty();

        match result {
            Ok(()) => {
                debug!(
                    "event=action_run module=queue status=ok action={} offspring={} pending={} duration_ms={}",
                    label,
                    offspring_count,
                    state.pending.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(queue_empty)
            }
            Err(source) => {
                warn!(
                    "event=action_run module=queue status=error action={} offspring={} pending={} duration_ms={} error={}",
                    label,
                    offspring_count,
                    state.pending.len(),
                    started_at.elapsed().as_millis(),
                    source
                );
                Err(QueueError::ActionFailed {
                    action: label,
                    queue_empty,
                    source,
                })
            }
        }
    }

    /// Calls `run_next` until the queue reports empty.
    ///
    /// Action failures are collected and draining continues. Stops early
    /// when the discipline cannot select an action.
    pub fn run_until_empty(&self) -> DrainReport {
        let mut report = DrainReport::default();
        loop {
            match self.run_next() {
                Ok(queue_empty) => {
                    report.executed += 1;
                    if queue_empty {
                        break;
                    }
                }
                Err(QueueError::EmptyQueue) => break,
                Err(err @ QueueError::NoSelectableAction { .. }) => {
                    report.failures.push(err);
                    break;
                }
                Err(err) => {
                    report.executed += 1;
                    let queue_empty = err.is_queue_empty();
                    report.failures.push(err);
                    if queue_empty {
                        break;
                    }
                }
            }
        }
        report
    }
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self::new(Fifo)
    }
}
