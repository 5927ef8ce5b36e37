//! Runnable unit contract.

use std::error::Error;
use std::fmt::{Debug, Formatter};

/// Failure reported by an action.
pub type ActionError = Box<dyn Error + Send + Sync + 'static>;

pub type BoxedAction = Box<dyn Action>;

/// Unit of deferred work.
///
/// `run` consumes the action; anything left to do afterwards is returned as
/// offspring in the outcome.
pub trait Action: Send {
    fn run(self: Box<Self>) -> ActionOutcome;

    /// Short name used in log events.
    fn label(&self) -> &str {
        "action"
    }

    /// Hint for priority-aware disciplines. Higher runs earlier.
    fn priority(&self) -> i32 {
        0
    }
}

/// Result of running one action.
pub struct ActionOutcome {
    /// Follow-up actions, queued whether or not `result` is an error.
    pub offspring: Vec<BoxedAction>,
    pub result: Result<(), ActionError>,
}

impl ActionOutcome {
    pub fn done() -> Self {
        Self {
            offspring: Vec::new(),
            result: Ok(()),
        }
    }

    pub fn failed(error: impl Into<ActionError>) -> Self {
        Self {
            offspring: Vec::new(),
            result: Err(error.into()),
        }
    }

    pub fn with_offspring(mut self, action: impl Action + 'static) -> Self {
        self.offspring.push(Box::new(action));
        self
    }
}

impl Debug for ActionOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let offspring: Vec<&str> = self.offspring.iter().map(|action| action.label()).collect();
        f.debug_struct("ActionOutcome")
            .field("offspring", &offspring)
            .field("result", &self.result)
            .finish()
    }
}

/// Action backed by a closure.
pub struct FnAction<F> {
    label: String,
    priority: i32,
    run: F,
}

impl<F> FnAction<F>
where
    F: FnOnce() -> ActionOutcome + Send,
{
    pub fn new(label: impl Into<String>, run: F) -> Self {
        Self {
            label: label.into(),
            priority: 0,
            run,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl<F> Action for FnAction<F>
where
    F: FnOnce() -> ActionOutcome + Send,
{
    fn run(self: Box<Self>) -> ActionOutcome {
        let this = *self;
        (this.run)()
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
