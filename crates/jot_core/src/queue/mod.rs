//! Deferred work queue with pluggable ordering.
//!
//! # Responsibility
//! - Hold pending actions and run them one at a time.
//! - Let a `Discipline` decide which pending action runs next.
//! - Requeue offspring produced by an action, even when the action failed.
//!
//! # Invariants
//! - At most one action runs through a queue at any moment.
//! - Selection, removal, execution and requeue happen under one lock.
//! - Actions must hand follow-up work back as offspring; calling into the
//!   same queue from inside `Action::run` deadlocks.

mod action;
mod action_queue;
mod discipline;

pub use action::{Action, ActionError, ActionOutcome, BoxedAction, FnAction};
pub use action_queue::{ActionQueue, DrainReport, QueueError, QueueResult};
pub use discipline::{Discipline, Fifo, HighestPriority, Lifo};
