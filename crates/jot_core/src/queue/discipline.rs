//! Ordering policies for `ActionQueue`.

use super::action::BoxedAction;
use std::cmp::Reverse;

/// Picks the index of the next pending action to run.
///
/// Returns `None` only when nothing is selectable. Called with the current
/// pending list on every dequeue.
pub trait Discipline: Send {
    fn select(&self, pending: &[BoxedAction]) -> Option<usize>;
}

impl<F> Discipline for F
where
    F: Fn(&[BoxedAction]) -> Option<usize> + Send,
{
    fn select(&self, pending: &[BoxedAction]) -> Option<usize> {
        self(pending)
    }
}

/// Oldest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fifo;

impl Discipline for Fifo {
    fn select(&self, pending: &[BoxedAction]) -> Option<usize> {
        if pending.is_empty() {
            None
        } else {
            Some(0)
        }
    }
}

/// Newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifo;

impl Discipline for Lifo {
    fn select(&self, pending: &[BoxedAction]) -> Option<usize> {
        pending.len().checked_sub(1)
    }
}

/// Largest `Action::priority` first; ties go to the oldest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighestPriority;

impl Discipline for HighestPriority {
    fn select(&self, pending: &[BoxedAction]) -> Option<usize> {
        pending
            .iter()
            .enumerate()
            .max_by_key(|(index, action)| (action.priority(), Reverse(*index)))
            .map(|(index, _)| index)
    }
}
