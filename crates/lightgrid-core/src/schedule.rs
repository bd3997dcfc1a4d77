//! Cancellable scheduled tasks and per-frame coalescing.
//!
//! The engine has no clock of its own. Callers pass the current time as a
//! [`Duration`] since an arbitrary origin and pump [`Scheduler::advance`].

use crate::gesture::Direction;
use std::time::Duration;

/// One trigger source. A slot holds at most one pending task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskSlot {
    ResizeRefit,
    OrientationRefit,
    NavigateSwap,
    DismissClose,
    ClearTransitions,
}

/// Work to run once a deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Recompute the fit after resize input went quiet.
    ResizeRefit,
    /// Force a refit once a new orientation has settled.
    OrientationRefit,
    /// Second phase of a navigation: swap the index and source.
    NavigateSwap { direction: Direction },
    /// Close the viewer after the dismiss exit animation.
    DismissClose,
    /// Drop transition styling after a snap-back finished.
    ClearTransitions,
}

impl Task {
    pub fn slot(&self) -> TaskSlot {
        match self {
            Task::ResizeRefit => TaskSlot::ResizeRefit,
            Task::OrientationRefit => TaskSlot::OrientationRefit,
            Task::NavigateSwap { .. } => TaskSlot::NavigateSwap,
            Task::DismissClose => TaskSlot::DismissClose,
            Task::ClearTransitions => TaskSlot::ClearTransitions,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    task: Task,
    deadline: Duration,
    /// Insertion order, breaks deadline ties.
    seq: u64,
}

/// Pending tasks keyed by slot.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Pending>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to run `delay` after `now`.
    ///
    /// Any task already pending in the same slot is cancelled and returned.
    pub fn schedule(&mut self, task: Task, now: Duration, delay: Duration) -> Option<Task> {
        let replaced = self.cancel(task.slot());
        self.pending.push(Pending {
            task,
            deadline: now + delay,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        replaced
    }

    /// Cancel the task pending in `slot`, if any.
    pub fn cancel(&mut self, slot: TaskSlot) -> Option<Task> {
        let index = self.pending.iter().position(|p| p.task.slot() == slot)?;
        Some(self.pending.swap_remove(index).task)
    }

    pub fn is_pending(&self, slot: TaskSlot) -> bool {
        self.pending.iter().any(|p| p.task.slot() == slot)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest deadline among pending tasks.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|p| p.deadline).min()
    }

    /// Remove and return every task due at `now`, earliest first.
    pub fn advance(&mut self, now: Duration) -> Vec<Task> {
        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.deadline <= now {
                due.push(*p);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|p| (p.deadline, p.seq));
        due.into_iter().map(|p| p.task).collect()
    }
}

/// Latest-value-wins cell flushed once per animation frame.
#[derive(Debug, Clone, Default)]
pub struct Coalesced<T> {
    value: Option<T>,
}

impl<T> Coalesced<T> {
    pub fn new() -> Self {
        Self { value: None }
    }

    /// Store a value, replacing anything not yet flushed.
    pub fn push(&mut self, value: T) {
        self.value = Some(value);
    }

    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    pub fn is_pending(&self) -> bool {
        self.value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_after_deadline() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Task::ResizeRefit, ms(0), ms(200));

        assert!(scheduler.advance(ms(199)).is_empty());
        assert_eq!(scheduler.advance(ms(200)), vec![Task::ResizeRefit]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_reschedule_replaces_pending() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.schedule(Task::ResizeRefit, ms(0), ms(200)).is_none());
        assert_eq!(
            scheduler.schedule(Task::ResizeRefit, ms(150), ms(200)),
            Some(Task::ResizeRefit)
        );

        assert!(scheduler.advance(ms(300)).is_empty());
        assert_eq!(scheduler.advance(ms(350)), vec![Task::ResizeRefit]);
    }

    #[test]
    fn test_slots_are_independent() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Task::ResizeRefit, ms(0), ms(200));
        scheduler.schedule(Task::OrientationRefit, ms(0), ms(100));
        scheduler.schedule(
            Task::NavigateSwap { direction: Direction::Forward },
            ms(0),
            ms(150),
        );

        assert_eq!(scheduler.next_deadline(), Some(ms(100)));
        assert_eq!(
            scheduler.advance(ms(500)),
            vec![
                Task::OrientationRefit,
                Task::NavigateSwap { direction: Direction::Forward },
                Task::ResizeRefit,
            ]
        );
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Task::DismissClose, ms(0), ms(250));
        assert!(scheduler.is_pending(TaskSlot::DismissClose));
        assert_eq!(scheduler.cancel(TaskSlot::DismissClose), Some(Task::DismissClose));
        assert!(scheduler.cancel(TaskSlot::DismissClose).is_none());
        assert!(scheduler.advance(ms(1000)).is_empty());
    }

    #[test]
    fn test_coalesced_keeps_latest() {
        let mut cell = Coalesced::new();
        cell.push(100.0);
        cell.push(120.0);
        cell.push(140.0);
        assert!(cell.is_pending());
        assert_eq!(cell.take(), Some(140.0));
        assert_eq!(cell.take(), None);
    }
}
