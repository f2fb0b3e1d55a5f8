//! Timer services the session core consumes.
//!
//! The controller never waits. It asks a [`Scheduler`] for a recurring tick
//! or a one-shot deferred wake-up, and the event loop hands each
//! [`Firing`] back through [`SessionController::fire`](crate::SessionController::fire).

use std::time::Duration;

/// Handle for a scheduled task, unique per scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A scheduled task coming due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Firing {
    Tick(TaskId),
    Deferred(TaskId),
}

impl Firing {
    pub fn task(&self) -> TaskId {
        match self {
            Firing::Tick(id) | Firing::Deferred(id) => *id,
        }
    }
}

pub trait Scheduler {
    /// Fire [`Firing::Tick`] every `period` until cancelled.
    fn start_ticking(&mut self, period: Duration) -> TaskId;

    /// Fire [`Firing::Deferred`] once after `delay` unless cancelled first.
    fn defer(&mut self, delay: Duration) -> TaskId;

    /// Stop a task. Unknown or already finished ids are ignored.
    fn cancel(&mut self, id: TaskId);
}

/// Scheduler that only records requests. Whoever owns it decides when
/// something fires, which makes it suitable for tests and headless drivers.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    ticking: Vec<(TaskId, Duration)>,
    deferred: Vec<(TaskId, Duration)>,
    cancelled: Vec<TaskId>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> TaskId {
        self.next_id += 1;
        TaskId::new(self.next_id)
    }

    /// The live tick subscription, if any.
    pub fn active_tick(&self) -> Option<Firing> {
        self.ticking.last().map(|(id, _)| Firing::Tick(*id))
    }

    /// The most recently requested deferred task that is still live.
    pub fn pending_deferred(&self) -> Option<Firing> {
        self.deferred.last().map(|(id, _)| Firing::Deferred(*id))
    }

    pub fn pending_delay(&self) -> Option<Duration> {
        self.deferred.last().map(|(_, delay)| *delay)
    }

    pub fn live_ticks(&self) -> usize {
        self.ticking.len()
    }

    pub fn live_deferred(&self) -> usize {
        self.deferred.len()
    }

    pub fn cancelled(&self) -> &[TaskId] {
        &self.cancelled
    }

    /// Removes and returns the pending deferred task, as a real scheduler
    /// would once the one-shot has fired.
    pub fn take_deferred(&mut self) -> Option<Firing> {
        self.deferred.pop().map(|(id, _)| Firing::Deferred(id))
    }
}

impl Scheduler for ManualScheduler {
    fn start_ticking(&mut self, period: Duration) -> TaskId {
        let id = self.allocate();
        self.ticking.push((id, period));
        id
    }

    fn defer(&mut self, delay: Duration) -> TaskId {
        let id = self.allocate();
        self.deferred.push((id, delay));
        id
    }

    fn cancel(&mut self, id: TaskId) {
        let before = self.ticking.len() + self.deferred.len();
        self.ticking.retain(|(live, _)| *live != id);
        self.deferred.retain(|(live, _)| *live != id);
        if self.ticking.len() + self.deferred.len() < before {
            self.cancelled.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_removes_only_the_named_task() {
        let mut scheduler = ManualScheduler::new();
        let tick = scheduler.start_ticking(Duration::from_secs(1));
        let later = scheduler.defer(Duration::from_millis(1000));
        assert_ne!(tick, later);

        scheduler.cancel(later);
        assert_eq!(scheduler.active_tick(), Some(Firing::Tick(tick)));
        assert_eq!(scheduler.pending_deferred(), None);
        assert_eq!(scheduler.cancelled(), &[later]);

        // Unknown ids are not recorded as cancellations.
        scheduler.cancel(TaskId::new(999));
        assert_eq!(scheduler.cancelled().len(), 1);
    }
}
