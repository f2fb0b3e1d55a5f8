//! Tokio-backed timers for the session controller.
//!
//! Every scheduled task is a spawned tokio task that pushes [`Firing`]s into
//! one channel. The event loop drains that channel and hands each firing to
//! the controller, so the controller itself is only ever touched from the
//! loop.

use pomo_core::{Firing, Scheduler, TaskId};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

pub struct TokioScheduler {
    next_id: u64,
    tx: UnboundedSender<Firing>,
    tasks: HashMap<TaskId, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new() -> (Self, UnboundedReceiver<Firing>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            next_id: 0,
            tx,
            tasks: HashMap::new(),
        };
        (scheduler, rx)
    }

    fn allocate(&mut self) -> TaskId {
        self.next_id += 1;
        TaskId::new(self.next_id)
    }

    fn track(&mut self, id: TaskId, handle: JoinHandle<()>) {
        self.tasks.retain(|_, task| !task.is_finished());
        self.tasks.insert(id, handle);
    }

    #[cfg(test)]
    pub fn live_tasks(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl Scheduler for TokioScheduler {
    fn start_ticking(&mut self, period: Duration) -> TaskId {
        let id = self.allocate();
        let tx = self.tx.clone();
        // First tick one full period after start, not immediately.
        let first = Instant::now() + period;
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Firing::Tick(id)).is_err() {
                    break;
                }
            }
        });
        trace!(task = id.raw(), ?period, "ticking started");
        self.track(id, handle);
        id
    }

    fn defer(&mut self, delay: Duration) -> TaskId {
        let id = self.allocate();
        let tx = self.tx.clone();
        let deadline = Instant::now() + delay;
        let handle = tokio::spawn(async move {
            time::sleep_until(deadline).await;
            let _ = tx.send(Firing::Deferred(id));
        });
        trace!(task = id.raw(), ?delay, "deferred task scheduled");
        self.track(id, handle);
        id
    }

    fn cancel(&mut self, id: TaskId) {
        if let Some(handle) = self.tasks.remove(&id) {
            handle.abort();
            trace!(task = id.raw(), "task cancelled");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;

    async fn settle() {
        // Let spawned timer tasks observe the advanced clock.
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let (mut scheduler, mut rx) = TokioScheduler::new();
        let id = scheduler.start_ticking(Duration::from_secs(1));
        settle().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        for _ in 0..3 {
            time::advance(Duration::from_secs(1)).await;
            settle().await;
            assert_eq!(rx.try_recv(), Ok(Firing::Tick(id)));
        }
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_ticks_stop() {
        let (mut scheduler, mut rx) = TokioScheduler::new();
        let id = scheduler.start_ticking(Duration::from_secs(1));
        settle().await;
        time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(rx.try_recv(), Ok(Firing::Tick(id)));

        scheduler.cancel(id);
        time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(scheduler.live_tasks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn deferred_fires_once_after_delay() {
        let (mut scheduler, mut rx) = TokioScheduler::new();
        let id = scheduler.defer(Duration::from_millis(1000));
        settle().await;

        time::advance(Duration::from_millis(999)).await;
        settle().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        time::advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(rx.try_recv(), Ok(Firing::Deferred(id)));

        time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_deferred_never_fires() {
        let (mut scheduler, mut rx) = TokioScheduler::new();
        let id = scheduler.defer(Duration::from_millis(1000));
        scheduler.cancel(id);
        time::advance(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }
}
