//! Single-shot advance timer.
//!
//! At most one timer is pending at a time. Each arm gets a fresh generation
//! number; a fire that arrives after its timer was cancelled or replaced
//! carries a stale generation and is dropped by [`Scheduler::accept`].

use crate::error::{SchedulerError, invariant_violation};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub generation: u64,
}

#[derive(Debug)]
struct PendingTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Debug)]
pub struct Scheduler {
    next_generation: u64,
    pending: Option<PendingTimer>,
    fired_tx: mpsc::UnboundedSender<TimerFired>,
}

impl Scheduler {
    /// Fires are delivered on the returned receiver.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerFired>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        (
            Self {
                next_generation: 0,
                pending: None,
                fired_tx,
            },
            fired_rx,
        )
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    #[cfg(test)]
    pub(crate) fn pending_generation(&self) -> Option<u64> {
        self.pending.as_ref().map(|pending| pending.generation)
    }

    /// Start a timer that fires once after `delay`. Must be called from
    /// inside a tokio runtime.
    pub fn arm(&mut self, delay: Duration) -> Result<u64, SchedulerError> {
        if let Some(pending) = &self.pending {
            let err = SchedulerError::AlreadyArmed(pending.generation);
            invariant_violation(&err);
            return Err(err);
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        let fired_tx = self.fired_tx.clone();
        // Deadline is fixed at arm time, before the task is first polled.
        let deadline = Instant::now() + delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = fired_tx.send(TimerFired { generation });
        });
        trace!(generation, delay_ms = delay.as_millis() as u64, "Armed advance timer");
        self.pending = Some(PendingTimer { generation, handle });
        Ok(generation)
    }

    /// Abort the pending timer, if any. Safe to call repeatedly.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.handle.abort();
                debug!(generation = pending.generation, "Cancelled advance timer");
                true
            }
            None => false,
        }
    }

    /// Claim a fire. Returns `true` only for the fire of the currently
    /// pending timer, which is then considered consumed.
    pub fn accept(&mut self, fired: TimerFired) -> bool {
        match &self.pending {
            Some(pending) if pending.generation == fired.generation => {
                self.pending = None;
                true
            }
            _ => {
                debug!(generation = fired.generation, "Ignoring stale timer fire");
                false
            }
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_delay() {
        let (mut scheduler, mut fired_rx) = Scheduler::new();
        let started = Instant::now();
        let generation = scheduler.arm(Duration::from_millis(180)).unwrap();

        let fired = fired_rx.recv().await.unwrap();
        assert_eq!(fired.generation, generation);
        assert_eq!(started.elapsed(), Duration::from_millis(180));
        assert!(scheduler.accept(fired));
        assert!(!scheduler.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_starts_at_arm_time() {
        let (mut scheduler, mut fired_rx) = Scheduler::new();
        let started = Instant::now();
        scheduler.arm(Duration::from_millis(100)).unwrap();
        tokio::time::advance(Duration::from_millis(50)).await;

        let fired = fired_rx.recv().await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_millis(100));
        assert!(scheduler.accept(fired));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let (mut scheduler, mut fired_rx) = Scheduler::new();
        scheduler.arm(Duration::from_millis(100)).unwrap();
        assert!(scheduler.cancel());
        assert!(!scheduler.cancel());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(fired_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_generation_is_rejected() {
        let (mut scheduler, _fired_rx) = Scheduler::new();
        let first = scheduler.arm(Duration::from_millis(100)).unwrap();
        scheduler.cancel();
        let second = scheduler.arm(Duration::from_millis(100)).unwrap();
        assert_ne!(first, second);

        assert!(!scheduler.accept(TimerFired { generation: first }));
        assert_eq!(scheduler.pending_generation(), Some(second));
        assert!(scheduler.accept(TimerFired { generation: second }));
        assert!(!scheduler.accept(TimerFired { generation: second }));
    }

    #[cfg(debug_assertions)]
    #[tokio::test(start_paused = true)]
    #[should_panic(expected = "invariant violation")]
    async fn arming_twice_is_an_invariant_violation() {
        let (mut scheduler, _fired_rx) = Scheduler::new();
        scheduler.arm(Duration::from_millis(100)).unwrap();
        let _ = scheduler.arm(Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_scheduler_aborts_the_timer() {
        let (mut scheduler, mut fired_rx) = Scheduler::new();
        scheduler.arm(Duration::from_millis(50)).unwrap();
        drop(scheduler);

        tokio::time::sleep(Duration::from_millis(200)).await;
        // sender dropped with the scheduler and the task aborted
        assert!(fired_rx.recv().await.is_none());
    }
}
