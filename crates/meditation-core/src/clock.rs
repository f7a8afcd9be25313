//! Session clock.
//!
//! A background task driven by `tokio::time::interval` pushes one [`Tick`]
//! per period into a single-slot channel. Missed periods are skipped and a
//! full slot drops the tick, so a stalled consumer never sees a backlog.
//! Pausing is not the clock's business: the scheduler ignores ticks while
//! paused.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

/// Default tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// 1-based sequence number of the period that produced the tick.
    pub seq: u64,
}

#[derive(Debug)]
pub struct Clock {
    period: Duration,
    alive: Arc<AtomicBool>,
    ticks: mpsc::Receiver<Tick>,
    handle: Option<JoinHandle<()>>,
}

impl Clock {
    /// Start ticking. The first tick arrives one period from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(period: Duration) -> Self {
        let alive = Arc::new(AtomicBool::new(true));
        let (tx, ticks) = mpsc::channel(1);

        let flag = Arc::clone(&alive);
        // Timed from the call, not from the task's first poll.
        let first = Instant::now() + period;
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut seq = 0u64;
            loop {
                interval.tick().await;
                if !flag.load(Ordering::Acquire) {
                    break;
                }
                seq += 1;
                match tx.try_send(Tick { seq }) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => trace!(seq, "tick dropped, consumer is behind"),
                    Err(TrySendError::Closed(_)) => break,
                }
            }
        });

        Self {
            period,
            alive,
            ticks,
            handle: Some(handle),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Wait for the next tick. Returns `None` once the clock is stopped.
    pub async fn tick(&mut self) -> Option<Tick> {
        if !self.is_running() {
            return None;
        }
        let tick = self.ticks.recv().await?;
        self.is_running().then_some(tick)
    }

    /// A tick that is already waiting, without blocking.
    pub fn try_tick(&mut self) -> Option<Tick> {
        if !self.is_running() {
            return None;
        }
        self.ticks.try_recv().ok()
    }

    /// Cancel the clock. Idempotent; no tick is delivered afterwards.
    pub fn stop(&mut self) {
        self.alive.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.ticks.close();
        while self.ticks.try_recv().is_ok() {}
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.stop();
    }
}
