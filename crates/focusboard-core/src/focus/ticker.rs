//! The recurring tick that drives a running session.
//!
//! A spawned tokio task sends one [`Tick`] per period over a channel. The
//! task is aborted when the ticker is cancelled or dropped, which also drops
//! the sender, so a receiver sees the channel close once any buffered ticks
//! are drained. Ticks carry their session id; the tracker ignores ticks for
//! a session that is no longer running.
//!
//! Missed periods are skipped, not replayed: after a stall the ticker sends
//! at most one tick and then resumes its schedule.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// One period elapsed for `session`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub session: u64,
}

#[derive(Debug)]
pub struct FocusTicker {
    handle: JoinHandle<()>,
}

impl FocusTicker {
    /// Start ticking for `session` every `period`. The first tick arrives one
    /// period after the call.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(session: u64, period: Duration, tx: UnboundedSender<Tick>) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let handle = tokio::spawn(async move {
            loop {
                interval.tick().await;
                if tx.send(Tick { session }).is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Stop producing ticks. Idempotent.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for FocusTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
