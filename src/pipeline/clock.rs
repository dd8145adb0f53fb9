// Periodic step clock. A worker thread sleeps to absolute deadlines and drops a
// ClockTick into the event channel; it never touches sequencer state itself.
//
// Every start bumps the generation and revokes the previous worker's flag, so
// ticks from an old timer that are still sitting in the channel can be told
// apart and thrown away.
//
// The channel holds a single tick. A tick that finds it occupied is dropped,
// and a worker that wakes up late skips the steps it missed, so a stall never
// comes back as a burst of steps.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TrySendError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockTick {
    pub generation: u64,
}

/// The event loop's end of the clock. Never more than one tick waits in it.
pub fn tick_channel() -> (Sender<ClockTick>, Receiver<ClockTick>) {
    crossbeam_channel::bounded(1)
}

pub struct Ticker {
    tx: Sender<ClockTick>,
    generation: u64,
    alive: Option<Arc<AtomicBool>>,
    interval: Option<Duration>,
}

impl Ticker {
    pub fn new(tx: Sender<ClockTick>) -> Self {
        Self {
            tx,
            generation: 0,
            alive: None,
            interval: None,
        }
    }

    /// Cancel whatever is running and start a fresh periodic task.
    pub fn start(&mut self, interval: Duration) -> u64 {
        self.cancel();
        self.generation += 1;
        let alive = Arc::new(AtomicBool::new(true));
        self.alive = Some(Arc::clone(&alive));
        self.interval = Some(interval);

        let tx = self.tx.clone();
        let generation = self.generation;
        thread::spawn(move || {
            let mut deadline = Instant::now() + interval;
            loop {
                let now = Instant::now();
                if deadline > now {
                    thread::sleep(deadline - now);
                }
                if !alive.load(Ordering::Acquire) {
                    break;
                }
                match tx.try_send(ClockTick { generation }) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        tracing::trace!(generation, "tick dropped, last one still pending");
                    }
                    Err(TrySendError::Disconnected(_)) => break, // event loop is gone
                }
                deadline += interval;
                let now = Instant::now();
                if now > deadline {
                    deadline = now + interval;
                }
            }
        });
        tracing::debug!(generation, ?interval, "clock started");
        generation
    }

    pub fn cancel(&mut self) {
        if let Some(alive) = self.alive.take() {
            alive.store(false, Ordering::Release);
            tracing::debug!(generation = self.generation, "clock cancelled");
        }
        self.interval = None;
    }

    pub fn is_running(&self) -> bool {
        self.alive.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // a tick counts only if it came from the timer that is running right now
    pub fn is_current(&self, tick: ClockTick) -> bool {
        self.alive.is_some() && tick.generation == self.generation
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
