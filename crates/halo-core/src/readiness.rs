//! Cancellable wait for a window to finish appearing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Sender, unbounded};
use tracing::debug;

use crate::event::{self, BorderEvent, EventSender};
use crate::query::WindowQuery;
use crate::window::WindowSnapshot;

/// Result of a readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    /// Still not ready when the timeout ran out.
    NotReady,
    /// A newer transition superseded the wait.
    Cancelled,
}

/// Monotonic transition counter shared between the consumer and the
/// background producers that must not act on stale transitions.
#[derive(Debug, Clone, Default)]
pub struct Sequence(Arc<AtomicU64>);

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new transition and returns its number.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.current() == seq
    }
}

/// Polls [`WindowQuery::is_valid_for_border`] every `interval` until it
/// holds, `timeout` elapses, or `is_cancelled` returns true.
///
/// A window counts as ready only once it is both in front and uncloaked,
/// so one that finishes appearing before it takes the foreground is
/// still waited for.
pub fn wait_until_ready(
    query: &dyn WindowQuery,
    handle: usize,
    interval: Duration,
    timeout: Duration,
    is_cancelled: impl Fn() -> bool,
) -> Readiness {
    let deadline = Instant::now() + timeout;
    loop {
        if is_cancelled() {
            return Readiness::Cancelled;
        }
        if query.is_valid_for_border(handle) {
            return Readiness::Ready;
        }
        let now = Instant::now();
        if now >= deadline {
            return Readiness::NotReady;
        }
        thread::sleep(interval.min(deadline - now));
    }
}

struct Job {
    seq: u64,
    snapshot: WindowSnapshot,
}

/// Runs readiness waits off the consumer thread.
///
/// Each job is tied to a transition number. When a newer transition
/// starts, the running wait notices on its next poll and exits without
/// posting anything.
pub struct ReadinessWaiter {
    jobs: Option<Sender<Job>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl ReadinessWaiter {
    pub fn new(
        query: Arc<dyn WindowQuery>,
        sequence: Sequence,
        interval: Duration,
        timeout: Duration,
        tx: EventSender,
    ) -> Self {
        let (jobs, queue) = unbounded::<Job>();
        let worker = thread::spawn(move || {
            for job in queue {
                if !sequence.is_current(job.seq) {
                    continue;
                }
                let handle = job.snapshot.handle();
                let readiness = wait_until_ready(query.as_ref(), handle, interval, timeout, || {
                    !sequence.is_current(job.seq)
                });
                if readiness == Readiness::Cancelled || !sequence.is_current(job.seq) {
                    debug!("readiness wait for 0x{handle:X} superseded");
                    continue;
                }
                event::post(
                    &tx,
                    BorderEvent::ReadinessSettled {
                        seq: job.seq,
                        snapshot: job.snapshot,
                        readiness,
                    },
                );
            }
        });
        Self {
            jobs: Some(jobs),
            worker: Some(worker),
        }
    }

    /// Queues a wait for `snapshot` on behalf of transition `seq`.
    pub fn submit(&self, seq: u64, snapshot: WindowSnapshot) {
        if let Some(jobs) = &self.jobs {
            let _ = jobs.send(Job { seq, snapshot });
        }
    }
}

impl Drop for ReadinessWaiter {
    fn drop(&mut self) {
        // Closing the queue ends the worker after its current job.
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
