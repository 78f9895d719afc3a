//! Single-slot deferred event timer.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::trace;

use crate::event::{self, BorderEvent, EventSender};

#[derive(Default)]
struct Slot {
    pending: Option<(Instant, BorderEvent)>,
    shutdown: bool,
}

struct Shared {
    slot: Mutex<Slot>,
    wake: Condvar,
}

/// Posts one event into the consumer channel after a delay.
///
/// Holds at most one pending event: scheduling again replaces it. Firing
/// and cancelling are serialized by the slot lock, so `cancel` returning
/// `true` means the event will never be posted.
pub struct DeferredTimer {
    shared: Arc<Shared>,
    worker: Option<thread::JoinHandle<()>>,
}

impl DeferredTimer {
    pub fn new(tx: EventSender) -> Self {
        let shared = Arc::new(Shared {
            slot: Mutex::new(Slot::default()),
            wake: Condvar::new(),
        });
        let worker = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || run(&shared, &tx))
        };
        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Schedules `event` after `delay`, replacing any pending event.
    pub fn schedule(&self, delay: Duration, event: BorderEvent) {
        let mut slot = self.shared.slot.lock();
        slot.pending = Some((Instant::now() + delay, event));
        self.shared.wake.notify_one();
    }

    /// Drops the pending event. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let mut slot = self.shared.slot.lock();
        let had = slot.pending.take().is_some();
        if had {
            self.shared.wake.notify_one();
        }
        had
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.shared.slot.lock().pending.is_some()
    }
}

impl Drop for DeferredTimer {
    fn drop(&mut self) {
        {
            let mut slot = self.shared.slot.lock();
            slot.shutdown = true;
            slot.pending = None;
            self.shared.wake.notify_one();
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run(shared: &Shared, tx: &EventSender) {
    let mut slot = shared.slot.lock();
    loop {
        if slot.shutdown {
            return;
        }
        let Some(deadline) = slot.pending.as_ref().map(|(at, _)| *at) else {
            shared.wake.wait(&mut slot);
            continue;
        };
        if Instant::now() < deadline {
            shared.wake.wait_until(&mut slot, deadline);
            continue;
        }
        if let Some((_, event)) = slot.pending.take() {
            trace!("deferred timer fired");
            event::post(tx, event);
        }
    }
}
