//! Periodic check that the bordered window is still in front.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, info};

use crate::event::{self, BorderEvent, EventSender};
use crate::query::WindowQuery;
use crate::window::WindowSnapshot;

struct Watch {
    snapshot: WindowSnapshot,
    next_tick: Instant,
}

#[derive(Default)]
struct State {
    watch: Option<Watch>,
    shutdown: bool,
}

struct Shared {
    state: Mutex<State>,
    wake: Condvar,
}

/// Polls whether the watched window is still the foreground window.
///
/// `Idle` until [`start`](Self::start), then `Watching` until the window
/// loses the foreground, [`stop`](Self::stop) is called, or another
/// window is started. Each tick checks and invalidates under the state
/// lock, so an invalidation fires at most once per `start`, and none
/// fires once `stop` has returned.
pub struct Validator {
    shared: Arc<Shared>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Validator {
    pub fn new(interval: Duration, query: Arc<dyn WindowQuery>, tx: EventSender) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(State::default()),
            wake: Condvar::new(),
        });
        let worker = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || run(&shared, interval, query.as_ref(), &tx))
        };
        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Starts watching `snapshot`, replacing any previous watch.
    pub fn start(&self, snapshot: WindowSnapshot) {
        let mut state = self.shared.state.lock();
        debug!("validator watching 0x{:X}", snapshot.handle());
        state.watch = Some(Watch {
            snapshot,
            next_tick: Instant::now(),
        });
        self.shared.wake.notify_one();
    }

    /// Stops watching. No invalidation is posted after this returns.
    pub fn stop(&self) {
        let mut state = self.shared.state.lock();
        if state.watch.take().is_some() {
            self.shared.wake.notify_one();
        }
    }

    #[cfg(test)]
    pub fn is_watching(&self) -> bool {
        self.shared.state.lock().watch.is_some()
    }

    #[cfg(test)]
    pub fn watched(&self) -> Option<WindowSnapshot> {
        self.shared
            .state
            .lock()
            .watch
            .as_ref()
            .map(|w| w.snapshot.clone())
    }
}

impl Drop for Validator {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            state.shutdown = true;
            state.watch = None;
            self.shared.wake.notify_one();
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run(shared: &Shared, interval: Duration, query: &dyn WindowQuery, tx: &EventSender) {
    let mut state = shared.state.lock();
    loop {
        if state.shutdown {
            return;
        }
        let Some(next_tick) = state.watch.as_ref().map(|w| w.next_tick) else {
            shared.wake.wait(&mut state);
            continue;
        };
        let now = Instant::now();
        if now < next_tick {
            shared.wake.wait_until(&mut state, next_tick);
            continue;
        }

        let Some(watch) = state.watch.as_mut() else {
            continue;
        };
        if query.is_foreground(watch.snapshot.handle()) {
            watch.next_tick = now + interval;
            continue;
        }
        if let Some(watch) = state.watch.take() {
            info!("0x{:X} lost the foreground", watch.snapshot.handle());
            event::post(tx, BorderEvent::WindowInvalidated(watch.snapshot));
        }
    }
}
