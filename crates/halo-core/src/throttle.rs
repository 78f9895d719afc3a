use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::ThrottleConfig;
use crate::event::{BorderEvent, EventSender};
use crate::timer::DeferredTimer;
use crate::window::WindowSnapshot;

/// What the coordinator should do with a transition right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Throttle {
    /// Act on it immediately.
    Immediate,
    /// Part of a drag/resize burst: hide now, a `DeferredShow` follows
    /// once the burst settles.
    Rapid,
}

/// Absorbs bursts of transitions to keep the overlay from flickering.
pub struct Throttler {
    rapid_threshold: Duration,
    quiet_delay: Duration,
    last: Option<Instant>,
    timer: DeferredTimer,
}

impl Throttler {
    pub fn new(config: &ThrottleConfig, tx: EventSender) -> Self {
        Self {
            rapid_threshold: config.rapid_threshold(),
            quiet_delay: config.quiet_delay(),
            last: None,
            timer: DeferredTimer::new(tx),
        }
    }

    /// Records a transition at `now` and classifies it.
    ///
    /// A transition arriving within the rapid threshold of the previous
    /// one (and strictly after it) reschedules the single deferred show
    /// for `snapshot`. Anything else cancels the pending show.
    pub fn observe(&mut self, snapshot: &WindowSnapshot, seq: u64, now: Instant) -> Throttle {
        let elapsed = self.last.map(|last| now.saturating_duration_since(last));
        self.last = Some(now);

        match elapsed {
            Some(elapsed) if !elapsed.is_zero() && elapsed < self.rapid_threshold => {
                debug!("rapid transition after {elapsed:?}, deferring 0x{:X}", snapshot.handle());
                self.timer.schedule(
                    self.quiet_delay,
                    BorderEvent::DeferredShow {
                        seq,
                        snapshot: snapshot.clone(),
                    },
                );
                Throttle::Rapid
            }
            _ => {
                self.timer.cancel();
                Throttle::Immediate
            }
        }
    }

    /// Drops any pending deferred show.
    pub fn cancel_pending(&self) -> bool {
        self.timer.cancel()
    }

    #[cfg(test)]
    pub fn has_pending(&self) -> bool {
        self.timer.is_pending()
    }
}
