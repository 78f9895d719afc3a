use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::warn;

use crate::readiness::Readiness;
use crate::window::WindowSnapshot;

/// Object id of the window itself, as opposed to one of its child
/// accessibility objects.
pub const OBJID_WINDOW: i32 = 0;

/// Maximum number of queued events before producers start dropping.
pub const CHANNEL_CAPACITY: usize = 256;

/// Kind of OS window notification the monitor listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The foreground window changed.
    Foreground,
    /// A window moved or resized.
    LocationChange,
    /// A window object's state changed.
    StateChange,
    MinimizeStart,
    MinimizeEnd,
    Destroy,
    Hide,
}

impl EventKind {
    /// Events that may mean the active window went away.
    pub fn is_teardown(self) -> bool {
        matches!(self, Self::Destroy | Self::Hide | Self::MinimizeStart)
    }

    /// Events that re-resolve from the current foreground window instead
    /// of the window that raised them.
    pub fn follows_foreground(self) -> bool {
        matches!(
            self,
            Self::LocationChange | Self::StateChange | Self::MinimizeEnd
        )
    }
}

/// A platform-agnostic window notification.
///
/// Platform crates translate raw OS hook callbacks into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: EventKind,
    pub handle: usize,
    pub object_id: i32,
}

impl RawEvent {
    pub fn new(kind: EventKind, handle: usize, object_id: i32) -> Self {
        Self {
            kind,
            handle,
            object_id,
        }
    }

    /// A notification about the window object itself.
    pub fn window(kind: EventKind, handle: usize) -> Self {
        Self::new(kind, handle, OBJID_WINDOW)
    }

    /// Whether the event targets the window rather than a child object.
    pub fn targets_window(&self) -> bool {
        self.object_id == OBJID_WINDOW
    }
}

/// Everything the border coordinator reacts to.
///
/// The monitor, the validator, the throttler's deferred timer, the
/// readiness waiter and the Ctrl+C handler all post into one ordered
/// channel of these.
#[derive(Debug, Clone, PartialEq)]
pub enum BorderEvent {
    /// The highlighted window changed. `None` means no eligible window.
    WindowChanged(Option<WindowSnapshot>),

    /// The validator saw the bordered window lose the foreground.
    WindowInvalidated(WindowSnapshot),

    /// A readiness wait for transition `seq` finished.
    ReadinessSettled {
        seq: u64,
        snapshot: WindowSnapshot,
        readiness: Readiness,
    },

    /// A drag/resize burst settled; show the last window of transition `seq`.
    DeferredShow { seq: u64, snapshot: WindowSnapshot },

    /// Stop the consumer loop.
    Shutdown,
}

pub type EventSender = Sender<BorderEvent>;
pub type EventReceiver = Receiver<BorderEvent>;

/// Creates the bounded consumer channel.
pub fn channel() -> (EventSender, EventReceiver) {
    crossbeam_channel::bounded(CHANNEL_CAPACITY)
}

/// Posts an event without blocking.
///
/// Returns `false` if the event was dropped because the channel is full
/// or the consumer is gone.
pub fn post(tx: &EventSender, event: BorderEvent) -> bool {
    match tx.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            warn!("event channel full, dropping {event:?}");
            false
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}
