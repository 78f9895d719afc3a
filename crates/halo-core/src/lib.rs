pub mod classify;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod event;
pub mod log;
pub mod monitor;
pub mod overlay;
pub mod query;
pub mod readiness;
pub mod rect;
pub mod throttle;
pub mod timer;
pub mod validator;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::{Classification, DiscardReason, classify};
pub use context::BorderedWindow;
pub use coordinator::{BorderCoordinator, Flow};
pub use error::{Error, Result};
pub use event::{BorderEvent, EventKind, RawEvent};
pub use monitor::{EventSource, Monitor, MonitorState, RawEventSink};
pub use overlay::{BorderStyle, Color, Overlay};
pub use query::{WindowQuery, WindowStyle};
pub use readiness::{Readiness, Sequence};
pub use rect::Rect;
pub use throttle::{Throttle, Throttler};
pub use validator::Validator;
pub use window::{WindowSnapshot, WindowState};
