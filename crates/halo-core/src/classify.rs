//! Decides what a raw window notification means for the border.

use tracing::debug;

use crate::event::{EventKind, RawEvent};
use crate::query::WindowQuery;
use crate::window::WindowSnapshot;

/// Outcome of classifying one raw notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Publish this snapshot as the highlighted window.
    Publish(WindowSnapshot),
    /// Publish "no window": the active window went away.
    PublishNone,
    /// Nothing to publish.
    Discard(DiscardReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The event came from a background window.
    NotForeground,
    /// The event targets a child object, not the window itself.
    ChildObject,
    /// There is no foreground window to re-resolve from.
    NoForeground,
    /// The window disappeared before it could be resolved.
    WindowGone,
    /// The window is a child, popup or dialog.
    NotParent,
    /// A destroy/hide fired on a window that is still alive and visible.
    StillVisible,
}

/// Classifies a raw notification against the current desktop.
///
/// Rules, in order:
/// 1. Anything but a foreground change must come from the foreground
///    window.
/// 2. Location, state and minimize-end changes must target the window
///    object, and re-resolve from the *current* foreground handle since
///    some applications raise them on an internal child handle.
/// 3. Destroy, hide and minimize-start publish "no window" only once the
///    window is really gone or invisible.
/// 4. Everything else resolves the event's window, which must be a
///    parent window.
pub fn classify(event: &RawEvent, query: &dyn WindowQuery) -> Classification {
    if event.kind != EventKind::Foreground && !query.is_foreground(event.handle) {
        return Classification::Discard(DiscardReason::NotForeground);
    }

    if event.kind.follows_foreground() {
        if !event.targets_window() {
            return Classification::Discard(DiscardReason::ChildObject);
        }
        let Some(foreground) = query.foreground() else {
            return Classification::Discard(DiscardReason::NoForeground);
        };
        return resolve_parent(foreground, query);
    }

    if event.kind.is_teardown() {
        if !query.is_visible(event.handle) || !query.is_window(event.handle) {
            debug!("0x{:X} went away on {:?}", event.handle, event.kind);
            return Classification::PublishNone;
        }
        debug!(
            "ignoring {:?} on still visible 0x{:X}",
            event.kind, event.handle
        );
        return Classification::Discard(DiscardReason::StillVisible);
    }

    resolve_parent(event.handle, query)
}

fn resolve_parent(handle: usize, query: &dyn WindowQuery) -> Classification {
    let Some(snapshot) = query.resolve(handle) else {
        return Classification::Discard(DiscardReason::WindowGone);
    };
    if !snapshot.is_parent() {
        debug!("skipping non-parent window {snapshot}");
        return Classification::Discard(DiscardReason::NotParent);
    }
    Classification::Publish(snapshot)
}
