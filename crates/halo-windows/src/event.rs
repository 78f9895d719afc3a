use halo_core::{EventKind, RawEvent};
use windows::Win32::UI::WindowsAndMessaging::{
    EVENT_OBJECT_DESTROY, EVENT_OBJECT_HIDE, EVENT_OBJECT_LOCATIONCHANGE,
    EVENT_OBJECT_STATECHANGE, EVENT_SYSTEM_FOREGROUND, EVENT_SYSTEM_MINIMIZEEND,
    EVENT_SYSTEM_MINIMIZESTART,
};

/// Event code ranges we hook: foreground through minimize-end, then
/// object destroy through location-change. Two hooks keep the codes
/// between the system and object blocks out of the callback.
pub const HOOK_RANGES: [(u32, u32); 2] = [
    (EVENT_SYSTEM_FOREGROUND, EVENT_SYSTEM_MINIMIZEEND),
    (EVENT_OBJECT_DESTROY, EVENT_OBJECT_LOCATIONCHANGE),
];

/// Translates a raw WinEvent into a platform-agnostic `RawEvent`.
///
/// Returns `None` for event codes the monitor does not handle. Child
/// object events are passed through; the classifier decides on them.
pub fn translate(event: u32, handle: usize, id_object: i32) -> Option<RawEvent> {
    let kind = match event {
        e if e == EVENT_SYSTEM_FOREGROUND => EventKind::Foreground,
        e if e == EVENT_OBJECT_LOCATIONCHANGE => EventKind::LocationChange,
        e if e == EVENT_OBJECT_STATECHANGE => EventKind::StateChange,
        e if e == EVENT_SYSTEM_MINIMIZESTART => EventKind::MinimizeStart,
        e if e == EVENT_SYSTEM_MINIMIZEEND => EventKind::MinimizeEnd,
        e if e == EVENT_OBJECT_DESTROY => EventKind::Destroy,
        e if e == EVENT_OBJECT_HIDE => EventKind::Hide,
        _ => return None,
    };
    if handle == 0 {
        return None;
    }
    Some(RawEvent::new(kind, handle, id_object))
}
