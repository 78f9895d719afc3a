//! In-memory stand-ins for the OS used by unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::Rect;
use crate::error::{Error, Result};
use crate::event::RawEvent;
use crate::monitor::{EventSource, RawEventSink};
use crate::overlay::Overlay;
use crate::query::{WindowQuery, WindowStyle};
use crate::window::WindowSnapshot;

#[derive(Debug, Clone)]
pub struct FakeWindow {
    pub class_name: Option<String>,
    pub title: Option<String>,
    pub frame: Option<Rect>,
    pub window_rect: Option<Rect>,
    pub show_command: Option<u32>,
    pub root: Option<usize>,
    pub style: Option<WindowStyle>,
    pub dpi: u32,
    pub visible: bool,
    pub cloaked: Option<bool>,
}

impl FakeWindow {
    /// A visible, restored, un-styled top-level window.
    pub fn app(class_name: &str, title: &str, rect: Rect) -> Self {
        Self {
            class_name: Some(class_name.into()),
            title: Some(title.into()),
            frame: Some(rect),
            window_rect: Some(rect.inflate(7)),
            show_command: Some(1),
            root: None,
            style: Some(WindowStyle {
                popup: false,
                caption: true,
                dialog_modal_frame: false,
            }),
            dpi: 96,
            visible: true,
            cloaked: Some(false),
        }
    }
}

#[derive(Default)]
struct DesktopState {
    foreground: Option<usize>,
    windows: HashMap<usize, FakeWindow>,
}

/// A scriptable desktop. `root` of `None` means the window is its own root.
#[derive(Default)]
pub struct FakeDesktop {
    state: Mutex<DesktopState>,
}

impl FakeDesktop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, handle: usize, window: FakeWindow) {
        self.state.lock().windows.insert(handle, window);
    }

    pub fn remove(&self, handle: usize) {
        self.state.lock().windows.remove(&handle);
    }

    pub fn update(&self, handle: usize, f: impl FnOnce(&mut FakeWindow)) {
        if let Some(window) = self.state.lock().windows.get_mut(&handle) {
            f(window);
        }
    }

    pub fn set_foreground(&self, handle: Option<usize>) {
        self.state.lock().foreground = handle;
    }

    fn read<T>(&self, handle: usize, f: impl FnOnce(&FakeWindow) -> Option<T>) -> Option<T> {
        self.state.lock().windows.get(&handle).and_then(f)
    }
}

impl WindowQuery for FakeDesktop {
    fn foreground(&self) -> Option<usize> {
        self.state.lock().foreground
    }

    fn is_window(&self, handle: usize) -> bool {
        self.state.lock().windows.contains_key(&handle)
    }

    fn is_visible(&self, handle: usize) -> bool {
        self.read(handle, |w| Some(w.visible)).unwrap_or(false)
    }

    fn is_cloaked(&self, handle: usize) -> Option<bool> {
        self.read(handle, |w| w.cloaked)
    }

    fn class_name(&self, handle: usize) -> Option<String> {
        self.read(handle, |w| w.class_name.clone())
    }

    fn title(&self, handle: usize) -> Option<String> {
        self.read(handle, |w| w.title.clone())
    }

    fn extended_frame_bounds(&self, handle: usize) -> Option<Rect> {
        self.read(handle, |w| w.frame)
    }

    fn window_rect(&self, handle: usize) -> Option<Rect> {
        self.read(handle, |w| w.window_rect)
    }

    fn show_command(&self, handle: usize) -> Option<u32> {
        self.read(handle, |w| w.show_command)
    }

    fn root_ancestor(&self, handle: usize) -> Option<usize> {
        self.read(handle, |w| Some(w.root.unwrap_or(handle)))
    }

    fn style(&self, handle: usize) -> Option<WindowStyle> {
        self.read(handle, |w| w.style)
    }

    fn dpi(&self, handle: usize) -> u32 {
        self.read(handle, |w| Some(w.dpi)).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayCall {
    Show(usize),
    Hide,
}

/// Overlay that records every call. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingOverlay {
    calls: Arc<Mutex<Vec<OverlayCall>>>,
}

impl RecordingOverlay {
    pub fn calls(&self) -> Vec<OverlayCall> {
        self.calls.lock().clone()
    }
}

impl Overlay for RecordingOverlay {
    fn show(&mut self, snapshot: &WindowSnapshot) {
        self.calls.lock().push(OverlayCall::Show(snapshot.handle()));
    }

    fn hide(&mut self) {
        self.calls.lock().push(OverlayCall::Hide);
    }
}

/// Event source driven by the test. Clones share the same subscription.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    sink: Arc<Mutex<Option<RawEventSink>>>,
    pub fail: bool,
}

impl ScriptedSource {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.sink.lock().is_some()
    }

    /// Delivers an event the way an OS callback would. Returns `false`
    /// when nothing is subscribed.
    pub fn emit(&self, event: RawEvent) -> bool {
        let sink = self.sink.lock().clone();
        match sink {
            Some(sink) => {
                sink(event);
                true
            }
            None => false,
        }
    }

    /// Returns the current sink so a test can simulate a callback that
    /// was already in flight when the subscription ended.
    pub fn sink(&self) -> Option<RawEventSink> {
        self.sink.lock().clone()
    }
}

impl EventSource for ScriptedSource {
    fn subscribe(&mut self, sink: RawEventSink) -> Result<()> {
        if self.fail {
            return Err(Error::Subscribe("scripted failure".into()));
        }
        *self.sink.lock() = Some(sink);
        Ok(())
    }

    fn unsubscribe(&mut self) {
        self.sink.lock().take();
    }
}
