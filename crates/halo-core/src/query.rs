use tracing::debug;

use crate::Rect;
use crate::window::{WindowSnapshot, WindowState};

/// Style bits that decide whether a window counts as a real top-level
/// application window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowStyle {
    /// `WS_POPUP` is set.
    pub popup: bool,
    /// Any `WS_CAPTION` bit is set (border or title bar).
    pub caption: bool,
    /// `WS_EX_DLGMODALFRAME` is set.
    pub dialog_modal_frame: bool,
}

/// Window queries against the OS.
///
/// Platform crates implement the primitive reads. Each one fails on
/// its own and reports failure as `None`; the provided methods compose
/// them into snapshots and eligibility checks, substituting sentinels
/// so a single failed read never aborts a resolve.
pub trait WindowQuery: Send + Sync {
    /// Handle of the current foreground window, if any.
    fn foreground(&self) -> Option<usize>;

    /// Whether the handle still refers to an existing window.
    fn is_window(&self, handle: usize) -> bool;

    fn is_visible(&self, handle: usize) -> bool;

    /// Whether the compositor currently cloaks the window.
    fn is_cloaked(&self, handle: usize) -> Option<bool>;

    fn class_name(&self, handle: usize) -> Option<String>;

    fn title(&self, handle: usize) -> Option<String>;

    /// Compositor-reported visual bounds.
    fn extended_frame_bounds(&self, handle: usize) -> Option<Rect>;

    /// Raw window rectangle, including invisible resize borders.
    fn window_rect(&self, handle: usize) -> Option<Rect>;

    /// Raw `showCmd` from the window placement.
    fn show_command(&self, handle: usize) -> Option<u32>;

    /// Root ancestor of the window (itself for top-level windows).
    fn root_ancestor(&self, handle: usize) -> Option<usize>;

    fn style(&self, handle: usize) -> Option<WindowStyle>;

    /// Per-window DPI, `0` when unknown.
    fn dpi(&self, handle: usize) -> u32;

    /// Builds a snapshot of the window.
    ///
    /// Returns `None` only when the handle no longer refers to a live
    /// window. Every other failed read falls back to its sentinel: an
    /// empty string, an empty rect, `WindowState::Unknown`, or DPI 0.
    fn resolve(&self, handle: usize) -> Option<WindowSnapshot> {
        if handle == 0 || !self.is_window(handle) {
            debug!("window 0x{handle:X} is no longer valid");
            return None;
        }

        let state = self
            .show_command(handle)
            .map_or(WindowState::Unknown, WindowState::from_show_command);

        Some(WindowSnapshot::new(
            handle,
            self.class_name(handle).unwrap_or_default(),
            self.title(handle).unwrap_or_default(),
            self.frame_bounds(handle),
            state,
            self.is_parent(handle),
            self.dpi(handle),
        ))
    }

    /// Visible bounds, falling back to the raw rectangle and then to an
    /// empty rect.
    fn frame_bounds(&self, handle: usize) -> Rect {
        if let Some(rect) = self.extended_frame_bounds(handle) {
            return rect;
        }
        debug!("extended frame bounds unavailable for 0x{handle:X}, using window rect");
        self.window_rect(handle).unwrap_or_default()
    }

    /// Whether the window is its own root and is neither a caption-less
    /// popup nor a modal-dialog frame.
    ///
    /// A failed style read counts as "not a parent".
    fn is_parent(&self, handle: usize) -> bool {
        if self.root_ancestor(handle) != Some(handle) {
            return false;
        }
        match self.style(handle) {
            Some(style) => !(style.popup && !style.caption) && !style.dialog_modal_frame,
            None => false,
        }
    }

    fn is_foreground(&self, handle: usize) -> bool {
        self.foreground() == Some(handle)
    }

    /// Whether the window is visible and not cloaked mid-animation.
    ///
    /// An unreadable cloak attribute counts as not cloaked.
    fn is_ready(&self, handle: usize) -> bool {
        self.is_visible(handle) && !self.is_cloaked(handle).unwrap_or(false)
    }

    /// Whether a border may be drawn on the window right now.
    fn is_valid_for_border(&self, handle: usize) -> bool {
        self.is_foreground(handle) && self.is_ready(handle)
    }
}
