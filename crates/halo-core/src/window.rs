use std::fmt;

use crate::Rect;

/// Monitor DPI at 100% scaling.
pub const BASELINE_DPI: u32 = 96;

/// Visual state of a window, as reported by its show-state placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowState {
    Hidden,
    Normal,
    Minimized,
    Maximized,
    Unknown,
}

impl WindowState {
    pub const ALL: [WindowState; 5] = [
        Self::Hidden,
        Self::Normal,
        Self::Minimized,
        Self::Maximized,
        Self::Unknown,
    ];

    /// Maps a Win32 `SW_*` show command, as stored in `WINDOWPLACEMENT`.
    ///
    /// Anything other than hide / normal / minimized / maximized maps to
    /// `Unknown`.
    pub fn from_show_command(cmd: u32) -> Self {
        match cmd {
            0 => Self::Hidden,
            1 => Self::Normal,
            2 => Self::Minimized,
            3 => Self::Maximized,
            _ => Self::Unknown,
        }
    }
}

/// Point-in-time description of one window.
///
/// Snapshots are never updated in place. When the real window changes,
/// a new snapshot is resolved from the OS. Fields are private so the
/// only way to get one is [`WindowSnapshot::new`] or a query resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSnapshot {
    handle: usize,
    class_name: String,
    title: String,
    rect: Rect,
    state: WindowState,
    is_parent: bool,
    dpi: u32,
}

impl WindowSnapshot {
    pub fn new(
        handle: usize,
        class_name: impl Into<String>,
        title: impl Into<String>,
        rect: Rect,
        state: WindowState,
        is_parent: bool,
        dpi: u32,
    ) -> Self {
        Self {
            handle,
            class_name: class_name.into(),
            title: title.into(),
            rect,
            state,
            is_parent,
            dpi,
        }
    }

    /// Raw platform handle. May already be invalid by the time it is read.
    pub fn handle(&self) -> usize {
        self.handle
    }

    /// Window class name, empty when the query failed.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Window title, empty when the query failed.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Visible frame bounds in screen coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn is_parent(&self) -> bool {
        self.is_parent
    }

    /// Monitor DPI at capture time. Zero means unknown.
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Whether this window is eligible for a border at all.
    ///
    /// Only restored top-level windows with real geometry qualify;
    /// maximized, minimized and hidden windows never get one.
    pub fn can_have_border(&self) -> bool {
        self.state == WindowState::Normal && self.is_parent && !self.rect.is_empty()
    }

    pub fn scale_factor(&self) -> f32 {
        scale_factor(self.dpi)
    }
}

impl fmt::Display for WindowSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:X} [{}] \"{}\" {:?} {}x{} at ({}, {}) parent={} dpi={}",
            self.handle,
            self.class_name,
            self.title,
            self.state,
            self.rect.width,
            self.rect.height,
            self.rect.x,
            self.rect.y,
            self.is_parent,
            self.dpi
        )
    }
}

/// Scale factor for a DPI value relative to 96 DPI.
///
/// A DPI of zero is the "unknown" sentinel and means no scaling.
pub fn scale_factor(dpi: u32) -> f32 {
    if dpi == 0 {
        1.0
    } else {
        dpi as f32 / BASELINE_DPI as f32
    }
}
