use std::mem;

use halo_core::{Rect, WindowQuery, WindowStyle};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::HiDpi::GetDpiForWindow;
use windows::Win32::UI::WindowsAndMessaging::{
    GA_ROOT, GWL_EXSTYLE, GWL_STYLE, GetAncestor, GetForegroundWindow, GetWindowLongPtrW,
    GetWindowPlacement, GetWindowTextW, IsWindow, IsWindowVisible, RealGetWindowClassW,
    WINDOWPLACEMENT, WS_CAPTION, WS_EX_DLGMODALFRAME, WS_POPUP,
};

use crate::frame;

/// Longest class name or title read, in UTF-16 code units.
const MAX_TEXT: usize = 256;

/// Window queries against the live Win32 desktop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Query;

pub(crate) fn hwnd(handle: usize) -> HWND {
    HWND(handle as *mut _)
}

impl WindowQuery for Win32Query {
    fn foreground(&self) -> Option<usize> {
        let hwnd = unsafe { GetForegroundWindow() };
        (!hwnd.is_invalid()).then_some(hwnd.0 as usize)
    }

    fn is_window(&self, handle: usize) -> bool {
        unsafe { IsWindow(Some(hwnd(handle))).as_bool() }
    }

    fn is_visible(&self, handle: usize) -> bool {
        unsafe { IsWindowVisible(hwnd(handle)).as_bool() }
    }

    fn is_cloaked(&self, handle: usize) -> Option<bool> {
        frame::is_cloaked(hwnd(handle))
    }

    fn class_name(&self, handle: usize) -> Option<String> {
        let mut buffer = [0u16; MAX_TEXT];
        // SAFETY: RealGetWindowClassW writes at most buffer.len() units.
        let length = unsafe { RealGetWindowClassW(hwnd(handle), &mut buffer) } as usize;
        (length > 0).then(|| String::from_utf16_lossy(&buffer[..length.min(MAX_TEXT)]))
    }

    fn title(&self, handle: usize) -> Option<String> {
        let mut buffer = [0u16; MAX_TEXT];
        // SAFETY: GetWindowTextW writes at most buffer.len() units,
        // including the terminator.
        let length = unsafe { GetWindowTextW(hwnd(handle), &mut buffer) };
        let length = usize::try_from(length).ok()?;
        Some(String::from_utf16_lossy(&buffer[..length.min(MAX_TEXT)]))
    }

    fn extended_frame_bounds(&self, handle: usize) -> Option<Rect> {
        frame::extended_frame_bounds(hwnd(handle))
    }

    fn window_rect(&self, handle: usize) -> Option<Rect> {
        frame::window_rect(hwnd(handle))
    }

    fn show_command(&self, handle: usize) -> Option<u32> {
        let mut placement = WINDOWPLACEMENT {
            length: mem::size_of::<WINDOWPLACEMENT>() as u32,
            ..Default::default()
        };
        unsafe { GetWindowPlacement(hwnd(handle), &mut placement) }.ok()?;
        Some(placement.showCmd)
    }

    fn root_ancestor(&self, handle: usize) -> Option<usize> {
        let root = unsafe { GetAncestor(hwnd(handle), GA_ROOT) };
        (!root.is_invalid()).then_some(root.0 as usize)
    }

    fn style(&self, handle: usize) -> Option<WindowStyle> {
        // SAFETY: GetWindowLongPtrW only reads window data. Zero style is
        // what a failed read returns; no real top-level window has it.
        let (style, ex_style) = unsafe {
            (
                GetWindowLongPtrW(hwnd(handle), GWL_STYLE) as u32,
                GetWindowLongPtrW(hwnd(handle), GWL_EXSTYLE) as u32,
            )
        };
        if style == 0 {
            return None;
        }
        Some(style_from_bits(style, ex_style))
    }

    fn dpi(&self, handle: usize) -> u32 {
        unsafe { GetDpiForWindow(hwnd(handle)) }
    }
}

/// Decodes the style bits that decide parent-ness. A single caption bit
/// (a bare `WS_BORDER`) already counts as captioned.
fn style_from_bits(style: u32, ex_style: u32) -> WindowStyle {
    WindowStyle {
        popup: style & WS_POPUP.0 != 0,
        caption: style & WS_CAPTION.0 != 0,
        dialog_modal_frame: ex_style & WS_EX_DLGMODALFRAME.0 != 0,
    }
}

#[cfg(test)]
mod tests {
    use windows::Win32::UI::WindowsAndMessaging::{WS_BORDER, WS_DLGFRAME, WS_OVERLAPPEDWINDOW};

    use super::*;

    #[test]
    fn bordered_popup_counts_as_captioned() {
        // Act
        let style = style_from_bits(WS_POPUP.0 | WS_BORDER.0, 0);

        // Assert
        assert!(style.popup);
        assert!(style.caption);
    }

    #[test]
    fn bare_popup_has_no_caption() {
        // Act
        let style = style_from_bits(WS_POPUP.0, 0);

        // Assert
        assert!(style.popup);
        assert!(!style.caption);
    }

    #[test]
    fn decodes_overlapped_window_and_modal_frame() {
        // Act
        let app = style_from_bits(WS_OVERLAPPEDWINDOW.0, 0);
        let dialog = style_from_bits(WS_POPUP.0 | WS_DLGFRAME.0, WS_EX_DLGMODALFRAME.0);

        // Assert
        assert!(!app.popup && app.caption && !app.dialog_modal_frame);
        assert!(dialog.caption && dialog.dialog_modal_frame);
    }
}
