use std::ffi::c_void;
use std::mem;

use halo_core::Rect;
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::Graphics::Dwm::{
    DWMWA_CLOAKED, DWMWA_EXTENDED_FRAME_BOUNDS, DwmGetWindowAttribute,
};
use windows::Win32::UI::WindowsAndMessaging::GetWindowRect;

/// Returns the visible bounds of a window using DWM extended frame bounds.
///
/// On Windows 10/11 this excludes the invisible drop-shadow borders that
/// `GetWindowRect` includes.
pub fn extended_frame_bounds(hwnd: HWND) -> Option<Rect> {
    let mut frame = RECT::default();
    // SAFETY: the out pointer is a RECT-sized stack value.
    unsafe {
        DwmGetWindowAttribute(
            hwnd,
            DWMWA_EXTENDED_FRAME_BOUNDS,
            &mut frame as *mut RECT as *mut c_void,
            mem::size_of::<RECT>() as u32,
        )
    }
    .ok()?;
    Some(to_rect(frame))
}

/// Returns the raw window rectangle, invisible borders included.
pub fn window_rect(hwnd: HWND) -> Option<Rect> {
    let mut rect = RECT::default();
    unsafe { GetWindowRect(hwnd, &mut rect) }.ok()?;
    Some(to_rect(rect))
}

/// Whether DWM currently cloaks the window (mid-animation, another
/// virtual desktop, suspended UWP frame).
pub fn is_cloaked(hwnd: HWND) -> Option<bool> {
    let mut cloaked: u32 = 0;
    // SAFETY: the out pointer is a u32-sized stack value.
    unsafe {
        DwmGetWindowAttribute(
            hwnd,
            DWMWA_CLOAKED,
            &mut cloaked as *mut u32 as *mut c_void,
            mem::size_of::<u32>() as u32,
        )
    }
    .ok()?;
    Some(cloaked != 0)
}

fn to_rect(r: RECT) -> Rect {
    Rect::from_edges(r.left, r.top, r.right, r.bottom)
}
