use std::mem;
use std::sync::Once;

use halo_core::overlay::paint_frame;
use halo_core::{BorderStyle, Error, Overlay, Rect, Result, WindowSnapshot};
use tracing::{debug, warn};
use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, POINT, SIZE, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BLENDFUNCTION,
    CreateCompatibleDC, CreateDIBSection, DIB_RGB_COLORS, DeleteDC, DeleteObject, GetDC,
    ReleaseDC, SelectObject,
};
use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, SetProcessDpiAwarenessContext,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, HWND_TOPMOST, RegisterClassW, SW_HIDE,
    SWP_NOACTIVATE, SWP_SHOWWINDOW, SetWindowPos, ShowWindow, ULW_ALPHA, UpdateLayeredWindow,
    WNDCLASSW, WS_EX_LAYERED, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST,
    WS_EX_TRANSPARENT, WS_POPUP,
};
use windows::core::{PCWSTR, w};

const CLASS_NAME: PCWSTR = w!("HaloBorder");

static REGISTER_CLASS: Once = Once::new();

/// Declares this process as per-monitor DPI aware (V2).
///
/// Without this, Windows reports frame bounds scaled to the primary
/// monitor's DPI and the border lands in the wrong place on mixed-DPI
/// setups. Call once at startup, before creating the overlay.
pub fn enable_dpi_awareness() {
    // SAFETY: if awareness was already set (e.g. via manifest) the call
    // fails harmlessly.
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}

fn ensure_class_registered() {
    REGISTER_CLASS.call_once(|| {
        let wc = WNDCLASSW {
            lpfnWndProc: Some(border_wnd_proc),
            lpszClassName: CLASS_NAME,
            ..Default::default()
        };
        unsafe {
            RegisterClassW(&wc);
        }
    });
}

unsafe extern "system" fn border_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

/// A click-through, topmost, layered window that draws the border.
///
/// Uses `UpdateLayeredWindow` with per-pixel alpha so the interior stays
/// fully transparent and no paint messages are needed.
pub struct BorderOverlay {
    hwnd: HWND,
    style: BorderStyle,
    /// Overlay rect and DPI currently on screen, if visible.
    shown: Option<(Rect, u32)>,
}

impl BorderOverlay {
    /// Creates the hidden overlay window.
    pub fn new(style: BorderStyle) -> Result<Self> {
        ensure_class_registered();

        let ex = WS_EX_LAYERED
            | WS_EX_TRANSPARENT
            | WS_EX_TOPMOST
            | WS_EX_TOOLWINDOW
            | WS_EX_NOACTIVATE;
        let hwnd = unsafe {
            CreateWindowExW(
                ex,
                CLASS_NAME,
                PCWSTR::null(),
                WS_POPUP,
                0,
                0,
                0,
                0,
                None,
                None,
                None,
                None,
            )
        }
        .map_err(|e| Error::platform("CreateWindowExW", e))?;

        Ok(Self {
            hwnd,
            style,
            shown: None,
        })
    }

    /// Renders the frame bitmap and applies it via `UpdateLayeredWindow`.
    fn render(&self, rect: Rect, thickness: i32) -> Result<()> {
        let (w, h) = (rect.width, rect.height);
        let pixels = paint_frame(w, h, thickness, self.style.color.premultiplied());
        if pixels.is_empty() {
            return Ok(());
        }

        unsafe {
            let screen_dc = GetDC(None);
            let mem_dc = CreateCompatibleDC(Some(screen_dc));

            let bmi = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: w,
                    biHeight: -h, // top-down
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    ..Default::default()
                },
                ..Default::default()
            };

            let mut bits = std::ptr::null_mut();
            let bmp = match CreateDIBSection(Some(mem_dc), &bmi, DIB_RGB_COLORS, &mut bits, None, 0)
            {
                Ok(bmp) if !bits.is_null() => bmp,
                Ok(bmp) => {
                    let _ = DeleteObject(bmp.into());
                    let _ = DeleteDC(mem_dc);
                    ReleaseDC(None, screen_dc);
                    return Err(Error::platform("CreateDIBSection", "null pixel buffer"));
                }
                Err(e) => {
                    let _ = DeleteDC(mem_dc);
                    ReleaseDC(None, screen_dc);
                    return Err(Error::platform("CreateDIBSection", e));
                }
            };
            let old = SelectObject(mem_dc, bmp.into());

            // SAFETY: `bits` is non-null and points to `w * h` pixels
            // allocated by CreateDIBSection; `pixels` has the same length.
            std::ptr::copy_nonoverlapping(pixels.as_ptr(), bits as *mut u32, pixels.len());

            let pt_dst = POINT {
                x: rect.x,
                y: rect.y,
            };
            let size = SIZE { cx: w, cy: h };
            let pt_src = POINT::default();
            let blend = BLENDFUNCTION {
                BlendOp: 0, // AC_SRC_OVER
                SourceConstantAlpha: 255,
                AlphaFormat: 1, // AC_SRC_ALPHA
                ..Default::default()
            };

            let result = UpdateLayeredWindow(
                self.hwnd,
                Some(screen_dc),
                Some(&pt_dst),
                Some(&size),
                Some(mem_dc),
                Some(&pt_src),
                COLORREF(0),
                Some(&blend),
                ULW_ALPHA,
            );

            SelectObject(mem_dc, old);
            let _ = DeleteObject(bmp.into());
            let _ = DeleteDC(mem_dc);
            ReleaseDC(None, screen_dc);

            result.map_err(|e| Error::platform("UpdateLayeredWindow", e))
        }
    }
}

impl Overlay for BorderOverlay {
    fn show(&mut self, snapshot: &WindowSnapshot) {
        let rect = self.style.overlay_rect(snapshot.rect());
        let dpi = snapshot.dpi();
        if self.shown == Some((rect, dpi)) {
            return;
        }
        if rect.is_empty() {
            self.hide();
            return;
        }

        let thickness = self.style.thickness(dpi);
        unsafe {
            let _ = SetWindowPos(
                self.hwnd,
                Some(HWND_TOPMOST),
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                SWP_NOACTIVATE | SWP_SHOWWINDOW,
            );
        }
        match self.render(rect, thickness) {
            Ok(()) => {
                debug!("overlay at {rect:?} ({thickness}px)");
                self.shown = Some((rect, dpi));
            }
            Err(e) => {
                warn!("failed to render border: {e}");
                self.shown = None;
                unsafe {
                    let _ = ShowWindow(self.hwnd, SW_HIDE);
                }
            }
        }
    }

    fn hide(&mut self) {
        if self.shown.take().is_none() {
            return;
        }
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_HIDE);
        }
    }
}

impl Drop for BorderOverlay {
    fn drop(&mut self) {
        unsafe {
            let _ = DestroyWindow(self.hwnd);
        }
    }
}
