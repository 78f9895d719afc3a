use tracing::warn;

use crate::Rect;
use crate::config::BorderConfig;
use crate::window::{WindowSnapshot, scale_factor};

/// Renders the border. Platform crates provide the real window; tests
/// record calls.
///
/// Only the coordinator calls into an overlay, from one thread.
pub trait Overlay {
    /// Positions and shows the border around `snapshot`. Showing again
    /// for the same geometry must be a no-op.
    fn show(&mut self, snapshot: &WindowSnapshot);

    /// Hides the border. Must be a no-op when already hidden.
    fn hide(&mut self);
}

/// ARGB color parsed from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Parses "#RRGGBB" or "#AARRGGBB" (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self {
                a: 0xFF,
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
            }),
            8 => Some(Self {
                a: byte(0)?,
                r: byte(2)?,
                g: byte(4)?,
                b: byte(6)?,
            }),
            _ => None,
        }
    }

    /// Premultiplied `0xAARRGGBB`, as `UpdateLayeredWindow` expects with
    /// per-pixel alpha.
    pub fn premultiplied(self) -> u32 {
        let mul = |c: u8| (u32::from(c) * u32::from(self.a) + 127) / 255;
        (u32::from(self.a) << 24) | (mul(self.r) << 16) | (mul(self.g) << 8) | mul(self.b)
    }
}

/// Resolved border appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderStyle {
    pub color: Color,
    /// Width in pixels at 96 DPI.
    pub width: i32,
    /// Pixels the overlay extends past the window frame.
    pub offset: i32,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self::from_config(&BorderConfig::default())
    }
}

impl BorderStyle {
    /// Builds the style from config. An unparseable color falls back to
    /// the default orange.
    pub fn from_config(config: &BorderConfig) -> Self {
        let color = Color::from_hex(&config.color).unwrap_or_else(|| {
            warn!("invalid border color {:?}, using default", config.color);
            Color {
                a: 0xFF,
                r: 0xFF,
                g: 0xA5,
                b: 0x00,
            }
        });
        Self {
            color,
            width: config.width,
            offset: config.offset,
        }
    }

    /// Screen rectangle the overlay window covers.
    pub fn overlay_rect(&self, rect: Rect) -> Rect {
        rect.inflate(self.offset)
    }

    /// Frame thickness in physical pixels for a window at `dpi`.
    pub fn thickness(&self, dpi: u32) -> i32 {
        ((self.width as f32 * scale_factor(dpi)).round() as i32).max(1)
    }
}

/// Builds a top-down `width * height` pixel buffer with a `thickness`
/// frame of `pixel` around a fully transparent interior.
pub fn paint_frame(width: i32, height: i32, thickness: i32, pixel: u32) -> Vec<u32> {
    if width <= 0 || height <= 0 {
        return Vec::new();
    }
    let mut buf = vec![0u32; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            let on_border =
                x < thickness || x >= width - thickness || y < thickness || y >= height - thickness;
            if on_border {
                buf[(y * width + x) as usize] = pixel;
            }
        }
    }
    buf
}
