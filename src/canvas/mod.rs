//! 2D drawing surface shared by the grass field, the sprite renderer and the
//! overlays.
//!
//! The model follows an immediate-mode canvas: a current [`Affine`], a
//! save/restore stack, and a handful of fill primitives. [`Framebuffer`]
//! rasterizes through `vello_cpu` for presentation; [`DrawList`] records
//! commands for tests.

mod draw;
mod framebuffer;

pub use draw::{DrawCommand, DrawList};
pub use framebuffer::Framebuffer;

use image::RgbaImage;
pub use vello_cpu::kurbo::Affine;
use vello_cpu::kurbo;

/// Straight-alpha sRGB colour.
pub type Rgba = [u8; 4];

/// Build an opaque colour from a `0xRRGGBB` literal.
pub const fn rgb(hex: u32) -> Rgba {
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 0xFF]
}

/// Build a colour from a `0xRRGGBBAA` literal (CSS `#rrggbbaa` order).
pub const fn rgba(hex: u32) -> Rgba {
    [(hex >> 24) as u8, (hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Grow the rect by `margin` on every side.
    pub fn inflate(&self, margin: f32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    pub fn to_kurbo(&self) -> kurbo::Rect {
        kurbo::Rect::new(
            self.x as f64,
            self.y as f64,
            self.right() as f64,
            self.bottom() as f64,
        )
    }

    pub fn from_kurbo(r: kurbo::Rect) -> Self {
        Self::new(r.x0 as f32, r.y0 as f32, r.width() as f32, r.height() as f32)
    }

    /// Closed-interval membership: points exactly on an edge are inside.
    pub fn contains_inclusive(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }
}

/// Map a local rect through `t` into device space. A mirroring scale
/// yields the same axis-aligned box as the unmirrored draw.
pub fn map_rect(t: &Affine, rect: Rect) -> Rect {
    Rect::from_kurbo(t.transform_rect_bbox(rect.to_kurbo()))
}

pub fn is_mirrored_x(t: &Affine) -> bool {
    t.as_coeffs()[0] < 0.0
}

/// Immediate-mode drawing surface.
///
/// Every primitive is interpreted through the current transform. `save` and
/// `restore` must be balanced by callers; a `restore` on an empty stack is
/// ignored.
pub trait Canvas {
    fn size(&self) -> Size;

    /// Reset every pixel to transparent. The transform is left untouched.
    fn clear(&mut self);

    fn save(&mut self);

    fn restore(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);

    fn scale(&mut self, sx: f32, sy: f32);

    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Stroke centred on the rect outline, `line_width` wide.
    fn stroke_rect(&mut self, rect: Rect, color: Rgba, line_width: f32) {
        let half = line_width / 2.0;
        let outer_w = rect.width + line_width;
        let inner_h = (rect.height - line_width).max(0.0);
        self.fill_rect(
            Rect::new(rect.x - half, rect.y - half, outer_w, line_width),
            color,
        );
        self.fill_rect(
            Rect::new(rect.x - half, rect.bottom() - half, outer_w, line_width),
            color,
        );
        self.fill_rect(
            Rect::new(rect.x - half, rect.y + half, line_width, inner_h),
            color,
        );
        self.fill_rect(
            Rect::new(rect.right() - half, rect.y + half, line_width, inner_h),
            color,
        );
    }

    /// Copy the `src` region of `image` into `dst`, nearest-neighbour.
    fn draw_image(&mut self, image: &RgbaImage, src: Rect, dst: Rect);
}
