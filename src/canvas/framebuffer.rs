use std::sync::Arc;

use image::RgbaImage;
use vello_cpu::kurbo;
use vello_cpu::peniko::color::PremulRgba8;
use vello_cpu::peniko::{self, ImageQuality, ImageSampler};
use vello_cpu::{ImageSource, Pixmap, RenderContext};

use super::{Affine, Canvas, Rect, Rgba, Size};

/// CPU raster target on `vello_cpu`.
///
/// Primitives are recorded into a [`RenderContext`] and rasterized into the
/// pixmap on the next read, so the context always holds everything drawn
/// since the last `clear` or `fill`. Sprite cells sample nearest.
pub struct Framebuffer {
    pixmap: Pixmap,
    ctx: RenderContext,
    transform: Affine,
    stack: Vec<Affine>,
    dirty: bool,
}

fn dim(v: u32) -> u16 {
    v.clamp(1, u16::MAX as u32) as u16
}

fn premul(c: Rgba) -> PremulRgba8 {
    let af = c[3] as u16 + 1;
    let p = |v: u8| ((v as u16 * af) >> 8) as u8;
    PremulRgba8 {
        r: p(c[0]),
        g: p(c[1]),
        b: p(c[2]),
        a: c[3],
    }
}

fn unpremul(px: &[u8]) -> Rgba {
    let a = px[3];
    match a {
        0 => [0, 0, 0, 0],
        255 => [px[0], px[1], px[2], 255],
        _ => {
            let u = |v: u8| ((v as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8;
            [u(px[0]), u(px[1]), u(px[2]), a]
        }
    }
}

fn paint_color(c: Rgba) -> peniko::Color {
    peniko::Color::from_rgba8(c[0], c[1], c[2], c[3])
}

/// Wrap premultiplied pixels as a nearest-sampled image paint.
fn nearest_image(pixels: Vec<PremulRgba8>, w: u16, h: u16) -> vello_cpu::Image {
    let opaque = pixels.iter().all(|p| p.a == 255);
    let pixmap = Pixmap::from_parts_with_opacity(pixels, w, h, !opaque);
    vello_cpu::Image {
        image: ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: ImageSampler {
            quality: ImageQuality::Low,
            ..ImageSampler::default()
        },
    }
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (dim(width), dim(height));
        Self {
            pixmap: Pixmap::new(w, h),
            ctx: RenderContext::new(w, h),
            transform: Affine::IDENTITY,
            stack: Vec::new(),
            dirty: false,
        }
    }

    /// Reallocate to a new size. Contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height() as u32
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Rasterize pending primitives into the pixmap.
    fn render(&mut self) {
        if !self.dirty {
            return;
        }
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.dirty = false;
    }

    /// Premultiplied RGBA8 rows, tightly packed. A composed frame starts
    /// from an opaque fill, so its bytes are straight alpha as well.
    pub fn as_bytes(&mut self) -> &[u8] {
        self.render();
        self.pixmap.data_as_u8_slice()
    }

    pub fn pixel(&mut self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.render();
        let i = (y as usize * self.width() as usize + x as usize) * 4;
        Some(unpremul(&self.pixmap.data_as_u8_slice()[i..i + 4]))
    }

    /// Discard every primitive and cover the surface with `color`.
    pub fn fill(&mut self, color: Rgba) {
        self.ctx.reset();
        self.dirty = true;
        if color[3] == 0 {
            return;
        }
        self.ctx.set_transform(Affine::IDENTITY);
        self.ctx.set_paint(paint_color(color));
        self.ctx.fill_rect(&kurbo::Rect::new(
            0.0,
            0.0,
            self.width() as f64,
            self.height() as f64,
        ));
    }

    /// Source-over composite another layer with its top-left at `(dx, dy)`.
    pub fn composite(&mut self, layer: &mut Framebuffer, dx: i32, dy: i32) {
        let (w, h) = (layer.width(), layer.height());
        let pixels = layer
            .as_bytes()
            .chunks_exact(4)
            .map(|px| PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            })
            .collect();
        self.ctx.set_paint_transform(Affine::IDENTITY);
        self.ctx
            .set_transform(Affine::translate((dx as f64, dy as f64)));
        self.ctx.set_paint(nearest_image(pixels, dim(w), dim(h)));
        self.ctx
            .fill_rect(&kurbo::Rect::new(0.0, 0.0, w as f64, h as f64));
        self.dirty = true;
    }
}

impl Canvas for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width() as f32, self.height() as f32)
    }

    fn clear(&mut self) {
        self.fill([0, 0, 0, 0]);
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.transform = self.transform * Affine::translate((dx as f64, dy as f64));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.transform = self.transform * Affine::scale_non_uniform(sx as f64, sy as f64);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        if color[3] == 0 || rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        self.ctx.set_transform(self.transform);
        self.ctx.set_paint(paint_color(color));
        self.ctx.fill_rect(&rect.to_kurbo());
        self.dirty = true;
    }

    fn draw_image(&mut self, image: &RgbaImage, src: Rect, dst: Rect) {
        if dst.width <= 0.0 || dst.height <= 0.0 {
            return;
        }
        // Crop the cell so the paint never bleeds across neighbouring frames.
        let x0 = (src.x.max(0.0) as u32).min(image.width());
        let y0 = (src.y.max(0.0) as u32).min(image.height());
        let x1 = (src.right().round().max(0.0) as u32).min(image.width());
        let y1 = (src.bottom().round().max(0.0) as u32).min(image.height());
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let (cw, ch) = (x1 - x0, y1 - y0);
        let mut pixels = Vec::with_capacity((cw * ch) as usize);
        for y in y0..y1 {
            for x in x0..x1 {
                pixels.push(premul(image.get_pixel(x, y).0));
            }
        }
        let cell_to_dst = Affine::translate((dst.x as f64, dst.y as f64))
            * Affine::scale_non_uniform(dst.width as f64 / cw as f64, dst.height as f64 / ch as f64);
        self.ctx.set_paint_transform(Affine::IDENTITY);
        self.ctx.set_transform(self.transform * cell_to_dst);
        self.ctx.set_paint(nearest_image(pixels, dim(cw), dim(ch)));
        self.ctx
            .fill_rect(&kurbo::Rect::new(0.0, 0.0, cw as f64, ch as f64));
        self.dirty = true;
    }
}
