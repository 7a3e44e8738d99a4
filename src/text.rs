//! Text measurement and drawing for nametags and overlays.
//!
//! The renderer only needs two things from a font: how wide a string is
//! and a way to put it on a canvas. [`CosmicText`] shapes real glyphs;
//! [`FixedAdvance`] is a deterministic stand-in for tests.

use cosmic_text::{Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache};

use crate::canvas::{Canvas, Rect, Rgba};

pub trait TextEngine {
    /// Advance width of `text` at `font_size` pixels.
    fn measure(&mut self, text: &str, font_size: f32) -> f32;

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        text: &str,
        x: f32,
        y: f32,
        font_size: f32,
        color: Rgba,
    );
}

/// cosmic-text shaping with swash rasterization, monospace family.
pub struct CosmicText {
    font_system: FontSystem,
    cache: SwashCache,
}

impl CosmicText {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            cache: SwashCache::new(),
        }
    }

    fn layout(&mut self, text: &str, font_size: f32) -> Buffer {
        let metrics = Metrics::new(font_size, (font_size * 1.25).ceil());
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        let attrs = Attrs::new().family(Family::Monospace);
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }
}

impl Default for CosmicText {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine for CosmicText {
    fn measure(&mut self, text: &str, font_size: f32) -> f32 {
        let buffer = self.layout(text, font_size);
        buffer
            .layout_runs()
            .map(|run| run.line_w)
            .fold(0.0, f32::max)
    }

    fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        text: &str,
        x: f32,
        y: f32,
        font_size: f32,
        color: Rgba,
    ) {
        let buffer = self.layout(text, font_size);
        let base = Color::rgba(color[0], color[1], color[2], color[3]);
        buffer.draw(
            &mut self.font_system,
            &mut self.cache,
            base,
            |gx, gy, w, h, c| {
                if c.a() == 0 {
                    return;
                }
                canvas.fill_rect(
                    Rect::new(x + gx as f32, y + gy as f32, w as f32, h as f32),
                    [c.r(), c.g(), c.b(), c.a()],
                );
            },
        );
    }
}

/// Every character advances by `font_size · advance_ratio`; each visible
/// character draws as one solid cell.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvance {
    pub advance_ratio: f32,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self { advance_ratio: 1.0 }
    }
}

impl TextEngine for FixedAdvance {
    fn measure(&mut self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.advance_ratio
    }

    fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        text: &str,
        x: f32,
        y: f32,
        font_size: f32,
        color: Rgba,
    ) {
        let advance = font_size * self.advance_ratio;
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            canvas.fill_rect(
                Rect::new(x + i as f32 * advance, y, advance, font_size),
                color,
            );
        }
    }
}
