use image::RgbaImage;

use super::{Affine, Canvas, Rect, Rgba, Size, is_mirrored_x, map_rect};

/// A primitive as it landed on the surface, in device pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect {
        rect: Rect,
        color: Rgba,
    },
    StrokeRect {
        rect: Rect,
        color: Rgba,
        line_width: f32,
    },
    /// `src` is the sheet cell; `mirrored` is set when the transform
    /// flipped the horizontal axis.
    Image {
        src: Rect,
        dst: Rect,
        mirrored: bool,
    },
}

/// Recording canvas. Collects device-space commands instead of pixels so
/// renderers can be checked without a window.
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
    size: Size,
    transform: Affine,
    stack: Vec<Affine>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            commands: Vec::new(),
            size: Size::new(width, height),
            transform: Affine::IDENTITY,
            stack: Vec::new(),
        }
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Open save() calls.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn images(&self) -> impl Iterator<Item = (&Rect, &Rect, bool)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Image { src, dst, mirrored } => Some((src, dst, *mirrored)),
            _ => None,
        })
    }

    pub fn fills(&self) -> impl Iterator<Item = (&Rect, &Rgba)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillRect { rect, color } => Some((rect, color)),
            _ => None,
        })
    }

    pub fn reset(&mut self) {
        self.commands.clear();
        self.transform = Affine::IDENTITY;
        self.stack.clear();
    }
}

impl Canvas for DrawList {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
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
        self.commands.push(DrawCommand::FillRect {
            rect: map_rect(&self.transform, rect),
            color,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect {
            rect: map_rect(&self.transform, rect),
            color,
            line_width,
        });
    }

    fn draw_image(&mut self, _image: &RgbaImage, src: Rect, dst: Rect) {
        self.commands.push(DrawCommand::Image {
            src,
            dst: map_rect(&self.transform, dst),
            mirrored: is_mirrored_x(&self.transform),
        });
    }
}
