//! Procedural pixel-art grass strip.
//!
//! Blades sit on a fixed grid and sway with two summed sine waves. The
//! field keeps no per-frame state: `render` is a pure function of the blade
//! set and the timestamp.

use std::f32::consts::TAU;

use rand::RngExt;
use rand::rngs::StdRng;
use serde::Deserialize;

use crate::canvas::{Canvas, Rect, Rgba, rgb};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GrassStyle {
    /// Size of one grass "pixel" block.
    pub px: f32,
    pub strip_height: f32,
    pub dark: Rgba,
    pub mid: Rgba,
    pub light: Rgba,
    pub tip: Rgba,
    pub soil: Rgba,
    pub soil_dark: Rgba,
}

impl Default for GrassStyle {
    fn default() -> Self {
        Self {
            px: 4.0,
            strip_height: 120.0,
            dark: rgb(0x3a6b22),
            mid: rgb(0x4e8a30),
            light: rgb(0x6aaa44),
            tip: rgb(0x88cc55),
            soil: rgb(0x5a3a1a),
            soil_dark: rgb(0x3e2810),
        }
    }
}

impl GrassStyle {
    /// Top of the upper soil band, in strip coordinates.
    pub fn soil_top(&self) -> f32 {
        self.strip_height - self.px * 4.0
    }

    pub fn tier_color(&self, t: f32) -> Rgba {
        if t < 0.3 {
            self.dark
        } else if t < 0.65 {
            self.mid
        } else if t < 0.85 {
            self.light
        } else {
            self.tip
        }
    }
}

/// One blade. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blade {
    pub x: f32,
    /// Segment count, 3..=7.
    pub height: u32,
    pub phase: f32,
    pub speed: f32,
}

impl Blade {
    /// Horizontal sway at `wind_time` seconds.
    pub fn wind(&self, wind_time: f32) -> f32 {
        (wind_time * self.speed + self.phase).sin() * 1.2
            + (wind_time * 0.7 + self.phase * 1.3).sin() * 0.5
    }
}

/// Whole-block lean of a segment at fraction `t` up the blade.
pub fn lean(wind: f32, t: f32) -> i32 {
    // Half-way values round toward +inf, so a blade leaning left by exactly
    // half a block stays put.
    (wind * t * t * 2.0 + 0.5).floor() as i32
}

#[derive(Debug, Clone, Default)]
pub struct GrassField {
    pub blades: Vec<Blade>,
    pub width: f32,
    pub style: GrassStyle,
}

impl GrassField {
    pub fn new(style: GrassStyle) -> Self {
        Self {
            blades: Vec::new(),
            width: 0.0,
            style,
        }
    }

    /// Replace the whole blade set for a strip `width` pixels wide. One blade
    /// per `2·px` slot.
    pub fn init(&mut self, width: f32, rng: &mut StdRng) {
        let spacing = self.style.px * 2.0;
        self.width = width.max(0.0);
        self.blades.clear();
        if spacing <= 0.0 {
            return;
        }
        let mut x = 0.0;
        while x < self.width {
            self.blades.push(Blade {
                x,
                height: rng.random_range(3..=7),
                phase: rng.random_range(0.0..TAU),
                speed: rng.random_range(0.4..1.0),
            });
            x += spacing;
        }
    }

    pub fn strip_height(&self) -> f32 {
        self.style.strip_height
    }

    /// Draw the strip at `timestamp_ms`. Clears first.
    pub fn render(&self, canvas: &mut dyn Canvas, timestamp_ms: f64) {
        let style = &self.style;
        let px = style.px;
        let wind_time = (timestamp_ms * 0.001) as f32;
        let soil_top = style.soil_top();

        canvas.clear();
        canvas.fill_rect(Rect::new(0.0, soil_top, self.width, px * 2.0), style.soil);
        canvas.fill_rect(
            Rect::new(0.0, soil_top + px * 2.0, self.width, px * 2.0),
            style.soil_dark,
        );

        for blade in &self.blades {
            let wind = blade.wind(wind_time);
            for seg in 0..blade.height {
                let t = seg as f32 / blade.height as f32;
                let draw_x = blade.x + lean(wind, t) as f32 * px;
                let draw_y = soil_top - seg as f32 * px;
                canvas.fill_rect(Rect::new(draw_x, draw_y, px, px), style.tier_color(t));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, DrawList};
    use crate::rng::create_rng;

    fn field(width: f32, seed: u64) -> GrassField {
        let mut f = GrassField::new(GrassStyle::default());
        f.init(width, &mut create_rng(seed));
        f
    }

    #[test]
    fn one_blade_per_slot() {
        let f = field(100.0, 1);
        // slots at 0, 8, ..., 96
        assert_eq!(f.blades.len(), 13);
        assert_eq!(f.blades[1].x, 8.0);
    }

    #[test]
    fn blade_parameters_in_range() {
        let f = field(2000.0, 7);
        for b in &f.blades {
            assert!((3..=7).contains(&b.height));
            assert!((0.0..TAU).contains(&b.phase));
            assert!((0.4..1.0).contains(&b.speed));
        }
    }

    #[test]
    fn same_seed_same_field() {
        assert_eq!(field(640.0, 9).blades, field(640.0, 9).blades);
    }

    #[test]
    fn tier_boundaries() {
        let s = GrassStyle::default();
        assert_eq!(s.tier_color(0.0), s.dark);
        assert_eq!(s.tier_color(0.3), s.mid);
        assert_eq!(s.tier_color(0.65), s.light);
        assert_eq!(s.tier_color(0.85), s.tip);
    }

    #[test]
    fn base_segment_never_leans() {
        assert_eq!(lean(1.7, 0.0), 0);
        assert_eq!(lean(-1.7, 0.0), 0);
    }

    #[test]
    fn lean_rounds_half_up() {
        assert_eq!(lean(0.25, 1.0), 1);
        assert_eq!(lean(-0.25, 1.0), 0);
    }

    #[test]
    fn render_draws_soil_then_one_block_per_segment() {
        let f = field(40.0, 3);
        let mut list = DrawList::new(40.0, 120.0);
        f.render(&mut list, 1234.0);

        assert_eq!(list.commands[0], DrawCommand::Clear);
        let segments: u32 = f.blades.iter().map(|b| b.height).sum();
        assert_eq!(list.fills().count(), 2 + segments as usize);

        let soil_top = f.style.soil_top();
        let (first, color) = list.fills().next().expect("soil band");
        assert_eq!(first.y, soil_top);
        assert_eq!(*color, f.style.soil);
        // Base segment of the first blade sits on the soil line at its slot.
        let (base, _) = list.fills().nth(2).expect("first block");
        assert_eq!(*base, Rect::new(f.blades[0].x, soil_top, 4.0, 4.0));
    }

    #[test]
    fn upper_segments_lean_with_the_wind() {
        let blade = Blade {
            x: 20.0,
            height: 7,
            phase: 0.3,
            speed: 0.8,
        };
        let f = GrassField {
            blades: vec![blade],
            width: 40.0,
            style: GrassStyle::default(),
        };
        let mut list = DrawList::new(40.0, 120.0);
        f.render(&mut list, 2500.0);

        let wind = (2.5f32 * 0.8 + 0.3).sin() * 1.2 + (2.5f32 * 0.7 + 0.3 * 1.3).sin() * 0.5;
        assert!((blade.wind(2.5) - wind).abs() < 1e-6);
        assert!((wind - 1.316).abs() < 1e-3);

        let px = f.style.px;
        let soil_top = f.style.soil_top();
        let blocks: Vec<Rect> = list.fills().skip(2).map(|(r, _)| *r).collect();
        assert_eq!(blocks.len(), 7);
        for (seg, block) in blocks.iter().enumerate() {
            let t = seg as f32 / 7.0;
            let offset = (wind * t * t * 2.0).round();
            assert_eq!(block.x, blade.x + offset * px, "segment {seg}");
            assert_eq!(block.y, soil_top - seg as f32 * px);
        }
        // The top two tiers lean one and two blocks downwind.
        let leans: Vec<f32> = blocks.iter().map(|b| (b.x - blade.x) / px).collect();
        assert_eq!(leans, vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn empty_width_has_no_blades() {
        assert!(field(0.0, 1).blades.is_empty());
    }
}
