//! The per-frame driver: grass redraw, scene tick, actor redraw.

use std::time::Instant;

use crate::canvas::Canvas;
use crate::render::draw_scene;
use crate::scene::Scene;
use crate::sprite::SheetStore;
use crate::systems::run_tick;
use crate::text::TextEngine;
use crate::ui::Theme;

/// Start/stop handle for the animation loop.
///
/// Timestamps are milliseconds of running time: they start at 0 on the
/// first `start` and do not advance while stopped, so pausing never makes
/// frame cycling or grass sway jump.
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    running: bool,
    /// Running time accumulated before the current run.
    banked_ms: f64,
    started_at: Option<Instant>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: Instant) {
        if !self.running {
            self.running = true;
            self.started_at = Some(now);
        }
    }

    pub fn stop(&mut self, now: Instant) {
        if self.running {
            self.banked_ms = self.timestamp_ms(now);
            self.running = false;
            self.started_at = None;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn timestamp_ms(&self, now: Instant) -> f64 {
        match self.started_at {
            Some(start) if self.running => {
                self.banked_ms + now.saturating_duration_since(start).as_secs_f64() * 1000.0
            }
            _ => self.banked_ms,
        }
    }

    /// Run one frame body with the current timestamp. Does nothing and
    /// returns None while stopped.
    pub fn run_frame(&mut self, now: Instant, body: impl FnOnce(f64)) -> Option<f64> {
        if !self.running {
            return None;
        }
        let t = self.timestamp_ms(now);
        body(t);
        Some(t)
    }
}

/// Surfaces one frame draws into.
pub struct FrameTargets<'a> {
    pub grass: &'a mut dyn Canvas,
    pub actors: &'a mut dyn Canvas,
}

/// One full frame at `timestamp_ms`: grass redraw → movement and frame
/// cycling → actor redraw.
pub fn advance_scene(
    scene: &mut Scene,
    targets: FrameTargets<'_>,
    sheets: &SheetStore,
    text: &mut dyn TextEngine,
    theme: &Theme,
    timestamp_ms: f64,
) {
    scene.grass.render(targets.grass, timestamp_ms);
    run_tick(scene, timestamp_ms);
    draw_scene(targets.actors, scene, sheets, text, theme);
}
