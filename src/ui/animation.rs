use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Easing function for overlay animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed interpolation.
    Linear,
    /// Cubic ease-in-out: slow start, fast middle, slow end.
    EaseInOut,
    /// Cubic ease-out: fast start, slow end (deceleration).
    EaseOut,
}

/// The overlay effects the app animates. At most one of each runs at a
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anim {
    /// Intro screen opacity, 1 → 0 before the scene is revealed.
    IntroFade,
    /// Lock modal shake after a wrong code, progress 0 → 1.
    LockShake,
    /// "Unlocked" banner opacity, 1 → 0.
    BannerFade,
}

/// A single active animation interpolating an f32 value over time.
struct Animation {
    from: f32,
    to: f32,
    start: Instant,
    duration: Duration,
    easing: Easing,
}

impl Animation {
    fn finished(&self, now: Instant) -> bool {
        self.duration.is_zero() || now.duration_since(self.start) >= self.duration
    }
}

/// Wall-clock driven f32 interpolation keyed by [`Anim`].
///
/// Independent of the scene tick, so overlays keep animating while the
/// scene loop is paused.
pub struct Animator {
    animations: HashMap<Anim, Animation>,
}

impl Animator {
    pub fn new() -> Self {
        Self {
            animations: HashMap::new(),
        }
    }

    /// Start (or restart) an animation.
    pub fn start(
        &mut self,
        key: Anim,
        from: f32,
        to: f32,
        duration: Duration,
        easing: Easing,
        now: Instant,
    ) {
        self.animations.insert(
            key,
            Animation {
                from,
                to,
                start: now,
                duration,
                easing,
            },
        );
    }

    /// Current value, or `None` if never started. Holds `to` once complete.
    pub fn get(&self, key: Anim, now: Instant) -> Option<f32> {
        let anim = self.animations.get(&key)?;
        if anim.finished(now) {
            return Some(anim.to);
        }
        let t = now.duration_since(anim.start).as_secs_f32() / anim.duration.as_secs_f32();
        Some(anim.from + (anim.to - anim.from) * ease(t, anim.easing))
    }

    pub fn is_active(&self, key: Anim, now: Instant) -> bool {
        self.animations.get(&key).is_some_and(|a| !a.finished(now))
    }

    /// True once an animation that was started has run to completion.
    pub fn is_done(&self, key: Anim, now: Instant) -> bool {
        self.animations.get(&key).is_some_and(|a| a.finished(now))
    }

    pub fn remove(&mut self, key: Anim) {
        self.animations.remove(&key);
    }

    /// Horizontal shake offset for a decaying wobble: three full swings
    /// that shrink to zero.
    pub fn shake_offset(&self, key: Anim, amplitude: f32, now: Instant) -> f32 {
        if !self.is_active(key, now) {
            return 0.0;
        }
        let p = self.get(key, now).unwrap_or(1.0);
        (p * std::f32::consts::TAU * 3.0).sin() * amplitude * (1.0 - p)
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply an easing function to a linear progress value `t` in [0, 1].
fn ease(t: f32, easing: Easing) -> f32 {
    match easing {
        Easing::Linear => t,
        Easing::EaseInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let f = -2.0 * t + 2.0;
                1.0 - f * f * f / 2.0
            }
        }
        Easing::EaseOut => {
            let f = 1.0 - t;
            1.0 - f * f * f
        }
    }
}
