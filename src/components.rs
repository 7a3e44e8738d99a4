use serde::Deserialize;
use slotmap::new_key_type;

use crate::canvas::Rgba;
use crate::sound::Cue;

new_key_type! {
    /// Handle into the actor arena. Stable for the life of the scene.
    pub struct ActorId;
}

/// Index into `Scene::species`. Never use a raw usize where a SpeciesId is
/// meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpeciesId(pub usize);

/// Scene tick counter. One tick per presented frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Tick(pub u64);

/// Static per-species sheet geometry. Sheets are horizontal strips of
/// `frame_count` cells, each `frame_w × frame_h`.
#[derive(Debug, Clone, Deserialize)]
pub struct Species {
    pub name: String,
    pub sheet_path: String,
    pub frame_count: usize,
    pub frame_w: u32,
    pub frame_h: u32,
    pub frame_interval_ms: f64,
    /// Pixels the sprite sinks below the ground line (feet overlap grass).
    #[serde(default)]
    pub ground_offset: f32,
    /// Solid fill used when the sheet fails to decode.
    #[serde(default)]
    pub placeholder: Option<Rgba>,
}

/// Trailing slot behind a leader.
///
/// `leader` is a non-owning handle, resolved through the scene every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Formation {
    pub leader: ActorId,
    pub gap: f32,
    pub slot: u32,
    /// Rendered height relative to the leader's.
    pub size_ratio: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Autonomous back-and-forth walk between the viewport margins.
    Patrol { speed: f32 },
    Follow(Formation),
}

impl Motion {
    pub fn is_autonomous(&self) -> bool {
        matches!(self, Motion::Patrol { .. })
    }
}

/// What a click on the actor does.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    None,
    Dialogue(Vec<String>),
    Sound(Cue),
}

impl Interaction {
    pub fn is_interactive(&self) -> bool {
        !matches!(self, Interaction::None)
    }
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub name: String,
    pub species: SpeciesId,
    /// Nametag text. Only lead characters carry one.
    pub label: Option<String>,
    /// Left edge in scene pixels.
    pub x: f32,
    pub facing_left: bool,
    pub frame: usize,
    /// Timestamp (ms) of the last frame advance.
    pub frame_timer_ms: f64,
    pub frame_interval_ms: f64,
    pub motion: Motion,
    /// Sheet-to-screen scale for autonomous actors; followers derive their
    /// size from the leader instead.
    pub scale: f32,
    /// Lower layers draw first.
    pub layer: i32,
    pub interaction: Interaction,
}

impl Actor {
    /// A stationary actor with frame state zeroed. Callers fill in motion
    /// and interaction.
    pub fn new(name: impl Into<String>, species: SpeciesId, frame_interval_ms: f64) -> Self {
        Self {
            name: name.into(),
            species,
            label: None,
            x: 0.0,
            facing_left: false,
            frame: 0,
            frame_timer_ms: 0.0,
            frame_interval_ms,
            motion: Motion::Patrol { speed: 0.0 },
            scale: 1.0,
            layer: 0,
            interaction: Interaction::None,
        }
    }
}
