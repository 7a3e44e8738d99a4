//! Scene configuration, read from a RON file at startup.

use serde::Deserialize;

use crate::book::BookConfig;
use crate::canvas::{Rgba, rgb};
use crate::components::Species;
use crate::grass::GrassStyle;
use crate::lock::LockConfig;
use crate::sound::{Cue, SoundConfig};

pub const DEFAULT_PATH: &str = "data/scene.ron";

#[derive(Debug, Clone, Deserialize)]
pub enum MotionConfig {
    Patrol {
        speed: f32,
    },
    /// `leader` names an actor listed earlier in the file.
    Follow {
        leader: String,
        gap: f32,
        #[serde(default)]
        slot: u32,
        size_ratio: f32,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub enum InteractionConfig {
    #[default]
    None,
    Dialogue(Vec<String>),
    Sound(Cue),
}

fn one() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActorConfig {
    pub name: String,
    pub species: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Starting x as a fraction of the viewport width.
    #[serde(default)]
    pub start: f32,
    #[serde(default)]
    pub facing_left: bool,
    #[serde(default = "one")]
    pub scale: f32,
    /// Overrides the species interval.
    #[serde(default)]
    pub frame_interval_ms: Option<f64>,
    pub motion: MotionConfig,
    #[serde(default)]
    pub layer: i32,
    #[serde(default)]
    pub interaction: InteractionConfig,
}

impl ActorConfig {
    /// An unlabelled patroller of the species with the same name.
    pub fn patrol(name: &str, speed: f32) -> Self {
        Self {
            name: name.to_string(),
            species: name.to_string(),
            label: None,
            start: 0.0,
            facing_left: false,
            scale: 1.0,
            frame_interval_ms: None,
            motion: MotionConfig::Patrol { speed },
            layer: 0,
            interaction: InteractionConfig::None,
        }
    }

    fn follower(name: &str, leader: &str, gap: f32, size_ratio: f32, interval: f64) -> Self {
        Self {
            name: name.to_string(),
            species: "duck".to_string(),
            label: None,
            start: 0.0,
            facing_left: false,
            scale: 1.0,
            frame_interval_ms: Some(interval),
            motion: MotionConfig::Follow {
                leader: leader.to_string(),
                gap,
                slot: 0,
                size_ratio,
            },
            layer: 1,
            interaction: InteractionConfig::Sound(Cue::Quack),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub seed: u64,
    /// Window pixels per canvas pixel. 2.0 renders chunky double-size art.
    pub pixel_scale: f32,
    pub sky: Rgba,
    pub patrol_margin: f32,
    pub hit_margin: f32,
    pub narrow_width: f32,
    pub narrow_scale: f32,
    pub grass: GrassStyle,
    /// Sprite sheet paths are relative to this directory.
    pub asset_dir: String,
    pub species: Vec<Species>,
    /// Spawn order. Leaders must come before their followers.
    pub actors: Vec<ActorConfig>,
    pub intro_lines: Vec<String>,
    pub lock: LockConfig,
    pub book: BookConfig,
    pub sound: SoundConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let lead = |name: &str, sheet: &str, interval: f64, tint: u32| Species {
            name: name.to_string(),
            sheet_path: sheet.to_string(),
            frame_count: 6,
            frame_w: 41,
            frame_h: 100,
            frame_interval_ms: interval,
            ground_offset: 0.0,
            placeholder: Some(rgb(tint)),
        };
        Self {
            seed: 42,
            pixel_scale: 1.0,
            sky: rgb(0x9fd3e8),
            patrol_margin: 8.0,
            hit_margin: 10.0,
            narrow_width: 480.0,
            narrow_scale: 0.7,
            grass: GrassStyle::default(),
            asset_dir: "assets".to_string(),
            species: vec![
                lead("ren", "sprites/ren.png", 100.0, 0xc9787f),
                lead("kit", "sprites/kit.png", 110.0, 0x5f7fb0),
                Species {
                    name: "duck".to_string(),
                    sheet_path: "sprites/duck.png".to_string(),
                    frame_count: 13,
                    frame_w: 32,
                    frame_h: 32,
                    frame_interval_ms: 60.0,
                    ground_offset: 20.0,
                    placeholder: Some(rgb(0xf2d04a)),
                },
            ],
            actors: vec![
                ActorConfig {
                    label: Some("ren".to_string()),
                    start: 0.2,
                    interaction: InteractionConfig::Dialogue(vec![
                        "Oh! You found me.".to_string(),
                        "The ducks insist on coming everywhere.".to_string(),
                    ]),
                    ..ActorConfig::patrol("ren", 1.2)
                },
                ActorConfig {
                    label: Some("kit".to_string()),
                    start: 0.7,
                    facing_left: true,
                    interaction: InteractionConfig::Dialogue(vec![
                        "Happy to see you here.".to_string(),
                    ]),
                    ..ActorConfig::patrol("kit", 1.0)
                },
                ActorConfig::follower("duck1", "ren", 30.0, 0.8, 60.0),
                ActorConfig::follower("duck2", "duck1", -10.0, 0.76, 65.0),
                ActorConfig::follower("duck3", "duck2", -10.0, 1.0, 70.0),
            ],
            intro_lines: vec![
                "Hello there!".to_string(),
                "I put together a little something to mark our time together.".to_string(),
                "Every picture in here was drawn by hand, pixel by pixel.".to_string(),
                "The scrapbook is locked. You already know the code.".to_string(),
                "Press open when you're ready...".to_string(),
            ],
            lock: LockConfig::default(),
            book: BookConfig::default(),
            sound: SoundConfig::default(),
        }
    }
}

/// Parse a scene config from RON text.
pub fn parse_scene_config(text: &str) -> Result<SceneConfig, ron::error::SpannedError> {
    ron::from_str::<SceneConfig>(text)
}

/// Load the scene config from a RON file. Logs a warning and falls back to
/// the built-in defaults on failure.
pub fn load_scene_config(path: &str) -> SceneConfig {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("failed to read {}: {}, using default config", path, e);
            return SceneConfig::default();
        }
    };
    match parse_scene_config(&content) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("failed to parse RON {}: {}, using default config", path, e);
            SceneConfig::default()
        }
    }
}
