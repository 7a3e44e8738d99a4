use rand::rngs::StdRng;
use slotmap::SlotMap;

use crate::canvas::{Rect, Size};
use crate::components::*;
use crate::config::{ActorConfig, InteractionConfig, MotionConfig, SceneConfig};
use crate::events::{Event, EventLog};
use crate::grass::{GrassField, GrassStyle};
use crate::rng::create_rng;
use crate::systems::{formation, patrol};

/// Fixed layout constants, loaded from config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Distance from the viewport edge at which patrollers turn.
    pub patrol_margin: f32,
    /// Padding added around every hit box.
    pub hit_margin: f32,
    /// Viewports narrower than this render lead actors at `narrow_scale`.
    pub narrow_width: f32,
    pub narrow_scale: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            patrol_margin: 8.0,
            hit_margin: 10.0,
            narrow_width: 480.0,
            narrow_scale: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Extra scale applied to autonomous actors on narrow screens.
    pub lead_scale: f32,
}

pub struct Scene {
    pub actors: SlotMap<ActorId, Actor>,
    /// Spawn order. Leaders always precede their followers.
    pub order: Vec<ActorId>,
    pub species: Vec<Species>,
    pub viewport: Viewport,
    pub tuning: Tuning,
    pub grass: GrassField,
    pub events: EventLog,
    pub rng: StdRng,
    pub tick: Tick,
}

impl Scene {
    /// Create an empty scene with default tuning and a deterministic RNG seed.
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            actors: SlotMap::with_key(),
            order: Vec::new(),
            species: Vec::new(),
            viewport: Viewport {
                width: 0.0,
                height: 0.0,
                lead_scale: 1.0,
            },
            tuning: Tuning::default(),
            grass: GrassField::new(GrassStyle::default()),
            events: EventLog::default(),
            rng: create_rng(seed),
            tick: Tick(0),
        }
    }

    /// Empty scene carrying the config's seed, tuning, grass style and
    /// species table. Actors arrive later through `populate`.
    pub fn from_config(config: &SceneConfig) -> Self {
        let mut scene = Self::new_with_seed(config.seed);
        scene.tuning = Tuning {
            patrol_margin: config.patrol_margin,
            hit_margin: config.hit_margin,
            narrow_width: config.narrow_width,
            narrow_scale: config.narrow_scale,
        };
        scene.grass = GrassField::new(config.grass.clone());
        for species in &config.species {
            scene.add_species(species.clone());
        }
        scene
    }

    pub fn add_species(&mut self, species: Species) -> SpeciesId {
        self.species.push(species);
        SpeciesId(self.species.len() - 1)
    }

    pub fn species_by_name(&self, name: &str) -> Option<SpeciesId> {
        self.species
            .iter()
            .position(|s| s.name == name)
            .map(SpeciesId)
    }

    pub fn species_of(&self, id: ActorId) -> Option<&Species> {
        let actor = self.actors.get(id)?;
        self.species.get(actor.species.0)
    }

    pub fn actor_by_name(&self, name: &str) -> Option<ActorId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.actors.get(id).is_some_and(|a| a.name == name))
    }

    /// Add an actor. Its frame interval defaults to the species' when the
    /// caller left it at zero.
    pub fn spawn(&mut self, mut actor: Actor) -> ActorId {
        if actor.frame_interval_ms <= 0.0 {
            if let Some(species) = self.species.get(actor.species.0) {
                actor.frame_interval_ms = species.frame_interval_ms;
            }
        }
        let id = self.actors.insert(actor);
        self.order.push(id);
        self.events.push(Event::Spawned {
            actor: id,
            tick: self.tick,
        });
        id
    }

    /// Apply a new viewport. Regenerates the grass field and pulls
    /// autonomous actors back inside the walkable range right away.
    pub fn resize(&mut self, width: f32, height: f32) {
        let width = width.max(0.0);
        let height = height.max(0.0);
        self.viewport = Viewport {
            width,
            height,
            lead_scale: if width < self.tuning.narrow_width {
                self.tuning.narrow_scale
            } else {
                1.0
            },
        };
        self.grass.init(width, &mut self.rng);
        patrol::clamp_patrollers(self);
        self.events.push(Event::Resized {
            width,
            height,
            tick: self.tick,
        });
    }

    /// On-screen size of one sprite cell for this actor.
    ///
    /// Autonomous actors scale their sheet cell directly. Followers take
    /// `size_ratio` of their leader's rendered height and keep their own
    /// cell's aspect ratio.
    pub fn rendered_size(&self, id: ActorId) -> Option<Size> {
        let mut ratio = 1.0;
        let mut current = id;
        // A chain can never be longer than the arena; bail out on a cycle.
        for _ in 0..=self.actors.len() {
            let actor = self.actors.get(current)?;
            match actor.motion {
                Motion::Patrol { .. } => {
                    let species = self.species.get(actor.species.0)?;
                    let scale = actor.scale * self.viewport.lead_scale;
                    let root_h = species.frame_h as f32 * scale;
                    if current == id {
                        return Some(Size::new(species.frame_w as f32 * scale, root_h));
                    }
                    let own = self.species_of(id)?;
                    let h = root_h * ratio;
                    let w = h * own.frame_w as f32 / own.frame_h.max(1) as f32;
                    return Some(Size::new(w, h));
                }
                Motion::Follow(f) => {
                    ratio *= f.size_ratio;
                    current = f.leader;
                }
            }
        }
        None
    }

    /// Shared ground line: the top of the lower soil band.
    pub fn ground_y(&self) -> f32 {
        self.viewport.height - self.grass.style.px * 4.0
    }

    /// Top edge of the actor's sprite rectangle.
    pub fn draw_y(&self, id: ActorId) -> Option<f32> {
        let size = self.rendered_size(id)?;
        let offset = self.species_of(id)?.ground_offset;
        Some(self.ground_y() - size.height + offset)
    }

    /// Sprite rectangle in scene pixels.
    pub fn bounds(&self, id: ActorId) -> Option<Rect> {
        let actor = self.actors.get(id)?;
        let size = self.rendered_size(id)?;
        let y = self.draw_y(id)?;
        Some(Rect::new(actor.x, y, size.width, size.height))
    }

    /// Patrol speed of the formation's root leader (the actor's own speed
    /// when autonomous).
    pub fn pace(&self, id: ActorId) -> Option<f32> {
        let mut current = id;
        for _ in 0..=self.actors.len() {
            match self.actors.get(current)?.motion {
                Motion::Patrol { speed } => return Some(speed),
                Motion::Follow(f) => current = f.leader,
            }
        }
        None
    }

    /// Right-most x an autonomous actor may occupy.
    pub fn max_x(&self, id: ActorId) -> f32 {
        let w = self.rendered_size(id).map_or(0.0, |s| s.width);
        (self.viewport.width - w).max(0.0)
    }

    /// Spawn every configured actor. Call after the first `resize` so start
    /// ratios resolve against the real viewport. Followers are placed in
    /// their trailing slot immediately.
    pub fn populate(&mut self, config: &SceneConfig) {
        for entry in &config.actors {
            match self.actor_from_config(entry) {
                Some(actor) => {
                    self.spawn(actor);
                }
                None => log::warn!("skipping actor '{}': unresolved reference", entry.name),
            }
        }
        formation::snap_followers(self);
        patrol::clamp_patrollers(self);
        log::info!("scene populated with {} actors", self.order.len());
    }

    fn actor_from_config(&self, entry: &ActorConfig) -> Option<Actor> {
        let Some(species) = self.species_by_name(&entry.species) else {
            log::warn!("actor '{}': unknown species '{}'", entry.name, entry.species);
            return None;
        };
        let motion = match &entry.motion {
            MotionConfig::Patrol { speed } => Motion::Patrol { speed: *speed },
            MotionConfig::Follow {
                leader,
                gap,
                slot,
                size_ratio,
            } => {
                let Some(leader_id) = self.actor_by_name(leader) else {
                    log::warn!("actor '{}': leader '{}' not spawned yet", entry.name, leader);
                    return None;
                };
                Motion::Follow(Formation {
                    leader: leader_id,
                    gap: *gap,
                    slot: *slot,
                    size_ratio: *size_ratio,
                })
            }
        };
        let mut actor = Actor::new(
            entry.name.clone(),
            species,
            entry.frame_interval_ms.unwrap_or(0.0),
        );
        actor.label = entry.label.clone();
        actor.x = self.viewport.width * entry.start;
        actor.facing_left = entry.facing_left;
        actor.motion = motion;
        actor.scale = entry.scale;
        actor.layer = entry.layer;
        actor.interaction = match &entry.interaction {
            InteractionConfig::None => Interaction::None,
            InteractionConfig::Dialogue(lines) => Interaction::Dialogue(lines.clone()),
            InteractionConfig::Sound(cue) => Interaction::Sound(*cue),
        };
        Some(actor)
    }
}

/// Validate scene invariants. Run every tick in debug builds.
#[cfg(debug_assertions)]
pub fn validate_scene(scene: &Scene) {
    assert_eq!(
        scene.order.len(),
        scene.actors.len(),
        "spawn order out of sync with actor arena"
    );
    for (i, &id) in scene.order.iter().enumerate() {
        let actor = scene
            .actors
            .get(id)
            .unwrap_or_else(|| panic!("dangling actor {:?} in spawn order", id));
        if let Motion::Follow(f) = actor.motion {
            let leader_pos = scene.order.iter().position(|&o| o == f.leader);
            assert!(
                leader_pos.is_none_or(|p| p < i),
                "follower {:?} spawned before its leader",
                id
            );
        }
        if actor.motion.is_autonomous() {
            let max = scene.max_x(id);
            assert!(
                actor.x >= 0.0 && actor.x <= max + 1e-3,
                "autonomous actor {:?} at x={} outside [0, {}]",
                id,
                actor.x,
                max
            );
        }
        if let Some(species) = scene.species.get(actor.species.0) {
            assert!(
                species.frame_count == 0 || actor.frame < species.frame_count,
                "actor {:?} frame {} out of range",
                id,
                actor.frame
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead_species() -> Species {
        Species {
            name: "lead".into(),
            sheet_path: "lead.png".into(),
            frame_count: 6,
            frame_w: 41,
            frame_h: 100,
            frame_interval_ms: 100.0,
            ground_offset: 0.0,
            placeholder: None,
        }
    }

    fn duck_species() -> Species {
        Species {
            name: "duck".into(),
            sheet_path: "duck.png".into(),
            frame_count: 13,
            frame_w: 32,
            frame_h: 32,
            frame_interval_ms: 60.0,
            ground_offset: 20.0,
            placeholder: None,
        }
    }

    fn scene_with_pair() -> (Scene, ActorId, ActorId) {
        let mut scene = Scene::new_with_seed(42);
        scene.resize(1000.0, 600.0);
        let lead = scene.add_species(lead_species());
        let duck = scene.add_species(duck_species());
        let mut a = Actor::new("ren", lead, 0.0);
        a.x = 500.0;
        a.motion = Motion::Patrol { speed: 1.2 };
        let leader = scene.spawn(a);
        let mut d = Actor::new("duck", duck, 0.0);
        d.motion = Motion::Follow(Formation {
            leader,
            gap: 30.0,
            slot: 0,
            size_ratio: 0.8,
        });
        let follower = scene.spawn(d);
        (scene, leader, follower)
    }

    #[test]
    fn new_with_seed_initializes_correctly() {
        let scene = Scene::new_with_seed(42);
        assert!(scene.actors.is_empty());
        assert!(scene.order.is_empty());
        assert_eq!(scene.tick, Tick(0));
        assert_eq!(scene.tuning, Tuning::default());
    }

    #[test]
    fn spawn_inherits_species_interval() {
        let (scene, leader, follower) = scene_with_pair();
        assert_eq!(scene.actors[leader].frame_interval_ms, 100.0);
        assert_eq!(scene.actors[follower].frame_interval_ms, 60.0);
    }

    #[test]
    fn follower_size_derives_from_leader() {
        let (scene, leader, follower) = scene_with_pair();
        assert_eq!(scene.rendered_size(leader), Some(Size::new(41.0, 100.0)));
        // 80% of the leader's height, square cell.
        assert_eq!(scene.rendered_size(follower), Some(Size::new(80.0, 80.0)));
    }

    #[test]
    fn narrow_viewport_shrinks_leads() {
        let (mut scene, leader, _) = scene_with_pair();
        scene.resize(400.0, 600.0);
        let size = scene.rendered_size(leader).expect("leader size");
        assert!((size.width - 41.0 * 0.7).abs() < 1e-4);
        assert!((size.height - 70.0).abs() < 1e-4);
    }

    #[test]
    fn draw_y_sits_on_ground_line_with_offset() {
        let (scene, leader, follower) = scene_with_pair();
        // ground = 600 - 16
        assert_eq!(scene.draw_y(leader), Some(484.0));
        assert_eq!(scene.draw_y(follower), Some(584.0 - 80.0 + 20.0));
    }

    #[test]
    fn pace_resolves_to_root_leader() {
        let (scene, leader, follower) = scene_with_pair();
        assert_eq!(scene.pace(leader), Some(1.2));
        assert_eq!(scene.pace(follower), Some(1.2));
    }

    #[test]
    fn resize_clamps_autonomous_actors() {
        let (mut scene, leader, _) = scene_with_pair();
        scene.actors[leader].x = 900.0;
        scene.resize(600.0, 400.0);
        assert_eq!(scene.actors[leader].x, 600.0 - 41.0);
        validate_scene(&scene);
    }

    #[test]
    fn validate_passes_for_clean_scene() {
        let (scene, _, _) = scene_with_pair();
        validate_scene(&scene);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn validate_catches_escaped_patroller() {
        let (mut scene, leader, _) = scene_with_pair();
        scene.actors[leader].x = 5000.0;
        validate_scene(&scene);
    }

    #[test]
    fn populate_skips_unknown_species() {
        let mut config = SceneConfig::default();
        config.actors.push(ActorConfig {
            species: "unicorn".into(),
            ..ActorConfig::patrol("ghost", 1.0)
        });
        let mut scene = Scene::from_config(&config);
        scene.resize(1000.0, 600.0);
        scene.populate(&config);
        assert_eq!(scene.order.len(), config.actors.len() - 1);
        assert!(scene.actor_by_name("ghost").is_none());
        validate_scene(&scene);
    }
}
