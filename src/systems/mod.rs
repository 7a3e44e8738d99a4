pub mod animation;
pub mod formation;
pub mod patrol;

use crate::scene::Scene;

/// One scene step at `timestamp_ms`: movement first, leaders before
/// followers, then frame cycling.
pub fn run_tick(scene: &mut Scene, timestamp_ms: f64) {
    let tick = scene.tick;
    patrol::run_patrol(scene, tick);
    formation::run_formation(scene, tick);
    animation::run_frame_cycle(scene, timestamp_ms);

    #[cfg(debug_assertions)]
    crate::scene::validate_scene(scene);

    scene.tick.0 += 1;
}
