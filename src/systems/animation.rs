use crate::scene::Scene;

/// Phase 3 (Animation): frame cycling.
///
/// Advances each actor's frame once per elapsed `frame_interval_ms`. When
/// several intervals have passed since the last advance, all of them are
/// applied at once and the timer moves by whole intervals, so the frame
/// index depends only on total elapsed time and not on how that time was
/// split into ticks.
pub fn run_frame_cycle(scene: &mut Scene, timestamp_ms: f64) {
    for &id in &scene.order {
        let Some(actor) = scene.actors.get_mut(id) else {
            continue;
        };
        let Some(species) = scene.species.get(actor.species.0) else {
            continue;
        };
        let interval = actor.frame_interval_ms;
        if interval <= 0.0 || species.frame_count == 0 {
            continue;
        }
        let elapsed = timestamp_ms - actor.frame_timer_ms;
        if elapsed < interval {
            continue;
        }
        let steps = (elapsed / interval).floor();
        actor.frame = (actor.frame + (steps as u64 % species.frame_count as u64) as usize)
            % species.frame_count;
        actor.frame_timer_ms += steps * interval;
    }
}
