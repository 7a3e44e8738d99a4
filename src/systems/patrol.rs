use crate::components::{ActorId, Motion, Tick};
use crate::events::Event;
use crate::scene::Scene;

/// Phase 1 (Movement): autonomous back-and-forth walk.
///
/// Each patroller steps `speed` pixels along its facing. Moving right, it
/// turns once its right edge reaches `W − margin` and snaps to
/// `W − margin − w`; moving left, it turns at `x ≤ margin` and snaps to
/// `margin`. The result is then clamped into `[0, max(0, W − w)]`, which
/// only bites when the viewport is narrower than `w + 2·margin`.
/// Uses collect-then-apply mutation pattern.
pub fn run_patrol(scene: &mut Scene, tick: Tick) {
    let width = scene.viewport.width;
    let margin = scene.tuning.patrol_margin;

    let mut updates: Vec<(ActorId, f32, bool)> = Vec::new();
    for &id in &scene.order {
        let Some(actor) = scene.actors.get(id) else {
            continue;
        };
        let Motion::Patrol { speed } = actor.motion else {
            continue;
        };
        let Some(size) = scene.rendered_size(id) else {
            continue;
        };
        let w = size.width;

        let mut facing_left = actor.facing_left;
        let mut x = if facing_left {
            actor.x - speed
        } else {
            actor.x + speed
        };
        if !facing_left && x + w >= width - margin {
            facing_left = true;
            x = width - margin - w;
        } else if facing_left && x <= margin {
            facing_left = false;
            x = margin;
        }
        x = x.clamp(0.0, (width - w).max(0.0));
        updates.push((id, x, facing_left));
    }

    for (id, x, facing_left) in updates {
        let Some(actor) = scene.actors.get_mut(id) else {
            continue;
        };
        let turned = actor.facing_left != facing_left;
        actor.x = x;
        actor.facing_left = facing_left;
        if turned {
            log::debug!("{} turned {} at x={:.1}", actor.name, if facing_left { "left" } else { "right" }, x);
            scene.events.push(Event::Turned {
                actor: id,
                facing_left,
                x,
                tick,
            });
        }
    }
}

/// Pull every autonomous actor back into `[0, max(0, W − w)]`. Run on
/// resize so nobody is stranded off-screen until their next step.
pub fn clamp_patrollers(scene: &mut Scene) {
    let clamped: Vec<(ActorId, f32)> = scene
        .order
        .iter()
        .filter(|&&id| scene.actors.get(id).is_some_and(|a| a.motion.is_autonomous()))
        .map(|&id| (id, scene.max_x(id)))
        .collect();

    for (id, max_x) in clamped {
        if let Some(actor) = scene.actors.get_mut(id) {
            actor.x = actor.x.clamp(0.0, max_x);
        }
    }
}
