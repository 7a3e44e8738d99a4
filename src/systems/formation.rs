use crate::components::{ActorId, Formation, Motion, Tick};
use crate::scene::Scene;

/// Where a follower wants to stand: behind its leader, on the side
/// opposite the leader's facing.
///
/// `stagger = slot · (follower_w + gap)` spaces several followers sharing
/// one leader.
pub fn trail_target(
    leader_x: f32,
    leader_w: f32,
    leader_facing_left: bool,
    follower_w: f32,
    formation: &Formation,
) -> f32 {
    let stagger = formation.slot as f32 * (follower_w + formation.gap);
    if leader_facing_left {
        leader_x + leader_w + formation.gap + stagger
    } else {
        leader_x - follower_w - formation.gap - stagger
    }
}

/// Resolve a follower's target and its leader's facing, or None when the
/// leader is gone.
fn resolve(scene: &Scene, id: ActorId) -> Option<(f32, bool)> {
    let actor = scene.actors.get(id)?;
    let Motion::Follow(formation) = actor.motion else {
        return None;
    };
    let leader = scene.actors.get(formation.leader)?;
    let leader_w = scene.rendered_size(formation.leader)?.width;
    let follower_w = scene.rendered_size(id)?.width;
    let target = trail_target(leader.x, leader_w, leader.facing_left, follower_w, &formation);
    Some((target, leader.facing_left))
}

/// Phase 2 (Movement): followers walk toward their trailing slot.
///
/// Followers are visited in spawn order, so each one sees its leader's
/// position from this tick. The step is capped at the root leader's pace
/// and never overshoots the target; facing copies the leader's.
/// A follower whose leader no longer resolves keeps its position.
pub fn run_formation(scene: &mut Scene, _tick: Tick) {
    let order = scene.order.clone();
    for id in order {
        let Some((target, facing_left)) = resolve(scene, id) else {
            continue;
        };
        let pace = scene.pace(id).unwrap_or(0.0).abs();
        let Some(actor) = scene.actors.get_mut(id) else {
            continue;
        };
        actor.x += (target - actor.x).clamp(-pace, pace);
        actor.facing_left = facing_left;
    }
}

/// Place every follower exactly on its slot. Used when actors first
/// appear so the formation starts assembled.
pub fn snap_followers(scene: &mut Scene) {
    let order = scene.order.clone();
    for id in order {
        let Some((target, facing_left)) = resolve(scene, id) else {
            continue;
        };
        if let Some(actor) = scene.actors.get_mut(id) {
            actor.x = target;
            actor.facing_left = facing_left;
        }
    }
}
