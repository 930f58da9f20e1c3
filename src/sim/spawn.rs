//! Spawn policy
//!
//! Where new food and hazards appear, and how many base chasers the current
//! score calls for.

use glam::Vec2;
use rand::Rng;

use super::collision::distance;
use super::events::GameEvent;
use super::state::{Arena, Food, GameState, Hazard, HazardKind};
use crate::consts::*;

/// Sample a spawn position inside the arena at least `min_dist` from `reference`.
///
/// Gives up after `SPAWN_ATTEMPTS` samples and returns the last one, so the
/// distance is best-effort.
pub fn random_pos_away_from<R: Rng>(
    rng: &mut R,
    arena: &Arena,
    reference: Vec2,
    min_dist: f32,
) -> Vec2 {
    let span_x = (arena.width - 2.0 * SPAWN_INSET).max(0.0);
    let span_y = (arena.height - 2.0 * SPAWN_INSET).max(0.0);

    let mut pos = Vec2::ZERO;
    for _ in 0..SPAWN_ATTEMPTS {
        pos = Vec2::new(
            SPAWN_INSET + rng.random::<f32>() * span_x,
            SPAWN_INSET + rng.random::<f32>() * span_y,
        );
        if distance(reference, pos) >= min_dist {
            break;
        }
    }
    pos
}

/// Number of base chasers wanted at this score: one per threshold reached
pub fn desired_base_enemies(score: u32, thresholds: &[u32]) -> usize {
    thresholds.iter().take_while(|&&t| score >= t).count()
}

/// Place one hazard of the given kind away from the player
pub fn spawn_hazard(state: &mut GameState, kind: HazardKind) -> u32 {
    let pos = random_pos_away_from(
        &mut state.rng,
        &state.arena,
        state.player.pos,
        kind.min_spawn_distance(),
    );
    let id = state.next_entity_id();
    state.insert_hazard(Hazard::build(kind, id, pos));
    log::debug!("Spawned {:?} #{} at ({:.0}, {:.0})", kind, id, pos.x, pos.y);
    id
}

/// Replace the food at a new position away from the player
pub fn respawn_food(state: &mut GameState) {
    let pos = random_pos_away_from(&mut state.rng, &state.arena, state.player.pos, FOOD_MIN_DIST);
    state.food = Food::new(pos);
}

/// Bring the base (non-fast) chaser count to what the score calls for.
///
/// Surplus base chasers are removed in scan order; fast chasers are never
/// touched.
pub fn ensure_base_enemies(state: &mut GameState) {
    let desired = desired_base_enemies(state.score, &state.tuning.base_enemy_thresholds);
    let current = state.base_chaser_count();

    if desired > current {
        for _ in 0..desired - current {
            spawn_hazard(state, HazardKind::Chaser);
        }
    } else {
        for _ in 0..current - desired {
            if let Some(idx) = state.chasers.iter().position(|c| !c.fast) {
                let removed = state.chasers.remove(idx);
                state.push_event(GameEvent::HazardRemoved { id: removed.id });
            }
        }
    }
}

/// Apply scoring for one eaten food: score, growth and any escalation for the
/// new score.
pub fn on_food_eaten(state: &mut GameState) {
    state.score += 1;
    state.player.grow(state.tuning.growth_per_food);
    state.push_event(GameEvent::FoodEaten { score: state.score });

    let score = state.score;
    let spawns: Vec<HazardKind> = state
        .tuning
        .escalation
        .iter()
        .filter(|step| step.score == score)
        .map(|step| step.hazard)
        .collect();
    for kind in spawns {
        spawn_hazard(state, kind);
    }
}
