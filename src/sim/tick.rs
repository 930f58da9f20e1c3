//! Simulation tick
//!
//! Core game loop that advances the run by one step. The order of the steps
//! below is part of the contract: replays depend on it.

use super::collision::{circles_overlap, near_wall};
use super::events::{GameEvent, HitSource};
use super::spawn::{ensure_base_enemies, on_food_eaten, respawn_food};
use super::state::{GamePhase, GameState, Projectile};
use crate::consts::*;

/// Control signals for a single tick (already merged from all input sources)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Signed turn amount, positive = clockwise on screen (+angle)
    pub turn: f32,
    /// Boost requested
    pub boost: bool,
    /// Ghost activation requested
    pub ghost: bool,
    /// Wall-clock time in milliseconds
    pub now_ms: f64,
}

/// Advance the game state by one tick. `dt` is elapsed time in reference
/// frames (1.0 at 60 Hz).
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Paused, ready and finished runs don't move
    if state.phase != GamePhase::Running {
        return;
    }

    state.time_ticks += 1;
    let arena = state.arena;

    if state.player.expire_ghost(input.now_ms) {
        state.push_event(GameEvent::GhostExpired);
    }

    // Heading
    state.player.angle += input.turn * TURN_RATE * dt;

    // Boost
    let boost = if input.boost {
        state.tuning.boost_multiplier
    } else {
        1.0
    };
    state.player.speed = state.player.base_speed * boost;

    // Ghost (requests while active or cooling down are dropped)
    if input.ghost && state.player.can_activate_ghost() {
        let duration = state.tuning.ghost_duration_ms;
        let cooldown = state.tuning.ghost_cooldown_ticks;
        state.player.activate_ghost(input.now_ms, duration, cooldown);
        state.push_event(GameEvent::GhostActivated);
        log::debug!("Ghost on until {:.0}ms", input.now_ms + duration);
    }

    state.player.advance(dt);
    let target = state.player.pos;

    for chaser in &mut state.chasers {
        chaser.update(target, HAZARD_SLOW_FACTOR);
    }

    // Turrets aim at where the player is now; shots never re-aim
    let mut shots = Vec::new();
    for turret in &mut state.turrets {
        if turret.update(target) {
            shots.push((turret.id, turret.pos));
        }
    }
    for (turret_id, origin) in shots {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile::new(id, origin, target));
        state.push_event(GameEvent::ProjectileFired {
            turret_id,
            projectile_id: id,
        });
    }

    // Mines see the player after any earlier knock-back this tick
    for i in 0..state.mines.len() {
        let (pos, ghost) = (state.player.pos, state.player.ghost);
        if state.mines[i].update(pos, ghost) {
            state.handle_hit(HitSource::Mine);
        }
    }

    for projectile in &mut state.projectiles {
        projectile.update(&arena, HAZARD_SLOW_FACTOR);
    }

    state.projectiles.retain(|p| !p.dead);
    state.mines.retain(|m| !m.dead);

    if near_wall(state.player.pos, &arena, WALL_MARGIN) {
        state.handle_hit(HitSource::Wall);
    }

    let player = &state.player;
    if circles_overlap(player.pos, player.radius, state.food.pos, state.food.radius) {
        on_food_eaten(state);
        respawn_food(state);
    }

    if !state.player.ghost {
        let (pos, radius) = (state.player.pos, state.player.radius);
        let enemy_hit = state
            .chasers
            .iter()
            .any(|c| circles_overlap(pos, radius, c.pos, c.radius));
        if enemy_hit {
            state.handle_hit(HitSource::Enemy);
        }

        let (pos, radius) = (state.player.pos, state.player.radius);
        let bullet_hit = match state
            .projectiles
            .iter_mut()
            .find(|b| circles_overlap(pos, radius, b.pos, b.radius))
        {
            Some(bullet) => {
                bullet.dead = true;
                true
            }
            None => false,
        };
        if bullet_hit {
            state.handle_hit(HitSource::Bullet);
        }
    }

    ensure_base_enemies(state);
}
