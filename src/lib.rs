//! Ghost Serpent - A neon arena snake game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, spawning, scoring)
//! - `session`: Lifecycle state machine and frame driver
//! - `input`: Keyboard/touch and head-tracking control merging
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod input;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use input::{ControlMode, Controls, DirectInput, HeadSignal};
pub use session::{HudSummary, Session, StateLabel};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Milliseconds in one reference frame (dt = 1.0 at 60 Hz)
    pub const FRAME_MS: f64 = 16.666;
    /// Largest dt accepted by the frame driver (tab suspension, debugger pauses)
    pub const MAX_FRAME_DT: f32 = 3.0;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 960.0;
    pub const ARENA_HEIGHT: f32 = 640.0;
    /// Inset of the spawn area from every arena edge
    pub const SPAWN_INSET: f32 = 40.0;
    /// Distance from the edge at which the player hits the wall
    pub const WALL_MARGIN: f32 = 10.0;
    /// Projectiles die once this far outside the arena
    pub const PROJECTILE_MARGIN: f32 = 20.0;
    /// Rejection-sampling attempts before accepting any position
    pub const SPAWN_ATTEMPTS: u32 = 50;

    /// Player defaults
    pub const PLAYER_BASE_SPEED: f32 = 2.4;
    pub const PLAYER_RADIUS: f32 = 10.0;
    /// Spawn point offset below the arena center
    pub const PLAYER_SPAWN_DROP: f32 = 40.0;
    /// Radians per tick at full turn input
    pub const TURN_RATE: f32 = 0.06;

    /// Chaser defaults
    pub const CHASER_SPEED: f32 = 1.6;
    pub const CHASER_RADIUS: f32 = 14.0;
    pub const FAST_CHASER_SPEED: f32 = 2.6;
    pub const FAST_CHASER_RADIUS: f32 = 9.0;

    /// Turret defaults
    pub const TURRET_RADIUS: f32 = 14.0;
    pub const TURRET_COOLDOWN_TICKS: i32 = 120;

    /// Mine defaults
    pub const MINE_RADIUS: f32 = 14.0;
    pub const MINE_TRIGGER_RADIUS: f32 = 52.0;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 4.0;
    pub const PROJECTILE_RADIUS: f32 = 4.0;

    /// Food defaults
    pub const FOOD_RADIUS: f32 = 8.0;

    /// Minimum spawn distances from the player
    pub const FIRST_FOOD_MIN_DIST: f32 = 120.0;
    pub const FOOD_MIN_DIST: f32 = 100.0;
    pub const CHASER_MIN_DIST: f32 = 140.0;
    pub const TURRET_MIN_DIST: f32 = 160.0;
    pub const MINE_MIN_DIST: f32 = 140.0;

    /// Global hazard slow factor (reserved, always 1.0 for now)
    pub const HAZARD_SLOW_FACTOR: f32 = 1.0;

    /// Maximum orbs drawn along the body
    pub const MAX_ORBS: u32 = 6;
}

/// Unit vector pointing along `angle`
#[inline]
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Angle of the vector from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
