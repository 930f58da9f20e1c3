//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (insertion order per collection)
//! - Wall-clock time enters only through `TickInput::now_ms`
//! - No rendering or platform dependencies

pub mod collision;
pub mod events;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{circles_overlap, distance, near_wall, outside_arena};
pub use events::{GameEvent, HitSource};
pub use spawn::{desired_base_enemies, ensure_base_enemies, random_pos_away_from, spawn_hazard};
pub use state::{
    Arena, Chaser, Food, GamePhase, GameState, Hazard, HazardKind, Mine, Player, Projectile,
    Turret,
};
pub use tick::{TickInput, tick};
