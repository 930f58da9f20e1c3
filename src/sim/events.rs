//! Game events
//!
//! Events generated during a tick. The state collects them in order so the
//! presentation layer (sound, flashes, game-over dialog) can react without
//! touching simulation state.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::HazardKind;

/// What hit the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitSource {
    Wall,
    Enemy,
    Bullet,
    Mine,
}

impl HitSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            HitSource::Wall => "wall",
            HitSource::Enemy => "enemy",
            HitSource::Bullet => "bullet",
            HitSource::Mine => "mine",
        }
    }
}

impl fmt::Display for HitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player touched something dangerous
    Hit { source: HitSource },
    /// A shield charge absorbed the hit
    ShieldAbsorbed { remaining: u32 },
    /// Food was eaten
    FoodEaten { score: u32 },
    /// A hazard entered the arena
    HazardSpawned { id: u32, kind: HazardKind },
    /// A base chaser was removed by difficulty reconciliation
    HazardRemoved { id: u32 },
    /// A turret fired
    ProjectileFired { turret_id: u32, projectile_id: u32 },
    /// Ghost phase started
    GhostActivated,
    /// Ghost phase ran out
    GhostExpired,
    /// Run ended
    GameOver { reason: HitSource, score: u32 },
}
