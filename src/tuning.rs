//! Data-driven game balance
//!
//! The default table is the reference tuning. A custom table can be loaded
//! from JSON; every field falls back to its default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, SPAWN_INSET};
use crate::sim::state::{Arena, HazardKind};

/// Scores at which one more base chaser is wanted
pub const BASE_ENEMY_THRESHOLDS: [u32; 4] = [4, 8, 13, 19];

/// Errors from loading a tuning table
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tuning: {0}")]
    Invalid(String),
}

/// One-time hazard spawn when the score becomes exactly `score`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationStep {
    pub score: u32,
    pub hazard: HazardKind,
}

/// Balance knobs for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena_width: f32,
    pub arena_height: f32,
    /// Shield charges at the start of a run
    pub initial_shield: u32,
    /// Trail cap at the start of a run
    pub start_length: usize,
    /// Trail cap increase per food
    pub growth_per_food: usize,
    pub boost_multiplier: f32,
    /// Real-time length of the ghost phase
    pub ghost_duration_ms: f64,
    /// Simulation ticks before ghost can be used again
    pub ghost_cooldown_ticks: f32,
    /// Distance the player is pushed back when a shield absorbs a hit
    pub knockback_distance: f32,
    pub base_enemy_thresholds: Vec<u32>,
    pub escalation: Vec<EscalationStep>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            initial_shield: 1,
            start_length: 30,
            growth_per_food: 10,
            boost_multiplier: 1.8,
            ghost_duration_ms: 2000.0,
            ghost_cooldown_ticks: 60.0,
            knockback_distance: 25.0,
            base_enemy_thresholds: BASE_ENEMY_THRESHOLDS.to_vec(),
            escalation: vec![
                EscalationStep {
                    score: 6,
                    hazard: HazardKind::Turret,
                },
                EscalationStep {
                    score: 10,
                    hazard: HazardKind::Mine,
                },
                EscalationStep {
                    score: 14,
                    hazard: HazardKind::FastChaser,
                },
                EscalationStep {
                    score: 17,
                    hazard: HazardKind::Mine,
                },
                EscalationStep {
                    score: 25,
                    hazard: HazardKind::Mine,
                },
                EscalationStep {
                    score: 30,
                    hazard: HazardKind::Turret,
                },
            ],
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning table
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let min_side = 2.0 * SPAWN_INSET;
        if self.arena_width.is_nan()
            || self.arena_height.is_nan()
            || self.arena_width <= min_side
            || self.arena_height <= min_side
        {
            return Err(TuningError::Invalid(format!(
                "arena {}x{} is smaller than the spawn inset allows",
                self.arena_width, self.arena_height
            )));
        }
        if self.start_length == 0 {
            return Err(TuningError::Invalid("start_length must be positive".into()));
        }
        if self.boost_multiplier.is_nan() || self.boost_multiplier < 1.0 {
            return Err(TuningError::Invalid(format!(
                "boost_multiplier {} must be at least 1",
                self.boost_multiplier
            )));
        }
        if self.ghost_duration_ms < 0.0 || self.ghost_cooldown_ticks < 0.0 {
            return Err(TuningError::Invalid("ghost timings must not be negative".into()));
        }
        if self.base_enemy_thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TuningError::Invalid(
                "base_enemy_thresholds must be strictly ascending".into(),
            ));
        }
        for (i, step) in self.escalation.iter().enumerate() {
            if step.score == 0 {
                return Err(TuningError::Invalid("escalation score 0 can never be reached".into()));
            }
            if self.escalation[..i].iter().any(|s| s.score == step.score) {
                return Err(TuningError::Invalid(format!(
                    "duplicate escalation score {}",
                    step.score
                )));
            }
        }
        Ok(())
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }
}
