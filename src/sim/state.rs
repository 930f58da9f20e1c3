//! Game state and core simulation types
//!
//! Everything the renderer needs for a frame lives here and serializes to a
//! snapshot. The RNG and the per-tick event log are skipped.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{outside_arena, point_in_circle};
use super::events::{GameEvent, HitSource};
use super::spawn::random_pos_away_from;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{angle_between, heading_vector};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh run, waiting for start
    Ready,
    /// Active gameplay
    Running,
    /// Simulation frozen, snapshot still available
    Paused,
    /// Run ended (terminal until reset)
    GameOver,
}

/// Rectangular playfield, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// The player's serpent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Heading (radians, 0 = +x)
    pub angle: f32,
    pub base_speed: f32,
    /// Speed for the current tick (base speed times boost)
    pub speed: f32,
    pub radius: f32,
    /// Past head positions (newest first)
    pub trail: Vec<Vec2>,
    /// Trail length cap
    pub length: usize,
    /// Passing through hazards
    pub ghost: bool,
    /// Wall-clock time (ms) at which the ghost phase ends
    pub ghost_until_ms: Option<f64>,
    /// Ticks until ghost can be used again (counts down only outside ghost)
    pub ghost_cooldown: f32,
    /// Hits that can still be absorbed
    pub shield: u32,
}

impl Player {
    pub fn new(pos: Vec2, shield: u32, length: usize) -> Self {
        Self {
            pos,
            angle: 0.0,
            base_speed: PLAYER_BASE_SPEED,
            speed: PLAYER_BASE_SPEED,
            radius: PLAYER_RADIUS,
            trail: Vec::with_capacity(length),
            length,
            ghost: false,
            ghost_until_ms: None,
            ghost_cooldown: 0.0,
            shield,
        }
    }

    /// Move one tick along the heading and record the new head position
    pub fn advance(&mut self, dt: f32) {
        if !self.ghost && self.ghost_cooldown > 0.0 {
            self.ghost_cooldown = (self.ghost_cooldown - dt).max(0.0);
        }

        self.pos += heading_vector(self.angle) * self.speed;

        self.trail.insert(0, self.pos);
        self.trail.truncate(self.length);
    }

    /// Raise the trail cap
    pub fn grow(&mut self, amount: usize) {
        self.length += amount;
    }

    pub fn can_activate_ghost(&self) -> bool {
        !self.ghost && self.ghost_cooldown <= 0.0
    }

    /// Enter the ghost phase until `now_ms + duration_ms`
    pub fn activate_ghost(&mut self, now_ms: f64, duration_ms: f64, cooldown_ticks: f32) {
        self.ghost = true;
        self.ghost_until_ms = Some(now_ms + duration_ms);
        self.ghost_cooldown = cooldown_ticks;
    }

    /// Leave the ghost phase if its time is up. Returns true if it ended.
    pub fn expire_ghost(&mut self, now_ms: f64) -> bool {
        match self.ghost_until_ms {
            Some(until) if self.ghost && now_ms >= until => {
                self.ghost = false;
                self.ghost_until_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Push the head back against the heading
    pub fn knock_back(&mut self, distance: f32) {
        self.pos -= heading_vector(self.angle) * distance;
    }
}

/// Enemy that homes in on the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chaser {
    pub id: u32,
    pub pos: Vec2,
    pub speed: f32,
    pub radius: f32,
    /// Fast variant (smaller, quicker, never reconciled away)
    pub fast: bool,
}

impl Chaser {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            speed: CHASER_SPEED,
            radius: CHASER_RADIUS,
            fast: false,
        }
    }

    pub fn new_fast(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            speed: FAST_CHASER_SPEED,
            radius: FAST_CHASER_RADIUS,
            fast: true,
        }
    }

    /// Step toward the target
    pub fn update(&mut self, target: Vec2, slow_factor: f32) {
        let a = angle_between(self.pos, target);
        self.pos += heading_vector(a) * self.speed * slow_factor;
    }
}

/// Stationary gun that fires at the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Ticks until the next shot
    pub cooldown: i32,
    pub cooldown_max: i32,
    /// Barrel direction (for rendering)
    pub angle: f32,
}

impl Turret {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            radius: TURRET_RADIUS,
            cooldown: 0,
            cooldown_max: TURRET_COOLDOWN_TICKS,
            angle: 0.0,
        }
    }

    /// Track the target. Returns true when a shot should be fired.
    pub fn update(&mut self, target: Vec2) -> bool {
        self.cooldown -= 1;
        self.angle = angle_between(self.pos, target);
        if self.cooldown <= 0 {
            self.cooldown = self.cooldown_max;
            return true;
        }
        false
    }
}

/// Proximity mine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mine {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Player center inside this radius detonates the mine
    pub trigger_radius: f32,
    pub dead: bool,
}

impl Mine {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            radius: MINE_RADIUS,
            trigger_radius: MINE_TRIGGER_RADIUS,
            dead: false,
        }
    }

    /// Returns true if the mine detonated this tick
    pub fn update(&mut self, player_pos: Vec2, player_ghost: bool) -> bool {
        if self.dead || player_ghost {
            return false;
        }
        if point_in_circle(player_pos, self.pos, self.trigger_radius) {
            self.dead = true;
            return true;
        }
        false
    }
}

/// Turret shot, flies straight along the direction it was fired in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Unit direction, fixed at creation
    pub dir: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub dead: bool,
}

impl Projectile {
    /// Aim from `origin` at `target`'s current position
    pub fn new(id: u32, origin: Vec2, target: Vec2) -> Self {
        Self {
            id,
            pos: origin,
            dir: heading_vector(angle_between(origin, target)),
            speed: PROJECTILE_SPEED,
            radius: PROJECTILE_RADIUS,
            dead: false,
        }
    }

    pub fn update(&mut self, arena: &Arena, slow_factor: f32) {
        self.pos += self.dir * self.speed * slow_factor;
        if outside_arena(self.pos, arena, PROJECTILE_MARGIN) {
            self.dead = true;
        }
    }
}

/// The food pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub pos: Vec2,
    pub radius: f32,
}

impl Food {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: FOOD_RADIUS,
        }
    }
}

/// Hazard types that the spawn policy can place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    Chaser,
    FastChaser,
    Turret,
    Mine,
}

impl HazardKind {
    /// Minimum distance from the player when placing this hazard
    pub fn min_spawn_distance(&self) -> f32 {
        match self {
            HazardKind::Chaser | HazardKind::FastChaser => CHASER_MIN_DIST,
            HazardKind::Turret => TURRET_MIN_DIST,
            HazardKind::Mine => MINE_MIN_DIST,
        }
    }
}

/// A freshly built hazard, routed into its collection by `GameState::insert_hazard`
#[derive(Debug, Clone)]
pub enum Hazard {
    Chaser(Chaser),
    Turret(Turret),
    Mine(Mine),
}

impl Hazard {
    pub fn build(kind: HazardKind, id: u32, pos: Vec2) -> Self {
        match kind {
            HazardKind::Chaser => Hazard::Chaser(Chaser::new(id, pos)),
            HazardKind::FastChaser => Hazard::Chaser(Chaser::new_fast(id, pos)),
            HazardKind::Turret => Hazard::Turret(Turret::new(id, pos)),
            HazardKind::Mine => Hazard::Mine(Mine::new(id, pos)),
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Hazard::Chaser(c) => c.id,
            Hazard::Turret(t) => t.id,
            Hazard::Mine(m) => m.id,
        }
    }

    pub fn kind(&self) -> HazardKind {
        match self {
            Hazard::Chaser(c) if c.fast => HazardKind::FastChaser,
            Hazard::Chaser(_) => HazardKind::Chaser,
            Hazard::Turret(_) => HazardKind::Turret,
            Hazard::Mine(_) => HazardKind::Mine,
        }
    }
}

/// Complete game state (deterministic, serializable for the renderer)
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    /// Balance table for this run
    #[serde(skip)]
    pub tuning: Tuning,
    pub arena: Arena,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub score: u32,
    pub player: Player,
    /// Chasers, base and fast (insertion order)
    pub chasers: Vec<Chaser>,
    pub turrets: Vec<Turret>,
    pub mines: Vec<Mine>,
    pub projectiles: Vec<Projectile>,
    pub food: Food,
    /// Why the run ended
    pub end_reason: Option<HitSource>,
    /// Events from the last ticks, drained by the presentation layer
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh run with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let arena = tuning.arena();
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawn = arena.center() + Vec2::new(0.0, PLAYER_SPAWN_DROP);
        let player = Player::new(spawn, tuning.initial_shield, tuning.start_length);
        let food_pos = random_pos_away_from(&mut rng, &arena, spawn, FIRST_FOOD_MIN_DIST);

        Self {
            seed,
            rng,
            tuning,
            arena,
            time_ticks: 0,
            phase: GamePhase::Ready,
            score: 0,
            player,
            chasers: Vec::new(),
            turrets: Vec::new(),
            mines: Vec::new(),
            projectiles: Vec::new(),
            food: Food::new(food_pos),
            end_reason: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Record an event for the presentation layer
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Append a hazard to the collection for its kind
    pub fn insert_hazard(&mut self, hazard: Hazard) {
        self.push_event(GameEvent::HazardSpawned {
            id: hazard.id(),
            kind: hazard.kind(),
        });
        match hazard {
            Hazard::Chaser(c) => self.chasers.push(c),
            Hazard::Turret(t) => self.turrets.push(t),
            Hazard::Mine(m) => self.mines.push(m),
        }
    }

    /// Live chasers that are not the fast variant
    pub fn base_chaser_count(&self) -> usize {
        self.chasers.iter().filter(|c| !c.fast).count()
    }

    pub fn fast_chaser_count(&self) -> usize {
        self.chasers.iter().filter(|c| c.fast).count()
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// The player touched something: spend a shield charge or end the run
    pub fn handle_hit(&mut self, source: HitSource) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.push_event(GameEvent::Hit { source });

        if self.player.shield > 0 {
            self.player.shield -= 1;
            self.player.knock_back(self.tuning.knockback_distance);
            self.push_event(GameEvent::ShieldAbsorbed {
                remaining: self.player.shield,
            });
            log::debug!(
                "Shield absorbed {} hit ({} left)",
                source,
                self.player.shield
            );
        } else {
            self.end_game(source);
        }
    }

    /// End the run. No-op if it already ended.
    pub fn end_game(&mut self, reason: HitSource) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.end_reason = Some(reason);
        self.player.ghost = false;
        self.player.ghost_until_ms = None;
        self.push_event(GameEvent::GameOver {
            reason,
            score: self.score,
        });
        log::info!("Game over ({}). Score: {}", reason, self.score);
    }

    /// Number of orbs decorating the body
    pub fn orb_count(&self) -> u32 {
        self.score.min(MAX_ORBS)
    }

    /// Evenly spaced trail points where the renderer puts orbs
    pub fn orb_points(&self) -> Vec<Vec2> {
        let count = self.orb_count() as usize;
        let trail = &self.player.trail;
        if count == 0 || trail.len() < 5 {
            return Vec::new();
        }

        let step = trail.len() / (count + 1);
        (1..=count)
            .map(|i| i * step)
            .filter(|&index| index < trail.len())
            .map(|index| trail[index])
            .collect()
    }
}
