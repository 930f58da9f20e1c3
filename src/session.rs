//! Session lifecycle
//!
//! Owns the current run and moves it through Ready → Running ⇄ Paused →
//! GameOver. Also drives frames: turns wall-clock time into `dt`, merges
//! input, steps the simulation and produces the HUD summary.

use glam::Vec2;
use serde::Serialize;

use crate::consts::{FRAME_MS, MAX_FRAME_DT};
use crate::input::Controls;
use crate::sim::{GameEvent, GamePhase, GameState, HitSource, TickInput, tick};
use crate::tuning::Tuning;

/// HUD state label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StateLabel {
    Ready,
    Running,
    Paused,
    Ended,
}

impl StateLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateLabel::Ready => "ready",
            StateLabel::Running => "running",
            StateLabel::Paused => "paused",
            StateLabel::Ended => "ended",
        }
    }
}

impl From<GamePhase> for StateLabel {
    fn from(phase: GamePhase) -> Self {
        match phase {
            GamePhase::Ready => StateLabel::Ready,
            GamePhase::Running => StateLabel::Running,
            GamePhase::Paused => StateLabel::Paused,
            GamePhase::GameOver => StateLabel::Ended,
        }
    }
}

/// What the HUD shows after each frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSummary {
    pub score: u32,
    pub shield: u32,
    pub state: StateLabel,
    pub effects: Vec<String>,
    /// Set once the run has ended
    pub end_reason: Option<HitSource>,
}

/// What the renderer receives each frame: the full state plus derived
/// decorations
#[derive(Serialize)]
struct Snapshot<'a> {
    #[serde(flatten)]
    state: &'a GameState,
    /// Orb anchor points along the body
    orbs: Vec<Vec2>,
}

/// A player's sequence of runs
pub struct Session {
    state: GameState,
    tuning: Tuning,
    base_seed: u64,
    /// Resets so far (feeds the per-run seed)
    runs: u64,
    last_frame_ms: Option<f64>,
}

impl Session {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: GameState::new(seed, tuning.clone()),
            tuning,
            base_seed: seed,
            runs: 0,
            last_frame_ms: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for debugging tools and scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    fn run_seed(&self) -> u64 {
        self.base_seed
            .wrapping_add(self.runs.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Begin (or resume) play. A finished run is replaced by a fresh one.
    pub fn start(&mut self) {
        match self.state.phase {
            GamePhase::Running => return,
            GamePhase::GameOver => self.reset(),
            GamePhase::Ready | GamePhase::Paused => {}
        }
        self.state.phase = GamePhase::Running;
        self.last_frame_ms = None;
        log::info!("Run started (seed {})", self.state.seed);
    }

    /// Throw away the current run and prepare a fresh one
    pub fn reset(&mut self) {
        self.runs += 1;
        self.state = GameState::new(self.run_seed(), self.tuning.clone());
        self.last_frame_ms = None;
        log::info!("Session reset (seed {})", self.state.seed);
    }

    /// Running ⇄ Paused. Ignored before start and after the run ends.
    pub fn toggle_pause(&mut self) {
        let next = match self.state.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            other => {
                log::debug!("Pause ignored in {:?}", other);
                return;
            }
        };
        self.state.phase = next;
        if next == GamePhase::Running {
            self.last_frame_ms = None;
        }
        log::info!("{:?}", next);
    }

    /// End the run. No-op if it already ended.
    pub fn end_game(&mut self, reason: HitSource) {
        self.state.end_game(reason);
    }

    /// Run one simulation step (only while running)
    pub fn step(&mut self, input: &TickInput, dt: f32) -> HudSummary {
        tick(&mut self.state, input, dt);
        self.summary(input.now_ms)
    }

    /// Per-frame entry point: handle pause, compute `dt`, step, summarize
    pub fn frame(&mut self, now_ms: f64, controls: &mut Controls) -> HudSummary {
        if controls.take_pause() {
            self.toggle_pause();
        }

        let dt = match self.last_frame_ms {
            Some(last) => (((now_ms - last) / FRAME_MS) as f32).clamp(0.0, MAX_FRAME_DT),
            None => 1.0,
        };
        self.last_frame_ms = Some(now_ms);

        let input = controls.resolve(now_ms);
        self.step(&input, dt)
    }

    /// HUD view of the current run
    pub fn summary(&self, now_ms: f64) -> HudSummary {
        let player = &self.state.player;
        let mut effects = Vec::new();
        let ghost_live = player.ghost && player.ghost_until_ms.is_some_and(|until| now_ms < until);
        if ghost_live {
            effects.push("Ghost".to_string());
        }
        if self.state.is_running() && player.speed > player.base_speed {
            effects.push("Boost".to_string());
        }

        HudSummary {
            score: self.state.score,
            shield: player.shield,
            state: self.state.phase.into(),
            effects,
            end_reason: self.state.end_reason,
        }
    }

    /// Full state for the renderer
    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&Snapshot {
            state: &self.state,
            orbs: self.state.orb_points(),
        })
    }

    /// Take events since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    #[test]
    fn test_lifecycle() {
        let mut session = Session::new(1, Tuning::default());
        assert_eq!(session.phase(), GamePhase::Ready);

        // Nothing to pause yet
        session.toggle_pause();
        assert_eq!(session.phase(), GamePhase::Ready);

        session.start();
        assert_eq!(session.phase(), GamePhase::Running);
        session.toggle_pause();
        assert_eq!(session.phase(), GamePhase::Paused);
        session.toggle_pause();
        assert_eq!(session.phase(), GamePhase::Running);

        session.end_game(HitSource::Enemy);
        assert_eq!(session.phase(), GamePhase::GameOver);
        session.end_game(HitSource::Wall);
        assert_eq!(session.state().end_reason, Some(HitSource::Enemy));

        session.toggle_pause();
        assert_eq!(session.phase(), GamePhase::GameOver);

        // Start after game over begins a fresh run
        session.start();
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.state().end_reason, None);
    }

    #[test]
    fn test_reset_round_trip() {
        let mut session = Session::new(5, Tuning::default());
        session.start();
        {
            let state = session.state_mut();
            state.score = 20;
            state.player.shield = 0;
        }
        let mut controls = Controls::default();
        session.frame(0.0, &mut controls);
        assert!(!session.state().chasers.is_empty());

        session.reset();
        let state = session.state();
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.shield, Tuning::default().initial_shield);
        assert!(state.chasers.is_empty());
        assert!(state.turrets.is_empty());
        assert!(state.mines.is_empty());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_paused_frames_do_not_step() {
        let mut session = Session::new(2, Tuning::default());
        let mut controls = Controls::default();
        session.start();
        session.frame(0.0, &mut controls);
        let ticks = session.state().time_ticks;

        controls.direct.key_down("KeyP");
        let hud = session.frame(16.0, &mut controls);
        assert_eq!(hud.state, StateLabel::Paused);
        session.frame(32.0, &mut controls);
        assert_eq!(session.state().time_ticks, ticks);

        controls.direct.key_down("KeyP");
        let hud = session.frame(48.0, &mut controls);
        assert_eq!(hud.state, StateLabel::Running);
        assert_eq!(session.state().time_ticks, ticks + 1);
    }

    #[test]
    fn test_frame_dt_scales_turning() {
        let mut session = Session::new(3, Tuning::default());
        let mut controls = Controls::default();
        session.start();
        controls.direct.turn_right = true;

        // First frame after start uses dt = 1
        session.frame(1000.0, &mut controls);
        assert!((session.state().player.angle - 0.06).abs() < 0.0001);

        // Two reference frames later
        session.frame(1000.0 + 2.0 * FRAME_MS, &mut controls);
        assert!((session.state().player.angle - 0.18).abs() < 0.0001);

        // A long stall is clamped
        session.frame(60_000.0, &mut controls);
        let expected = 0.18 + 0.06 * MAX_FRAME_DT;
        assert!((session.state().player.angle - expected).abs() < 0.0001);
    }

    #[test]
    fn test_summary_labels() {
        let mut session = Session::new(4, Tuning::default());
        let mut controls = Controls::default();
        assert_eq!(session.summary(0.0).state, StateLabel::Ready);

        session.start();
        controls.direct.ghost_pressed = true;
        controls.direct.boost = true;
        let hud = session.frame(100.0, &mut controls);
        assert_eq!(hud.effects, vec!["Ghost".to_string(), "Boost".to_string()]);

        // Wall clock ran out even though no tick has expired it yet
        let hud = session.summary(2100.0);
        assert_eq!(hud.effects, vec!["Boost".to_string()]);

        session.end_game(HitSource::Mine);
        let hud = session.summary(2200.0);
        assert_eq!(hud.state, StateLabel::Ended);
        assert_eq!(hud.end_reason, Some(HitSource::Mine));
        assert!(hud.effects.is_empty());
    }

    #[test]
    fn test_reset_gives_new_seed() {
        let mut session = Session::new(77, Tuning::default());
        let first = session.state().seed;
        session.reset();
        assert_ne!(session.state().seed, first);
    }

    #[test]
    fn test_snapshot_json() {
        let session = Session::new(8, Tuning::default());
        let json = session.snapshot_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["score"], 0);
        assert_eq!(value["phase"], "Ready");
        assert!(value["player"]["trail"].is_array());
        assert!(value.get("rng").is_none());
        assert_eq!(value["orbs"], serde_json::json!([]));
    }

    #[test]
    fn test_snapshot_carries_orbs() {
        let mut session = Session::new(9, Tuning::default());
        let mut controls = Controls::default();
        session.start();
        session.state_mut().score = 9;
        for frame in 0..20 {
            session.frame(frame as f64 * FRAME_MS, &mut controls);
        }
        assert!(session.state().player.trail.len() >= 5);

        let json = session.snapshot_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let orbs = value["orbs"].as_array().unwrap();
        assert_eq!(orbs.len(), 6);
        assert_eq!(orbs.len(), session.state().orb_points().len());
        assert!(orbs[0].as_array().is_some_and(|xy| xy.len() == 2));
    }

    #[test]
    fn test_reset_waits_for_start() {
        let mut session = Session::new(10, Tuning::default());
        let mut controls = Controls::default();
        session.start();
        session.frame(0.0, &mut controls);
        session.frame(FRAME_MS, &mut controls);

        session.reset();
        let hud = session.frame(2.0 * FRAME_MS, &mut controls);
        assert_eq!(hud.state, StateLabel::Ready);
        assert_eq!(session.state().time_ticks, 0);
        assert!(session.state().player.trail.is_empty());

        session.start();
        session.frame(3.0 * FRAME_MS, &mut controls);
        assert_eq!(session.state().time_ticks, 1);
    }

    #[test]
    fn test_reset_discards_active_ghost() {
        let mut session = Session::new(11, Tuning::default());
        let mut controls = Controls::default();
        session.start();
        controls.direct.ghost_pressed = true;
        session.frame(0.0, &mut controls);
        assert!(session.state().player.ghost);

        session.reset();
        session.start();
        // Still inside the old ghost window
        let hud = session.frame(500.0, &mut controls);
        assert!(!session.state().player.ghost);
        assert_eq!(session.state().player.ghost_until_ms, None);
        assert!(!hud.effects.contains(&"Ghost".to_string()));
    }
}
