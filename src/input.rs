//! Input merging
//!
//! Two sources feed the serpent: direct keyboard/touch state and an optional
//! head-tracking feed (normalized yaw plus brow/squint gestures). `Controls`
//! holds both and resolves them into one `TickInput` per tick.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Raw yaw below this magnitude is treated as noise
pub const HEAD_DEAD_ZONE: f32 = 0.01;
/// Raw yaw that maps to a full turn
pub const HEAD_MAX_YAW: f32 = 0.08;
/// Turn gain applied to the normalized yaw
pub const HEAD_SENSITIVITY: f32 = 1.2;
/// Minimum gap between two squint pulses
pub const SQUINT_INTERVAL_MS: f64 = 700.0;

/// Which source steers the serpent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    #[default]
    Keyboard,
    Head,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Keyboard => "keyboard",
            ControlMode::Head => "head",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ControlMode::Keyboard => ControlMode::Head,
            ControlMode::Head => ControlMode::Keyboard,
        }
    }
}

impl FromStr for ControlMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keyboard" | "keys" | "touch" => Ok(ControlMode::Keyboard),
            "head" | "face" => Ok(ControlMode::Head),
            other => Err(format!("unknown control mode: {other}")),
        }
    }
}

/// Keyboard and touch-button state
#[derive(Debug, Clone, Default)]
pub struct DirectInput {
    pub turn_left: bool,
    pub turn_right: bool,
    pub boost: bool,
    /// Ghost key held (fires whenever ghost becomes available)
    pub ghost_held: bool,
    /// Ghost button tapped since the last tick
    pub ghost_pressed: bool,
    /// Pause toggle requested since the last frame
    pub pause_pressed: bool,
}

impl DirectInput {
    /// Apply a key press by `KeyboardEvent.code`. Returns true if the key is bound.
    pub fn key_down(&mut self, code: &str) -> bool {
        match code {
            "KeyA" | "ArrowLeft" => self.turn_left = true,
            "KeyD" | "ArrowRight" => self.turn_right = true,
            "KeyE" => self.boost = true,
            "KeyQ" => self.ghost_held = true,
            "KeyP" => self.pause_pressed = true,
            _ => return false,
        }
        true
    }

    /// Apply a key release by `KeyboardEvent.code`
    pub fn key_up(&mut self, code: &str) -> bool {
        match code {
            "KeyA" | "ArrowLeft" => self.turn_left = false,
            "KeyD" | "ArrowRight" => self.turn_right = false,
            "KeyE" => self.boost = false,
            "KeyQ" => self.ghost_held = false,
            "KeyP" => {}
            _ => return false,
        }
        true
    }

    /// Release everything held (focus loss)
    pub fn release_all(&mut self) {
        self.turn_left = false;
        self.turn_right = false;
        self.boost = false;
        self.ghost_held = false;
    }

    /// -1, 0 or 1
    pub fn turn(&self) -> f32 {
        let mut turn = 0.0;
        if self.turn_left {
            turn -= 1.0;
        }
        if self.turn_right {
            turn += 1.0;
        }
        turn
    }
}

/// Latest reading from the head-tracking adapter
#[derive(Debug, Clone, Default)]
pub struct HeadSignal {
    /// Normalized yaw in [-1, 1], dead zone already applied
    pub yaw: f32,
    /// Eyebrows raised (boost, held)
    pub brow_raised: bool,
    /// Squint pulse pending (ghost, one-shot)
    pub squint: bool,
    last_squint_ms: Option<f64>,
}

impl HeadSignal {
    /// Map a raw yaw reading (nose offset from the eye midpoint) to [-1, 1]
    pub fn normalize_yaw(raw: f32) -> f32 {
        if !raw.is_finite() || raw.abs() <= HEAD_DEAD_ZONE {
            return 0.0;
        }
        (raw / HEAD_MAX_YAW).clamp(-1.0, 1.0)
    }

    pub fn set_raw_yaw(&mut self, raw: f32) {
        self.yaw = Self::normalize_yaw(raw);
    }

    /// Register a detected squint. Pulses closer than `SQUINT_INTERVAL_MS` to
    /// the last accepted one are dropped. Returns true if accepted.
    pub fn squint_detected(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_squint_ms {
            if now_ms - last <= SQUINT_INTERVAL_MS {
                return false;
            }
        }
        self.last_squint_ms = Some(now_ms);
        self.squint = true;
        true
    }
}

/// All input sources plus the active control mode
#[derive(Debug, Clone)]
pub struct Controls {
    pub mode: ControlMode,
    pub direct: DirectInput,
    pub head: HeadSignal,
    /// Turn gain in head mode
    pub head_sensitivity: f32,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(ControlMode::default())
    }
}

impl Controls {
    pub fn new(mode: ControlMode) -> Self {
        Self {
            mode,
            direct: DirectInput::default(),
            head: HeadSignal::default(),
            head_sensitivity: HEAD_SENSITIVITY,
        }
    }

    pub fn toggle_mode(&mut self) -> ControlMode {
        self.mode = self.mode.toggled();
        log::info!("Control mode: {}", self.mode.as_str());
        self.mode
    }

    /// Take a pending pause toggle
    pub fn take_pause(&mut self) -> bool {
        std::mem::take(&mut self.direct.pause_pressed)
    }

    /// Merge all sources into this tick's control signals, consuming one-shot
    /// triggers.
    pub fn resolve(&mut self, now_ms: f64) -> TickInput {
        let head_mode = self.mode == ControlMode::Head;

        let turn = if head_mode {
            self.head.yaw * self.head_sensitivity
        } else {
            self.direct.turn()
        };

        let boost = self.direct.boost || (head_mode && self.head.brow_raised);

        let button = std::mem::take(&mut self.direct.ghost_pressed);
        let squint = std::mem::take(&mut self.head.squint);
        let ghost = self.direct.ghost_held || button || (head_mode && squint);

        TickInput {
            turn,
            boost,
            ghost,
            now_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_map() {
        let mut direct = DirectInput::default();
        assert!(direct.key_down("KeyA"));
        assert_eq!(direct.turn(), -1.0);
        assert!(direct.key_down("ArrowRight"));
        assert_eq!(direct.turn(), 0.0);
        assert!(direct.key_up("KeyA"));
        assert_eq!(direct.turn(), 1.0);
        assert!(!direct.key_down("KeyZ"));

        direct.key_down("KeyE");
        direct.release_all();
        assert!(!direct.boost);
        assert_eq!(direct.turn(), 0.0);
    }

    #[test]
    fn test_normalize_yaw() {
        assert_eq!(HeadSignal::normalize_yaw(0.005), 0.0);
        assert_eq!(HeadSignal::normalize_yaw(-0.01), 0.0);
        assert!((HeadSignal::normalize_yaw(0.04) - 0.5).abs() < 0.0001);
        assert_eq!(HeadSignal::normalize_yaw(0.2), 1.0);
        assert_eq!(HeadSignal::normalize_yaw(-0.2), -1.0);
        assert_eq!(HeadSignal::normalize_yaw(f32::NAN), 0.0);
    }

    #[test]
    fn test_squint_rate_limited() {
        let mut head = HeadSignal::default();
        assert!(head.squint_detected(1000.0));
        assert!(!head.squint_detected(1500.0));
        assert!(!head.squint_detected(1700.0));
        assert!(head.squint_detected(1701.0));
    }

    #[test]
    fn test_keyboard_mode_ignores_head() {
        let mut controls = Controls::new(ControlMode::Keyboard);
        controls.head.yaw = 1.0;
        controls.head.brow_raised = true;
        controls.head.squint_detected(0.0);

        let input = controls.resolve(10.0);
        assert_eq!(input.turn, 0.0);
        assert!(!input.boost);
        assert!(!input.ghost);
        assert_eq!(input.now_ms, 10.0);
    }

    #[test]
    fn test_head_mode_merges_sources() {
        let mut controls = Controls::new(ControlMode::Head);
        controls.direct.turn_left = true;
        controls.head.yaw = 0.5;

        let input = controls.resolve(0.0);
        // Keys don't steer in head mode
        assert!((input.turn - 0.6).abs() < 0.0001);
        assert!(!input.boost);

        // Key boost works in any mode
        controls.direct.boost = true;
        assert!(controls.resolve(0.0).boost);
        controls.direct.boost = false;
        controls.head.brow_raised = true;
        assert!(controls.resolve(0.0).boost);

        controls.head.squint_detected(0.0);
        assert!(controls.resolve(0.0).ghost);
        // Pulse is consumed
        assert!(!controls.resolve(0.0).ghost);
    }

    #[test]
    fn test_one_shots_consumed() {
        let mut controls = Controls::default();
        controls.direct.ghost_pressed = true;
        controls.direct.key_down("KeyP");

        assert!(controls.resolve(0.0).ghost);
        assert!(!controls.resolve(0.0).ghost);
        assert!(controls.take_pause());
        assert!(!controls.take_pause());

        controls.direct.key_down("KeyQ");
        assert!(controls.resolve(0.0).ghost);
        assert!(controls.resolve(0.0).ghost);
    }

    #[test]
    fn test_mode_parse_and_toggle() {
        assert_eq!("Head".parse::<ControlMode>(), Ok(ControlMode::Head));
        assert_eq!("keyboard".parse::<ControlMode>(), Ok(ControlMode::Keyboard));
        assert!("joystick".parse::<ControlMode>().is_err());

        let mut controls = Controls::default();
        assert_eq!(controls.toggle_mode(), ControlMode::Head);
        assert_eq!(controls.toggle_mode(), ControlMode::Keyboard);
    }
}
