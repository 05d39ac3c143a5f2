//! Data-driven game balance
//!
//! Every gameplay knob the simulation reads lives here so collaborators can
//! load or dump a balance profile as JSON without touching the core.

use serde::{Deserialize, Serialize};

/// Difficulty mode, affects lives and paddle width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    #[default]
    Normal,
    Easy,
    /// Gravity-and-jump variant; balls arc instead of flying straight
    Doodle,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Normal => "normal",
            GameMode::Easy => "easy",
            GameMode::Doodle => "doodle",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(GameMode::Normal),
            "easy" => Some(GameMode::Easy),
            "doodle" => Some(GameMode::Doodle),
            _ => None,
        }
    }

    /// Starting lives for this mode
    pub fn start_lives(&self) -> u32 {
        match self {
            GameMode::Easy => 5,
            _ => 3,
        }
    }

    /// Upper bound on lives for this mode
    pub fn max_lives(&self) -> u32 {
        match self {
            GameMode::Easy => 7,
            _ => 5,
        }
    }

    /// Paddle width multiplier applied on top of powerup modifiers
    pub fn paddle_width_multiplier(&self) -> f32 {
        match self {
            GameMode::Easy => 1.3,
            _ => 1.0,
        }
    }
}

/// Gameplay balance knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Difficulty mode
    pub mode: GameMode,

    // === Balls ===
    /// Hard cap on simultaneously active balls (multiball never exceeds it)
    pub max_balls: usize,
    /// Balls requested per multiball pickup
    pub multiball_count: usize,

    // === Powerups ===
    /// Drop roll chance on brick destruction, 0.0 - 1.0
    pub powerup_drop_chance: f32,
    /// Timed powerup duration in milliseconds
    pub powerup_duration_ms: u64,
    /// Max repeat-collection stacks per timed powerup
    pub powerup_max_stacks: u32,
    /// Magnet catches granted per magnet stack
    pub magnet_catches: u32,

    // === Lasers ===
    /// Max simultaneously active laser projectiles
    pub laser_cap: usize,
    /// Minimum milliseconds between laser volleys
    pub laser_cooldown_ms: u64,

    // === Scoring ===
    /// Multiplier ceiling
    pub max_multiplier: f32,
    /// Multiplier gained per brick destroyed
    pub multiplier_step: f32,
    /// Score milestone granting an extra life
    pub extra_life_step: u64,

    // === Effect pools ===
    /// Particle pool capacity (fixed at creation, never grows)
    pub particle_capacity: usize,
    /// Screen effect pool capacity
    pub screen_effect_capacity: usize,
    /// Trail points kept per ball
    pub trail_length: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            mode: GameMode::Normal,

            max_balls: 8,
            multiball_count: 2,

            powerup_drop_chance: 0.18,
            powerup_duration_ms: 10_000,
            powerup_max_stacks: 3,
            magnet_catches: 3,

            laser_cap: 6,
            laser_cooldown_ms: 300,

            max_multiplier: 5.0,
            multiplier_step: 0.25,
            extra_life_step: 10_000,

            particle_capacity: 256,
            screen_effect_capacity: 16,
            trail_length: 12,
        }
    }
}

impl Tuning {
    /// Tuning preset for a mode
    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}
