//! Brick Core - deterministic simulation core for an arcade brick-breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision kernel, entities, game state)
//! - `levels`: Static level/pattern tables consumed as read-only configuration
//! - `tuning`: Data-driven game balance knobs
//! - `highscores`: Score ledger handoff and local leaderboard
//! - `quotes`: Flavor-text decks drawn without repeats
//!
//! Rendering, audio, haptics and input capture are external collaborators:
//! they feed [`sim::FrameInput`] in and react to the [`sim::GameEvent`] list
//! that each frame advance returns.

pub mod highscores;
pub mod levels;
pub mod quotes;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScores, ScoreRecord};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 110.0;
    pub const PADDLE_HEIGHT: f32 = 16.0;
    /// Distance from the bottom bound to the paddle top
    pub const PADDLE_BOTTOM_MARGIN: f32 = 40.0;
    /// Keyboard paddle speed, pixels per second
    pub const PADDLE_SPEED: f32 = 620.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_BASE_SPEED: f32 = 320.0;

    /// Minimum bounce angle off the paddle, measured from horizontal.
    /// Prevents near-horizontal, unrecoverable trajectories.
    pub const MIN_BOUNCE_ANGLE: f32 = std::f32::consts::PI / 6.0;

    /// Brick grid defaults
    pub const BRICK_WIDTH: f32 = 70.0;
    pub const BRICK_HEIGHT: f32 = 24.0;
    pub const BRICK_PADDING: f32 = 6.0;
    pub const BRICK_TOP_OFFSET: f32 = 60.0;

    /// Falling powerup defaults
    pub const POWERUP_SIZE: f32 = 22.0;
    pub const POWERUP_FALL_SPEED: f32 = 130.0;

    /// Laser projectile defaults
    pub const LASER_WIDTH: f32 = 4.0;
    pub const LASER_HEIGHT: f32 = 14.0;
    pub const LASER_SPEED: f32 = 540.0;
    /// Horizontal inset of the laser pair from the paddle edges
    pub const LASER_EDGE_OFFSET: f32 = 8.0;
}

/// Clamp a value into `[lo, hi]`, degrading to `lo` on inverted bounds
/// instead of panicking.
#[inline]
pub fn clamp_range(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi { lo } else { value.clamp(lo, hi) }
}
