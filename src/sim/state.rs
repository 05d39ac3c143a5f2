//! Game state and frame events
//!
//! One [`GameState`] owns everything a frame advance touches: entity lists,
//! the bookkeeping ledger, effect pools and the seeded RNG. There are no
//! process-wide statics; callers construct a state and pass it by reference
//! into [`crate::sim::advance`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::levels;
use crate::sim::ball::{Ball, Wall};
use crate::sim::brick::{Brick, BrickKind};
use crate::sim::fx::FxState;
use crate::sim::ledger::Ledger;
use crate::sim::paddle::Paddle;
use crate::sim::powerup::{Laser, Powerup, PowerupKind};
use crate::tuning::{GameMode, Tuning};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball stuck to paddle, waiting for launch input
    Serve,
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
}

/// Discrete per-frame events for the render/audio/haptics collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WallHit(Wall),
    PaddleHit,
    BallCaught,
    BrickHit { kind: BrickKind },
    BrickDestroyed { kind: BrickKind, score: u64 },
    PowerupCollected { kind: PowerupKind },
    PowerupMissed { kind: PowerupKind },
    PowerupExpired { kind: PowerupKind },
    LaserFired,
    MultiBallSplit { count: usize },
    BallLost,
    LifeLost,
    ExtraLife,
    LevelComplete { level: usize, perfect: bool },
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG, the only randomness source in the core
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// 0-based level index
    pub level_index: usize,
    /// Frame counter
    pub frame: u64,
    /// Last injected clock reading
    pub now_ms: u64,
    /// Clock reading when the run started
    pub started_ms: u64,

    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub powerups: Vec<Powerup>,
    pub lasers: Vec<Laser>,
    /// Timestamp of the last laser volley (cooldown reference)
    pub last_laser_ms: u64,

    pub ledger: Ledger,
    pub fx: FxState,

    next_ball_id: u32,
}

impl GameState {
    /// Create a fresh game at level 0 with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let ledger = Ledger::new(&tuning);
        let fx = FxState::new(
            tuning.particle_capacity,
            tuning.screen_effect_capacity,
            tuning.trail_length,
        );
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Serve,
            level_index: 0,
            frame: 0,
            now_ms: 0,
            started_ms: 0,
            paddle: Paddle::new(FIELD_WIDTH, FIELD_HEIGHT),
            balls: Vec::new(),
            bricks: Vec::new(),
            powerups: Vec::new(),
            lasers: Vec::new(),
            last_laser_ms: 0,
            ledger,
            fx,
            tuning,
            next_ball_id: 1,
        };
        state.load_level(0);
        state
    }

    /// Allocate a unique ball id
    pub fn next_ball_id(&mut self) -> u32 {
        let id = self.next_ball_id;
        self.next_ball_id += 1;
        id
    }

    /// Mutable access to the id counter for fan-out helpers
    pub(crate) fn ball_id_counter(&mut self) -> &mut u32 {
        &mut self.next_ball_id
    }

    /// Full state replacement for a level: new entity lists, cleared pools.
    /// Never a partial teardown.
    pub fn load_level(&mut self, index: usize) {
        let def = levels::level_def(index);
        log::info!("loading level {} (pattern {})", index, def.pattern);

        self.level_index = index;
        self.bricks = levels::build_bricks(&def, FIELD_WIDTH);
        self.powerups.clear();
        self.lasers.clear();
        self.balls.clear();
        self.fx.reset();
        self.ledger.begin_level();

        self.paddle = Paddle::new(FIELD_WIDTH, FIELD_HEIGHT);
        self.paddle
            .set_width_multiplier(self.tuning.mode.paddle_width_multiplier(), FIELD_WIDTH);

        let speed = BALL_BASE_SPEED * def.speed_scale;
        self.spawn_stuck_ball(speed);
        self.phase = GamePhase::Serve;
    }

    /// Spawn a ball resting on the paddle
    pub fn spawn_stuck_ball(&mut self, speed: f32) {
        let id = self.next_ball_id();
        let pos = Vec2::new(
            self.paddle.center_x(),
            self.paddle.pos.y - BALL_RADIUS,
        );
        let mut ball = Ball::new(id, pos);
        ball.base_speed = speed;
        ball.set_speed(speed);
        ball.stuck = true;
        if self.tuning.mode == GameMode::Doodle {
            ball.gravity = 420.0;
            ball.jump_force = 380.0;
        }
        self.balls.push(ball);
    }

    /// Keep stuck balls riding the paddle
    pub fn carry_stuck_balls(&mut self) {
        let x = self.paddle.center_x();
        let y = self.paddle.pos.y;
        for ball in self.balls.iter_mut().filter(|b| b.stuck) {
            ball.pos = Vec2::new(x, y - ball.radius);
        }
    }

    /// Whether every brick that counts has been destroyed
    pub fn level_cleared(&self) -> bool {
        self.bricks
            .iter()
            .filter(|b| b.kind.counts_for_clear())
            .all(|b| b.destroyed)
    }

    /// Elapsed play time against the injected clock
    pub fn elapsed_ms(&self) -> u64 {
        self.now_ms.saturating_sub(self.started_ms)
    }

    /// Final score handoff for the external storage collaborator
    pub fn score_record(&self, label: &str) -> crate::ScoreRecord {
        crate::ScoreRecord {
            mode: self.tuning.mode.as_str().to_string(),
            label: label.to_string(),
            elapsed_ms: self.elapsed_ms(),
            score: self.ledger.score,
        }
    }
}
