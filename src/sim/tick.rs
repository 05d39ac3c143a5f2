//! Fixed-timestep frame advance
//!
//! One [`advance`] call consumes one [`FrameInput`] and returns the discrete
//! [`GameEvent`] list for that frame. The caller owns the clock: `now_ms` is
//! injected, never read from the wall. Single threaded; a call completes
//! before the next begins.
//!
//! Pipeline per playing frame: paddle -> moving bricks -> balls -> lasers ->
//! falling powerups -> collision resolution -> powerup expiry sweep ->
//! modifier sync -> ball loss / level clear -> fx decay.

use crate::consts::*;
use crate::levels;
use crate::sim::ball::create_multi_balls;
use crate::sim::brick::update_moving_bricks;
use crate::sim::paddle::PaddleKeys;
use crate::sim::powerup::{fire_lasers, update_lasers, update_powerups, PowerupKind};
use crate::sim::resolve::resolve_collisions;
use crate::sim::state::{GameEvent, GamePhase, GameState};

/// Paddle width gained per WidePaddle stack
const WIDE_STEP: f32 = 0.3;
/// Paddle width lost per ShrinkPaddle stack
const SHRINK_STEP: f32 = 0.2;
/// Floor on the combined width factor
const MIN_WIDTH_FACTOR: f32 = 0.4;
/// Ball speed factor per SlowBall stack
const SLOW_FACTOR: f32 = 0.75;
/// Ball speed factor per FastBall stack
const FAST_FACTOR: f32 = 1.25;

/// Button state sampled for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct KeySet {
    pub left: bool,
    pub right: bool,
    /// Laser trigger
    pub fire: bool,
    /// Releases stuck balls
    pub launch: bool,
}

/// Everything the simulation reads for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub keys: KeySet,
    pub mouse_x: Option<f32>,
    pub touch_x: Option<f32>,
    /// Injected monotonic clock, milliseconds
    pub now_ms: u64,
}

impl FrameInput {
    /// Idle input at a clock reading
    pub fn at(now_ms: u64) -> Self {
        Self {
            now_ms,
            ..Self::default()
        }
    }
}

/// Advance the simulation by one fixed step
pub fn advance(state: &mut GameState, input: &FrameInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.frame == 0 {
        state.started_ms = input.now_ms;
    }
    state.frame += 1;
    state.now_ms = input.now_ms;

    match state.phase {
        GamePhase::GameOver => {}
        GamePhase::Serve => {
            let keys = PaddleKeys {
                left: input.keys.left,
                right: input.keys.right,
            };
            state
                .paddle
                .update(keys, input.mouse_x, input.touch_x, FIELD_WIDTH, SIM_DT);

            // Falling powerups and lasers pause in Serve, but the ledger
            // clock does not: timed modifiers keep expiring while the player
            // waits, so the sweep runs here too.
            for kind in state.ledger.expired_powerups(input.now_ms) {
                events.push(GameEvent::PowerupExpired { kind });
            }
            sync_modifiers(state);
            state.carry_stuck_balls();

            if input.keys.launch {
                for ball in state.balls.iter_mut() {
                    ball.launch(&mut state.rng);
                }
                state.phase = GamePhase::Playing;
            }
            state.fx.update(SIM_DT);
        }
        GamePhase::Playing => playing_frame(state, input, &mut events),
    }

    events
}

fn playing_frame(state: &mut GameState, input: &FrameInput, events: &mut Vec<GameEvent>) {
    let keys = PaddleKeys {
        left: input.keys.left,
        right: input.keys.right,
    };
    state
        .paddle
        .update(keys, input.mouse_x, input.touch_x, FIELD_WIDTH, SIM_DT);
    state.carry_stuck_balls();

    // Magnet-caught balls relaunch on the same input that serves
    if input.keys.launch {
        for ball in state.balls.iter_mut().filter(|b| b.stuck) {
            ball.launch(&mut state.rng);
        }
    }

    update_moving_bricks(&mut state.bricks, FIELD_WIDTH, SIM_DT);

    for ball in state.balls.iter_mut() {
        ball.update_position(SIM_DT);
        state.fx.record_trail(ball.id, ball.pos);
    }

    // Lasers fire only while the powerup is active
    if input.keys.fire && state.ledger.is_active(PowerupKind::Laser) {
        let volley = fire_lasers(
            &state.paddle,
            state.lasers.len(),
            state.tuning.laser_cap,
            state.last_laser_ms,
            state.tuning.laser_cooldown_ms,
            input.now_ms,
            false,
        );
        if let Some(pair) = volley {
            state.lasers.extend(pair);
            state.last_laser_ms = input.now_ms;
            events.push(GameEvent::LaserFired);
        }
    }
    update_lasers(&mut state.lasers, SIM_DT);

    let sweep = update_powerups(&mut state.powerups, &state.paddle, FIELD_HEIGHT, SIM_DT);
    for kind in sweep.collected {
        apply_powerup(state, kind, events);
    }
    for kind in sweep.missed {
        events.push(GameEvent::PowerupMissed { kind });
    }

    resolve_collisions(state, events);

    for kind in state.ledger.expired_powerups(input.now_ms) {
        events.push(GameEvent::PowerupExpired { kind });
    }
    sync_modifiers(state);

    // Bottom exits are losses, not bounces
    let mut lost_ids = Vec::new();
    state.balls.retain(|b| {
        if b.is_out_of_bounds(FIELD_HEIGHT) {
            lost_ids.push(b.id);
            false
        } else {
            true
        }
    });
    for id in lost_ids {
        state.fx.remove_ball_trail(id);
        events.push(GameEvent::BallLost);
    }

    if state.balls.is_empty() {
        let game_over = state.ledger.lose_life();
        events.push(GameEvent::LifeLost);
        if game_over {
            state.phase = GamePhase::GameOver;
            events.push(GameEvent::GameOver);
            log::info!(
                "game over at level {} with score {}",
                state.level_index,
                state.ledger.score
            );
        } else {
            let speed = BALL_BASE_SPEED * levels::level_def(state.level_index).speed_scale;
            state.spawn_stuck_ball(speed);
            sync_modifiers(state);
            state.phase = GamePhase::Serve;
        }
    } else if state.level_cleared() {
        let perfect = state.ledger.perfect_level;
        events.push(GameEvent::LevelComplete {
            level: state.level_index,
            perfect,
        });
        state.load_level(state.level_index + 1);
    }

    state.fx.update(SIM_DT);
}

/// Apply one collected powerup: instants take effect immediately, timed
/// kinds go through the ledger and the modifier sync.
fn apply_powerup(state: &mut GameState, kind: PowerupKind, events: &mut Vec<GameEvent>) {
    events.push(GameEvent::PowerupCollected { kind });
    log::debug!("powerup collected: {kind:?}");

    match kind {
        PowerupKind::ExtraLife => {
            if state.ledger.gain_life() {
                events.push(GameEvent::ExtraLife);
            }
        }
        PowerupKind::MultiBall => {
            let source = state
                .balls
                .iter()
                .find(|b| !b.stuck)
                .or_else(|| state.balls.first())
                .cloned();
            if let Some(source) = source {
                let mut next_id = *state.ball_id_counter();
                let spawned = create_multi_balls(
                    &source,
                    state.tuning.multiball_count,
                    state.tuning.max_balls,
                    state.balls.len(),
                    &mut next_id,
                    &mut state.rng,
                );
                *state.ball_id_counter() = next_id;
                if !spawned.is_empty() {
                    events.push(GameEvent::MultiBallSplit {
                        count: spawned.len(),
                    });
                    state.balls.extend(spawned);
                }
            }
        }
        _ => {
            state
                .ledger
                .activate_powerup(kind, state.tuning.powerup_duration_ms, state.now_ms);
            if kind == PowerupKind::Magnet {
                // Re-collection tops the charges back up
                state.paddle.enable_magnet(state.tuning.magnet_catches);
            }
            sync_modifiers(state);
        }
    }
}

/// Re-derive every modifier from the ledger's active stacks. Runs after
/// collection and after the expiry sweep, so expiry restores baseline state
/// exactly (width from `base_width`, speed from `base_speed`).
fn sync_modifiers(state: &mut GameState) {
    let wide = state.ledger.stacks(PowerupKind::WidePaddle) as f32;
    let shrink = state.ledger.stacks(PowerupKind::ShrinkPaddle) as f32;
    let factor = ((1.0 + WIDE_STEP * wide) * (1.0 - SHRINK_STEP * shrink)).max(MIN_WIDTH_FACTOR);
    state.paddle.set_width_multiplier(
        state.tuning.mode.paddle_width_multiplier() * factor,
        FIELD_WIDTH,
    );

    if state.ledger.is_active(PowerupKind::SplitPaddle) {
        state.paddle.enable_split(FIELD_WIDTH);
    } else {
        state.paddle.disable_split(FIELD_WIDTH);
    }

    state.paddle.inverted_controls = state.ledger.is_active(PowerupKind::InvertControls);

    if !state.ledger.is_active(PowerupKind::Magnet) && state.paddle.has_magnet {
        state.paddle.disable_magnet();
    }

    let fireball = state.ledger.is_active(PowerupKind::Fireball);
    let slow = state.ledger.stacks(PowerupKind::SlowBall) as i32;
    let fast = state.ledger.stacks(PowerupKind::FastBall) as i32;
    let speed_factor = SLOW_FACTOR.powi(slow) * FAST_FACTOR.powi(fast);
    for ball in state.balls.iter_mut() {
        ball.fireball = fireball;
        let target = ball.base_speed * speed_factor;
        if (ball.speed - target).abs() > 0.001 {
            ball.set_speed(target);
        }
    }
}
