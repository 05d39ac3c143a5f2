//! Headless demo driver
//!
//! Seeds a game, drives frames at the fixed cadence with a simple
//! ball-tracking paddle, logs the events each frame emits, and prints the
//! final score record as JSON. Useful for balance tuning and for eyeballing
//! determinism: the same arguments always print the same record.
//!
//! Usage: `brick-core [seed] [mode] [max-frames]`

use brick_core::consts::*;
use brick_core::sim::{advance, FrameInput, GameEvent, GamePhase, GameState, KeySet};
use brick_core::tuning::{GameMode, Tuning};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xB121C);
    let mode = args
        .next()
        .and_then(|s| GameMode::from_str(&s))
        .unwrap_or_default();
    let max_frames: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(36_000); // ten minutes of play

    log::info!("seed {seed}, mode {}, up to {max_frames} frames", mode.as_str());

    let mut state = GameState::new(seed, Tuning::for_mode(mode));
    let frame_ms = (SIM_DT * 1000.0) as u64;

    for frame in 0..max_frames {
        let input = FrameInput {
            keys: track_ball(&state),
            mouse_x: None,
            touch_x: None,
            now_ms: frame * frame_ms,
        };

        for event in advance(&mut state, &input) {
            match event {
                GameEvent::BrickDestroyed { kind, score } => {
                    log::debug!("destroyed {kind:?} for {score}");
                }
                GameEvent::LevelComplete { level, perfect } => {
                    log::info!("level {level} complete (perfect: {perfect})");
                }
                GameEvent::LifeLost => {
                    log::info!("life lost, {} remaining", state.ledger.lives);
                }
                other => log::trace!("{other:?}"),
            }
        }

        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    let label = format!("level {}", state.level_index + 1);
    let record = state.score_record(&label);
    match serde_json::to_string_pretty(&record) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to serialize score record: {err}"),
    }
}

/// Keyboard-only paddle control that chases the lowest free ball
fn track_ball(state: &GameState) -> KeySet {
    let mut keys = KeySet {
        launch: state.phase == GamePhase::Serve,
        fire: true,
        ..KeySet::default()
    };

    let target = state
        .balls
        .iter()
        .filter(|b| !b.stuck)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|b| b.pos.x)
        .unwrap_or(FIELD_WIDTH / 2.0);

    let center = state.paddle.center_x();
    let dead_zone = state.paddle.width * 0.2;
    if target < center - dead_zone {
        keys.left = true;
    } else if target > center + dead_zone {
        keys.right = true;
    }
    keys
}
