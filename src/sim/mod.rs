//! Deterministic simulation core
//!
//! Everything in here advances under a fixed timestep with an injected clock
//! and a seeded RNG owned by [`GameState`]. The same seed and the same
//! [`FrameInput`] sequence reproduce the same run bit for bit.

pub mod ball;
pub mod brick;
pub mod fx;
pub mod geom;
pub mod ledger;
pub mod paddle;
pub mod powerup;
pub mod resolve;
pub mod state;
pub mod tick;

pub use ball::{Ball, Wall};
pub use brick::{Brick, BrickKind};
pub use fx::FxState;
pub use geom::{ImpactAxis, Rect};
pub use ledger::Ledger;
pub use paddle::{Paddle, PaddleKeys};
pub use powerup::{Laser, Powerup, PowerupKind};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{advance, FrameInput, KeySet};
