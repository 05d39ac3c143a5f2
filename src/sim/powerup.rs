//! Falling powerups, the powerup catalog, and laser projectiles
//!
//! Catalog entries are static configuration; a spawned pickup carries only a
//! reference to its kind plus the narrow set of display fields copied at
//! spawn time. Random selection takes the RNG explicitly so drops are
//! reproducible under a fixed seed.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::geom::Rect;
use crate::sim::paddle::Paddle;

/// Powerup catalog keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    // Positive
    ExtraLife,
    MultiBall,
    WidePaddle,
    Magnet,
    Fireball,
    Laser,
    SlowBall,
    SplitPaddle,
    // Negative
    ShrinkPaddle,
    FastBall,
    InvertControls,
}

/// Static catalog entry for a powerup kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerupSpec {
    pub kind: PowerupKind,
    /// Display color, RGB
    pub color: [u8; 3],
    /// Single glyph shown on the falling capsule
    pub symbol: char,
    pub positive: bool,
    /// Relative drop weight within the catalog
    pub weight: u32,
}

/// The full powerup catalog, read-only configuration
pub const CATALOG: &[PowerupSpec] = &[
    PowerupSpec { kind: PowerupKind::ExtraLife, color: [255, 80, 120], symbol: '+', positive: true, weight: 3 },
    PowerupSpec { kind: PowerupKind::MultiBall, color: [80, 200, 255], symbol: 'M', positive: true, weight: 10 },
    PowerupSpec { kind: PowerupKind::WidePaddle, color: [120, 255, 120], symbol: 'W', positive: true, weight: 12 },
    PowerupSpec { kind: PowerupKind::Magnet, color: [200, 120, 255], symbol: 'G', positive: true, weight: 8 },
    PowerupSpec { kind: PowerupKind::Fireball, color: [255, 140, 40], symbol: 'F', positive: true, weight: 7 },
    PowerupSpec { kind: PowerupKind::Laser, color: [255, 60, 60], symbol: 'L', positive: true, weight: 8 },
    PowerupSpec { kind: PowerupKind::SlowBall, color: [140, 200, 200], symbol: 'S', positive: true, weight: 9 },
    PowerupSpec { kind: PowerupKind::SplitPaddle, color: [255, 220, 80], symbol: '=', positive: true, weight: 6 },
    PowerupSpec { kind: PowerupKind::ShrinkPaddle, color: [120, 120, 120], symbol: 'w', positive: false, weight: 6 },
    PowerupSpec { kind: PowerupKind::FastBall, color: [255, 100, 0], symbol: 'f', positive: false, weight: 6 },
    PowerupSpec { kind: PowerupKind::InvertControls, color: [180, 60, 180], symbol: '?', positive: false, weight: 5 },
];

impl PowerupKind {
    /// Catalog entry for this kind
    pub fn spec(&self) -> &'static PowerupSpec {
        // The catalog covers every variant; fall back to the first entry
        // rather than panicking if it ever doesn't.
        CATALOG
            .iter()
            .find(|s| s.kind == *self)
            .unwrap_or(&CATALOG[0])
    }

    /// Instant powerups apply once and never enter the timed stack ledger
    pub fn is_instant(&self) -> bool {
        matches!(self, PowerupKind::ExtraLife | PowerupKind::MultiBall)
    }
}

/// Weighted random pick from the catalog.
///
/// `filter` narrows the candidate set (e.g. positive-only). When nothing
/// passes the filter the most common eligible entry of the whole catalog is
/// returned, so selection always yields a defined kind.
pub fn pick_powerup(rng: &mut Pcg32, filter: impl Fn(&PowerupSpec) -> bool) -> PowerupKind {
    let candidates: Vec<&PowerupSpec> = CATALOG.iter().filter(|s| filter(s)).collect();

    let pool: &[&PowerupSpec] = if candidates.is_empty() {
        // Defined fallback: the single most common catalog entry
        return CATALOG
            .iter()
            .max_by_key(|s| s.weight)
            .map(|s| s.kind)
            .unwrap_or(PowerupKind::WidePaddle);
    } else {
        &candidates
    };

    let total: u32 = pool.iter().map(|s| s.weight).sum();
    let mut roll = rng.random_range(0..total.max(1));
    for spec in pool {
        if roll < spec.weight {
            return spec.kind;
        }
        roll -= spec.weight;
    }
    pool[pool.len() - 1].kind
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub size: f32,
    // Display fields copied from the catalog at spawn
    pub color: [u8; 3],
    pub symbol: char,
    pub positive: bool,
}

impl Powerup {
    /// Spawn a pickup of `kind` centered at `pos`
    pub fn spawn(kind: PowerupKind, pos: Vec2) -> Self {
        let spec = kind.spec();
        Self {
            kind,
            pos,
            size: POWERUP_SIZE,
            color: spec.color,
            symbol: spec.symbol,
            positive: spec.positive,
        }
    }

    fn rect(&self) -> Rect {
        Rect::new(
            self.pos.x - self.size / 2.0,
            self.pos.y - self.size / 2.0,
            self.size,
            self.size,
        )
    }
}

/// Result of one powerup sweep
#[derive(Debug, Clone, Default)]
pub struct PowerupSweep {
    pub collected: Vec<PowerupKind>,
    pub missed: Vec<PowerupKind>,
}

/// Advance falling powerups one frame: collect on paddle overlap (split
/// child included), drop those leaving the bottom bound, keep the rest.
/// Single pass; `powerups` retains only the survivors.
pub fn update_powerups(
    powerups: &mut Vec<Powerup>,
    paddle: &Paddle,
    field_h: f32,
    dt: f32,
) -> PowerupSweep {
    let mut sweep = PowerupSweep::default();
    let paddle_rect = paddle.rect();
    let split_rect = paddle.split_rect();

    powerups.retain_mut(|p| {
        p.pos.y += POWERUP_FALL_SPEED * dt;

        let caught = p.rect().overlaps(&paddle_rect)
            || split_rect.as_ref().is_some_and(|r| p.rect().overlaps(r));
        if caught {
            sweep.collected.push(p.kind);
            return false;
        }
        if p.pos.y - p.size / 2.0 > field_h {
            sweep.missed.push(p.kind);
            return false;
        }
        true
    });

    sweep
}

/// An upward-moving laser projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub pos: Vec2,
    pub w: f32,
    pub h: f32,
}

impl Laser {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x - self.w / 2.0, self.pos.y, self.w, self.h)
    }
}

/// Fire a symmetric laser pair from the paddle edges.
///
/// Refuses (`None`) when the active laser count is at or above `cap`, or
/// when fired within `cooldown_ms` of `last_fire_ms` unless `force` is set.
pub fn fire_lasers(
    paddle: &Paddle,
    active_count: usize,
    cap: usize,
    last_fire_ms: u64,
    cooldown_ms: u64,
    now_ms: u64,
    force: bool,
) -> Option<[Laser; 2]> {
    if active_count >= cap {
        return None;
    }
    if !force && now_ms.saturating_sub(last_fire_ms) < cooldown_ms {
        return None;
    }

    let y = paddle.pos.y - LASER_HEIGHT;
    let make = |x: f32| Laser { pos: Vec2::new(x, y), w: LASER_WIDTH, h: LASER_HEIGHT };
    Some([
        make(paddle.pos.x + LASER_EDGE_OFFSET),
        make(paddle.pos.x + paddle.width - LASER_EDGE_OFFSET),
    ])
}

/// Move lasers upward, dropping any that left the top bound
pub fn update_lasers(lasers: &mut Vec<Laser>, dt: f32) {
    lasers.retain_mut(|l| {
        l.pos.y -= LASER_SPEED * dt;
        l.pos.y + l.h > 0.0
    });
}
