//! Particle and screen-effect pools, ball trails
//!
//! All pools are fixed capacity, allocated once per game. "Allocating" a
//! record means reclaiming the first inactive slot; under saturation slot 0
//! is reused. The backing store never grows, so steady-state play performs
//! no per-frame allocation.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Decaying scalars snap to zero below this to avoid asymptotic flicker
const SNAP_THRESHOLD: f32 = 0.01;

/// Particle render shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParticleShape {
    #[default]
    Square,
    Circle,
    Spark,
}

/// A pool-allocated particle record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub active: bool,
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [u8; 3],
    pub size: f32,
    /// Remaining life in [0, 1]
    pub life: f32,
    /// Life lost per second
    pub decay: f32,
    pub shape: ParticleShape,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            active: false,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            color: [255, 255, 255],
            size: 4.0,
            life: 0.0,
            decay: 1.5,
            shape: ParticleShape::Square,
        }
    }
}

/// Caller-supplied overrides for a spawned particle
#[derive(Debug, Clone)]
pub struct ParticleInit {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [u8; 3],
    pub size: f32,
    pub decay: f32,
    pub shape: ParticleShape,
}

/// Fixed-capacity particle pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    pub active_count: usize,
}

impl ParticlePool {
    /// Allocate the backing store once; it never grows afterwards
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::default(); capacity.max(1)],
            active_count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Reinitialize the first inactive slot with `init`, reclaiming slot 0
    /// when the pool is saturated. Returns the slot index used.
    pub fn spawn(&mut self, init: ParticleInit) -> usize {
        let idx = self
            .slots
            .iter()
            .position(|p| !p.active)
            .unwrap_or(0);
        let was_active = self.slots[idx].active;
        self.slots[idx] = Particle {
            active: true,
            pos: init.pos,
            vel: init.vel,
            color: init.color,
            size: init.size,
            life: 1.0,
            decay: init.decay.max(0.01),
            shape: init.shape,
        };
        if !was_active {
            self.active_count += 1;
        }
        idx
    }

    /// Advance every active particle and recompute the active count
    pub fn update(&mut self, dt: f32) {
        let mut active = 0;
        for p in self.slots.iter_mut() {
            if !p.active {
                continue;
            }
            p.pos += p.vel * dt;
            p.vel *= 0.98;
            p.life -= p.decay * dt;
            p.size *= 0.995;
            if p.life <= 0.0 {
                p.active = false;
            } else {
                active += 1;
            }
        }
        self.active_count = active;
    }

    /// Iterate active particles (render snapshot)
    pub fn iter_active(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().filter(|p| p.active)
    }

    /// Deactivate every slot (level reset)
    pub fn clear(&mut self) {
        for p in self.slots.iter_mut() {
            p.active = false;
        }
        self.active_count = 0;
    }
}

/// Full-screen effect variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScreenEffectKind {
    #[default]
    Flash,
    Shockwave,
}

/// A pool-allocated screen effect
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenEffect {
    pub active: bool,
    pub kind: ScreenEffectKind,
    pub pos: Vec2,
    /// Seconds the effect lasts
    pub duration: f32,
    pub age: f32,
}

/// Fixed-capacity screen-effect pool; same reclaim rules as the particles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenEffectPool {
    slots: Vec<ScreenEffect>,
    pub active_count: usize,
}

impl ScreenEffectPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![ScreenEffect::default(); capacity.max(1)],
            active_count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn spawn(&mut self, kind: ScreenEffectKind, pos: Vec2, duration: f32) -> usize {
        let idx = self
            .slots
            .iter()
            .position(|e| !e.active)
            .unwrap_or(0);
        let was_active = self.slots[idx].active;
        self.slots[idx] = ScreenEffect {
            active: true,
            kind,
            pos,
            duration: duration.max(0.01),
            age: 0.0,
        };
        if !was_active {
            self.active_count += 1;
        }
        idx
    }

    pub fn update(&mut self, dt: f32) {
        let mut active = 0;
        for e in self.slots.iter_mut() {
            if !e.active {
                continue;
            }
            e.age += dt;
            if e.age >= e.duration {
                e.active = false;
            } else {
                active += 1;
            }
        }
        self.active_count = active;
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &ScreenEffect> {
        self.slots.iter().filter(|e| e.active)
    }

    pub fn clear(&mut self) {
        for e in self.slots.iter_mut() {
            e.active = false;
        }
        self.active_count = 0;
    }
}

/// Bounded ring buffer of recent positions for one ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail {
    points: Vec<Vec2>,
    limit: usize,
}

impl Trail {
    fn new(limit: usize) -> Self {
        Self {
            points: Vec::with_capacity(limit),
            limit: limit.max(1),
        }
    }

    fn record(&mut self, pos: Vec2) {
        self.points.insert(0, pos);
        self.points.truncate(self.limit);
    }

    /// Newest first
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
}

/// All visual-effect state for one game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxState {
    pub particles: ParticlePool,
    pub effects: ScreenEffectPool,
    /// Decaying paddle-impact glow
    pub paddle_flash: f32,
    /// Decaying combo-multiplier glow
    pub combo_glow: f32,
    trails: HashMap<u32, Trail>,
    trail_length: usize,
}

impl FxState {
    pub fn new(particle_capacity: usize, effect_capacity: usize, trail_length: usize) -> Self {
        Self {
            particles: ParticlePool::new(particle_capacity),
            effects: ScreenEffectPool::new(effect_capacity),
            paddle_flash: 0.0,
            combo_glow: 0.0,
            trails: HashMap::new(),
            trail_length,
        }
    }

    /// Append a trail point for a ball id, creating the ring buffer on first
    /// sight of the id
    pub fn record_trail(&mut self, ball_id: u32, pos: Vec2) {
        self.trails
            .entry(ball_id)
            .or_insert_with(|| Trail::new(self.trail_length))
            .record(pos);
    }

    pub fn trail(&self, ball_id: u32) -> Option<&Trail> {
        self.trails.get(&ball_id)
    }

    /// Drop trail state for a destroyed ball
    pub fn remove_ball_trail(&mut self, ball_id: u32) {
        self.trails.remove(&ball_id);
    }

    /// Drop all trails (level reset)
    pub fn clear_ball_trails(&mut self) {
        self.trails.clear();
    }

    /// Advance pools and fade the global scalars, snapping to zero below
    /// the flicker threshold
    pub fn update(&mut self, dt: f32) {
        self.particles.update(dt);
        self.effects.update(dt);

        self.paddle_flash *= 0.9;
        if self.paddle_flash < SNAP_THRESHOLD {
            self.paddle_flash = 0.0;
        }
        self.combo_glow *= 0.95;
        if self.combo_glow < SNAP_THRESHOLD {
            self.combo_glow = 0.0;
        }
    }

    /// Full reset, keeping pool capacities
    pub fn reset(&mut self) {
        self.particles.clear();
        self.effects.clear();
        self.clear_ball_trails();
        self.paddle_flash = 0.0;
        self.combo_glow = 0.0;
    }
}

/// Spawn a burst of particles radiating from a point
pub fn spawn_burst(
    pool: &mut ParticlePool,
    center: Vec2,
    color: [u8; 3],
    count: usize,
    shape: ParticleShape,
    rng: &mut rand_pcg::Pcg32,
) {
    use rand::Rng;
    for _ in 0..count {
        let angle: f32 = rng.random_range(0.0..std::f32::consts::TAU);
        let speed: f32 = rng.random_range(60.0..220.0);
        pool.spawn(ParticleInit {
            pos: center,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            color,
            size: rng.random_range(3.0..8.0),
            decay: rng.random_range(1.2..2.2),
            shape,
        });
    }
}
