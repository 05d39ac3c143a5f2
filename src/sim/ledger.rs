//! Score / lives / multiplier / powerup-stack ledger
//!
//! The single source of truth the rest of the simulation reads. Only the
//! ledger mutates its own fields; the frame advance calls in here and
//! forwards the results as events.
//!
//! The one real state machine is the timed powerup lifecycle:
//! `inactive -> active(stacks=1)` on first collection, stacks clamp at the
//! configured max on re-collection (each refreshing the expiry), and an
//! explicit once-per-frame sweep retires expired entries atomically.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sim::powerup::PowerupKind;
use crate::tuning::Tuning;

/// Active timed powerup entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerupStack {
    /// Injected-clock timestamp at which the entry expires
    pub expiry_ms: u64,
    /// Repeat-collection count, always >= 1
    pub stacks: u32,
}

/// The bookkeeping ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub score: u64,
    pub lives: u32,
    pub multiplier: f32,
    /// Highest multiplier reached this run (achievement tracking)
    pub peak_multiplier: f32,
    /// True until the first life is lost this level
    pub perfect_level: bool,
    active: HashMap<PowerupKind, PowerupStack>,
    /// Last extra-life milestone paid out (`score / step` watermark)
    milestone: u64,

    // Bounds, copied from tuning at creation
    max_lives: u32,
    max_multiplier: f32,
    max_stacks: u32,
    milestone_step: u64,
}

impl Ledger {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.mode.start_lives(),
            multiplier: 1.0,
            peak_multiplier: 1.0,
            perfect_level: true,
            active: HashMap::new(),
            milestone: 0,
            max_lives: tuning.mode.max_lives(),
            max_multiplier: tuning.max_multiplier,
            max_stacks: tuning.powerup_max_stacks,
            milestone_step: tuning.extra_life_step,
        }
    }

    /// Award `floor(base * multiplier)` points; returns the amount added
    pub fn add_score(&mut self, base: u64) -> u64 {
        let awarded = (base as f32 * self.multiplier).floor() as u64;
        self.score += awarded;
        awarded
    }

    /// Raise the multiplier by one step, clamped to the configured ceiling
    pub fn increment_multiplier(&mut self, step: f32) {
        self.multiplier = (self.multiplier + step).min(self.max_multiplier);
        if self.multiplier > self.peak_multiplier {
            self.peak_multiplier = self.multiplier;
        }
    }

    /// Reset the multiplier to 1.0, recording the peak reached
    pub fn reset_multiplier(&mut self) {
        if self.multiplier > self.peak_multiplier {
            self.peak_multiplier = self.multiplier;
        }
        self.multiplier = 1.0;
    }

    /// Collect a timed powerup: first collection activates with one stack,
    /// re-collection clamps stacks at the max. Either way the expiry resets
    /// to `now + duration`.
    pub fn activate_powerup(&mut self, kind: PowerupKind, duration_ms: u64, now_ms: u64) {
        let expiry_ms = now_ms + duration_ms;
        self.active
            .entry(kind)
            .and_modify(|s| {
                s.stacks = (s.stacks + 1).min(self.max_stacks);
                s.expiry_ms = expiry_ms;
            })
            .or_insert(PowerupStack { expiry_ms, stacks: 1 });
    }

    /// Sweep out every newly-expired powerup, returning each key exactly
    /// once. An expired entry is removed, never left at zero stacks.
    pub fn expired_powerups(&mut self, now_ms: u64) -> Vec<PowerupKind> {
        let mut expired: Vec<PowerupKind> = self
            .active
            .iter()
            .filter(|(_, s)| now_ms >= s.expiry_ms)
            .map(|(k, _)| *k)
            .collect();
        // HashMap iteration order is unstable; sort for determinism
        expired.sort_by_key(|k| format!("{k:?}"));
        for kind in &expired {
            self.active.remove(kind);
        }
        expired
    }

    /// Whether a timed powerup is currently active
    pub fn is_active(&self, kind: PowerupKind) -> bool {
        self.active.contains_key(&kind)
    }

    /// Current stack count for a timed powerup (0 when inactive)
    pub fn stacks(&self, kind: PowerupKind) -> u32 {
        self.active.get(&kind).map(|s| s.stacks).unwrap_or(0)
    }

    /// Drop all timed powerups without emitting expiry (level reset)
    pub fn clear_powerups(&mut self) {
        self.active.clear();
    }

    /// Lose one life: clears the perfect-level flag, resets the multiplier,
    /// and returns whether lives reached zero (game over). Does not itself
    /// transition screens.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.perfect_level = false;
        self.reset_multiplier();
        self.lives == 0
    }

    /// Grant one life, bounded by the mode max; returns whether it took
    pub fn gain_life(&mut self) -> bool {
        if self.lives >= self.max_lives {
            return false;
        }
        self.lives += 1;
        true
    }

    /// Extra-life milestone check: grants one life the first time the score
    /// crosses each successive milestone. The watermark guarantees a
    /// milestone is never paid out twice.
    pub fn check_extra_life(&mut self) -> bool {
        if self.milestone_step == 0 {
            return false;
        }
        let reached = self.score / self.milestone_step;
        if reached > self.milestone {
            self.milestone = reached;
            return self.gain_life();
        }
        false
    }

    /// Mark the start of a fresh level attempt
    pub fn begin_level(&mut self) {
        self.perfect_level = true;
        self.clear_powerups();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> Ledger {
        Ledger::new(&Tuning::default())
    }

    #[test]
    fn test_add_score_floors_multiplied_base() {
        let mut l = ledger();
        l.multiplier = 1.5;
        let awarded = l.add_score(101);
        assert_eq!(awarded, 151); // floor(151.5)
        assert_eq!(l.score, 151);
    }

    #[test]
    fn test_multiplier_clamps_and_tracks_peak() {
        let mut l = ledger();
        for _ in 0..100 {
            l.increment_multiplier(0.25);
        }
        assert_eq!(l.multiplier, 5.0);
        l.reset_multiplier();
        assert_eq!(l.multiplier, 1.0);
        assert_eq!(l.peak_multiplier, 5.0);
    }

    #[test]
    fn test_powerup_stacking_clamps_and_refreshes_expiry() {
        let mut l = ledger();
        // Tighten the cap to 2 so the clamp is visible in three collections
        l.max_stacks = 2;

        l.activate_powerup(PowerupKind::Laser, 5000, 0);
        assert_eq!(l.stacks(PowerupKind::Laser), 1);

        l.activate_powerup(PowerupKind::Laser, 5000, 1000);
        assert_eq!(l.stacks(PowerupKind::Laser), 2);

        l.activate_powerup(PowerupKind::Laser, 5000, 2000);
        assert_eq!(l.stacks(PowerupKind::Laser), 2);

        // Third collection still refreshed the expiry to 2000 + 5000
        assert!(l.expired_powerups(6999).is_empty());
        assert_eq!(l.expired_powerups(7000), vec![PowerupKind::Laser]);
    }

    #[test]
    fn test_expiry_sweep_returns_each_key_once() {
        let mut l = ledger();
        l.activate_powerup(PowerupKind::Fireball, 1000, 0);
        let first = l.expired_powerups(1000);
        assert_eq!(first, vec![PowerupKind::Fireball]);
        // Entry is gone, never left at zero stacks
        assert!(l.expired_powerups(2000).is_empty());
        assert!(!l.is_active(PowerupKind::Fireball));
        assert_eq!(l.stacks(PowerupKind::Fireball), 0);
    }

    #[test]
    fn test_lose_life_resets_multiplier_and_signals_game_over() {
        let mut l = ledger();
        l.multiplier = 3.0;
        assert!(!l.lose_life());
        assert!(!l.perfect_level);
        assert_eq!(l.multiplier, 1.0);

        assert!(!l.lose_life());
        assert!(l.lose_life()); // third loss: lives hit zero
        assert_eq!(l.lives, 0);
    }

    #[test]
    fn test_extra_life_milestones_pay_once() {
        let mut l = ledger();
        l.score = 10_500;
        assert!(l.check_extra_life());
        assert_eq!(l.lives, 4);
        // Same milestone: no second payout
        assert!(!l.check_extra_life());

        l.score = 20_000;
        assert!(l.check_extra_life());
        assert_eq!(l.lives, 5);
    }

    #[test]
    fn test_extra_life_bounded_by_max_lives() {
        let mut l = ledger();
        l.lives = l.max_lives;
        l.score = 10_500;
        // Milestone consumed even when lives are capped
        assert!(!l.check_extra_life());
        assert_eq!(l.lives, l.max_lives);
    }
}
