//! Ball entity and per-frame update rules
//!
//! The one invariant that matters: whenever a ball is not stuck to the
//! paddle, `vel.length() == speed` within floating-point tolerance. Every
//! velocity-affecting operation here re-establishes it.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which wall a ball bounced off (bottom exit is not a bounce)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Left,
    Right,
    Top,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Unique id, keys per-ball trail state
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Current scalar speed; `vel` is renormalized to it on every change
    pub speed: f32,
    /// Speed before powerup/level scaling
    pub base_speed: f32,
    pub radius: f32,
    /// Resting on the paddle prior to launch; does not move under velocity
    pub stuck: bool,
    pub visible: bool,
    /// Penetrates one brick per contact instead of bouncing
    pub fireball: bool,
    /// Doodle-mode downward acceleration (0 outside doodle mode)
    pub gravity: f32,
    /// Doodle-mode upward kick applied on paddle contact
    pub jump_force: f32,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            speed: BALL_BASE_SPEED,
            base_speed: BALL_BASE_SPEED,
            radius: BALL_RADIUS,
            stuck: true,
            visible: true,
            fireball: false,
            gravity: 0.0,
            jump_force: 0.0,
        }
    }

    /// Advance position by velocity; stuck balls do not move
    pub fn update_position(&mut self, dt: f32) {
        if self.stuck {
            return;
        }
        if self.gravity > 0.0 {
            // Doodle mode: velocity arcs under gravity, speed is not enforced
            self.vel.y += self.gravity * dt;
        }
        self.pos += self.vel * dt;
    }

    /// Renormalize velocity to a new speed without altering direction.
    ///
    /// Used when powerups or level scaling change `speed`. A zero-length
    /// velocity defaults to straight up.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
        let dir = if self.vel.length_squared() > 0.0 {
            self.vel.normalize()
        } else {
            Vec2::new(0.0, -1.0)
        };
        self.vel = dir * self.speed;
    }

    /// Convert a stuck ball to moving with a near-vertical angle plus small
    /// randomized horizontal jitter.
    pub fn launch(&mut self, rng: &mut Pcg32) {
        if !self.stuck {
            return;
        }
        self.stuck = false;
        let jitter: f32 = rng.random_range(-0.35..0.35);
        let angle = std::f32::consts::FRAC_PI_2 + jitter;
        self.vel = Vec2::new(self.speed * angle.cos(), -self.speed * angle.sin());
    }

    /// Reflect off the left/right/top bounds, clamping position inside the
    /// field. Returns which wall was hit so the caller can trigger effects.
    pub fn check_wall_collision(&mut self, field_w: f32) -> Option<Wall> {
        if self.pos.x - self.radius < 0.0 {
            self.pos.x = self.radius;
            self.vel.x = self.vel.x.abs();
            return Some(Wall::Left);
        }
        if self.pos.x + self.radius > field_w {
            self.pos.x = field_w - self.radius;
            self.vel.x = -self.vel.x.abs();
            return Some(Wall::Right);
        }
        if self.pos.y - self.radius < 0.0 {
            self.pos.y = self.radius;
            self.vel.y = self.vel.y.abs();
            return Some(Wall::Top);
        }
        None
    }

    /// Whether the ball has left the bottom bound (a loss, not a bounce)
    pub fn is_out_of_bounds(&self, field_h: f32) -> bool {
        self.pos.y - self.radius > field_h
    }
}

/// Clone a source ball into a fan of extra balls, biased upward.
///
/// Creates `min(requested, max_balls - current)` clones at the source
/// position with velocity angles spread across an upward arc, inheriting
/// the source's fireball state. Never exceeds the ball cap.
pub fn create_multi_balls(
    source: &Ball,
    requested: usize,
    max_balls: usize,
    current: usize,
    next_id: &mut u32,
    rng: &mut Pcg32,
) -> Vec<Ball> {
    let count = requested.min(max_balls.saturating_sub(current));
    let mut balls = Vec::with_capacity(count);

    for i in 0..count {
        // Fan across [PI/4, 3PI/4] with per-ball jitter
        let t = (i as f32 + 0.5) / count as f32;
        let jitter: f32 = rng.random_range(-0.1..0.1);
        let angle = std::f32::consts::FRAC_PI_4 + t * std::f32::consts::FRAC_PI_2 + jitter;

        let mut ball = Ball::new(*next_id, source.pos);
        *next_id += 1;
        ball.speed = source.speed;
        ball.base_speed = source.base_speed;
        ball.radius = source.radius;
        ball.stuck = false;
        ball.fireball = source.fireball;
        ball.gravity = source.gravity;
        ball.jump_force = source.jump_force;
        ball.vel = Vec2::new(ball.speed * angle.cos(), -ball.speed * angle.sin());
        balls.push(ball);
    }

    balls
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn free_ball() -> Ball {
        let mut ball = Ball::new(1, Vec2::new(100.0, 100.0));
        ball.stuck = false;
        ball.vel = Vec2::new(0.0, ball.speed);
        ball
    }

    #[test]
    fn test_stuck_ball_does_not_move() {
        let mut ball = Ball::new(1, Vec2::new(100.0, 100.0));
        ball.vel = Vec2::new(50.0, 50.0);
        ball.update_position(1.0 / 60.0);
        assert_eq!(ball.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_launch_sets_speed_and_upward_direction() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ball = Ball::new(1, Vec2::new(100.0, 100.0));
        ball.launch(&mut rng);
        assert!(!ball.stuck);
        assert!(ball.vel.y < 0.0);
        assert!((ball.vel.length() - ball.speed).abs() < 0.001);
        // Near vertical: horizontal component stays small
        assert!(ball.vel.x.abs() < ball.speed * 0.5);
    }

    #[test]
    fn test_set_speed_preserves_direction() {
        let mut ball = free_ball();
        ball.vel = Vec2::new(3.0, -4.0).normalize() * ball.speed;
        let dir_before = ball.vel.normalize();
        ball.set_speed(500.0);
        assert!((ball.vel.length() - 500.0).abs() < 0.001);
        assert!(ball.vel.normalize().distance(dir_before) < 0.001);
    }

    #[test]
    fn test_wall_collision_left() {
        let mut ball = free_ball();
        ball.pos = Vec2::new(5.0, 100.0);
        ball.radius = 8.0;
        ball.vel = Vec2::new(-5.0, 0.0);
        let wall = ball.check_wall_collision(800.0);
        assert_eq!(wall, Some(Wall::Left));
        assert_eq!(ball.vel.x, 5.0);
        assert_eq!(ball.pos.x, 8.0);
    }

    #[test]
    fn test_wall_collision_right_and_top() {
        let mut ball = free_ball();
        ball.pos = Vec2::new(798.0, 100.0);
        ball.vel = Vec2::new(60.0, 10.0);
        assert_eq!(ball.check_wall_collision(800.0), Some(Wall::Right));
        assert!(ball.vel.x < 0.0);
        assert_eq!(ball.pos.x, 800.0 - ball.radius);

        ball.pos = Vec2::new(400.0, 2.0);
        ball.vel = Vec2::new(10.0, -60.0);
        assert_eq!(ball.check_wall_collision(800.0), Some(Wall::Top));
        assert!(ball.vel.y > 0.0);
        assert_eq!(ball.pos.y, ball.radius);
    }

    #[test]
    fn test_bottom_exit_is_not_a_bounce() {
        let mut ball = free_ball();
        ball.pos = Vec2::new(400.0, 620.0);
        assert_eq!(ball.check_wall_collision(800.0), None);
        assert!(ball.is_out_of_bounds(600.0));
    }

    #[test]
    fn test_create_multi_balls_respects_cap() {
        let mut rng = Pcg32::seed_from_u64(42);
        let source = free_ball();
        let mut next_id = 10;

        let balls = create_multi_balls(&source, 5, 3, 1, &mut next_id, &mut rng);
        assert_eq!(balls.len(), 2);
        assert_eq!(next_id, 12);

        // Already at cap: nothing spawns
        let balls = create_multi_balls(&source, 5, 3, 3, &mut next_id, &mut rng);
        assert!(balls.is_empty());
    }

    #[test]
    fn test_multi_balls_inherit_fireball_and_fan_upward() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut source = free_ball();
        source.fireball = true;
        let mut next_id = 2;

        let balls = create_multi_balls(&source, 3, 8, 1, &mut next_id, &mut rng);
        assert_eq!(balls.len(), 3);
        for ball in &balls {
            assert!(ball.fireball);
            assert!(ball.vel.y < 0.0);
            assert!((ball.vel.length() - source.speed).abs() < 0.001);
            assert_eq!(ball.pos, source.pos);
        }
    }
}
