//! Per-frame collision resolution
//!
//! Fixed order per ball: walls first, then paddle (only while descending),
//! then the first overlapping non-destroyed brick. At most one brick
//! interaction per ball per frame, which prevents double-scoring from
//! overlapping bricks. Destruction side effects (scoring, drops, portal
//! teleport, chain explosions) run through a single worklist so chains
//! cannot recurse unboundedly.

use glam::Vec2;

use crate::consts::*;
use crate::sim::brick::{find_adjacent_bricks, portal_partner, BrickKind};
use crate::sim::fx::{spawn_burst, ParticleShape};
use crate::sim::geom::{circle_intersects_rect, classify_impact_axis, paddle_bounce, ImpactAxis, Rect};
use crate::sim::powerup::{pick_powerup, Powerup};
use crate::sim::state::{GameEvent, GameState};

/// Particle color per brick kind
fn brick_color(kind: BrickKind) -> [u8; 3] {
    match kind {
        BrickKind::Standard => [120, 200, 255],
        BrickKind::Strong => [255, 200, 80],
        BrickKind::Tough => [255, 120, 80],
        BrickKind::Unbreakable => [140, 140, 140],
        BrickKind::Exploding => [255, 80, 40],
        BrickKind::Portal => [180, 80, 255],
        BrickKind::Hazard => [80, 255, 120],
    }
}

/// Reflect a ball off a brick along the classified impact axis and nudge it
/// clear of the rectangle.
fn bounce_off_rect(pos: &mut Vec2, vel: &mut Vec2, radius: f32, rect: &Rect) {
    match classify_impact_axis(*pos, radius, rect) {
        ImpactAxis::Vertical => {
            if pos.y < rect.center().y {
                pos.y = rect.y - radius;
                vel.y = -vel.y.abs();
            } else {
                pos.y = rect.bottom() + radius;
                vel.y = vel.y.abs();
            }
        }
        ImpactAxis::Horizontal => {
            if pos.x < rect.center().x {
                pos.x = rect.x - radius;
                vel.x = -vel.x.abs();
            } else {
                pos.x = rect.right() + radius;
                vel.x = vel.x.abs();
            }
        }
    }
}

/// Run destruction side effects for bricks that just reached zero, chaining
/// through exploding bricks with an explicit worklist.
///
/// `ball_idx` is the ball credited with the initial destruction (portal
/// teleports apply to it); chained destructions carry no ball.
fn apply_destruction(
    state: &mut GameState,
    idx: usize,
    ball_idx: Option<usize>,
    events: &mut Vec<GameEvent>,
) {
    let mut queue: Vec<(usize, Option<usize>)> = vec![(idx, ball_idx)];

    while let Some((i, bi)) = queue.pop() {
        let kind = state.bricks[i].kind;
        let center = state.bricks[i].rect.center();

        let score = state.ledger.add_score(kind.base_score());
        state.ledger.increment_multiplier(state.tuning.multiplier_step);
        state.fx.combo_glow = 1.0;
        events.push(GameEvent::BrickDestroyed { kind, score });
        if state.ledger.check_extra_life() {
            events.push(GameEvent::ExtraLife);
        }

        spawn_burst(
            &mut state.fx.particles,
            center,
            brick_color(kind),
            14,
            ParticleShape::Square,
            &mut state.rng,
        );

        // Drop roll: hazards always drop a negative pickup, everything else
        // rolls against the tuned chance.
        use rand::Rng;
        let drop = if kind == BrickKind::Hazard {
            Some(pick_powerup(&mut state.rng, |s| !s.positive))
        } else if state.rng.random::<f32>() < state.tuning.powerup_drop_chance {
            Some(pick_powerup(&mut state.rng, |_| true))
        } else {
            None
        };
        if let Some(p) = drop {
            state.powerups.push(Powerup::spawn(p, center));
        }

        // Portal: relocate the crediting ball to just below the partner
        if kind == BrickKind::Portal
            && let Some(bi) = bi
            && let Some(partner) = portal_partner(i, &state.bricks)
        {
            let target = state.bricks[partner].rect;
            if let Some(ball) = state.balls.get_mut(bi) {
                ball.pos = Vec2::new(target.center().x, target.bottom() + ball.radius + 1.0);
            }
        }

        // Exploding: chain one hit into every adjacent brick
        if kind == BrickKind::Exploding {
            state.fx.effects.spawn(
                crate::sim::fx::ScreenEffectKind::Shockwave,
                center,
                0.4,
            );
            for adj in find_adjacent_bricks(i, &state.bricks) {
                if state.bricks[adj].hit() {
                    queue.push((adj, None));
                } else if !state.bricks[adj].destroyed {
                    events.push(GameEvent::BrickHit {
                        kind: state.bricks[adj].kind,
                    });
                }
            }
        }
    }
}

/// Resolve one frame of collisions for every free ball and laser
pub fn resolve_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) {
    for ball_idx in 0..state.balls.len() {
        if state.balls[ball_idx].stuck {
            continue;
        }

        // --- Walls ---
        if let Some(wall) = state.balls[ball_idx].check_wall_collision(FIELD_WIDTH) {
            events.push(GameEvent::WallHit(wall));
        }

        // --- Paddle, only while descending ---
        let descending = state.balls[ball_idx].vel.y > 0.0;
        if descending {
            // Stuck balls are carried on the main paddle, so only the main
            // rect may magnet-catch; the split child always bounces.
            let mut targets: Vec<(Rect, bool)> = vec![(state.paddle.rect(), true)];
            if let Some(rect) = state.paddle.split_rect() {
                targets.push((rect, false));
            }
            for (rect, is_main) in targets {
                let ball = &state.balls[ball_idx];
                if !circle_intersects_rect(ball.pos, ball.radius, &rect) {
                    continue;
                }

                if is_main && state.paddle.consume_magnet_catch() {
                    let ball = &mut state.balls[ball_idx];
                    ball.stuck = true;
                    ball.vel = Vec2::ZERO;
                    ball.pos.y = rect.y - ball.radius;
                    events.push(GameEvent::BallCaught);
                } else {
                    let ball = &mut state.balls[ball_idx];
                    let speed = ball.speed;
                    paddle_bounce(
                        &mut ball.pos,
                        &mut ball.vel,
                        ball.radius,
                        speed,
                        &rect,
                        MIN_BOUNCE_ANGLE,
                    );
                    if ball.gravity > 0.0 {
                        // Doodle mode: paddle contact is a jump, not a bounce
                        ball.vel.y = -ball.jump_force;
                    }
                    state.fx.paddle_flash = 1.0;
                    events.push(GameEvent::PaddleHit);
                }
                break;
            }
        }

        // --- Bricks: first overlap only ---
        for i in 0..state.bricks.len() {
            if state.bricks[i].destroyed {
                continue;
            }
            let ball = &state.balls[ball_idx];
            let rect = state.bricks[i].rect;
            if !circle_intersects_rect(ball.pos, ball.radius, &rect) {
                continue;
            }

            let kind = state.bricks[i].kind;
            if kind == BrickKind::Unbreakable {
                // Always bounces, fireball included
                let ball = &mut state.balls[ball_idx];
                bounce_off_rect(&mut ball.pos, &mut ball.vel, ball.radius, &rect);
                events.push(GameEvent::BrickHit { kind });
                break;
            }

            let destroyed = state.bricks[i].hit();
            let penetrates = state.balls[ball_idx].fireball && destroyed;
            if !penetrates {
                let ball = &mut state.balls[ball_idx];
                bounce_off_rect(&mut ball.pos, &mut ball.vel, ball.radius, &rect);
            }

            if destroyed {
                apply_destruction(state, i, Some(ball_idx), events);
            } else {
                events.push(GameEvent::BrickHit { kind });
            }
            break;
        }
    }

    // --- Lasers vs bricks ---
    let mut l = 0;
    while l < state.lasers.len() {
        let laser_rect = state.lasers[l].rect();
        let hit = state
            .bricks
            .iter()
            .position(|b| !b.destroyed && b.rect.overlaps(&laser_rect));

        if let Some(i) = hit {
            let kind = state.bricks[i].kind;
            if state.bricks[i].hit() {
                apply_destruction(state, i, None, events);
            } else {
                events.push(GameEvent::BrickHit { kind });
            }
            state.lasers.swap_remove(l);
        } else {
            l += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::brick::Brick;
    use crate::sim::powerup::Laser;
    use crate::tuning::Tuning;

    fn state_with_bricks(bricks: Vec<Brick>) -> GameState {
        let mut state = GameState::new(7, Tuning::default());
        state.bricks = bricks;
        state
    }

    fn free_ball_at(state: &mut GameState, pos: Vec2, vel: Vec2) {
        let ball = &mut state.balls[0];
        ball.stuck = false;
        ball.pos = pos;
        ball.speed = vel.length();
        ball.vel = vel;
    }

    fn brick_at(x: f32, y: f32, kind: BrickKind) -> Brick {
        Brick::new(Rect::new(x, y, 70.0, 24.0), kind)
    }

    #[test]
    fn test_one_brick_interaction_per_ball_per_frame() {
        // Two overlapping bricks; the ball touches both but only the first
        // scanned may be credited.
        let mut state = state_with_bricks(vec![
            brick_at(100.0, 100.0, BrickKind::Standard),
            brick_at(100.0, 100.0, BrickKind::Standard),
        ]);
        free_ball_at(&mut state, Vec2::new(135.0, 96.0), Vec2::new(0.0, 200.0));

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        let destroyed = state.bricks.iter().filter(|b| b.destroyed).count();
        assert_eq!(destroyed, 1);
        assert!(state.bricks[0].destroyed);
        assert!(!state.bricks[1].destroyed);
    }

    #[test]
    fn test_fireball_penetrates_on_killing_hit() {
        let mut state = state_with_bricks(vec![brick_at(100.0, 100.0, BrickKind::Standard)]);
        free_ball_at(&mut state, Vec2::new(135.0, 96.0), Vec2::new(0.0, 200.0));
        state.balls[0].fireball = true;

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        // No bounce: still travelling downward
        assert!(state.balls[0].vel.y > 0.0);
        assert!(state.bricks[0].destroyed);
    }

    #[test]
    fn test_fireball_bounces_when_brick_survives() {
        let mut state = state_with_bricks(vec![brick_at(100.0, 100.0, BrickKind::Tough)]);
        free_ball_at(&mut state, Vec2::new(135.0, 96.0), Vec2::new(0.0, 200.0));
        state.balls[0].fireball = true;

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        assert!(state.balls[0].vel.y < 0.0);
        assert!(!state.bricks[0].destroyed);
        assert!(events.contains(&GameEvent::BrickHit { kind: BrickKind::Tough }));
    }

    #[test]
    fn test_unbreakable_always_bounces_even_fireball() {
        let mut state = state_with_bricks(vec![brick_at(100.0, 100.0, BrickKind::Unbreakable)]);
        free_ball_at(&mut state, Vec2::new(135.0, 96.0), Vec2::new(0.0, 200.0));
        state.balls[0].fireball = true;

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        assert!(state.balls[0].vel.y < 0.0);
        assert!(!state.bricks[0].destroyed);
    }

    #[test]
    fn test_destruction_scores_with_multiplier() {
        let mut state = state_with_bricks(vec![brick_at(100.0, 100.0, BrickKind::Standard)]);
        state.ledger.multiplier = 2.0;
        free_ball_at(&mut state, Vec2::new(135.0, 96.0), Vec2::new(0.0, 200.0));

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        assert_eq!(state.ledger.score, 20);
        assert!(state.ledger.multiplier > 2.0);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::BrickDestroyed { kind: BrickKind::Standard, score: 20 }
        )));
    }

    #[test]
    fn test_exploding_brick_chains_to_neighbors() {
        let mut state = state_with_bricks(vec![
            brick_at(100.0, 100.0, BrickKind::Exploding),
            brick_at(176.0, 100.0, BrickKind::Standard),
            brick_at(500.0, 400.0, BrickKind::Standard),
        ]);
        free_ball_at(&mut state, Vec2::new(135.0, 96.0), Vec2::new(0.0, 200.0));

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        assert!(state.bricks[0].destroyed);
        assert!(state.bricks[1].destroyed, "adjacent brick chains");
        assert!(!state.bricks[2].destroyed, "distant brick untouched");
        let destroyed_events = events
            .iter()
            .filter(|e| matches!(e, GameEvent::BrickDestroyed { .. }))
            .count();
        assert_eq!(destroyed_events, 2);
    }

    #[test]
    fn test_portal_teleports_ball_to_partner() {
        let mut bricks = vec![
            brick_at(100.0, 100.0, BrickKind::Portal),
            brick_at(500.0, 200.0, BrickKind::Portal),
        ];
        bricks[0].portal_id = Some(0);
        bricks[1].portal_id = Some(0);
        let mut state = state_with_bricks(bricks);
        free_ball_at(&mut state, Vec2::new(135.0, 96.0), Vec2::new(0.0, 200.0));

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        assert!(state.bricks[0].destroyed);
        let ball = &state.balls[0];
        assert!((ball.pos.x - 535.0).abs() < 0.001);
        assert!(ball.pos.y > 224.0);
    }

    #[test]
    fn test_magnet_catches_descending_ball() {
        let mut state = state_with_bricks(vec![]);
        state.paddle.enable_magnet(1);
        let catch_pos = Vec2::new(state.paddle.center_x(), state.paddle.pos.y - 4.0);
        free_ball_at(&mut state, catch_pos, Vec2::new(0.0, 200.0));

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        assert!(state.balls[0].stuck);
        assert!(events.contains(&GameEvent::BallCaught));
        assert_eq!(state.paddle.magnet_catches, 0);
    }

    #[test]
    fn test_split_child_bounces_instead_of_magnet_catching() {
        let mut state = state_with_bricks(vec![]);
        state.paddle.enable_magnet(3);
        state.paddle.enable_split(FIELD_WIDTH);

        let child = state.paddle.split_rect().unwrap();
        let pos = Vec2::new(child.x + child.w / 2.0, child.y - 4.0);
        free_ball_at(&mut state, pos, Vec2::new(0.0, 200.0));

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        assert!(!state.balls[0].stuck);
        assert!(state.balls[0].vel.y < 0.0);
        assert!(events.contains(&GameEvent::PaddleHit));
        // Charges stay for the main paddle
        assert_eq!(state.paddle.magnet_catches, 3);
    }

    #[test]
    fn test_paddle_ignored_while_ascending() {
        let mut state = state_with_bricks(vec![]);
        let pos = Vec2::new(state.paddle.center_x(), state.paddle.pos.y - 4.0);
        free_ball_at(&mut state, pos, Vec2::new(0.0, -200.0));

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);
        assert!(!events.contains(&GameEvent::PaddleHit));
    }

    #[test]
    fn test_laser_credits_brick_and_disappears() {
        let mut state = state_with_bricks(vec![brick_at(100.0, 100.0, BrickKind::Strong)]);
        state.lasers.push(Laser {
            pos: Vec2::new(135.0, 110.0),
            w: LASER_WIDTH,
            h: LASER_HEIGHT,
        });

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        assert!(state.lasers.is_empty());
        assert_eq!(state.bricks[0].hits, 1);
        assert!(!state.bricks[0].destroyed);
        assert!(events.contains(&GameEvent::BrickHit { kind: BrickKind::Strong }));
    }

    #[test]
    fn test_hazard_brick_drops_negative_powerup() {
        let mut state = state_with_bricks(vec![brick_at(100.0, 100.0, BrickKind::Hazard)]);
        free_ball_at(&mut state, Vec2::new(135.0, 96.0), Vec2::new(0.0, 200.0));

        let mut events = Vec::new();
        resolve_collisions(&mut state, &mut events);

        assert_eq!(state.powerups.len(), 1);
        assert!(!state.powerups[0].positive);
    }
}
