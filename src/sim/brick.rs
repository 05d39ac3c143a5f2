//! Brick entities and grid queries
//!
//! Bricks are marked destroyed rather than removed so indices stay stable
//! for adjacency queries (chain explosions, portal pairing).

use serde::{Deserialize, Serialize};

use crate::sim::geom::Rect;

/// Brick variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BrickKind {
    #[default]
    Standard,
    Strong,
    Tough,
    /// Never destroyed; always bounces the ball, fireball included
    Unbreakable,
    /// Chains a hit to adjacent bricks when destroyed
    Exploding,
    /// Paired with a partner brick; teleports the ball on destruction
    Portal,
    /// Drops a guaranteed negative powerup when destroyed
    Hazard,
}

impl BrickKind {
    /// Hits required to destroy, -1 meaning indestructible
    pub fn max_hits(&self) -> i32 {
        match self {
            BrickKind::Standard | BrickKind::Exploding | BrickKind::Portal | BrickKind::Hazard => 1,
            BrickKind::Strong => 2,
            BrickKind::Tough => 3,
            BrickKind::Unbreakable => -1,
        }
    }

    /// Base score awarded on destruction, before the multiplier
    pub fn base_score(&self) -> u64 {
        match self {
            BrickKind::Standard => 10,
            BrickKind::Strong => 25,
            BrickKind::Tough => 40,
            BrickKind::Exploding => 50,
            BrickKind::Portal => 20,
            BrickKind::Hazard => 5,
            BrickKind::Unbreakable => 0,
        }
    }

    /// Whether this brick must be destroyed to complete the level
    pub fn counts_for_clear(&self) -> bool {
        *self != BrickKind::Unbreakable
    }
}

/// Horizontal motion state for moving bricks
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Moving {
    /// +1.0 or -1.0
    pub dir: f32,
    /// Pixels per second
    pub speed: f32,
}

/// A brick in the level grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub kind: BrickKind,
    pub hits: i32,
    pub max_hits: i32,
    pub destroyed: bool,
    pub moving: Option<Moving>,
    /// Links portal bricks that share a pair id
    pub portal_id: Option<u32>,
}

impl Brick {
    pub fn new(rect: Rect, kind: BrickKind) -> Self {
        Self {
            rect,
            kind,
            hits: 0,
            max_hits: kind.max_hits(),
            destroyed: false,
            moving: None,
            portal_id: None,
        }
    }

    /// Credit one hit. Returns `true` only on the hit that destroys the
    /// brick; unconditionally `false` for indestructible or already
    /// destroyed bricks.
    pub fn hit(&mut self) -> bool {
        if self.destroyed || self.max_hits == -1 {
            return false;
        }
        self.hits = (self.hits + 1).min(self.max_hits);
        if self.hits == self.max_hits {
            self.destroyed = true;
            return true;
        }
        false
    }
}

/// Advance moving bricks, flipping direction at either horizontal field
/// bound. Destroyed bricks are skipped.
pub fn update_moving_bricks(bricks: &mut [Brick], field_w: f32, dt: f32) {
    for brick in bricks.iter_mut() {
        if brick.destroyed {
            continue;
        }
        let Some(moving) = brick.moving.as_mut() else {
            continue;
        };
        brick.rect.x += moving.dir * moving.speed * dt;
        if brick.rect.x <= 0.0 {
            brick.rect.x = 0.0;
            moving.dir = 1.0;
        } else if brick.rect.x + brick.rect.w >= field_w {
            brick.rect.x = field_w - brick.rect.w;
            moving.dir = -1.0;
        }
    }
}

/// Indices of non-destroyed bricks whose bounding boxes are within one
/// brick-width/height of `center`'s edges, excluding `center` itself.
/// Used for chain effects (exploding bricks).
pub fn find_adjacent_bricks(center: usize, bricks: &[Brick]) -> Vec<usize> {
    let Some(center_brick) = bricks.get(center) else {
        return Vec::new();
    };
    let reach = Rect::new(
        center_brick.rect.x - center_brick.rect.w,
        center_brick.rect.y - center_brick.rect.h,
        center_brick.rect.w * 3.0,
        center_brick.rect.h * 3.0,
    );

    bricks
        .iter()
        .enumerate()
        .filter(|(i, b)| *i != center && !b.destroyed && b.rect.overlaps(&reach))
        .map(|(i, _)| i)
        .collect()
}

/// Teleport target for a portal brick: the first other non-destroyed brick
/// sharing its pair id.
pub fn portal_partner(source: usize, bricks: &[Brick]) -> Option<usize> {
    let pair_id = bricks.get(source)?.portal_id?;
    bricks
        .iter()
        .enumerate()
        .find(|(i, b)| *i != source && b.portal_id == Some(pair_id) && !b.destroyed)
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brick_at(x: f32, y: f32, kind: BrickKind) -> Brick {
        Brick::new(Rect::new(x, y, 70.0, 24.0), kind)
    }

    #[test]
    fn test_hit_brick_counts_to_max() {
        let mut brick = brick_at(0.0, 0.0, BrickKind::Tough);
        assert!(!brick.hit());
        assert!(!brick.hit());
        assert!(brick.hit());
        assert!(brick.destroyed);
        // Further hits are a no-op
        assert!(!brick.hit());
        assert_eq!(brick.hits, brick.max_hits);
    }

    #[test]
    fn test_unbreakable_never_destroyed() {
        let mut brick = brick_at(0.0, 0.0, BrickKind::Unbreakable);
        for _ in 0..10 {
            assert!(!brick.hit());
        }
        assert!(!brick.destroyed);
    }

    #[test]
    fn test_moving_brick_flips_at_bounds() {
        let mut bricks = vec![brick_at(2.0, 0.0, BrickKind::Standard)];
        bricks[0].moving = Some(Moving { dir: -1.0, speed: 300.0 });

        update_moving_bricks(&mut bricks, 800.0, 1.0 / 60.0);
        assert_eq!(bricks[0].rect.x, 0.0);
        assert_eq!(bricks[0].moving.unwrap().dir, 1.0);

        bricks[0].rect.x = 728.0;
        update_moving_bricks(&mut bricks, 800.0, 1.0 / 60.0);
        assert_eq!(bricks[0].rect.x, 800.0 - 70.0);
        assert_eq!(bricks[0].moving.unwrap().dir, -1.0);
    }

    #[test]
    fn test_destroyed_bricks_do_not_move() {
        let mut bricks = vec![brick_at(100.0, 0.0, BrickKind::Standard)];
        bricks[0].moving = Some(Moving { dir: 1.0, speed: 300.0 });
        bricks[0].destroyed = true;
        update_moving_bricks(&mut bricks, 800.0, 1.0 / 60.0);
        assert_eq!(bricks[0].rect.x, 100.0);
    }

    #[test]
    fn test_find_adjacent_bricks() {
        // 3x1 row with standard grid spacing, plus one far away
        let bricks = vec![
            brick_at(0.0, 0.0, BrickKind::Exploding),
            brick_at(76.0, 0.0, BrickKind::Standard),
            brick_at(152.0, 0.0, BrickKind::Standard),
            brick_at(500.0, 300.0, BrickKind::Standard),
        ];
        let adjacent = find_adjacent_bricks(0, &bricks);
        assert_eq!(adjacent, vec![1]);

        let adjacent = find_adjacent_bricks(1, &bricks);
        assert_eq!(adjacent, vec![0, 2]);
    }

    #[test]
    fn test_adjacency_skips_destroyed() {
        let mut bricks = vec![
            brick_at(0.0, 0.0, BrickKind::Exploding),
            brick_at(76.0, 0.0, BrickKind::Standard),
        ];
        bricks[1].destroyed = true;
        assert!(find_adjacent_bricks(0, &bricks).is_empty());
    }

    #[test]
    fn test_portal_partner_lookup() {
        let mut bricks = vec![
            brick_at(0.0, 0.0, BrickKind::Portal),
            brick_at(300.0, 0.0, BrickKind::Portal),
            brick_at(600.0, 0.0, BrickKind::Standard),
        ];
        bricks[0].portal_id = Some(1);
        bricks[1].portal_id = Some(1);

        assert_eq!(portal_partner(0, &bricks), Some(1));
        assert_eq!(portal_partner(1, &bricks), Some(0));
        assert_eq!(portal_partner(2, &bricks), None);

        bricks[1].destroyed = true;
        assert_eq!(portal_partner(0, &bricks), None);
    }
}
