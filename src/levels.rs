//! Static level and pattern tables
//!
//! Read-only configuration: named brick patterns as character maps, plus a
//! level progression table layering mechanics (moving bricks, speed scaling)
//! on top of a pattern. Unknown pattern names fall back to the default
//! pattern rather than failing.
//!
//! Pattern glyphs: `.` empty, `s` standard, `2` strong, `3` tough,
//! `u` unbreakable, `e` exploding, `p` portal (paired left-to-right,
//! top-to-bottom), `h` hazard, `m` moving standard.

use crate::consts::*;
use crate::sim::brick::{Brick, BrickKind, Moving};
use crate::sim::geom::Rect;

/// A named brick pattern
#[derive(Debug, Clone, Copy)]
pub struct LevelPattern {
    pub name: &'static str,
    pub rows: &'static [&'static str],
}

/// All named patterns
pub const PATTERNS: &[LevelPattern] = &[
    LevelPattern {
        name: "standard",
        rows: &[
            "ssssssssss",
            "ssssssssss",
            "2222222222",
            "ssssssssss",
        ],
    },
    LevelPattern {
        name: "checker",
        rows: &[
            "s.s.s.s.s.",
            ".2.2.2.2.2",
            "s.s.s.s.s.",
            ".2.2.2.2.2",
            "s.s.s.s.s.",
        ],
    },
    LevelPattern {
        name: "diamond",
        rows: &[
            "....ss....",
            "...s22s...",
            "..s2332s..",
            "...s22s...",
            "....ss....",
        ],
    },
    LevelPattern {
        name: "fortress",
        rows: &[
            "ussssssssu",
            "s33e33e33s",
            "s2p2222p2s",
            "ussshsssus",
        ],
    },
    LevelPattern {
        name: "conveyor",
        rows: &[
            "m..m..m..m",
            "ssssssssss",
            "m..m..m..m",
            "2222222222",
        ],
    },
];

/// Look up a pattern by name, falling back to the default (`standard`)
/// pattern for unknown names.
pub fn pattern_by_name(name: &str) -> &'static LevelPattern {
    PATTERNS
        .iter()
        .find(|p| p.name == name)
        .unwrap_or(&PATTERNS[0])
}

/// A level: pattern plus active mechanics
#[derive(Debug, Clone, Copy)]
pub struct LevelDef {
    pub pattern: &'static str,
    /// Ball speed multiplier applied to `base_speed` for the level
    pub speed_scale: f32,
    /// Speed of bricks flagged moving in the pattern
    pub moving_speed: f32,
}

/// Level progression table
pub const LEVELS: &[LevelDef] = &[
    LevelDef { pattern: "standard", speed_scale: 1.0, moving_speed: 0.0 },
    LevelDef { pattern: "checker", speed_scale: 1.05, moving_speed: 0.0 },
    LevelDef { pattern: "diamond", speed_scale: 1.1, moving_speed: 0.0 },
    LevelDef { pattern: "conveyor", speed_scale: 1.15, moving_speed: 70.0 },
    LevelDef { pattern: "fortress", speed_scale: 1.2, moving_speed: 90.0 },
];

/// Level definition for an index; past the table the last level repeats
/// with further speed scaling.
pub fn level_def(index: usize) -> LevelDef {
    if let Some(def) = LEVELS.get(index) {
        return *def;
    }
    let mut def = LEVELS[LEVELS.len() - 1];
    def.speed_scale += 0.05 * (index + 1 - LEVELS.len()) as f32;
    def
}

fn kind_for_glyph(c: char) -> Option<BrickKind> {
    match c {
        's' | 'm' => Some(BrickKind::Standard),
        '2' => Some(BrickKind::Strong),
        '3' => Some(BrickKind::Tough),
        'u' => Some(BrickKind::Unbreakable),
        'e' => Some(BrickKind::Exploding),
        'p' => Some(BrickKind::Portal),
        'h' => Some(BrickKind::Hazard),
        _ => None,
    }
}

/// Build the brick grid for a level. The grid is centered horizontally;
/// portal bricks are paired in order of appearance (first with second,
/// third with fourth, ...). An odd portal out keeps `portal_id = None`.
pub fn build_bricks(def: &LevelDef, field_w: f32) -> Vec<Brick> {
    let pattern = pattern_by_name(def.pattern);
    let cols = pattern.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let grid_w = cols as f32 * (BRICK_WIDTH + BRICK_PADDING) - BRICK_PADDING;
    let left = ((field_w - grid_w) / 2.0).max(0.0);

    let mut bricks = Vec::new();
    let mut portal_indices = Vec::new();

    for (row, line) in pattern.rows.iter().enumerate() {
        for (col, c) in line.chars().enumerate() {
            let Some(kind) = kind_for_glyph(c) else {
                continue;
            };
            let rect = Rect::new(
                left + col as f32 * (BRICK_WIDTH + BRICK_PADDING),
                BRICK_TOP_OFFSET + row as f32 * (BRICK_HEIGHT + BRICK_PADDING),
                BRICK_WIDTH,
                BRICK_HEIGHT,
            );
            let mut brick = Brick::new(rect, kind);
            if c == 'm' && def.moving_speed > 0.0 {
                brick.moving = Some(Moving {
                    dir: if col % 2 == 0 { 1.0 } else { -1.0 },
                    speed: def.moving_speed,
                });
            }
            if kind == BrickKind::Portal {
                portal_indices.push(bricks.len());
            }
            bricks.push(brick);
        }
    }

    for (pair, chunk) in portal_indices.chunks(2).enumerate() {
        if let [a, b] = *chunk {
            bricks[a].portal_id = Some(pair as u32);
            bricks[b].portal_id = Some(pair as u32);
        }
    }

    bricks
}
