//! Paddle entity and movement rules
//!
//! Pointer input (touch over mouse) takes precedence over key-hold movement.
//! Width is never stored free-form: it is always derived from `base_width`
//! times the currently active multiplier, so powerup expiry can restore it
//! exactly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::geom::Rect;

/// Width fraction of the main paddle while split
const SPLIT_WIDTH_FRACTION: f32 = 0.4;

/// Mirrored secondary paddle owned by a split main paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitPaddle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

/// Key-hold movement state relevant to the paddle
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PaddleKeys {
    pub left: bool,
    pub right: bool,
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner; `pos.y` is fixed per level
    pub pos: Vec2,
    pub width: f32,
    pub base_width: f32,
    pub height: f32,
    /// Catches incoming balls instead of bouncing while charges remain
    pub has_magnet: bool,
    pub magnet_catches: u32,
    pub inverted_controls: bool,
    /// Mirrored child while split; at most one
    pub split: Option<Box<SplitPaddle>>,
    /// Active width multiplier (mode and powerup modifiers combined)
    width_multiplier: f32,
}

impl Paddle {
    pub fn new(field_w: f32, field_h: f32) -> Self {
        let width = PADDLE_WIDTH;
        Self {
            pos: Vec2::new(
                (field_w - width) / 2.0,
                field_h - PADDLE_BOTTOM_MARGIN - PADDLE_HEIGHT,
            ),
            width,
            base_width: width,
            height: PADDLE_HEIGHT,
            has_magnet: false,
            magnet_catches: 0,
            inverted_controls: false,
            split: None,
            width_multiplier: 1.0,
        }
    }

    /// Collision rectangle of the main paddle
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    /// Collision rectangle of the split child, if split
    pub fn split_rect(&self) -> Option<Rect> {
        self.split
            .as_ref()
            .map(|s| Rect::new(s.pos.x, s.pos.y, s.width, s.height))
    }

    /// Center x of the main paddle
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Move the paddle for one frame.
    ///
    /// Touch position beats mouse position beats key-hold movement. With
    /// inverted controls both the key direction and the mapped pointer
    /// position are mirrored around the field center before clamping.
    pub fn update(
        &mut self,
        keys: PaddleKeys,
        mouse_x: Option<f32>,
        touch_x: Option<f32>,
        field_w: f32,
        dt: f32,
    ) {
        let pointer = touch_x.or(mouse_x);

        if let Some(px) = pointer {
            let px = if self.inverted_controls { field_w - px } else { px };
            self.pos.x = px - self.width / 2.0;
        } else {
            let mut dir = (keys.right as i8 - keys.left as i8) as f32;
            if self.inverted_controls {
                dir = -dir;
            }
            self.pos.x += dir * PADDLE_SPEED * dt;
        }

        self.pos.x = crate::clamp_range(self.pos.x, 0.0, field_w - self.width);
        self.sync_split(field_w);
    }

    /// Re-derive width from `base_width` and the active multiplier, keeping
    /// the paddle center fixed and inside the field.
    pub fn set_width_multiplier(&mut self, multiplier: f32, field_w: f32) {
        self.width_multiplier = multiplier.max(0.1);
        let center = self.center_x();
        self.width = self.base_width
            * self.width_multiplier
            * if self.split.is_some() { SPLIT_WIDTH_FRACTION } else { 1.0 };
        self.pos.x = crate::clamp_range(center - self.width / 2.0, 0.0, field_w - self.width);
        self.sync_split(field_w);
    }

    /// Shrink to 40% of base width and spawn a mirrored child at the
    /// opposite horizontal extreme. No-op if already split.
    pub fn enable_split(&mut self, field_w: f32) {
        if self.split.is_some() {
            return;
        }
        self.width = self.base_width * self.width_multiplier * SPLIT_WIDTH_FRACTION;
        self.pos.x = crate::clamp_range(self.pos.x, 0.0, field_w - self.width);
        self.split = Some(Box::new(SplitPaddle {
            pos: Vec2::new(field_w - self.pos.x - self.width, self.pos.y),
            width: self.width,
            height: self.height,
        }));
    }

    /// Restore full base width and re-center
    pub fn disable_split(&mut self, field_w: f32) {
        if self.split.take().is_none() {
            return;
        }
        self.width = self.base_width * self.width_multiplier;
        self.pos.x = (field_w - self.width) / 2.0;
    }

    /// Grant magnet charges
    pub fn enable_magnet(&mut self, catches: u32) {
        self.has_magnet = true;
        self.magnet_catches = catches;
    }

    /// Clear magnet state
    pub fn disable_magnet(&mut self) {
        self.has_magnet = false;
        self.magnet_catches = 0;
    }

    /// Spend one magnet catch; returns whether a catch was available
    pub fn consume_magnet_catch(&mut self) -> bool {
        if !self.has_magnet || self.magnet_catches == 0 {
            return false;
        }
        self.magnet_catches -= 1;
        if self.magnet_catches == 0 {
            self.has_magnet = false;
        }
        true
    }

    /// Keep the split child mirrored around the field center
    fn sync_split(&mut self, field_w: f32) {
        let (x, width) = (self.pos.x, self.width);
        if let Some(split) = self.split.as_mut() {
            split.width = width;
            split.pos.x = crate::clamp_range(field_w - x - width, 0.0, field_w - width);
            split.pos.y = self.pos.y;
        }
    }
}
