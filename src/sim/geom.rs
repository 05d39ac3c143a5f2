//! Geometry and collision kernel
//!
//! Pure functions over circles and axis-aligned rectangles. Everything above
//! this module (entity updates, the collision resolver) is built on these
//! three primitives: overlap testing, impact-side classification, and the
//! paddle bounce-angle mapping. Nothing here panics; out-of-range numeric
//! input degrades to boundary values.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, `(x, y)` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Whether two rectangles overlap (inclusive on touching edges)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }
}

/// Axis of an impact against a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactAxis {
    /// Side impact: reflect the horizontal velocity component
    Horizontal,
    /// Top/bottom impact: reflect the vertical velocity component
    Vertical,
}

/// Closest point on `rect` to `p`
#[inline]
pub fn closest_point_on_rect(p: Vec2, rect: &Rect) -> Vec2 {
    Vec2::new(
        p.x.clamp(rect.x, rect.right()),
        p.y.clamp(rect.y, rect.bottom()),
    )
}

/// Check whether a circle overlaps a rectangle (inclusive on touch).
///
/// Closest-point clamp of the circle center to the rectangle, then a
/// squared-distance compare. A zero or negative radius degrades to a
/// point-containment test.
pub fn circle_intersects_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let radius = radius.max(0.0);
    let closest = closest_point_on_rect(center, rect);
    center.distance_squared(closest) <= radius * radius
}

/// Classify which axis a circle impacted a rectangle along.
///
/// Compares the penetration depth along each axis and returns the axis with
/// the smaller overlap. Ties resolve to [`ImpactAxis::Vertical`] since
/// top/bottom is the travel axis for most gameplay.
pub fn classify_impact_axis(center: Vec2, radius: f32, rect: &Rect) -> ImpactAxis {
    let radius = radius.max(0.0);
    let closest = closest_point_on_rect(center, rect);
    let dx = (center.x - closest.x).abs();
    let dy = (center.y - closest.y).abs();

    if closest == center {
        // Center is inside the rectangle: fall back to distance-to-edge
        let to_vertical_edge = (center.x - rect.x).min(rect.right() - center.x);
        let to_horizontal_edge = (center.y - rect.y).min(rect.bottom() - center.y);
        if to_vertical_edge < to_horizontal_edge {
            return ImpactAxis::Horizontal;
        }
        return ImpactAxis::Vertical;
    }

    // Larger center-to-surface distance on an axis means smaller overlap
    // along that axis.
    let x_overlap = radius - dx;
    let y_overlap = radius - dy;
    if x_overlap < y_overlap {
        ImpactAxis::Horizontal
    } else {
        ImpactAxis::Vertical
    }
}

/// Compute a paddle bounce and apply it to a ball's position and velocity.
///
/// The horizontal hit offset across the paddle width maps to a bounce angle
/// in `[min_angle, PI - min_angle]` measured from horizontal: the left edge
/// sends the ball up-left, dead center sends it straight up. The ball is
/// repositioned flush above the paddle top so the same contact cannot
/// re-trigger within the frame.
pub fn paddle_bounce(
    pos: &mut Vec2,
    vel: &mut Vec2,
    radius: f32,
    speed: f32,
    paddle: &Rect,
    min_angle: f32,
) {
    let min_angle = min_angle.clamp(0.0, std::f32::consts::FRAC_PI_2);
    // Offset in [-1, 1]: -1 at the left edge, +1 at the right
    let offset = if paddle.w > 0.0 {
        (((pos.x - paddle.x) / paddle.w) * 2.0 - 1.0).clamp(-1.0, 1.0)
    } else {
        0.0
    };

    // offset -1 -> PI - min_angle, 0 -> PI/2, +1 -> min_angle
    let angle = std::f32::consts::FRAC_PI_2 - offset * (std::f32::consts::FRAC_PI_2 - min_angle);
    *vel = Vec2::new(speed * angle.cos(), -speed * angle.sin());
    pos.y = paddle.y - radius;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_intersects_rect_overlap() {
        let rect = Rect::new(100.0, 100.0, 60.0, 20.0);
        // Center above the rect, touching the top edge exactly
        assert!(circle_intersects_rect(Vec2::new(130.0, 92.0), 8.0, &rect));
        // Just above touch distance
        assert!(!circle_intersects_rect(Vec2::new(130.0, 91.0), 8.0, &rect));
        // Corner approach: distance to corner vs radius
        assert!(circle_intersects_rect(Vec2::new(95.0, 95.0), 8.0, &rect));
        assert!(!circle_intersects_rect(Vec2::new(90.0, 90.0), 8.0, &rect));
    }

    #[test]
    fn test_circle_intersects_rect_zero_radius() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(circle_intersects_rect(Vec2::new(5.0, 5.0), 0.0, &rect));
        assert!(!circle_intersects_rect(Vec2::new(11.0, 5.0), 0.0, &rect));
        // Negative radius clamps to zero rather than inverting the test
        assert!(circle_intersects_rect(Vec2::new(5.0, 5.0), -3.0, &rect));
    }

    #[test]
    fn test_classify_impact_axis_from_above() {
        let rect = Rect::new(100.0, 100.0, 60.0, 20.0);
        // Ball coming from above the middle: vertical impact
        let axis = classify_impact_axis(Vec2::new(130.0, 95.0), 8.0, &rect);
        assert_eq!(axis, ImpactAxis::Vertical);
    }

    #[test]
    fn test_classify_impact_axis_from_side() {
        let rect = Rect::new(100.0, 100.0, 60.0, 20.0);
        let axis = classify_impact_axis(Vec2::new(96.0, 110.0), 8.0, &rect);
        assert_eq!(axis, ImpactAxis::Horizontal);
    }

    #[test]
    fn test_classify_impact_axis_tie_is_vertical() {
        let rect = Rect::new(100.0, 100.0, 60.0, 20.0);
        // Equidistant corner approach: dx == dy
        let axis = classify_impact_axis(Vec2::new(96.0, 96.0), 8.0, &rect);
        assert_eq!(axis, ImpactAxis::Vertical);
    }

    #[test]
    fn test_paddle_bounce_center_goes_straight_up() {
        let paddle = Rect::new(100.0, 500.0, 100.0, 16.0);
        let mut pos = Vec2::new(150.0, 498.0);
        let mut vel = Vec2::new(50.0, 200.0);
        paddle_bounce(&mut pos, &mut vel, 8.0, 300.0, &paddle, 0.5);

        assert!(vel.x.abs() < 0.001);
        assert!((vel.y - (-300.0)).abs() < 0.001);
        // Repositioned flush above the paddle top
        assert!((pos.y - 492.0).abs() < 0.001);
    }

    #[test]
    fn test_paddle_bounce_respects_min_angle() {
        let paddle = Rect::new(100.0, 500.0, 100.0, 16.0);
        let min_angle = std::f32::consts::PI / 6.0;

        // Far right edge: steepest allowed right-going angle
        let mut pos = Vec2::new(200.0, 498.0);
        let mut vel = Vec2::new(0.0, 200.0);
        paddle_bounce(&mut pos, &mut vel, 8.0, 300.0, &paddle, min_angle);
        let angle = (-vel.y).atan2(vel.x);
        assert!((angle - min_angle).abs() < 0.001);
        assert!(vel.x > 0.0);

        // Far left edge mirrors it
        let mut pos = Vec2::new(100.0, 498.0);
        let mut vel = Vec2::new(0.0, 200.0);
        paddle_bounce(&mut pos, &mut vel, 8.0, 300.0, &paddle, min_angle);
        let angle = (-vel.y).atan2(vel.x);
        assert!((angle - (std::f32::consts::PI - min_angle)).abs() < 0.001);
        assert!(vel.x < 0.0);
    }

    #[test]
    fn test_paddle_bounce_preserves_speed() {
        let paddle = Rect::new(100.0, 500.0, 100.0, 16.0);
        for x in [100.0, 120.0, 150.0, 180.0, 200.0] {
            let mut pos = Vec2::new(x, 498.0);
            let mut vel = Vec2::new(17.0, 211.0);
            paddle_bounce(&mut pos, &mut vel, 8.0, 300.0, &paddle, 0.5);
            assert!((vel.length() - 300.0).abs() < 0.01);
            assert!(vel.y < 0.0);
        }
    }

    #[test]
    fn test_rect_overlaps() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 10.0, 5.0, 5.0); // touching corner counts
        let c = Rect::new(20.0, 0.0, 5.0, 5.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
