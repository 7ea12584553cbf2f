//! Moving, collidable circle shared by every entity
//!
//! Each entity variant embeds a `Body` and adds its own state on top.
//! Movement comes in two flavours: wrapping (ship, asteroids, shields, boss)
//! and free flight (bullets, removed once they leave the wrap margin).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::wrap_coordinate;

/// Position, velocity and collision circle of a simulated object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Collision radius, always > 0
    pub radius: f32,
    /// Soft-delete flag; disabled bodies are dropped at the end of the tick
    pub disabled: bool,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        debug_assert!(radius > 0.0, "body radius must be positive");
        Self {
            pos,
            vel,
            radius,
            disabled: false,
        }
    }

    /// Advance one tick and wrap around the field edges.
    ///
    /// Axes wrap independently, so a diagonal exit through a corner
    /// re-enters through the opposite corner in the same tick.
    pub fn advance_wrapping(&mut self, field: Vec2) {
        self.pos += self.vel;
        self.pos.x = wrap_coordinate(self.pos.x, self.radius, field.x);
        self.pos.y = wrap_coordinate(self.pos.y, self.radius, field.y);
    }

    /// Advance one tick without wrapping
    #[inline]
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// Circle-circle overlap test
    #[inline]
    pub fn collides(&self, other: &Body) -> bool {
        self.pos.distance(other.pos) < self.radius + other.radius
    }

    /// True once the whole circle has left the field plus its wrap margin
    pub fn is_out_of_bounds(&self, field: Vec2) -> bool {
        self.pos.x < -self.radius
            || self.pos.x > field.x + self.radius
            || self.pos.y < -self.radius
            || self.pos.y > field.y + self.radius
    }

    /// Mark for removal
    #[inline]
    pub fn disable(&mut self) {
        self.disabled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FIELD: Vec2 = Vec2::new(1024.0, 768.0);

    #[test]
    fn test_left_exit_reenters_right_with_overshoot() {
        let mut body = Body::new(Vec2::new(-9.0, 100.0), Vec2::new(-3.0, 0.0), 10.0);
        body.advance_wrapping(FIELD);
        // -12 is 2 past the margin, so it lands 2 inside the right margin
        assert!((body.pos.x - (1024.0 + 10.0 - 2.0)).abs() < 1e-3);
        assert_eq!(body.pos.y, 100.0);
    }

    #[test]
    fn test_corner_exit_wraps_both_axes() {
        let mut body = Body::new(Vec2::new(1030.0, 775.0), Vec2::new(5.0, 5.0), 8.0);
        body.advance_wrapping(FIELD);
        assert!(body.pos.x < 0.0);
        assert!(body.pos.y < 0.0);
    }

    #[test]
    fn test_plain_advance_does_not_wrap() {
        let mut body = Body::new(Vec2::new(2.0, 2.0), Vec2::new(-6.0, 0.0), 4.0);
        body.advance();
        assert_eq!(body.pos, Vec2::new(-4.0, 2.0));
        assert!(!body.is_out_of_bounds(FIELD));
        body.advance();
        assert!(body.is_out_of_bounds(FIELD));
    }

    #[test]
    fn test_touching_circles_do_not_collide() {
        let a = Body::new(Vec2::new(0.0, 0.0), Vec2::ZERO, 5.0);
        let b = Body::new(Vec2::new(10.0, 0.0), Vec2::ZERO, 5.0);
        assert!(!a.collides(&b));
        let c = Body::new(Vec2::new(9.9, 0.0), Vec2::ZERO, 5.0);
        assert!(a.collides(&c));
    }

    proptest! {
        #[test]
        fn prop_wrap_keeps_body_in_margin(
            x in -60.0f32..1084.0,
            y in -60.0f32..828.0,
            vx in -10.0f32..10.0,
            vy in -10.0f32..10.0,
            radius in 1.0f32..50.0,
        ) {
            let mut body = Body::new(Vec2::new(x, y), Vec2::new(vx, vy), radius);
            body.pos.x = wrap_coordinate(body.pos.x, radius, FIELD.x);
            body.pos.y = wrap_coordinate(body.pos.y, radius, FIELD.y);
            for _ in 0..50 {
                body.advance_wrapping(FIELD);
                prop_assert!(body.pos.x >= -radius && body.pos.x <= FIELD.x + radius);
                prop_assert!(body.pos.y >= -radius && body.pos.y <= FIELD.y + radius);
            }
        }

        #[test]
        fn prop_collision_is_symmetric(
            ax in -100.0f32..1100.0, ay in -100.0f32..900.0, ar in 0.5f32..80.0,
            bx in -100.0f32..1100.0, by in -100.0f32..900.0, br in 0.5f32..80.0,
        ) {
            let a = Body::new(Vec2::new(ax, ay), Vec2::ZERO, ar);
            let b = Body::new(Vec2::new(bx, by), Vec2::ZERO, br);
            prop_assert_eq!(a.collides(&b), b.collides(&a));
        }
    }
}
