//! Asteroid Siege - simulation core for a wrap-around arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, phase machine, driver)
//! - `tuning`: Startup configuration (field size, pool sizes, lives)
//! - `cues`: Mapping from simulation events to abstract sound cues

pub mod cues;
pub mod sim;
pub mod tuning;

pub use cues::{CueLog, SoundCue};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Host tick rate the simulation is tuned for
    pub const TICK_RATE_HZ: u32 = 60;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 1024.0;
    pub const FIELD_HEIGHT: f32 = 768.0;

    /// Ship handling
    pub const SHIP_RADIUS: f32 = 16.0;
    pub const SHIP_LIVES: u32 = 5;
    /// Degrees per tick
    pub const SHIP_MANEUVERABILITY: f32 = 3.0;
    pub const SHIP_FORCE: f32 = 0.1;
    /// Per-axis clamp
    pub const SHIP_SPEED_LIMIT: f32 = 3.0;

    /// Ticks of damage immunity after a hit
    pub const INVINCIBILITY_TICKS: u32 = 1000;

    /// Asteroids
    pub const ASTEROID_RADIUS_LARGE: f32 = 48.0;
    pub const ASTEROID_RADIUS_MEDIUM: f32 = 24.0;
    pub const ASTEROID_RADIUS_SMALL: f32 = 12.0;
    /// Per-axis speed table. 0.5 appears twice on purpose.
    pub const ASTEROID_SPEEDS: [f32; 8] = [-2.0, -1.5, -1.0, 0.5, 0.5, 1.0, 1.5, 2.0];
    /// Fresh asteroids keep this many ship radii away from the ship
    pub const MIN_DISTANCE: f32 = 20.0;
    pub const FIELD1_ASTEROIDS: usize = 5;
    pub const FIELD2_TOP_UP: usize = 2;
    /// Rejection sampling budget before settling for the farthest candidate
    pub const MAX_SPAWN_ATTEMPTS: u32 = 64;

    /// Projectiles
    pub const PLAYER_BULLET_RADIUS: f32 = 4.0;
    pub const PLAYER_BULLET_SPEED: f32 = 6.0;
    pub const ENEMY_BULLET_RADIUS: f32 = 5.0;
    pub const ENEMY_BULLET_SPEED: f32 = 3.0;
    /// Total enemy bullets allowed in flight
    pub const ENEMY_BULLET_CAP: usize = 8;

    /// Boss encounter
    pub const BOSS_RADIUS: f32 = 64.0;
    pub const BOSS_LIVES: u32 = 9;
    pub const BOSS_SPAWN_X: f32 = 512.0;
    pub const BOSS_SPAWN_Y: f32 = -50.0;
    pub const BOSS_DESCENT_SPEED: f32 = 0.5;
    pub const BOSS_ENGAGE_X: f32 = 512.0;
    pub const BOSS_ENGAGE_Y: f32 = 200.0;
    pub const BOSS_PATROL_SPEED: f32 = 1.0;
    pub const BOSS_PATROL_RANGE: f32 = 200.0;

    /// Shields
    pub const SHIELD_RADIUS: f32 = 20.0;
    pub const SHIELD_PATROL_SPEED: f32 = 1.5;
    pub const SHIELD_PATROL_RANGE: f32 = 312.0;
    /// Shields at or below this y open fire
    pub const SHIELD_FIRE_Y: f32 = 200.0;
    /// Mirrored about x = 512
    pub const SHIELD_FORMATION: [(f32, f32); 14] = [
        (512.0, 50.0),
        (512.0, 300.0),
        (452.0, 70.0),
        (452.0, 280.0),
        (392.0, 110.0),
        (392.0, 240.0),
        (332.0, 150.0),
        (332.0, 200.0),
        (572.0, 70.0),
        (572.0, 280.0),
        (632.0, 110.0),
        (632.0, 240.0),
        (692.0, 150.0),
        (692.0, 200.0),
    ];
}

/// Toroidal wrap of a single coordinate.
///
/// An object leaving through one edge re-enters through the opposite one once
/// its whole circle has cleared the boundary.
#[inline]
pub fn wrap_coordinate(mut value: f32, radius: f32, extent: f32) -> f32 {
    let span = extent + radius * 2.0;
    if value < -radius {
        value += span;
    }
    if value > extent + radius {
        value -= span;
    }
    value
}

/// Rotate a vector by an angle in degrees.
///
/// Positive angles turn clockwise on screen (y grows downward).
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Field centre for a given field size
#[inline]
pub fn field_center(size: Vec2) -> Vec2 {
    size / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_left_edge_keeps_overshoot() {
        // 3 units past the left margin reappears 3 units inside the right margin
        let x = wrap_coordinate(-13.0, 10.0, 100.0);
        assert!((x - 107.0).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_inside_is_identity() {
        assert_eq!(wrap_coordinate(50.0, 10.0, 100.0), 50.0);
        assert_eq!(wrap_coordinate(-10.0, 10.0, 100.0), -10.0);
        assert_eq!(wrap_coordinate(110.0, 10.0, 100.0), 110.0);
    }

    #[test]
    fn test_rotate_degrees_quarter_turn() {
        let v = rotate_degrees(Vec2::new(0.0, -1.0), 90.0);
        assert!((v.x - 1.0).abs() < 1e-5);
        assert!(v.y.abs() < 1e-5);
    }

    #[test]
    fn test_formation_is_mirrored() {
        use consts::SHIELD_FORMATION;
        for &(x, y) in &SHIELD_FORMATION {
            let mirrored = (1024.0 - x, y);
            assert!(
                SHIELD_FORMATION.contains(&mirrored),
                "missing mirror of ({x}, {y})"
            );
        }
    }
}
