//! Startup tuning
//!
//! Read once before the first tick and never mutated afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Campaign-wide constants that a host may override at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Playfield width
    pub field_width: f32,
    /// Playfield height
    pub field_height: f32,
    /// Large asteroids seeded when Field 1 begins
    pub field1_asteroids: usize,
    /// Large asteroids added whenever Field 2 runs dry
    pub field2_top_up: usize,
    /// Lives the ship starts with
    pub ship_lives: u32,
    /// Lives the boss starts with
    pub boss_lives: u32,
    /// Length of the damage immunity window in ticks
    pub invincibility_ticks: u32,
    /// Minimum spawn distance from the ship, in ship radii
    pub min_spawn_distance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            field1_asteroids: FIELD1_ASTEROIDS,
            field2_top_up: FIELD2_TOP_UP,
            ship_lives: SHIP_LIVES,
            boss_lives: BOSS_LIVES,
            invincibility_ticks: INVINCIBILITY_TICKS,
            min_spawn_distance: MIN_DISTANCE,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        log::info!(
            "Loaded tuning: field {}x{}, ship lives {}, boss lives {}",
            tuning.field_width,
            tuning.field_height,
            tuning.ship_lives,
            tuning.boss_lives
        );
        Ok(tuning)
    }

    /// Playfield size as a vector
    #[inline]
    pub fn field_size(&self) -> Vec2 {
        Vec2::new(self.field_width, self.field_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let tuning = Tuning::default();
        assert_eq!(tuning.field_size(), Vec2::new(1024.0, 768.0));
        assert_eq!(tuning.invincibility_ticks, 1000);
        assert_eq!(tuning.ship_lives, 5);
        assert_eq!(tuning.boss_lives, 9);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "ship_lives": 2, "field2_top_up": 4 }"#).unwrap();
        assert_eq!(tuning.ship_lives, 2);
        assert_eq!(tuning.field2_top_up, 4);
        assert_eq!(tuning.field1_asteroids, FIELD1_ASTEROIDS);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("{ ship_lives: }").is_err());
    }
}
