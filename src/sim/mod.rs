//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod body;
pub mod collision;
pub mod phase;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use body::Body;
pub use collision::ShipDamage;
pub use snapshot::{DrawItem, ShipSnapshot, VisualTag, draw_list};
pub use state::{
    Asteroid, AsteroidTier, Boss, CampaignState, EnemyBullet, EntityId, GameEvent, Outcome, Phase,
    PlayerBullet, Shield, Ship,
};
pub use tick::{EventSink, Simulation, TickInput, TickResult, tick};
