//! Read-only views for the host
//!
//! Built after a tick completes, so the order is stable for the whole frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{AsteroidTier, CampaignState, Ship};

/// What the renderer should draw for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualTag {
    Ship,
    ShipThrust,
    ShipBrake,
    AsteroidLarge,
    AsteroidMedium,
    AsteroidSmall,
    PlayerBullet,
    EnemyBullet,
    Shield,
    Boss,
}

impl From<AsteroidTier> for VisualTag {
    fn from(tier: AsteroidTier) -> Self {
        match tier {
            AsteroidTier::Large => VisualTag::AsteroidLarge,
            AsteroidTier::Medium => VisualTag::AsteroidMedium,
            AsteroidTier::Small => VisualTag::AsteroidSmall,
        }
    }
}

/// One drawable entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawItem {
    pub pos: Vec2,
    pub radius: f32,
    pub tag: VisualTag,
}

/// Ship state for HUD and sprite orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipSnapshot {
    pub pos: Vec2,
    pub direction: Vec2,
    pub lives: u32,
    pub invincibility_timer: u32,
    pub disabled: bool,
}

impl From<&Ship> for ShipSnapshot {
    fn from(ship: &Ship) -> Self {
        Self {
            pos: ship.body.pos,
            direction: ship.direction,
            lives: ship.lives,
            invincibility_timer: ship.invincibility_timer,
            disabled: ship.body.disabled,
        }
    }
}

fn ship_tag(ship: &Ship) -> VisualTag {
    match ship.thrust_sign {
        s if s > 0 => VisualTag::ShipThrust,
        s if s < 0 => VisualTag::ShipBrake,
        _ => VisualTag::Ship,
    }
}

/// Live entities in draw order: asteroids, player bullets, ship, boss,
/// shields, enemy bullets
pub fn draw_list(state: &CampaignState) -> Vec<DrawItem> {
    let mut items = Vec::with_capacity(
        state.asteroids.len() + state.bullets.len() + state.shields.len()
            + state.enemy_bullets.len()
            + 2,
    );

    items.extend(state.asteroids.iter().filter(|a| !a.body.disabled).map(|a| DrawItem {
        pos: a.body.pos,
        radius: a.body.radius,
        tag: a.tier.into(),
    }));
    items.extend(state.bullets.iter().filter(|b| !b.body.disabled).map(|b| DrawItem {
        pos: b.body.pos,
        radius: b.body.radius,
        tag: VisualTag::PlayerBullet,
    }));
    if !state.ship.is_disabled() {
        items.push(DrawItem {
            pos: state.ship.body.pos,
            radius: state.ship.body.radius,
            tag: ship_tag(&state.ship),
        });
    }
    if let Some(boss) = &state.boss {
        items.push(DrawItem {
            pos: boss.body.pos,
            radius: boss.body.radius,
            tag: VisualTag::Boss,
        });
    }
    items.extend(state.shields.iter().filter(|s| !s.body.disabled).map(|s| DrawItem {
        pos: s.body.pos,
        radius: s.body.radius,
        tag: VisualTag::Shield,
    }));
    items.extend(
        state
            .enemy_bullets
            .iter()
            .filter(|b| !b.body.disabled)
            .map(|b| DrawItem {
                pos: b.body.pos,
                radius: b.body.radius,
                tag: VisualTag::EnemyBullet,
            }),
    );
    items
}
