//! Collision and damage resolution
//!
//! Hits are binary circle overlaps. Every pass marks entities disabled
//! instead of touching a collection it is iterating. New fragments are
//! handed back to the phase step, which commits them together with the
//! removals through `sweep` once all passes have run.

use glam::Vec2;

use super::state::{Asteroid, CampaignState, GameEvent, Ship};

/// Result of the hazard-versus-ship pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipDamage {
    /// No hit landed
    None,
    /// Ship lost a life and is now invincible
    Hit,
    /// Ship lost its last life
    Destroyed,
}

impl ShipDamage {
    pub fn landed(self) -> bool {
        self != ShipDamage::None
    }
}

/// Player bullets against asteroids.
///
/// Asteroids are visited in order; each takes the first live bullet that
/// overlaps it, so a bullet scores at most once. Large and Medium asteroids
/// leave two fragments of the next tier at their position; they are returned
/// rather than inserted, so no later pass this tick can see them.
pub fn resolve_bullets_vs_asteroids(
    state: &mut CampaignState,
    events: &mut Vec<GameEvent>,
) -> Vec<Asteroid> {
    let mut fragments: Vec<Asteroid> = Vec::new();

    for ai in 0..state.asteroids.len() {
        if state.asteroids[ai].body.disabled {
            continue;
        }
        let hit = state
            .bullets
            .iter()
            .position(|b| !b.body.disabled && b.body.collides(&state.asteroids[ai].body));
        let Some(bi) = hit else { continue };

        state.bullets[bi].body.disable();
        let asteroid = &mut state.asteroids[ai];
        asteroid.body.disable();
        let (tier, pos) = (asteroid.tier, asteroid.body.pos);

        let children = match tier.split() {
            Some(child_tier) => {
                for _ in 0..2 {
                    let fragment = state.make_fragment(child_tier, pos);
                    fragments.push(fragment);
                }
                2
            }
            None => 0,
        };
        log::debug!("{:?} asteroid destroyed at {:?}", tier, pos);
        events.push(GameEvent::AsteroidDestroyed {
            tier,
            pos,
            children,
        });
    }

    fragments
}

/// Player bullets against shields, then against the boss.
///
/// Returns true when the boss lost its last life.
pub fn resolve_bullets_vs_boss(state: &mut CampaignState, events: &mut Vec<GameEvent>) -> bool {
    for shield in state.shields.iter_mut().filter(|s| !s.body.disabled) {
        let hit = state
            .bullets
            .iter_mut()
            .find(|b| !b.body.disabled && b.body.collides(&shield.body));
        if let Some(bullet) = hit {
            bullet.body.disable();
            shield.body.disable();
            events.push(GameEvent::ShieldDestroyed {
                pos: shield.body.pos,
            });
        }
    }

    let Some(boss) = state.boss.as_mut() else {
        return false;
    };
    // Shots pass through the boss until it holds its engagement row
    if !boss.is_damageable() {
        return false;
    }
    for bullet in state.bullets.iter_mut().filter(|b| !b.body.disabled) {
        if boss.lives == 0 {
            break;
        }
        if bullet.body.collides(&boss.body) {
            bullet.body.disable();
            boss.lives -= 1;
            log::debug!("Boss hit, {} lives left", boss.lives);
            events.push(GameEvent::BossDamaged {
                lives_left: boss.lives,
            });
        }
    }
    boss.lives == 0
}

/// Take one life from the ship.
///
/// `recenter` moves the ship back to the given point (field phases only).
pub fn damage_ship(
    ship: &mut Ship,
    invincibility_ticks: u32,
    recenter: Option<Vec2>,
    events: &mut Vec<GameEvent>,
) -> ShipDamage {
    ship.lives = ship.lives.saturating_sub(1);
    events.push(GameEvent::ShipHit {
        lives_left: ship.lives,
    });
    if ship.lives == 0 {
        log::info!("Ship destroyed");
        ship.body.disable();
        return ShipDamage::Destroyed;
    }
    log::debug!("Ship hit, {} lives left", ship.lives);
    if invincibility_ticks > 0 {
        ship.invincibility_timer = 1;
    }
    if let Some(center) = recenter {
        ship.body.pos = center;
    }
    ShipDamage::Hit
}

/// Surviving asteroids against the ship
pub fn resolve_asteroids_vs_ship(
    state: &mut CampaignState,
    events: &mut Vec<GameEvent>,
) -> ShipDamage {
    if !state.ship.is_vulnerable() {
        return ShipDamage::None;
    }
    let ship_body = state.ship.body;
    let touching = state
        .asteroids
        .iter()
        .any(|a| !a.body.disabled && a.body.collides(&ship_body));
    if !touching {
        return ShipDamage::None;
    }
    let center = state.field_center();
    damage_ship(
        &mut state.ship,
        state.tuning.invincibility_ticks,
        Some(center),
        events,
    )
}

/// Shields, boss contact and enemy bullets against the ship.
///
/// The ship stays where it is when hit. An enemy bullet that lands is spent.
pub fn resolve_boss_hazards_vs_ship(
    state: &mut CampaignState,
    events: &mut Vec<GameEvent>,
) -> ShipDamage {
    if !state.ship.is_vulnerable() {
        return ShipDamage::None;
    }
    let ship_body = state.ship.body;

    let mut touching = state
        .shields
        .iter()
        .any(|s| !s.body.disabled && s.body.collides(&ship_body))
        || state
            .boss
            .as_ref()
            .is_some_and(|b| b.body.collides(&ship_body));

    if !touching {
        if let Some(bullet) = state
            .enemy_bullets
            .iter_mut()
            .find(|b| !b.body.disabled && b.body.collides(&ship_body))
        {
            bullet.body.disable();
            touching = true;
        }
    }

    if !touching {
        return ShipDamage::None;
    }
    damage_ship(
        &mut state.ship,
        state.tuning.invincibility_ticks,
        None,
        events,
    )
}

/// Advance the invincibility window.
///
/// The tick of the hit counts as the first tick of the window, so the ship is
/// vulnerable again exactly `window` ticks after the hit.
pub fn advance_invincibility(ship: &mut Ship, window: u32, hit_this_tick: bool) {
    if ship.invincibility_timer == 0 {
        return;
    }
    if !hit_this_tick {
        ship.invincibility_timer += 1;
    }
    if ship.invincibility_timer >= window {
        ship.invincibility_timer = 0;
    }
}

/// Drop everything disabled during the tick
pub fn sweep(state: &mut CampaignState) {
    state.asteroids.retain(|a| !a.body.disabled);
    state.bullets.retain(|b| !b.body.disabled);
    state.shields.retain(|s| !s.body.disabled);
    state.enemy_bullets.retain(|b| !b.body.disabled);
}
