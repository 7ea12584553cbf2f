//! Phase state machine
//!
//! Each phase step runs the same fixed order: move everything, resolve
//! bullets against hazards, resolve hazards against the ship, advance the
//! invincibility window, spawn, then commit removals and insertions.
//! A ship destroyed mid-step ends the step on the spot.

use super::collision::{
    ShipDamage, advance_invincibility, resolve_asteroids_vs_ship, resolve_boss_hazards_vs_ship,
    resolve_bullets_vs_asteroids, resolve_bullets_vs_boss, sweep,
};
use super::state::{CampaignState, GameEvent, Outcome, Phase};
use crate::consts::ENEMY_BULLET_CAP;

/// Advance the active phase by one tick and apply any resulting transition
pub fn step_phase(state: &mut CampaignState, events: &mut Vec<GameEvent>) {
    match state.phase {
        Phase::Field1 | Phase::Field2 => step_field(state, events),
        Phase::BossIntro | Phase::BossFight => step_boss(state, events),
        Phase::Victory | Phase::Defeat => {}
    }
}

/// Phase the debug skip jumps to, if any
pub fn skip_target(phase: Phase) -> Option<Phase> {
    match phase {
        Phase::Field1 => Some(Phase::Field2),
        Phase::Field2 => Some(Phase::BossIntro),
        Phase::BossIntro | Phase::BossFight | Phase::Victory | Phase::Defeat => None,
    }
}

fn end_encounter(state: &mut CampaignState, outcome: Outcome, events: &mut Vec<GameEvent>) {
    state.enter_phase(outcome.phase(), events);
}

/// Asteroid waves
fn step_field(state: &mut CampaignState, events: &mut Vec<GameEvent>) {
    let field = state.field_size();
    for asteroid in &mut state.asteroids {
        asteroid.update(field);
    }
    for bullet in &mut state.bullets {
        bullet.update(field);
    }
    state.ship.update(field);

    let fragments = resolve_bullets_vs_asteroids(state, events);

    let damage = resolve_asteroids_vs_ship(state, events);
    sweep(state);
    state.asteroids.extend(fragments);
    if damage == ShipDamage::Destroyed {
        end_encounter(state, Outcome::Defeat, events);
        return;
    }

    let window = state.tuning.invincibility_ticks;
    advance_invincibility(&mut state.ship, window, damage.landed());

    if state.asteroids.is_empty() {
        match state.phase {
            Phase::Field1 => {
                log::info!("Field 1 cleared at tick {}", state.time_ticks);
                state.enter_phase(Phase::Field2, events);
            }
            // Endurance wave: refill instead of ending
            _ => state.top_up_field(),
        }
    }
}

/// Boss descent and fight
fn step_boss(state: &mut CampaignState, events: &mut Vec<GameEvent>) {
    let field = state.field_size();
    for bullet in &mut state.bullets {
        bullet.update(field);
    }
    for bullet in &mut state.enemy_bullets {
        bullet.update(field);
    }
    state.ship.update(field);
    for shield in &mut state.shields {
        shield.update(field);
    }

    let engaged_now = state.boss.as_mut().is_some_and(|boss| boss.update(field));
    if engaged_now {
        log::info!("Boss engaged at tick {}", state.time_ticks);
        state.enter_phase(Phase::BossFight, events);
    } else if state.phase == Phase::BossFight
        && state.shields.is_empty()
        && state.boss.as_ref().is_some_and(|b| b.is_over_engagement_point())
    {
        state.spawn_formation(events);
    }

    let boss_defeated = resolve_bullets_vs_boss(state, events);

    let damage = resolve_boss_hazards_vs_ship(state, events);
    if damage == ShipDamage::Destroyed {
        sweep(state);
        end_encounter(state, Outcome::Defeat, events);
        return;
    }

    let window = state.tuning.invincibility_ticks;
    advance_invincibility(&mut state.ship, window, damage.landed());

    if boss_defeated {
        sweep(state);
        log::info!("Boss defeated at tick {}", state.time_ticks);
        end_encounter(state, Outcome::Victory, events);
        return;
    }

    fire_shields(state);
    sweep(state);
}

/// Shields in the firing band each keep at most one bullet in flight
fn fire_shields(state: &mut CampaignState) {
    let mut live = state
        .enemy_bullets
        .iter()
        .filter(|b| !b.body.disabled)
        .count();

    let mut volley = Vec::new();
    for shield in state.shields.iter().filter(|s| !s.body.disabled) {
        if live >= ENEMY_BULLET_CAP {
            break;
        }
        if !shield.can_fire() {
            continue;
        }
        let busy = state
            .enemy_bullets
            .iter()
            .any(|b| !b.body.disabled && b.launcher == shield.id);
        if busy {
            continue;
        }
        volley.push(shield.id);
        live += 1;
    }

    for launcher in volley {
        let id = state.next_entity_id();
        if let Some(shield) = state.shields.iter().find(|s| s.id == launcher) {
            let bullet = shield.fire(id);
            state.enemy_bullets.push(bullet);
        }
    }
}
