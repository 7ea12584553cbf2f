//! Fixed timestep simulation tick
//!
//! Core game loop that advances the campaign deterministically.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::phase::{skip_target, step_phase};
use super::snapshot::{DrawItem, ShipSnapshot, draw_list};
use super::state::{CampaignState, GameEvent, Phase};
use crate::tuning::Tuning;

/// Autopilot fires once every this many ticks
const AUTOPILOT_FIRE_INTERVAL: u64 = 12;
/// Autopilot fires when the target is within this angle of the heading (cosine)
const AUTOPILOT_AIM_COS: f32 = 0.94;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Turn counter-clockwise
    pub rotate_left: bool,
    /// Turn clockwise (wins over `rotate_left`)
    pub rotate_right: bool,
    /// Accelerate along the heading
    pub thrust: bool,
    /// Accelerate against the heading (loses to `thrust`)
    pub brake: bool,
    /// Fire one bullet (one-shot)
    pub fire: bool,
    /// Start a new playthrough; only honoured once the campaign has ended
    pub restart: bool,
    /// Skip to the next phase (debug/testing)
    pub skip_phase: bool,
    /// Demo mode - the autopilot flies the ship
    pub autopilot: bool,
}

impl TickInput {
    /// Drop inputs that must only act once per host frame
    pub fn clear_one_shots(&mut self) {
        self.fire = false;
        self.restart = false;
        self.skip_phase = false;
    }
}

/// Receiver for simulation events (audio, effects, telemetry)
pub trait EventSink {
    fn emit(&mut self, event: &GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: &GameEvent) {
        self.push(*event);
    }
}

/// Everything the host needs after a call to [`Simulation::tick`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickResult {
    pub phase: Phase,
    pub ship: ShipSnapshot,
    /// Draw list in stable order
    pub entities: Vec<DrawItem>,
    /// Events in the order they happened
    pub events: Vec<GameEvent>,
    /// Fixed steps actually simulated
    pub ticks_run: u32,
}

impl TickResult {
    pub fn events(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase.is_terminal()
    }
}

/// Advance the campaign by one fixed timestep.
///
/// Returns true if the step simulated anything.
pub fn tick(state: &mut CampaignState, input: &TickInput, events: &mut Vec<GameEvent>) -> bool {
    // Ended campaigns only react to a restart
    if state.phase.is_terminal() {
        if !input.restart {
            return false;
        }
        let from = state.phase;
        state.restart();
        events.push(GameEvent::PhaseChanged {
            from,
            to: state.phase,
        });
        return true;
    }

    // Debug: skip to next phase
    if input.skip_phase {
        if let Some(next) = skip_target(state.phase) {
            state.bullets.clear();
            state.enter_phase(next, events);
            return true;
        }
    }

    state.time_ticks += 1;

    let autopiloted;
    let input = if input.autopilot {
        autopiloted = autopilot(state);
        &autopiloted
    } else {
        input
    };
    apply_controls(state, input, events);

    step_phase(state, events);
    true
}

fn apply_controls(state: &mut CampaignState, input: &TickInput, events: &mut Vec<GameEvent>) {
    if state.ship.is_disabled() {
        return;
    }
    if input.rotate_right {
        state.ship.rotate(true);
    } else if input.rotate_left {
        state.ship.rotate(false);
    }

    state.ship.thrust_sign = 0;
    if input.thrust {
        state.ship.thrust(false);
    } else if input.brake {
        state.ship.thrust(true);
    }

    if input.fire {
        let id = state.next_entity_id();
        let bullet = state.ship.fire(id);
        events.push(GameEvent::ShotFired { pos: bullet.body.pos });
        state.bullets.push(bullet);
    }
}

/// Turn toward the nearest hazard and shoot when lined up
fn autopilot(state: &CampaignState) -> TickInput {
    let ship_pos = state.ship.body.pos;
    let hazards = state
        .asteroids
        .iter()
        .map(|a| a.body.pos)
        .chain(state.shields.iter().map(|s| s.body.pos))
        .chain(state.boss.iter().filter(|b| b.engaged).map(|b| b.body.pos));

    let target = hazards.min_by(|a, b| {
        a.distance_squared(ship_pos)
            .partial_cmp(&b.distance_squared(ship_pos))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut input = TickInput::default();
    let Some(target) = target else {
        return input;
    };

    let to_target = (target - ship_pos).normalize_or_zero();
    if to_target == Vec2::ZERO {
        return input;
    }
    let heading = state.ship.direction;
    // Positive angles turn clockwise on screen
    if heading.perp_dot(to_target) > 0.0 {
        input.rotate_right = true;
    } else {
        input.rotate_left = true;
    }
    input.fire = heading.dot(to_target) > AUTOPILOT_AIM_COS
        && state.time_ticks.is_multiple_of(AUTOPILOT_FIRE_INTERVAL);
    input
}

/// Host-facing driver owning one campaign
#[derive(Debug, Clone)]
pub struct Simulation {
    state: CampaignState,
}

impl Simulation {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: CampaignState::with_tuning(seed, tuning),
        }
    }

    pub fn from_state(state: CampaignState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &CampaignState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Run `dt_ticks` fixed steps with the same held input.
    ///
    /// One-shot inputs act on the first step only. Stepping stops early once
    /// the campaign ends; `dt_ticks == 0` only takes a snapshot.
    pub fn tick(&mut self, input: &TickInput, dt_ticks: u32) -> TickResult {
        let mut events = Vec::new();
        let mut input = input.clone();
        let mut ticks_run = 0;
        for _ in 0..dt_ticks {
            if !tick(&mut self.state, &input, &mut events) {
                break;
            }
            ticks_run += 1;
            input.clear_one_shots();
            if self.state.phase.is_terminal() {
                break;
            }
        }
        self.snapshot(events, ticks_run)
    }

    /// Same as [`Simulation::tick`], also forwarding every event to `sink`
    pub fn tick_with_sink(
        &mut self,
        input: &TickInput,
        dt_ticks: u32,
        sink: &mut dyn EventSink,
    ) -> TickResult {
        let result = self.tick(input, dt_ticks);
        for event in result.events() {
            sink.emit(event);
        }
        result
    }

    /// Reset to the start of Field 1 at a tick boundary
    pub fn restart(&mut self) {
        self.state.restart();
    }

    /// Drawable entities as of the last completed tick
    pub fn draw_list(&self) -> Vec<DrawItem> {
        draw_list(&self.state)
    }

    fn snapshot(&self, events: Vec<GameEvent>, ticks_run: u32) -> TickResult {
        TickResult {
            phase: self.state.phase,
            ship: ShipSnapshot::from(&self.state.ship),
            entities: self.draw_list(),
            events,
            ticks_run,
        }
    }
}
