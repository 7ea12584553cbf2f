//! Asteroid Siege headless runner
//!
//! Flies the autopilot through a full campaign and prints the final tick
//! result as JSON. Rendering and input belong to a separate host.
//!
//! Usage: `asteroid-siege [seed] [tuning.json]`

use anyhow::{Context, Result};

use asteroid_siege::consts::TICK_RATE_HZ;
use asteroid_siege::sim::{GameEvent, Simulation, TickInput};
use asteroid_siege::{CueLog, Tuning};

/// Give up after ten simulated minutes
const MAX_TICKS: u32 = 10 * 60 * TICK_RATE_HZ;
/// Ticks per host frame in the headless loop
const TICKS_PER_FRAME: u32 = 1;

fn load_tuning(path: Option<&str>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading tuning file {path}"))?;
    Tuning::from_json(&json).with_context(|| format!("parsing tuning file {path}"))
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let seed = match args.get(1) {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("seed must be an integer, got {raw:?}"))?,
        None => 0x5EED,
    };
    let tuning = load_tuning(args.get(2).map(String::as_str))?;

    log::info!("Asteroid Siege (headless) starting with seed {}", seed);
    let mut sim = Simulation::with_tuning(seed, tuning);
    let mut cues = CueLog::new();
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let mut elapsed = 0;
    let mut result = sim.tick(&input, 0);
    while elapsed < MAX_TICKS && !result.is_game_over() {
        result = sim.tick_with_sink(&input, TICKS_PER_FRAME, &mut cues);
        elapsed += result.ticks_run.max(1);

        for event in result.events() {
            if let GameEvent::PhaseChanged { to, .. } = event {
                log::info!("[tick {}] {}", elapsed, to.banner());
            }
        }
        for cue in cues.drain() {
            log::trace!("cue {:?}", cue);
        }
    }

    match result.phase.outcome() {
        Some(outcome) => log::info!("{} after {} ticks", outcome.message(), elapsed),
        None => log::info!("Stopped in {:?} after {} ticks", result.phase, elapsed),
    }

    let json = serde_json::to_string_pretty(&result).context("serializing final result")?;
    println!("{json}");
    Ok(())
}
