//! Dirt Dash entry point
//!
//! Headless demo driver: fast-forwards a scripted session (full
//! throttle, periodic jumps, restart on crash) and reports the result.
//! A rendering host embeds the library instead and calls `tick` once
//! per frame with real input.

use std::path::Path;

use dirt_dash::platform::{Clock, InputTracker, KeyState, SystemClock, Viewport};
use dirt_dash::sim::{GameState, tick};
use dirt_dash::Tuning;

/// Simulated run length (seconds) and fixed fast-forward step
const RUN_SECONDS: f32 = 60.0;
const STEP: f32 = 1.0 / 120.0;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xD1A7);
    let tuning = Tuning::load(Path::new("tuning.json"));
    let mut state = GameState::with_tuning(seed, Viewport::default(), tuning);
    let mut tracker = InputTracker::default();

    let clock = SystemClock::new();
    let started = clock.now();
    let total_ticks = (RUN_SECONDS / STEP) as u64;
    let mut crashes = 0u32;

    for tick_no in 0..total_ticks {
        let bike = &state.bike;
        tracker.set_keys(KeyState {
            accelerate: true,
            brake: false,
            // A short jab of jump every two seconds, when the bike can take it
            jump: tick_no % 240 < 4 && bike.grounded_front && bike.grounded_rear,
            restart: state.crashed,
        });
        if state.crashed {
            crashes += 1;
        }
        tick(&mut state, &tracker.snapshot(), STEP);
    }

    let wall = clock.now() - started;
    log::info!(
        "simulated {RUN_SECONDS}s in {wall:.3}s wall time ({total_ticks} ticks)"
    );

    println!(
        "seed {seed}: score {}, distance {:.0}, coins {}, crashes {}",
        state.score, state.bike.pos.x, state.coins_collected, crashes
    );
    match serde_json::to_string_pretty(&state) {
        Ok(snapshot) => println!("{snapshot}"),
        Err(e) => log::error!("snapshot failed: {e}"),
    }
}
