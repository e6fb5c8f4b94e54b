//! Platform abstraction layer
//!
//! The collaborators a rendering host wires the simulation up to:
//! a monotonic clock to derive timesteps from, and an input tracker
//! that turns level key state into per-tick snapshots. Event handlers
//! never touch simulation state directly - they report key levels here
//! and the driver consumes one snapshot at the start of each tick.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH, MAX_DT};
use crate::sim::TickInput;

/// Canvas/window size the session is laid out against. The terrain
/// baseline and spawn defaults derive from it at reset time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

/// Latest logical key state, as reported by the host's event handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub accelerate: bool,
    pub brake: bool,
    pub jump: bool,
    pub restart: bool,
}

/// Converts level key state into per-tick input snapshots.
///
/// Restart is edge-detected here so a held key resets the session
/// exactly once; the sim itself never has to debounce.
#[derive(Debug, Default)]
pub struct InputTracker {
    keys: KeyState,
    restart_was_down: bool,
}

impl InputTracker {
    /// Record the latest key levels (call from event handlers).
    pub fn set_keys(&mut self, keys: KeyState) {
        self.keys = keys;
    }

    /// Produce the snapshot for the next tick.
    pub fn snapshot(&mut self) -> TickInput {
        let restart = self.keys.restart && !self.restart_was_down;
        self.restart_was_down = self.keys.restart;
        TickInput {
            accelerate: self.keys.accelerate,
            brake: self.keys.brake,
            jump: self.keys.jump,
            restart,
        }
    }
}

/// Monotonic time source (seconds since some fixed origin).
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock measured from process start.
pub struct SystemClock {
    start: std::time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Timestep between two clock readings, clamped to the sim's bound.
/// A backwards clock yields zero (the tick treats it as a no-op).
pub fn frame_dt(previous: f64, now: f64) -> f32 {
    ((now - previous) as f32).clamp(0.0, MAX_DT)
}
