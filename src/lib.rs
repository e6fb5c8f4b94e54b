//! Dirt Dash - a side-scrolling motorcycle stunt game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, terrain collision, flips, particles)
//! - `platform`: Clock/input collaborators for the embedding host
//! - `tuning`: Data-driven game balance
//!
//! Rendering lives in the host: it reads the simulation state between
//! ticks and never mutates it.

pub mod platform;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Upper bound on a single tick's timestep (seconds). Longer frames
    /// are truncated, never split into substeps.
    pub const MAX_DT: f32 = 0.032;

    /// Bike geometry - horizontal rear-to-front axle distance when level
    pub const WHEEL_BASE: f32 = 140.0;
    pub const WHEEL_RADIUS: f32 = 30.0;

    /// Canonical spawn x for a fresh run
    pub const START_X: f32 = 200.0;

    /// Camera keeps the bike this far from the left edge
    pub const CAMERA_LEAD: f32 = 300.0;
    /// Exponential follow rate (per second)
    pub const CAMERA_SMOOTHING: f32 = 5.0;

    /// Particle caps and physics
    pub const MAX_PARTICLES: usize = 256;
    /// Downward acceleration applied to every particle (pixels/s²)
    pub const PARTICLE_GRAVITY: f32 = 800.0;
    /// Rear wheel throws a dirt trail above this ground speed
    pub const DIRT_TRAIL_MIN_SPEED: f32 = 100.0;

    /// Default viewport when the host doesn't report one
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 720.0;
}

/// Fold an unbounded angle accumulator into (-π, π].
///
/// The rotation accumulator is kept unbounded for integration smoothness;
/// every semantic decision (crash test, flip extraction) reduces through
/// this. Convention: sign-preserving remainder first, then the half-turn
/// overflow is folded, so 3π/2 maps to -π/2 and -3π/2 maps to π/2.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}
