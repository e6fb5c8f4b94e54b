//! Data-driven game balance
//!
//! Every feel-critical number lives in one serde table so sessions can
//! be rebalanced from a JSON file without recompiling. `Default` is the
//! shipped balance; a tuning file only needs the fields it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Gameplay balance values, fixed for the lifetime of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Throttle/brake acceleration (pixels/s²)
    pub accel_rate: f32,
    /// Asymmetric speed bounds: reversing is slower than riding
    pub min_speed: f32,
    pub max_speed: f32,
    /// Per-tick speed retention with no input
    pub idle_damping: f32,

    /// Downward acceleration (y-down, pixels/s²)
    pub gravity: f32,
    /// Upward launch velocity (negative = up)
    pub jump_impulse: f32,

    /// How fast directional input winds up the spin (rad/s per second)
    pub air_rotation_rate: f32,
    /// Hard bound on radians added per tick
    pub rotation_speed_max: f32,
    /// Per-tick spin retention while both wheels are down
    pub ground_rotation_damping: f32,
    /// Landing steeper than this (folded into (-π, π]) ends the run.
    /// Earlier builds used π/2; 0.62π keeps sloppy landings survivable.
    pub crash_angle: f32,

    /// Visual bounce applied on landing and its per-tick decay
    pub suspension_kick: f32,
    pub suspension_decay: f32,

    /// Paid immediately at each full 2π of same-direction air rotation
    pub flip_bonus: u64,
    /// Paid per banked flip on a clean landing
    pub flip_landing_bonus: u64,

    pub boost_radius: f32,
    pub boost_impulse: f32,
    pub boost_score: u64,

    pub hazard_radius: f32,
    /// Vertical band above the hazard's ground that still counts as a hit
    pub hazard_clearance: f32,

    /// Pickup distance (compared squared)
    pub coin_radius: f32,
    pub coin_score: u64,

    pub milestone_step: f32,
    pub milestone_bonus: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            accel_rate: 2500.0,
            min_speed: -850.0,
            max_speed: 900.0,
            idle_damping: 0.95,

            gravity: 2000.0,
            jump_impulse: -900.0,

            air_rotation_rate: 5.0,
            rotation_speed_max: 0.22,
            ground_rotation_damping: 0.8,
            crash_angle: 0.62 * std::f32::consts::PI,

            suspension_kick: 18.0,
            suspension_decay: 0.8,

            flip_bonus: 100,
            flip_landing_bonus: 50,

            boost_radius: 45.0,
            boost_impulse: 400.0,
            boost_score: 5,

            hazard_radius: 40.0,
            hazard_clearance: 80.0,

            coin_radius: 70.0,
            coin_score: 25,

            milestone_step: 1000.0,
            milestone_bonus: 50,
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load a tuning file, falling back to the shipped balance when the
    /// file is missing or malformed.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("invalid tuning file {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
