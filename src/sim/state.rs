//! Session state and the entities that live for a whole run
//!
//! Everything a run needs is owned by one `GameState`; snapshotting the
//! struct (particles excluded) captures the session.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::particle::Particle;
use super::terrain::Terrain;
use crate::consts::*;
use crate::platform::Viewport;
use crate::tuning::Tuning;

/// Boost pads placed along the course
const COURSE_PADS: u32 = 8;
/// First pad center / spacing between pads (before jitter)
const PAD_BASE_X: f32 = 1200.0;
const PAD_SPACING: f32 = 900.0;

const COURSE_HAZARDS: u32 = 7;
const HAZARD_BASE_X: f32 = 1700.0;
const HAZARD_SPACING: f32 = 1300.0;

/// Coins come in arcs of three
const COURSE_COIN_ARCS: u32 = 12;
const COIN_ARC_BASE_X: f32 = 800.0;
const COIN_ARC_SPACING: f32 = 950.0;
const COIN_SPACING: f32 = 90.0;

/// The player's bike.
///
/// `pos` is the rear-axle reference point; the front wheel hangs off it
/// by `WHEEL_BASE` rotated through `rotation`. Motion is an ad-hoc
/// kinematic model tuned for feel, not a rigid body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bike {
    pub pos: Vec2,
    /// Horizontal speed (pixels/s), asymmetric bounds from tuning
    pub speed: f32,
    /// Vertical velocity (pixels/s, y-down so negative is up)
    pub vel_y: f32,
    /// Unbounded accumulator; fold with `wrap_angle` before comparing
    pub rotation: f32,
    /// Radians added to `rotation` each tick, clamped by tuning
    pub rotation_speed: f32,
    pub grounded_front: bool,
    pub grounded_rear: bool,
    /// Visual bounce after a landing; decays geometrically and never
    /// feeds back into collision
    pub suspension: f32,
    /// Full revolutions banked since the last landing
    pub completed_flips: u32,
    /// -1 / 0 / +1: sign of the rotation being accumulated mid-air
    pub flip_direction: i8,
    /// Radians of same-direction rotation since takeoff or last reversal
    pub air_rotation: f32,
}

impl Bike {
    /// Canonical spawn: resting on the terrain at `START_X`.
    pub fn at_start(terrain: &Terrain) -> Self {
        Self {
            pos: Vec2::new(START_X, terrain.height_at(START_X) - WHEEL_RADIUS),
            speed: 0.0,
            vel_y: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            grounded_front: true,
            grounded_rear: true,
            suspension: 0.0,
            completed_flips: 0,
            flip_direction: 0,
            air_rotation: 0.0,
        }
    }

    /// Not both wheels on the ground. Gates jumping and air rotation.
    #[inline]
    pub fn airborne(&self) -> bool {
        !(self.grounded_front && self.grounded_rear)
    }
}

/// A speed strip on the ground. Re-applies its impulse every tick the
/// bike stays inside the radius.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoostPad {
    pub x: f32,
}

/// A fixed obstacle; touching it near ground level ends the run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hazard {
    pub x: f32,
}

/// A collectible hovering above the terrain. Collected coins keep their
/// slot (the flag clears on reset) so the course never changes shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coin {
    pub x: f32,
    /// Height above local terrain (subtracted in y-down space)
    pub hover: f32,
    pub collected: bool,
}

impl Coin {
    pub fn pos(&self, terrain: &Terrain) -> Vec2 {
        Vec2::new(self.x, terrain.height_at(self.x) - self.hover)
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    /// Balance values this session was created with
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub terrain: Terrain,
    pub bike: Bike,
    /// Course features, immutable during a run
    pub pads: Vec<BoostPad>,
    pub hazards: Vec<Hazard>,
    pub coins: Vec<Coin>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    pub score: u64,
    pub coins_collected: u32,
    /// Terminal until `reset`
    pub crashed: bool,
    /// Seconds of live play this run
    pub elapsed: f32,
    /// Next distance threshold that pays a bonus
    pub next_milestone: f32,
    /// Smoothed horizontal draw offset for the host
    pub camera_x: f32,
    /// Simulation tick counter (also salts particle bursts)
    pub time_ticks: u64,
}

impl GameState {
    /// Create a session with default balance.
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        Self::with_tuning(seed, viewport, Tuning::default())
    }

    pub fn with_tuning(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        let terrain = Terrain::for_viewport(viewport.height);
        let bike = Bike::at_start(&terrain);
        let next_milestone = tuning.milestone_step;
        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            tuning,
            viewport,
            terrain,
            bike,
            pads: Vec::new(),
            hazards: Vec::new(),
            coins: Vec::new(),
            particles: Vec::new(),
            score: 0,
            coins_collected: 0,
            crashed: false,
            elapsed: 0.0,
            next_milestone,
            camera_x: 0.0,
            time_ticks: 0,
        };
        state.generate_course();
        state
    }

    /// Place boost pads, hazards and coin arcs along the course.
    ///
    /// Positions are jittered from the seeded RNG once at session start
    /// and never change during a run; the same seed lays out the same
    /// course.
    fn generate_course(&mut self) {
        let mut rng = self.rng_state.to_rng();

        for i in 0..COURSE_PADS {
            let x = PAD_BASE_X + i as f32 * PAD_SPACING + rng.random_range(-150.0..150.0);
            self.pads.push(BoostPad { x });
        }

        for i in 0..COURSE_HAZARDS {
            let x = HAZARD_BASE_X + i as f32 * HAZARD_SPACING + rng.random_range(-200.0..200.0);
            self.hazards.push(Hazard { x });
        }

        for i in 0..COURSE_COIN_ARCS {
            let base_x =
                COIN_ARC_BASE_X + i as f32 * COIN_ARC_SPACING + rng.random_range(-100.0..100.0);
            let base_hover = rng.random_range(50.0..110.0);
            for j in 0..3 {
                // Middle coin of each arc floats higher
                let hover = base_hover + if j == 1 { 40.0 } else { 0.0 };
                self.coins.push(Coin {
                    x: base_x + j as f32 * COIN_SPACING,
                    hover,
                    collected: false,
                });
            }
        }

        log::info!(
            "course ready: {} pads, {} hazards, {} coins (seed {})",
            self.pads.len(),
            self.hazards.len(),
            self.coins.len(),
            self.seed
        );
    }

    /// Reinitialize the run as a unit: bike back to the canonical start,
    /// counters zeroed, particles dropped, every coin uncollected.
    /// Course feature positions are untouched - only this clears the
    /// crashed terminal state.
    pub fn reset(&mut self) {
        self.bike = Bike::at_start(&self.terrain);
        self.score = 0;
        self.coins_collected = 0;
        self.crashed = false;
        self.elapsed = 0.0;
        self.next_milestone = self.tuning.milestone_step;
        self.camera_x = 0.0;
        self.time_ticks = 0;
        self.particles.clear();
        for coin in &mut self.coins {
            coin.collected = false;
        }
    }
}
