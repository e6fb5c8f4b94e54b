//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per rendered frame, clamped variable timestep
//! - Seeded RNG only, and only at course generation
//! - No rendering or platform dependencies

pub mod collision;
pub mod particle;
pub mod state;
pub mod terrain;
pub mod tick;

pub use particle::{Particle, ParticleColor};
pub use state::{Bike, BoostPad, Coin, GameState, Hazard, RngState};
pub use terrain::{Terrain, Wave};
pub use tick::{TickInput, tick};
