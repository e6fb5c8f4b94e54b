//! Short-lived visual effects
//!
//! Particles are spawned in bursts by landings, boosts, coins and
//! crashes, owned exclusively by the session's collection, and pruned
//! when their life runs out. They never feed back into gameplay.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_PARTICLES, PARTICLE_GRAVITY};

/// Render-side color lookup tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Dirt,
    Boost,
    Spark,
    Crash,
}

/// A single effect particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Seconds of life remaining (starts at 1.0)
    pub life: f32,
    pub color: ParticleColor,
}

/// Append `count` particles spread around `pos`.
///
/// Spread comes from a golden-ratio hash of `salt` rather than an RNG
/// draw, so ticking the sim never advances the session RNG and replays
/// stay byte-stable. Horizontal velocity is symmetric, vertical is
/// upward-biased (y-down: negative). When the collection is full the
/// oldest particles are evicted first.
pub fn spawn_burst(
    particles: &mut Vec<Particle>,
    pos: Vec2,
    count: usize,
    color: ParticleColor,
    salt: u32,
) {
    for i in 0..count {
        if particles.len() >= MAX_PARTICLES {
            particles.remove(0);
        }
        let hash = salt
            .wrapping_mul(2654435761)
            .wrapping_add(i as u32 * 7919);
        let r1 = (hash % 1000) as f32 / 1000.0;
        let r2 = ((hash >> 10) % 1000) as f32 / 1000.0;
        let r3 = ((hash >> 20) % 1000) as f32 / 1000.0;

        particles.push(Particle {
            pos,
            vel: Vec2::new((r1 - 0.5) * 200.0, -r2 * 300.0),
            size: 2.0 + r3 * 6.0,
            life: 1.0,
            color,
        });
    }
}

/// Integrate every particle and drop the expired ones.
///
/// Particles don't interact, so removal order is irrelevant.
pub fn advance(particles: &mut Vec<Particle>, dt: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel * dt;
        p.vel.y += PARTICLE_GRAVITY * dt;
        p.life -= dt;
    }
    particles.retain(|p| p.life > 0.0);
}
