//! Wheel/terrain contact resolution
//!
//! The tricky part of Dirt Dash: the two wheels are tracked
//! independently against the ground-height function. Only the rear
//! wheel corrects position and triggers landings, crashes and flip
//! payouts; the front wheel's contact flag exists to gate jumping and
//! air rotation. Both flags are pure functions of this tick's
//! penetration test (closed boundary: exactly touching counts as
//! grounded).

use glam::Vec2;

use super::particle::{self, ParticleColor};
use super::state::{Bike, GameState};
use crate::consts::{WHEEL_BASE, WHEEL_RADIUS};
use crate::wrap_angle;

/// Rear tyre's lowest point (the ground-contact probe).
#[inline]
pub fn rear_contact(bike: &Bike) -> Vec2 {
    bike.pos + Vec2::new(0.0, WHEEL_RADIUS)
}

/// Front tyre's lowest point: the wheel base rotated through the
/// current angle, then the same radius drop.
#[inline]
pub fn front_contact(bike: &Bike) -> Vec2 {
    bike.pos
        + Vec2::new(
            WHEEL_BASE * bike.rotation.cos(),
            WHEEL_BASE * bike.rotation.sin() + WHEEL_RADIUS,
        )
}

/// Resolve both wheels against the terrain for this tick.
///
/// A rear wheel that reaches the ground while airborne is a landing
/// event: dirt flies, and the landing angle (folded into (-π, π])
/// either ends the run or pays out the banked flips. Landing or not,
/// the rear wheel is snapped onto the surface and vertical velocity is
/// zeroed.
pub fn resolve_ground(state: &mut GameState) {
    let salt = state.time_ticks as u32;

    // Decay first so a landing this tick shows the full kick
    state.bike.suspension *= state.tuning.suspension_decay;

    let contact = rear_contact(&state.bike);
    let ground = state.terrain.height_at(contact.x);
    if contact.y >= ground {
        if !state.bike.grounded_rear {
            // Landing event
            let impact = Vec2::new(contact.x, ground);
            particle::spawn_burst(&mut state.particles, impact, 30, ParticleColor::Dirt, salt);
            state.bike.suspension = state.tuning.suspension_kick;

            let tilt = wrap_angle(state.bike.rotation);
            if tilt.abs() > state.tuning.crash_angle {
                state.crashed = true;
                particle::spawn_burst(
                    &mut state.particles,
                    impact,
                    60,
                    ParticleColor::Crash,
                    salt.wrapping_mul(31337),
                );
                log::info!(
                    "crashed landing at {:.2} rad after {:.1}s, final score {}",
                    tilt,
                    state.elapsed,
                    state.score
                );
            } else {
                state.score +=
                    state.bike.completed_flips as u64 * state.tuning.flip_landing_bonus;
                if state.bike.completed_flips > 0 {
                    log::debug!(
                        "landed {} flip(s), score {}",
                        state.bike.completed_flips,
                        state.score
                    );
                }
                state.bike.completed_flips = 0;
            }
        }
        // Snap the rear wheel onto the surface
        state.bike.pos.y = ground - WHEEL_RADIUS;
        state.bike.vel_y = 0.0;
        state.bike.grounded_rear = true;
    } else {
        state.bike.grounded_rear = false;
    }

    // Front wheel: contact flag only, never position correction
    let front = front_contact(&state.bike);
    state.bike.grounded_front = front.y >= state.terrain.height_at(front.x);
}
