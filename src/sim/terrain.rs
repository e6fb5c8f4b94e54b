//! Procedural ground profile
//!
//! The terrain is never stored as geometry: height is derived on demand
//! from a baseline, a linear grade and a fixed set of sinusoidal bumps.
//! Collision, feature placement and the host's ground silhouette all
//! sample the same function, so the three can never drift apart.
//!
//! Coordinates are screen-style y-down: a larger height value is lower
//! on screen, and a wheel penetrates the ground when its y is at or
//! beyond `height_at(x)`.

use serde::{Deserialize, Serialize};

/// One sinusoidal bump component
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Wave {
    pub amplitude: f32,
    /// Radians per pixel of horizontal travel
    pub frequency: f32,
    pub phase: f32,
}

/// Stateless ground-height function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    /// Flat reference height (y-down, derived from the viewport)
    pub baseline: f32,
    /// Linear grade per pixel of x
    pub slope: f32,
    pub waves: Vec<Wave>,
}

impl Terrain {
    /// Build the course profile for a given viewport height.
    ///
    /// Two long rollers carry the ride; the short third wave adds chatter
    /// without creating slopes a bike can't climb.
    pub fn for_viewport(viewport_height: f32) -> Self {
        Self {
            baseline: viewport_height - 260.0,
            slope: 0.015,
            waves: vec![
                Wave {
                    amplitude: 90.0,
                    frequency: 0.00093,
                    phase: 1.7,
                },
                Wave {
                    amplitude: 60.0,
                    frequency: 0.0021,
                    phase: 0.0,
                },
                Wave {
                    amplitude: 18.0,
                    frequency: 0.0047,
                    phase: 4.2,
                },
            ],
        }
    }

    /// Ground height at a horizontal position. Pure, total, continuous.
    pub fn height_at(&self, x: f32) -> f32 {
        let mut h = self.baseline + self.slope * x;
        for w in &self.waves {
            h += w.amplitude * (x * w.frequency + w.phase).sin();
        }
        h
    }

    /// Analytic dh/dx, for ground normals on the render side.
    pub fn slope_at(&self, x: f32) -> f32 {
        let mut g = self.slope;
        for w in &self.waves {
            g += w.amplitude * w.frequency * (x * w.frequency + w.phase).cos();
        }
        g
    }

    /// Upper bound on |dh/dx| anywhere on the course.
    pub fn max_gradient(&self) -> f32 {
        let mut g = self.slope.abs();
        for w in &self.waves {
            g += w.amplitude.abs() * w.frequency.abs();
        }
        g
    }
}
