//! Particle state and spawn rules.
//!
//! Particles are owned exclusively by the animator session; nothing here is
//! shared across runs. Spawn placement depends on the scene's animation
//! branch, velocity on its mood bucket.

use rand::Rng;
use std::f32::consts::TAU;

use crate::scene::{AnimationKind, MoodBucket, SceneDescription};

/// A single animated particle.
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: [f32; 3],
    pub vx: f32,
    pub vy: f32,
    /// Polar angle assigned at spawn, used by the rotational branches.
    pub original_angle: f32,
    /// Polar radius assigned at spawn.
    pub dist: f32,
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    /// Construct a fresh particle for the given scene and surface size.
    ///
    /// Spawn positions are always in-bounds: rotational branches place the
    /// particle within 40% of each half-extent from the center, Comet starts
    /// on the bottom edge, and the default branches scatter uniformly.
    pub fn spawn(w: f32, h: f32, scene: &SceneDescription, rng: &mut impl Rng) -> Self {
        let size = rng.random_range(0.0..2.0) + 1.0;
        let (cx, cy) = (w / 2.0, h / 2.0);

        let mut angle = None;
        let (x, y) = match scene.animation_kind() {
            AnimationKind::Swirl | AnimationKind::Vortex => {
                let a = rng.random_range(0.0..TAU);
                angle = Some(a);
                (
                    cx + a.cos() * (rng.random_range(0.0..1.0) * w * 0.4),
                    cy + a.sin() * (rng.random_range(0.0..1.0) * h * 0.4),
                )
            }
            AnimationKind::Comet => (rng.random_range(0.0..1.0) * w, h),
            AnimationKind::Mist | AnimationKind::Particles => (
                rng.random_range(0.0..1.0) * w,
                rng.random_range(0.0..1.0) * h,
            ),
        };

        let vel_scale = match scene.mood_bucket() {
            MoodBucket::Anxious => 1.5,
            MoodBucket::Calm => 0.5,
        };

        Self {
            x,
            y,
            size,
            color: scene.color(),
            vx: (rng.random_range(0.0..1.0) - 0.5) * vel_scale,
            vy: (rng.random_range(0.0..1.0) - 0.5) * vel_scale,
            original_angle: angle.unwrap_or_else(|| rng.random_range(0.0..TAU)),
            dist: rng.random_range(0.0..50.0) + 50.0,
            life: rng.random_range(0.0..100.0) + 50.0,
            max_life: 150.0,
        }
    }

    /// Remaining-life opacity in 0.0–1.0.
    pub fn opacity(&self) -> f32 {
        self.life / self.max_life
    }

    /// Whether the particle is still on the surface.
    pub fn in_bounds(&self, w: f32, h: f32) -> bool {
        self.x >= 0.0 && self.x <= w && self.y >= 0.0 && self.y <= h
    }
}
