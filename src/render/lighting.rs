//! Flat per-primitive shading.
//!
//! A primitive's brightness is a discrete [`ShadeLevel`]. It starts at the
//! minimum, gains up to five levels from each light whose falloff sphere
//! contains the primitive's centroid, and loses up to two levels when the
//! primitive sits in the far end of the depth range.

use crate::colors::ShadeLevel;
use crate::light::Light;
use crate::math::Vec3;

/// Largest contribution of a single light, in shade levels.
const MAX_LIGHT_CONTRIBUTION: i32 = 5;
/// Largest reduction applied by depth dimming, in shade levels.
const MAX_DEPTH_DIMMING: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingModel {
    z_near: f32,
    z_far: f32,
    /// Fraction of the clip range, measured back from the far plane, over which
    /// depth dimming applies.
    depth_falloff: f32,
}

impl LightingModel {
    pub fn new(z_near: f32, z_far: f32, depth_falloff: f32) -> Self {
        Self {
            z_near: z_near.abs(),
            z_far: z_far.abs(),
            depth_falloff,
        }
    }

    /// Shade contributed by one light to a point at `centroid`, in `0..=5`.
    ///
    /// Lights that do not reach the point contribute 0.
    pub fn light_contribution(light: &Light, centroid: Vec3) -> i32 {
        let distance = light.position.distance(centroid);
        if !light.reaches(distance) {
            return 0;
        }
        let attenuation = (MAX_LIGHT_CONTRIBUTION as f32 / light.intensity) * (distance / light.falloff);
        (MAX_LIGHT_CONTRIBUTION - attenuation.round() as i32).clamp(0, MAX_LIGHT_CONTRIBUTION)
    }

    /// Levels removed for a primitive at view depth `depth`, in `0..=2`.
    pub fn depth_dimming(&self, depth: f32) -> i32 {
        let range = self.depth_falloff * (self.z_far - self.z_near);
        if range <= 0.0 {
            return 0;
        }
        let min_depth = self.z_far - range;
        if depth < min_depth {
            return 0;
        }
        let ratio = ((depth - min_depth) / (self.z_far - min_depth)).clamp(0.0, 1.0);
        (MAX_DEPTH_DIMMING * ratio).round() as i32
    }

    /// Shade level for a primitive at `depth` whose world-space centroid is
    /// `centroid`.
    pub fn shade(&self, depth: f32, centroid: Vec3, lights: &[Light]) -> ShadeLevel {
        let lit: i32 = lights
            .iter()
            .map(|light| Self::light_contribution(light, centroid))
            .sum();
        let level = i32::from(ShadeLevel::MIN.get()) + lit - self.depth_dimming(depth);
        ShadeLevel::clamped(level)
    }
}
