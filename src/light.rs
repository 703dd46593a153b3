//! Point lights.

use crate::math::Vec3;

/// A point light with a linear falloff.
///
/// `intensity` is the maximum luminance contribution in `0..=1`; `falloff` is
/// the world-space distance at which the contribution reaches zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub intensity: f32,
    pub falloff: f32,
}

impl Light {
    pub fn new(position: Vec3, intensity: f32, falloff: f32) -> Self {
        Light {
            position,
            intensity,
            falloff,
        }
    }

    /// Moves the light by a world-space delta. Positive `dy` is up, the same
    /// as for objects and the camera.
    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.position = self.position + Vec3::new(dx, dy, dz);
    }

    /// Whether a point at `distance` is inside this light's reach.
    pub fn reaches(&self, distance: f32) -> bool {
        self.intensity > 0.0 && self.falloff > 0.0 && distance <= self.falloff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_is_additive() {
        let mut light = Light::new(Vec3::new(-20.0, 15.0, -10.0), 1.0, 25.0);
        light.translate(0.5, 1.0, -2.0);
        assert_eq!(light.position, Vec3::new(-19.5, 16.0, -12.0));
    }

    #[test]
    fn test_positive_dy_moves_up() {
        let mut light = Light::new(Vec3::ZERO, 1.0, 10.0);
        light.translate(0.0, 2.0, 0.0);
        assert_eq!(light.position.y, 2.0);
    }

    #[test]
    fn test_reach_is_inclusive_of_falloff() {
        let light = Light::new(Vec3::ZERO, 0.5, 10.0);
        assert!(light.reaches(10.0));
        assert!(!light.reaches(10.001));
    }

    #[test]
    fn test_dark_light_reaches_nothing() {
        assert!(!Light::new(Vec3::ZERO, 0.0, 10.0).reaches(0.0));
        assert!(!Light::new(Vec3::ZERO, 1.0, 0.0).reaches(0.0));
    }
}
