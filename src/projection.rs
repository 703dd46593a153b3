//! Perspective projection parameters.
//!
//! The [`Projection`] struct is the single source of truth for field of view,
//! aspect ratio and clip distances. The four perspective-matrix terms derived
//! from them are computed once at construction; nothing changes them during a
//! session, so they are never recomputed.

use crate::math::{Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    fov_degrees: f32,
    /// Aspect ratio (width / height).
    aspect_ratio: f32,
    /// Near clipping distance (sign ignored).
    z_near: f32,
    /// Far clipping distance (sign ignored).
    z_far: f32,

    // Cached matrix terms: [0][0], [1][1], [2][2], [3][2].
    x_scale: f32,
    y_scale: f32,
    z_scale: f32,
    z_offset: f32,
}

impl Projection {
    /// Creates a projection and caches its matrix terms.
    ///
    /// # Arguments
    /// * `fov_degrees` - Field of view in degrees
    /// * `aspect_ratio` - Width divided by height
    /// * `z_near`, `z_far` - Clip distances; only their magnitudes are used
    pub fn new(fov_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        let (near, far) = (z_near.abs(), z_far.abs());
        let tan_half_fov = (fov_degrees.to_radians() / 2.0).tan();

        Self {
            fov_degrees,
            aspect_ratio,
            z_near: near,
            z_far: far,
            x_scale: 1.0 / (aspect_ratio * tan_half_fov),
            y_scale: 1.0 / tan_half_fov,
            z_scale: -(far + near) / (far - near),
            z_offset: -(2.0 * far * near) / (far - near),
        }
    }

    /// Creates a projection for a `width` x `height` cell grid.
    pub fn for_viewport(fov_degrees: f32, width: usize, height: usize, z_near: f32, z_far: f32) -> Self {
        Self::new(fov_degrees, width as f32 / height as f32, z_near, z_far)
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Near clip distance (always non-negative).
    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    /// Far clip distance (always non-negative).
    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    /// Camera space -> clip space. The resulting `w` is the negated camera
    /// space Z, i.e. the view depth.
    pub fn apply(&self, v: Vec3) -> Vec4 {
        Vec4::new(
            v.x * self.x_scale,
            v.y * self.y_scale,
            v.z * self.z_scale + self.z_offset,
            -v.z,
        )
    }

    /// Whether a view depth lies inside `[near, far]`.
    pub fn contains_depth(&self, w: f32) -> bool {
        w >= self.z_near && w <= self.z_far
    }
}
