//! Object pose: position, rotation (Euler angles in degrees), uniform scale.
//!
//! The position is stored negated: the world transform subtracts the stored
//! offset, so an object placed at `(1, 2, 3)` stores `(-1, -2, -3)`. Callers
//! only ever see world-space positions through the accessors below.

use crate::math::Vec3;

/// A pose with position, rotation (Euler angles, degrees), and uniform scale.
///
/// Provides a fluent API where mutating methods return `&mut Self` for chaining:
///
/// ```ignore
/// transform
///     .set_position_xyz(5.0, 2.0, -8.0)
///     .rotate_y(1.0)
///     .set_scale(2.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    offset: Vec3,
    rotation: Vec3, // degrees, accumulated without wraparound
    scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl Transform {
    /// Create a new transform with default values (position=0, rotation=0, scale=1).
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Position ============

    /// World-space position.
    pub fn position(&self) -> Vec3 {
        -self.offset
    }

    /// The negated position as stored and subtracted by the world transform.
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Set the world-space position.
    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.offset = -position;
        self
    }

    /// Set the world-space position from x, y, z components.
    pub fn set_position_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.set_position(Vec3::new(x, y, z))
    }

    /// Move by a world-space delta.
    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.offset = self.offset - delta;
        self
    }

    // ============ Rotation ============

    /// Get the rotation (Euler angles in degrees).
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Set the rotation (Euler angles in degrees).
    pub fn set_rotation(&mut self, rotation: Vec3) -> &mut Self {
        self.rotation = rotation;
        self
    }

    /// Add a delta rotation (degrees). Angles are never wrapped.
    pub fn rotate(&mut self, delta: Vec3) -> &mut Self {
        self.rotation = self.rotation + delta;
        self
    }

    /// Rotate around the Y axis (degrees).
    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.rotation.y += angle;
        self
    }

    // ============ Scale ============

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Set the uniform scale factor.
    pub fn set_scale(&mut self, scale: f32) -> &mut Self {
        self.scale = scale;
        self
    }

    // ============ Application ============

    /// Object space -> world space: rotate (Z, Y, X), scale, then subtract
    /// the stored offset.
    pub fn apply(&self, vertex: Vec3) -> Vec3 {
        vertex.rotate_zyx_degrees(self.rotation) * self.scale - self.offset
    }
}
