//! Scene camera.
//!
//! # Coordinate System
//!
//! Right-handed, camera looking down **-Z** at zero rotation:
//! - X: positive right
//! - Y: positive up
//! - Z: positive toward the viewer
//!
//! # Orientation
//!
//! Orientation is stored as Euler angles in degrees and applied in the same
//! Z -> Y -> X order as object rotations. Angles accumulate without wrapping.

use crate::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    rotation: Vec3, // degrees: x = pitch, y = yaw, z = roll
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera {
    /// Creates a camera at `position` looking down -Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    pub fn with_rotation(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Translates the camera in world space.
    pub fn move_by(&mut self, dx: f32, dy: f32, dz: f32) {
        self.position = self.position + Vec3::new(dx, dy, dz);
    }

    /// Adds Euler angles (degrees) to the camera orientation.
    pub fn rotate(&mut self, rx: f32, ry: f32, rz: f32) {
        self.rotation = self.rotation + Vec3::new(rx, ry, rz);
    }

    /// World space -> camera space: translate by the negated camera position,
    /// then rotate Z -> Y -> X by the camera angles.
    pub fn apply(&self, world: Vec3) -> Vec3 {
        (world - self.position).rotate_zyx_degrees(self.rotation)
    }
}

// =============================================================================
// Camera Controller
// =============================================================================

/// Maps the currently held key to camera motion.
#[derive(Debug, Clone)]
pub struct CameraController {
    /// World units per frame for translation. Rotation speeds derive from it.
    pub move_speed: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self { move_speed: 0.4 }
    }
}

impl CameraController {
    pub fn new(move_speed: f32) -> Self {
        Self { move_speed }
    }

    /// Updates the camera for one frame of `key` being held.
    ///
    /// # Input Mapping
    /// - W/S: Move forward/backward along the camera yaw
    /// - A/D: Strafe left/right
    /// - Space/Z: Move up/down
    /// - I/K: Pitch up/down
    /// - J/L: Yaw left/right
    ///
    /// Returns whether the key was a camera control.
    pub fn apply_key(&self, camera: &mut Camera, key: char) -> bool {
        let speed = self.move_speed;
        let yaw = camera.rotation.y.to_radians();
        // Forward is -Z at zero yaw; right is +X.
        let (forward_x, forward_z) = (yaw.sin(), -yaw.cos());
        let (right_x, right_z) = (yaw.cos(), yaw.sin());

        match key.to_ascii_lowercase() {
            'w' => camera.move_by(forward_x * speed, 0.0, forward_z * speed),
            's' => camera.move_by(-forward_x * speed, 0.0, -forward_z * speed),
            'd' => camera.move_by(right_x * speed, 0.0, right_z * speed),
            'a' => camera.move_by(-right_x * speed, 0.0, -right_z * speed),
            ' ' => camera.move_by(0.0, speed, 0.0),
            'z' => camera.move_by(0.0, -speed, 0.0),
            'i' => camera.rotate(-5.0 * speed, 0.0, 0.0),
            'k' => camera.rotate(5.0 * speed, 0.0, 0.0),
            'l' => camera.rotate(0.0, 10.0 * speed, 0.0),
            'j' => camera.rotate(0.0, -10.0 * speed, 0.0),
            _ => return false,
        }
        true
    }
}

// =============================================================================
// Tests
// =============================================================================
