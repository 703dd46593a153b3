use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Self = Self {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Rotates within the YZ plane by `angle` radians.
    pub fn rotate_x(&self, angle: f32) -> Self {
        let sin = angle.sin();
        let cos = angle.cos();
        Self {
            x: self.x,
            y: self.y * cos - self.z * sin,
            z: self.y * sin + self.z * cos,
        }
    }

    /// Rotates within the XZ plane by `angle` radians.
    pub fn rotate_y(&self, angle: f32) -> Self {
        let sin = angle.sin();
        let cos = angle.cos();
        Self {
            x: self.x * cos + self.z * sin,
            y: self.y,
            z: -self.x * sin + self.z * cos,
        }
    }

    /// Rotates within the XY plane by `angle` radians.
    pub fn rotate_z(&self, angle: f32) -> Self {
        let sin = angle.sin();
        let cos = angle.cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
            z: self.z,
        }
    }

    /// Applies Euler angles given in degrees: Z first, then Y, then X.
    ///
    /// This is the rotation chain shared by object and camera transforms.
    pub fn rotate_zyx_degrees(&self, degrees: Vec3) -> Self {
        self.rotate_z(degrees.z.to_radians())
            .rotate_y(degrees.y.to_radians())
            .rotate_x(degrees.x.to_radians())
    }

    pub fn magnitude(&self) -> f32 {
        (self.x.powi(2) + self.y.powi(2) + self.z.powi(2)).sqrt()
    }

    /// Euclidean distance between two points.
    pub fn distance(&self, other: Self) -> f32 {
        (*self - other).magnitude()
    }

    pub fn scale(&self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }

    /// Arithmetic mean of a set of points, or `None` for an empty set.
    pub fn centroid(points: &[Vec3]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let sum = points.iter().fold(Self::ZERO, |acc, p| acc + *p);
        Some(sum / points.len() as f32)
    }
}

/// Component-wise addition of two vectors.
impl Add<Vec3> for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

/// Component-wise subtraction of two vectors.
impl Sub<Vec3> for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

/// Scalar multiplication of a vector.
impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Self::Output {
        self.scale(rhs)
    }
}

/// Scalar division of a vector.
impl Div<f32> for Vec3 {
    type Output = Vec3;

    fn div(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x / rhs,
            y: self.y / rhs,
            z: self.z / rhs,
        }
    }
}

/// Negation of a vector.
impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rotate_y_quarter_turn_maps_x_to_negative_z() {
        let v = Vec3::new(1.0, 0.0, 0.0).rotate_y(std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(v.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn rotate_zyx_applies_z_before_x() {
        // Z: (0,1,0) -> (-1,0,0); X leaves it alone.
        let v = Vec3::new(0.0, 1.0, 0.0).rotate_zyx_degrees(Vec3::new(90.0, 0.0, 90.0));
        assert_relative_eq!(v.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(v.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(v.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_rotation_is_identity() {
        let v = Vec3::new(1.5, -2.0, 3.25);
        assert_eq!(v.rotate_zyx_degrees(Vec3::ZERO), v);
    }

    #[test]
    fn centroid_of_triangle() {
        let c = Vec3::centroid(&[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 3.0, 3.0),
        ])
        .unwrap();
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 1.0);
        assert_relative_eq!(c.z, 1.0);
        assert!(Vec3::centroid(&[]).is_none());
    }

    #[test]
    fn distance_is_euclidean() {
        assert_relative_eq!(Vec3::new(1.0, 2.0, 2.0).distance(Vec3::ZERO), 3.0);
    }
}
