//! Scene objects: a set of primitives sharing one pose and one hue.

use crate::colors::Hue;
use crate::math::Vec3;
use crate::primitive::{Primitive, Triangle};
use crate::transform::Transform;

/// Index of an object in a [`Scene`](crate::scene::Scene)'s object table.
///
/// Primitives never point back at their owner; the renderer looks the owner up
/// through the table while walking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) usize);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Object {
    primitives: Vec<Primitive>,
    transform: Transform,
    hue: Hue,
}

impl Object {
    /// Builds an object from parsed triangle geometry, placed at `position`
    /// with a uniform `scale`.
    pub fn from_triangles(
        triangles: impl IntoIterator<Item = [Vec3; 3]>,
        position: Vec3,
        scale: f32,
        hue: Hue,
    ) -> Self {
        let primitives = triangles
            .into_iter()
            .map(|t| Primitive::Triangle(Triangle::from(t)))
            .collect();
        Self::new(primitives, position, scale, hue)
    }

    pub fn new(primitives: Vec<Primitive>, position: Vec3, scale: f32, hue: Hue) -> Self {
        let mut transform = Transform::new();
        transform.set_position(position).set_scale(scale);
        Self {
            primitives,
            transform,
            hue,
        }
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn hue(&self) -> Hue {
        self.hue
    }

    /// Move by a world-space delta.
    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.transform.translate(Vec3::new(dx, dy, dz));
    }

    /// Add Euler angles in degrees.
    pub fn rotate(&mut self, rx: f32, ry: f32, rz: f32) {
        self.transform.rotate(Vec3::new(rx, ry, rz));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Renderable;

    #[test]
    fn from_triangles_keeps_order_and_pose() {
        let object = Object::from_triangles(
            [
                [Vec3::ZERO, Vec3::ONE, Vec3::new(1.0, 0.0, 0.0)],
                [Vec3::ONE, Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)],
            ],
            Vec3::new(0.0, 0.0, -8.0),
            0.5,
            Hue::Green,
        );

        assert_eq!(object.primitives().len(), 2);
        assert_eq!(object.primitives()[1].vertices()[2], Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(object.transform().position(), Vec3::new(0.0, 0.0, -8.0));
        assert_eq!(object.transform().scale(), 0.5);
        assert_eq!(object.hue(), Hue::Green);
    }

    #[test]
    fn pose_mutation_is_additive() {
        let mut object = Object::from_triangles(Vec::new(), Vec3::ZERO, 1.0, Hue::Red);
        object.rotate(1.0, 2.0, 3.0);
        object.rotate(1.0, 2.0, 3.0);
        object.translate(0.0, 1.0, 0.0);

        assert_eq!(object.transform().rotation(), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(object.transform().position(), Vec3::new(0.0, 1.0, 0.0));
    }
}
