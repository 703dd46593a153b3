//! 2D vector for normalized device and sub-pixel screen coordinates.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether both components lie inside `[-1, 1]`.
    pub fn is_normalized(&self) -> bool {
        (-1.0..=1.0).contains(&self.x) && (-1.0..=1.0).contains(&self.y)
    }
}
