//! Vertex transform chain.
//!
//! Object space -> world space -> camera space -> clip space -> normalized
//! device coordinates -> screen cells. Each stage is a pure function; the
//! `project_*` helpers compose them and apply the discard policy:
//!
//! - a clip `w` outside `[near, far]` discards the primitive
//! - an NDC coordinate outside `[-1, 1]` discards the primitive
//!
//! Discards are per primitive: if any vertex fails, none of it is drawn this
//! frame. There is no partial clipping.

use super::buffer::Pixel;
use crate::camera::Camera;
use crate::math::{Vec2, Vec3, Vec4};
use crate::primitive::Vertex;
use crate::projection::Projection;
use crate::transform::Transform;

/// A vertex after the full chain: its cell and its view depth (clip `w`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedVertex {
    pub pixel: Pixel,
    pub depth: f32,
}

/// A primitive that survived projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedPrimitive {
    /// World-space vertices, for lighting.
    pub world: Vec<Vec3>,
    /// Screen-space vertices, in the primitive's vertex order.
    pub raster: Vec<ProjectedVertex>,
}

impl ProjectedPrimitive {
    /// Mean view depth of the vertices: the flat per-primitive depth used for
    /// occlusion.
    pub fn approximate_depth(&self) -> f32 {
        if self.raster.is_empty() {
            return f32::INFINITY;
        }
        self.raster.iter().map(|v| v.depth).sum::<f32>() / self.raster.len() as f32
    }

    /// Mean world-space position.
    pub fn centroid(&self) -> Option<Vec3> {
        Vec3::centroid(&self.world)
    }

    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.raster.iter().map(|v| v.pixel)
    }
}

/// Screen dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

// =============================================================================
// Stages
// =============================================================================

/// Object space -> world space.
#[inline]
pub fn world_transform(vertex: Vertex, transform: &Transform) -> Vec3 {
    transform.apply(vertex)
}

/// World space -> camera space.
#[inline]
pub fn camera_transform(world: Vec3, camera: &Camera) -> Vec3 {
    camera.apply(world)
}

/// Camera space -> clip space.
#[inline]
pub fn projection_transform(view: Vec3, projection: &Projection) -> Vec4 {
    projection.apply(view)
}

/// Clip space -> NDC. `None` when either coordinate leaves `[-1, 1]`.
#[inline]
pub fn perspective_divide(clip: Vec4) -> Option<Vec2> {
    let ndc = Vec2::new(clip.x / clip.w, clip.y / clip.w);
    ndc.is_normalized().then_some(ndc)
}

/// NDC -> continuous screen coordinates. Y is flipped so rows grow downward.
#[inline]
pub fn viewport_transform(ndc: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(
        ((ndc.x + 1.0) / 2.0) * (viewport.width as f32 - 1.0),
        (1.0 - (ndc.y + 1.0) / 2.0) * (viewport.height as f32 - 1.0),
    )
}

/// Rounds continuous screen coordinates to the nearest cell.
#[inline]
pub fn to_pixel(screen: Vec2) -> Pixel {
    Pixel::new(screen.x.round() as i32, screen.y.round() as i32)
}

// =============================================================================
// Composition
// =============================================================================

/// Projects one world-space point, or `None` if it must be discarded.
pub fn project_point(
    world: Vec3,
    camera: &Camera,
    projection: &Projection,
    viewport: Viewport,
) -> Option<ProjectedVertex> {
    let clip = projection_transform(camera_transform(world, camera), projection);
    if !projection.contains_depth(clip.w) {
        return None;
    }
    let ndc = perspective_divide(clip)?;
    Some(ProjectedVertex {
        pixel: to_pixel(viewport_transform(ndc, viewport)),
        depth: clip.w,
    })
}

/// Projects every vertex of a primitive. Returns `None` if any vertex is
/// discarded.
pub fn project_primitive(
    vertices: &[Vertex],
    transform: &Transform,
    camera: &Camera,
    projection: &Projection,
    viewport: Viewport,
) -> Option<ProjectedPrimitive> {
    let mut projected = ProjectedPrimitive {
        world: Vec::with_capacity(vertices.len()),
        raster: Vec::with_capacity(vertices.len()),
    };

    for &vertex in vertices {
        let world = world_transform(vertex, transform);
        let raster = project_point(world, camera, projection, viewport)?;
        projected.world.push(world);
        projected.raster.push(raster);
    }

    Some(projected)
}
