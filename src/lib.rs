//! A CPU-based software 3D rasterizer that renders to a character grid.
//!
//! Scenes of triangles, points and polylines go through the classic
//! object -> world -> camera -> clip -> screen chain, are rasterized into a
//! grid of colored cells against a depth buffer, and are flushed once per
//! frame as ANSI-formatted rows. A frame scheduler paces the loop to a
//! target rate and keeps running statistics.
//!
//! # Quick Start
//!
//! ```no_run
//! use tty3d::prelude::*;
//!
//! let mut scene = Scene::new();
//! scene.add_object(Object::from_triangles(mesh::cube(), Vec3::ZERO, 2.0, Hue::Magenta));
//! scene.add_light(Light::new(Vec3::new(0.0, 5.0, 5.0), 1.0, 10.0));
//!
//! let mut engine = Engine::new(&EngineConfig::default(), scene)?;
//! let mut sink = CapturedFrame::default();
//! engine.run_frame(KeySnapshot::default(), &SceneMotion::default(), &mut sink)?;
//! # Ok::<(), tty3d::engine::EngineError>(())
//! ```

// Scene model
pub mod camera;
pub mod colors;
pub mod light;
pub mod math;
pub mod mesh;
pub mod object;
pub mod primitive;
pub mod projection;
pub mod scene;
pub mod transform;

// Frame loop
pub mod config;
pub mod engine;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod terminal;

pub use engine::{Engine, EngineError};
pub use mesh::LoadError;
pub use projection::Projection;
pub use transform::Transform;

/// Prelude module for convenient imports.
pub mod prelude {
    // Scene
    pub use crate::camera::{Camera, CameraController};
    pub use crate::colors::{Hue, ShadeLevel};
    pub use crate::light::Light;
    pub use crate::mesh;
    pub use crate::object::{Object, ObjectId};
    pub use crate::primitive::{Point, Polyline, Primitive, Renderable, Triangle};
    pub use crate::scene::Scene;

    // Engine
    pub use crate::config::{EngineConfig, RenderConfig, SceneDescription, SceneMotion};
    pub use crate::engine::{CapturedFrame, Engine, FrameSink};
    pub use crate::input::KeySnapshot;
    pub use crate::scheduler::{FrameStats, PacingPolicy};

    // Projection
    pub use crate::projection::Projection;

    // Transform
    pub use crate::transform::Transform;

    // Math
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::fill::{fill_primitive, RowSpans};
    pub use crate::render::line::{rasterize_edges, rasterize_line};
    pub use crate::render::{Cell, DepthBuffer, FrameBuffer, Pixel, RenderTarget, Renderer};
}
