//! Engine settings, render toggles, and RON scene descriptions.
//!
//! A scene file looks like:
//!
//! ```text
//! (
//!     camera: (position: (x: 0.0, y: 3.0, z: 10.0), rotation: (x: 10.0, y: 0.0, z: 0.0)),
//!     objects: [
//!         (mesh: Cube, position: (x: 0.0, y: 0.0, z: 0.0), scale: 2.0, hue: Cyan,
//!          spin: (x: 0.0, y: 1.5, z: 0.0)),
//!         (mesh: Obj("models/teapot.obj"), position: (x: 6.0, y: 0.0, z: -4.0), hue: Yellow),
//!     ],
//!     lights: [
//!         (position: (x: 0.0, y: 10.0, z: 5.0), intensity: 0.8, falloff: 30.0),
//!     ],
//! )
//! ```
//!
//! OBJ paths are resolved relative to the scene file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;
use ron::extensions::Extensions;
use serde::Deserialize;
use thiserror::Error;

use crate::camera::Camera;
use crate::colors::Hue;
use crate::light::Light;
use crate::math::Vec3;
use crate::mesh::{self, LoadError};
use crate::object::{Object, ObjectId};
use crate::scene::Scene;
use crate::scheduler::PacingPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("scene file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene description: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("object {index}: {source}")]
    Mesh {
        index: usize,
        #[source]
        source: LoadError,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Engine configuration
// =============================================================================

/// Construction-time engine settings. Nothing here changes during a session.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    pub fps: u32,
    /// Field of view in degrees.
    pub fov: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub camera_position: Vec3,
    pub camera_rotation: Vec3,
    /// Camera translation per frame while a movement key is held.
    pub move_speed: f32,
    pub pacing: PacingPolicy,
    /// Added to the pacing deadline.
    pub sync_adjust: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 120,
            height: 60,
            fps: 60,
            fov: 90.0,
            z_near: 1.0,
            z_far: 50.0,
            camera_position: Vec3::new(0.0, 3.0, 10.0),
            camera_rotation: Vec3::ZERO,
            move_speed: 0.4,
            pacing: PacingPolicy::Spin,
            sync_adjust: Duration::from_micros(3),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 2 || self.height < 2 {
            return Err(ConfigError::Invalid(format!(
                "screen must be at least 2x2 cells, got {}x{}",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be positive".into()));
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov must be between 0 and 180 degrees, got {}",
                self.fov
            )));
        }
        let (near, far) = (self.z_near.abs(), self.z_far.abs());
        if near <= 0.0 || near >= far {
            return Err(ConfigError::Invalid(format!(
                "clip distances must satisfy 0 < near < far, got near {near}, far {far}"
            )));
        }
        if !(self.move_speed >= 0.0) {
            return Err(ConfigError::Invalid("move speed must be non-negative".into()));
        }
        Ok(())
    }

    /// The camera described by this configuration.
    pub fn camera(&self) -> Camera {
        Camera::with_rotation(self.camera_position, self.camera_rotation)
    }
}

// =============================================================================
// Render toggles
// =============================================================================

/// What the renderer draws each frame. Can be flipped between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub draw_vertices: bool,
    pub draw_wireframe: bool,
    pub fill_faces: bool,
    pub lighting: bool,
    pub debug_overlay: bool,
    /// Fraction of the clip range, counted back from the far plane, that is
    /// dimmed with depth.
    pub depth_falloff: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            draw_vertices: false,
            draw_wireframe: false,
            fill_faces: true,
            lighting: true,
            debug_overlay: false,
            depth_falloff: 0.3,
        }
    }
}

// =============================================================================
// Scene description
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum MeshSource {
    Cube,
    Obj(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CameraDescription {
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectDescription {
    pub mesh: MeshSource,
    #[serde(default)]
    pub position: Vec3,
    /// Initial Euler angles, degrees.
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default = "default_hue")]
    pub hue: Hue,
    /// Degrees added to the rotation every frame.
    #[serde(default)]
    pub spin: Vec3,
    /// Peak per-frame translation of a sinusoidal bob.
    #[serde(default)]
    pub bob: Vec3,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LightDescription {
    pub position: Vec3,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    pub falloff: f32,
    /// Peak per-frame translation of a sinusoidal drift.
    #[serde(default)]
    pub drift: Vec3,
}

fn default_scale() -> f32 {
    1.0
}

fn default_hue() -> Hue {
    Hue::Gray
}

fn default_intensity() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: Option<CameraDescription>,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
    #[serde(default)]
    pub lights: Vec<LightDescription>,
    /// Directory OBJ paths are resolved against. Not part of the file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl SceneDescription {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut description = Self::from_str(&contents)?;
        description.base_dir = path.parent().map(Path::to_path_buf);
        info!(
            "loaded scene {} ({} objects, {} lights)",
            path.display(),
            description.objects.len(),
            description.lights.len()
        );
        Ok(description)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let description: SceneDescription = ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(s)?;
        description.validate()?;
        Ok(description)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, light) in self.lights.iter().enumerate() {
            if !(light.falloff > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "light {i}: falloff must be positive, got {}",
                    light.falloff
                )));
            }
        }
        Ok(())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Loads every mesh and builds the scene.
    pub fn build(&self) -> Result<SceneSetup, ConfigError> {
        let mut scene = Scene::new();
        let mut motion = SceneMotion::default();

        for (index, desc) in self.objects.iter().enumerate() {
            let triangles = match &desc.mesh {
                MeshSource::Cube => mesh::cube(),
                MeshSource::Obj(path) => {
                    mesh::load_obj(self.resolve(path)).map_err(|source| ConfigError::Mesh { index, source })?
                }
            };
            let mut object = Object::from_triangles(triangles, desc.position, desc.scale, desc.hue);
            object.transform_mut().set_rotation(desc.rotation);
            let id = scene.add_object(object);
            motion.add_object(id, desc.spin, desc.bob);
        }

        for desc in &self.lights {
            let index = scene.add_light(Light::new(desc.position, desc.intensity, desc.falloff));
            motion.add_light(index, desc.drift);
        }

        Ok(SceneSetup {
            scene,
            camera: self
                .camera
                .as_ref()
                .map(|c| Camera::with_rotation(c.position, c.rotation)),
            motion,
        })
    }
}

/// A scene built from a description, ready for the engine.
#[derive(Debug, Clone)]
pub struct SceneSetup {
    pub scene: Scene,
    /// Overrides the engine's default camera when present.
    pub camera: Option<Camera>,
    pub motion: SceneMotion,
}

/// Per-frame scripted movement of objects and lights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneMotion {
    objects: Vec<(ObjectId, Vec3, Vec3)>,
    lights: Vec<(usize, Vec3)>,
}

impl SceneMotion {
    /// Spins the object by `spin` degrees per frame and bobs it by up to
    /// `bob` per frame. Still objects are not recorded.
    pub fn add_object(&mut self, id: ObjectId, spin: Vec3, bob: Vec3) {
        if spin != Vec3::ZERO || bob != Vec3::ZERO {
            self.objects.push((id, spin, bob));
        }
    }

    pub fn add_light(&mut self, index: usize, drift: Vec3) {
        if drift != Vec3::ZERO {
            self.lights.push((index, drift));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.lights.is_empty()
    }

    /// Advances the scripted motion for frame number `frame`.
    pub fn apply(&self, scene: &mut Scene, frame: u64) {
        let wave = (frame as f32 / 10.0).sin();

        for &(id, spin, bob) in &self.objects {
            if let Some(object) = scene.object_mut(id) {
                object.rotate(spin.x, spin.y, spin.z);
                let step = bob * wave;
                object.translate(step.x, step.y, step.z);
            }
        }
        for &(index, drift) in &self.lights {
            if let Some(light) = scene.light_mut(index) {
                let step = drift * wave;
                light.translate(step.x, step.y, step.z);
            }
        }
    }
}
