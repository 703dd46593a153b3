//! Core rendering engine.
//!
//! The [`Engine`] struct is the main entry point. It owns the scene, the
//! camera, the renderer and the frame scheduler, and drives one frame at a
//! time through the scheduler's phases:
//!
//! ```text
//! start -> clear buffers -> move camera + scene -> prepare pixels
//!       -> present to sink -> pace to target frame time
//! ```
//!
//! Each step can also be called on its own; calling them out of order is
//! rejected with a [`SchedulerError`].

use std::io;

use log::{info, warn};
use thiserror::Error;

use crate::camera::{Camera, CameraController};
use crate::config::{ConfigError, EngineConfig, RenderConfig, SceneMotion};
use crate::input::{KeySnapshot, Toggle};
use crate::projection::Projection;
use crate::render::{FrameReport, Renderer};
use crate::scene::Scene;
use crate::scheduler::{FramePhase, FrameScheduler, FrameStats, SchedulerError};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("failed to present frame: {0}")]
    Present(#[from] io::Error),
}

/// Destination for finished frames.
pub trait FrameSink {
    /// Receives one formatted string per row of a `width`-cell frame.
    fn present(&mut self, rows: &[String], width: usize) -> io::Result<()>;
}

/// Keeps the most recent frame in memory.
#[derive(Debug, Clone, Default)]
pub struct CapturedFrame {
    pub rows: Vec<String>,
    pub width: usize,
    pub frames: u64,
}

impl FrameSink for CapturedFrame {
    fn present(&mut self, rows: &[String], width: usize) -> io::Result<()> {
        self.rows = rows.to_vec();
        self.width = width;
        self.frames += 1;
        Ok(())
    }
}

pub struct Engine {
    scene: Scene,
    camera: Camera,
    controller: CameraController,
    renderer: Renderer,
    scheduler: FrameScheduler,
    render_config: RenderConfig,
    frame: u64,
}

impl Engine {
    pub fn new(config: &EngineConfig, scene: Scene) -> Result<Self, EngineError> {
        config.validate()?;

        let projection = Projection::for_viewport(config.fov, config.width, config.height, config.z_near, config.z_far);
        info!(
            "engine: {}x{} cells, {} fps target, fov {}, clip [{}, {}], {} pacing",
            config.width, config.height, config.fps, config.fov, config.z_near, config.z_far, config.pacing
        );

        Ok(Self {
            scene,
            camera: config.camera(),
            controller: CameraController::new(config.move_speed),
            renderer: Renderer::new(config.width, config.height, projection),
            scheduler: FrameScheduler::new(config.fps, config.pacing, config.sync_adjust),
            render_config: RenderConfig::default(),
            frame: 0,
        })
    }

    // ============ Accessors ============

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render_config
    }

    pub fn render_config_mut(&mut self) -> &mut RenderConfig {
        &mut self.render_config
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Statistics of the last completed frame.
    pub fn stats(&self) -> &FrameStats {
        self.scheduler.stats()
    }

    pub fn phase(&self) -> FramePhase {
        self.scheduler.phase()
    }

    /// Frames completed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    // ============ Frame steps ============

    fn checked(&self, result: Result<(), SchedulerError>) -> Result<(), EngineError> {
        if let Err(e) = &result {
            warn!("frame {}: {e}", self.frame);
        }
        Ok(result?)
    }

    /// `Idle -> FrameStarted -> BuffersCleared`.
    pub fn begin_frame(&mut self) -> Result<(), EngineError> {
        let started = self.scheduler.start_frame();
        self.checked(started)?;
        self.renderer.clear();
        let advanced = self.scheduler.advance(FramePhase::BuffersCleared);
        self.checked(advanced)
    }

    /// Applies one frame of keyboard input: toggles on fresh presses, camera
    /// motion while a key is held.
    pub fn handle_keys(&mut self, keys: KeySnapshot) {
        if let Some(toggle) = keys.pressed.and_then(Toggle::from_key) {
            toggle.apply(&mut self.render_config);
        }
        if let Some(key) = keys.held {
            self.controller.apply_key(&mut self.camera, key);
        }
    }

    /// `BuffersCleared -> GeometryMutated`. Call after moving the camera or
    /// the scene for this frame.
    pub fn geometry_mutated(&mut self) -> Result<(), EngineError> {
        let advanced = self.scheduler.advance(FramePhase::GeometryMutated);
        self.checked(advanced)
    }

    /// `GeometryMutated -> PixelsPrepared`: rasterizes the scene, then the
    /// diagnostics overlay if it is on.
    pub fn prepare(&mut self) -> Result<FrameReport, EngineError> {
        let advanced = self.scheduler.advance(FramePhase::PixelsPrepared);
        self.checked(advanced)?;

        let report = self.renderer.prepare(&self.scene, &self.camera, &self.render_config);
        if self.render_config.debug_overlay {
            let stats = *self.scheduler.stats();
            self.renderer
                .draw_overlay(&stats, self.scene.primitive_count(), self.scene.lights().len());
        }
        Ok(report)
    }

    /// `PixelsPrepared -> BufferFlushed`: hands the frame to `sink`.
    pub fn flush(&mut self, sink: &mut impl FrameSink) -> Result<(), EngineError> {
        let presented = sink.present(&self.renderer.flush(), self.renderer.width());
        let advanced = self.scheduler.buffer_flushed();
        self.checked(advanced)?;
        Ok(presented?)
    }

    /// `BufferFlushed -> Synced -> Idle`: waits out the frame budget.
    pub fn sync(&mut self) -> Result<FrameStats, EngineError> {
        let stats = match self.scheduler.sync() {
            Ok(stats) => *stats,
            Err(e) => {
                warn!("frame {}: {e}", self.frame);
                return Err(e.into());
            }
        };
        self.frame += 1;
        Ok(stats)
    }

    /// Abandons the frame in progress so the next `begin_frame` starts clean.
    pub fn abort_frame(&mut self) {
        if self.scheduler.phase() != FramePhase::Idle {
            warn!("frame {}: abandoned in phase {:?}", self.frame, self.scheduler.phase());
            self.scheduler.abort_frame();
        }
    }

    /// Frames abandoned after a failed step.
    pub fn late_frames(&self) -> u64 {
        self.scheduler.late_frames()
    }

    /// Runs one complete frame. A failed step abandons the frame, so the
    /// next call starts from `Idle` again.
    pub fn run_frame(
        &mut self,
        keys: KeySnapshot,
        motion: &SceneMotion,
        sink: &mut impl FrameSink,
    ) -> Result<FrameReport, EngineError> {
        let result = self.step_frame(keys, motion, sink);
        if result.is_err() {
            self.abort_frame();
        }
        result
    }

    fn step_frame(
        &mut self,
        keys: KeySnapshot,
        motion: &SceneMotion,
        sink: &mut impl FrameSink,
    ) -> Result<FrameReport, EngineError> {
        self.begin_frame()?;
        self.handle_keys(keys);
        motion.apply(&mut self.scene, self.frame);
        self.geometry_mutated()?;
        let report = self.prepare()?;
        self.flush(sink)?;
        self.sync()?;
        Ok(report)
    }
}
