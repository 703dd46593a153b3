use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use tty3d::colors::Hue;
use tty3d::config::{EngineConfig, SceneDescription, SceneMotion, SceneSetup};
use tty3d::input::{self, KeyReader, KeyState};
use tty3d::light::Light;
use tty3d::math::Vec3;
use tty3d::mesh;
use tty3d::object::Object;
use tty3d::scene::Scene;
use tty3d::scheduler::PacingPolicy;
use tty3d::terminal::TerminalDisplay;
use tty3d::Engine;

/// Real-time software 3D rasterizer for the terminal.
///
/// Move with WASD, Space and Z; look with IJKL. Toggle the overlay with E,
/// vertices with 7, wireframe with 8, faces with 9 and lighting with 0.
/// Quit with Q or Esc.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Scene description file (RON)
    #[arg(long, conflicts_with = "model")]
    scene: Option<PathBuf>,

    /// Wavefront OBJ model to show instead of the default cube
    #[arg(long)]
    model: Option<PathBuf>,

    /// Color of the model
    #[arg(long, default_value_t = Hue::Magenta)]
    hue: Hue,

    /// Target frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Field of view in degrees
    #[arg(long, default_value_t = 90.0)]
    fov: f32,

    /// Grid width in cells (defaults to the terminal width)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells (defaults to the terminal height)
    #[arg(long)]
    height: Option<usize>,

    /// How to wait out the rest of each frame: spin or sleep
    #[arg(long, default_value_t = PacingPolicy::Spin)]
    pacing: PacingPolicy,

    /// Start with the statistics overlay on
    #[arg(long)]
    debug: bool,

    /// Start with the wireframe on
    #[arg(long)]
    wireframe: bool,

    /// Start with vertex markers on
    #[arg(long)]
    vertices: bool,

    /// Start with lighting off
    #[arg(long)]
    no_lighting: bool,

    /// Exit after this many frames
    #[arg(long)]
    frames: Option<u64>,
}

fn default_scene(args: &Args) -> Result<SceneSetup> {
    let triangles = match &args.model {
        Some(path) => mesh::load_obj(path).with_context(|| format!("failed to load model {}", path.display()))?,
        None => mesh::cube(),
    };

    let mut scene = Scene::new();
    let id = scene.add_object(Object::from_triangles(triangles, Vec3::ZERO, 3.0, args.hue));
    let light = scene.add_light(Light::new(Vec3::new(-6.0, 8.0, 6.0), 1.0, 25.0));

    let mut motion = SceneMotion::default();
    motion.add_object(id, Vec3::new(0.6, 1.0, 0.0), Vec3::ZERO);
    motion.add_light(light, Vec3::new(0.3, 0.0, 0.0));

    Ok(SceneSetup {
        scene,
        camera: None,
        motion,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();

    let setup = match &args.scene {
        Some(path) => SceneDescription::from_file(path)
            .and_then(|description| description.build())
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => default_scene(&args)?,
    };

    let (columns, rows) = TerminalDisplay::frame_size().context("failed to query terminal size")?;
    let config = EngineConfig {
        width: args.width.unwrap_or(columns),
        height: args.height.unwrap_or(rows),
        fps: args.fps,
        fov: args.fov,
        pacing: args.pacing,
        ..Default::default()
    };

    let mut engine = Engine::new(&config, setup.scene).context("invalid engine configuration")?;
    if let Some(camera) = setup.camera {
        engine.set_camera(camera);
    }
    {
        let render = engine.render_config_mut();
        render.debug_overlay = args.debug;
        render.draw_wireframe = args.wireframe;
        render.draw_vertices = args.vertices;
        render.lighting = !args.no_lighting;
    }

    let keys = Arc::new(KeyState::new());
    let mut reader = KeyReader::new(Arc::clone(&keys));
    let mut display = TerminalDisplay::new().context("failed to set up terminal")?;
    let listener = input::spawn_listener(Arc::clone(&keys)).context("failed to start key listener")?;

    let result = run(&mut engine, &setup.motion, &mut reader, &mut display, args.frames);

    keys.request_quit();
    drop(display);
    let _ = listener.join();

    let frames = result?;
    let stats = engine.stats();
    info!(
        "rendered {frames} frames, {:.1} fps average, {:.1}% average utilization",
        stats.avg_fps,
        stats.avg_utilization
    );
    Ok(())
}

fn run(
    engine: &mut Engine,
    motion: &SceneMotion,
    reader: &mut KeyReader,
    display: &mut TerminalDisplay,
    limit: Option<u64>,
) -> Result<u64> {
    while !reader.quit_requested() && limit.map_or(true, |n| engine.frame_count() < n) {
        let snapshot = reader.snapshot();
        engine.run_frame(snapshot, motion, display)?;

        let stats = engine.stats();
        display.set_status(format!(
            "{:>5.1} fps  {:>5.1}% busy  frame {}",
            stats.avg_fps,
            stats.avg_utilization,
            stats.frames
        ));
    }
    Ok(engine.frame_count())
}
