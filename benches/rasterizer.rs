use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tty3d::bench::{fill_primitive, rasterize_edges, rasterize_line, Cell, DepthBuffer, FrameBuffer, Pixel, RenderTarget, Renderer};
use tty3d::camera::Camera;
use tty3d::colors::{Hue, ShadeLevel};
use tty3d::config::RenderConfig;
use tty3d::light::Light;
use tty3d::math::vec3::Vec3;
use tty3d::mesh;
use tty3d::object::Object;
use tty3d::projection::Projection;
use tty3d::scene::Scene;

const GRID_WIDTH: usize = 240;
const GRID_HEIGHT: usize = 120;

fn small_triangle() -> [Pixel; 3] {
    [Pixel::new(100, 50), Pixel::new(110, 50), Pixel::new(105, 60)]
}

fn medium_triangle() -> [Pixel; 3] {
    [Pixel::new(40, 20), Pixel::new(140, 20), Pixel::new(90, 90)]
}

fn large_triangle() -> [Pixel; 3] {
    [Pixel::new(5, 5), Pixel::new(235, 30), Pixel::new(120, 115)]
}

fn benchmark_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("line");

    for (name, to) in [
        ("horizontal", Pixel::new(200, 10)),
        ("steep", Pixel::new(30, 110)),
        ("diagonal", Pixel::new(120, 110)),
    ] {
        group.bench_with_input(BenchmarkId::new("rasterize", name), &to, |b, &to| {
            b.iter(|| rasterize_line(black_box(Pixel::new(10, 10)), black_box(to), false));
        });
    }

    group.finish();
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");
    let fill = Cell::Lit(Hue::Red.shade(ShadeLevel::MID));

    for (name, triangle) in [
        ("small", small_triangle()),
        ("medium", medium_triangle()),
        ("large", large_triangle()),
    ] {
        group.bench_with_input(BenchmarkId::new("edges_and_fill", name), &triangle, |b, tri| {
            let mut frame = FrameBuffer::new(GRID_WIDTH, GRID_HEIGHT);
            let mut depth = DepthBuffer::new(GRID_WIDTH, GRID_HEIGHT);
            b.iter(|| {
                depth.clear();
                let mut target = RenderTarget::new(&mut frame, &mut depth);
                let edges = rasterize_edges(black_box(tri), false);
                fill_primitive(&mut target, tri, &edges, 5.0, fill, false)
            });
        });
    }

    group.finish();
}

fn benchmark_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepare");

    let mut scene = Scene::new();
    for i in 0..5 {
        let x = (i as f32 - 2.0) * 3.0;
        scene.add_object(Object::from_triangles(mesh::cube(), Vec3::new(x, 0.0, -8.0), 1.0, Hue::Magenta));
    }
    scene.add_light(Light::new(Vec3::new(0.0, 6.0, 0.0), 1.0, 20.0));

    let projection = Projection::for_viewport(90.0, GRID_WIDTH, GRID_HEIGHT, 1.0, 50.0);
    let camera = Camera::default();

    for (name, config) in [
        ("filled", RenderConfig::default()),
        (
            "wireframe",
            RenderConfig {
                draw_wireframe: true,
                draw_vertices: true,
                ..Default::default()
            },
        ),
    ] {
        group.bench_function(name, |b| {
            let mut renderer = Renderer::new(GRID_WIDTH, GRID_HEIGHT, projection);
            b.iter(|| {
                renderer.clear();
                renderer.prepare(black_box(&scene), &camera, &config)
            });
        });
    }

    group.bench_function("flush", |b| {
        let mut renderer = Renderer::new(GRID_WIDTH, GRID_HEIGHT, projection);
        renderer.prepare(&scene, &camera, &RenderConfig::default());
        b.iter(|| renderer.flush());
    });

    group.finish();
}

criterion_group!(benches, benchmark_lines, benchmark_single_triangle, benchmark_scene);
criterion_main!(benches);
