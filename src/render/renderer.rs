//! Per-frame buffer preparation.
//!
//! [`Renderer`] owns the frame and depth buffers and turns a scene into a
//! filled frame buffer. For each primitive, in scene order:
//!
//! 1. Project every vertex; discard the primitive if any vertex fails.
//! 2. Rasterize an edge between every pair of projected vertices.
//! 3. With three or more vertices, shade the primitive and fill its interior
//!    against the depth buffer.
//! 4. Draw the edges if the wireframe is on.
//! 5. Draw vertex markers if they are on.
//!
//! Points and two-vertex polylines have no interior, so their edges and
//! markers are always drawn.

use log::debug;

use super::buffer::{Cell, DepthBuffer, FrameBuffer, Pixel, RenderTarget};
use super::fill::fill_primitive;
use super::lighting::LightingModel;
use super::line::rasterize_edges;
use super::overlay;
use super::pipeline::{project_primitive, ProjectedPrimitive, Viewport};
use crate::camera::Camera;
use crate::colors::{Hue, ShadeLevel};
use crate::config::RenderConfig;
use crate::light::Light;
use crate::primitive::Renderable;
use crate::projection::Projection;
use crate::scene::Scene;
use crate::scheduler::FrameStats;

const WIRE_HUE: Hue = Hue::Cyan;
const VERTEX_HUE: Hue = Hue::Red;

/// Counts from one buffer preparation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Primitives that survived projection.
    pub accepted: usize,
    /// Primitives dropped by the clip or bounds test.
    pub discarded: usize,
    /// Cells written by face fills.
    pub filled: usize,
}

pub struct Renderer {
    frame: FrameBuffer,
    depth: DepthBuffer,
    viewport: Viewport,
    projection: Projection,
}

impl Renderer {
    pub fn new(width: usize, height: usize, projection: Projection) -> Self {
        Self {
            frame: FrameBuffer::new(width, height),
            depth: DepthBuffer::new(width, height),
            viewport: Viewport::new(width, height),
            projection,
        }
    }

    pub fn width(&self) -> usize {
        self.viewport.width
    }

    pub fn height(&self) -> usize {
        self.viewport.height
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Resets the frame buffer to background and the depth buffer to +inf.
    pub fn clear(&mut self) {
        self.frame.clear();
        self.depth.clear();
    }

    /// Rasterizes every primitive in `scene` into the buffers.
    pub fn prepare(&mut self, scene: &Scene, camera: &Camera, config: &RenderConfig) -> FrameReport {
        let lighting = LightingModel::new(
            self.projection.z_near(),
            self.projection.z_far(),
            config.depth_falloff,
        );
        let mut report = FrameReport::default();

        for object in scene.objects() {
            for primitive in object.primitives() {
                let projected = project_primitive(
                    primitive.vertices(),
                    object.transform(),
                    camera,
                    &self.projection,
                    self.viewport,
                );
                match projected {
                    Some(projected) => {
                        report.accepted += 1;
                        report.filled +=
                            self.draw_primitive(&projected, object.hue(), scene.lights(), &lighting, config);
                    }
                    None => report.discarded += 1,
                }
            }
        }

        debug!(
            "prepared frame: {} accepted, {} discarded, {} cells filled",
            report.accepted, report.discarded, report.filled
        );
        report
    }

    fn draw_primitive(
        &mut self,
        projected: &ProjectedPrimitive,
        hue: Hue,
        lights: &[Light],
        lighting: &LightingModel,
        config: &RenderConfig,
    ) -> usize {
        let raster: Vec<Pixel> = projected.pixels().collect();
        let has_face = raster.len() >= 3;
        let show_wire = config.draw_wireframe || !has_face;
        let show_vertices = config.draw_vertices || !has_face;

        let edges = rasterize_edges(&raster, show_vertices);
        let mut target = RenderTarget::new(&mut self.frame, &mut self.depth);

        let mut filled = 0;
        if has_face && config.fill_faces {
            let depth = projected.approximate_depth();
            // Unlit faces stay at the base level.
            let shade = match projected.centroid() {
                Some(centroid) if config.lighting => lighting.shade(depth, centroid, lights),
                _ => ShadeLevel::MIN,
            };
            filled = fill_primitive(
                &mut target,
                &raster,
                &edges,
                depth,
                Cell::Lit(hue.shade(shade)),
                config.draw_wireframe,
            );
        }

        if show_wire {
            let wire = Cell::Lit(WIRE_HUE.shade(ShadeLevel::MID));
            for p in &edges {
                target.set_pixel(p.x, p.y, wire);
            }
        }

        if show_vertices {
            let marker = Cell::Lit(VERTEX_HUE.shade(ShadeLevel::MID));
            for p in &raster {
                target.set_pixel(p.x, p.y, marker);
            }
        }

        filled
    }

    /// Draws frame statistics over the prepared frame.
    pub fn draw_overlay(&mut self, stats: &FrameStats, polygons: usize, lights: usize) {
        overlay::draw_stats(&mut self.frame, stats, polygons, lights);
    }

    /// The prepared frame as one formatted string per row.
    pub fn flush(&self) -> Vec<String> {
        self.frame.to_strings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::object::Object;
    use crate::primitive::{Point, Polyline, Primitive};

    fn renderer() -> Renderer {
        Renderer::new(41, 41, Projection::new(90.0, 1.0, 1.0, 50.0))
    }

    fn triangle_scene(z: f32) -> Scene {
        let mut scene = Scene::new();
        scene.add_object(Object::from_triangles(
            [[Vec3::new(0.0, 0.0, z), Vec3::new(1.0, 0.0, z), Vec3::new(0.0, 1.0, z)]],
            Vec3::ZERO,
            1.0,
            Hue::Green,
        ));
        scene
    }

    #[test]
    fn unlit_fill_uses_minimum_shade() {
        let mut r = renderer();
        let report = r.prepare(&triangle_scene(-5.0), &Camera::default(), &RenderConfig::default());
        assert_eq!(report, FrameReport { accepted: 1, discarded: 0, filled: 14 });
        assert_eq!(r.frame().get(22, 19), Some(Cell::Lit(Hue::Green.shade(ShadeLevel::MIN))));
    }

    #[test]
    fn lighting_off_uses_base_shade() {
        let mut scene = triangle_scene(-5.0);
        // Bright enough to raise the lit shade above the base level.
        scene.add_light(Light::new(Vec3::new(0.2, 0.2, -5.0), 1.0, 20.0));

        let mut r = renderer();
        r.prepare(&scene, &Camera::default(), &RenderConfig::default());
        assert_ne!(r.frame().get(22, 19), Some(Cell::Lit(Hue::Green.shade(ShadeLevel::MIN))));

        let config = RenderConfig {
            lighting: false,
            ..Default::default()
        };
        r.clear();
        r.prepare(&scene, &Camera::default(), &config);
        assert_eq!(r.frame().get(22, 19), Some(Cell::Lit(Hue::Green.shade(ShadeLevel::MIN))));
    }

    #[test]
    fn wireframe_and_markers_are_drawn_on_top() {
        let mut r = renderer();
        let config = RenderConfig {
            draw_wireframe: true,
            draw_vertices: true,
            ..Default::default()
        };
        r.prepare(&triangle_scene(-5.0), &Camera::default(), &config);
        let wire = Cell::Lit(WIRE_HUE.shade(ShadeLevel::MID));
        let marker = Cell::Lit(VERTEX_HUE.shade(ShadeLevel::MID));
        assert_eq!(r.frame().get(20, 20), Some(marker));
        assert_eq!(r.frame().get(20, 18), Some(wire));
        assert_eq!(r.frame().get(22, 20), Some(wire));
        assert_eq!(r.frame().get(21, 19), Some(Cell::Lit(Hue::Green.shade(ShadeLevel::MIN))));
    }

    #[test]
    fn faces_off_leaves_frame_empty() {
        let mut r = renderer();
        let config = RenderConfig {
            fill_faces: false,
            ..Default::default()
        };
        let report = r.prepare(&triangle_scene(-5.0), &Camera::default(), &config);
        assert_eq!(report.accepted, 1);
        assert_eq!(r.frame().lit_count(), 0);
    }

    #[test]
    fn primitive_behind_camera_is_discarded() {
        let mut r = renderer();
        let report = r.prepare(&triangle_scene(5.0), &Camera::default(), &RenderConfig::default());
        assert_eq!(report.discarded, 1);
        assert_eq!(r.frame().lit_count(), 0);
    }

    #[test]
    fn points_and_lines_always_show() {
        let mut scene = Scene::new();
        scene.add_object(Object::new(
            vec![
                Primitive::from(Point::new(Vec3::new(0.0, 0.0, -5.0))),
                Primitive::from(Polyline::new(vec![
                    Vec3::new(-1.0, -1.0, -5.0),
                    Vec3::new(-1.0, 1.0, -5.0),
                ])),
            ],
            Vec3::ZERO,
            1.0,
            Hue::Blue,
        ));
        let mut r = renderer();
        let report = r.prepare(&scene, &Camera::default(), &RenderConfig::default());
        assert_eq!(report.accepted, 2);
        assert_eq!(report.filled, 0);

        let marker = Cell::Lit(VERTEX_HUE.shade(ShadeLevel::MID));
        let wire = Cell::Lit(WIRE_HUE.shade(ShadeLevel::MID));
        assert_eq!(r.frame().get(20, 20), Some(marker));
        // (-1, 1) lands on (16, 16); (-1, -1) on (16, 24).
        assert_eq!(r.frame().get(16, 16), Some(marker));
        assert_eq!(r.frame().get(16, 24), Some(marker));
        assert_eq!(r.frame().get(16, 20), Some(wire));
    }

    #[test]
    fn clear_resets_buffers() {
        let mut r = renderer();
        r.prepare(&triangle_scene(-5.0), &Camera::default(), &RenderConfig::default());
        r.clear();
        assert_eq!(r.frame().lit_count(), 0);
        assert_eq!(r.depth().get(21, 19), Some(f32::INFINITY));
    }
}
