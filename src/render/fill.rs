//! Face filling driven by rasterized edges.
//!
//! Rather than walking an edge table, the filler reuses the cells the line
//! rasterizer already produced. Each row of the primitive's bounding box
//! records the leftmost and rightmost cell touched by a vertex or an edge; the
//! span between them is the silhouette for that row.
//!
//! ```text
//!   y=16   #          # outline cell (vertex or edge)
//!   y=17   ##         + interior cell
//!   y=18   #+#
//!   y=19   #++#
//!   y=20   #+++#
//! ```
//!
//! Every cell in a span is written with the primitive's flat depth through
//! [`RenderTarget::set_pixel_with_depth`], so occlusion is resolved per
//! primitive rather than per pixel.

use super::buffer::{Cell, Pixel, RenderTarget};

/// Per-row horizontal extent of a primitive's outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSpans {
    min_y: i32,
    spans: Vec<Option<(i32, i32)>>,
}

impl RowSpans {
    /// Builds the spans for the bounding box of `vertices`, widened by every
    /// outline cell that falls on one of its rows.
    ///
    /// Returns `None` when there are no vertices.
    pub fn new(vertices: &[Pixel], edges: &[Pixel]) -> Option<Self> {
        let min_y = vertices.iter().map(|p| p.y).min()?;
        let max_y = vertices.iter().map(|p| p.y).max()?;

        // Both ends of the box are rows: the bottom vertex row is filled too.
        let mut spans = RowSpans {
            min_y,
            spans: vec![None; (max_y - min_y + 1) as usize],
        };
        for &p in vertices.iter().chain(edges) {
            spans.record(p);
        }
        Some(spans)
    }

    fn record(&mut self, p: Pixel) {
        let Some(row) = usize::try_from(p.y - self.min_y)
            .ok()
            .and_then(|i| self.spans.get_mut(i))
        else {
            return;
        };
        *row = Some(match *row {
            Some((left, right)) => (left.min(p.x), right.max(p.x)),
            None => (p.x, p.x),
        });
    }

    /// `(y, left, right)` for every row with two or more distinct X values.
    pub fn rows(&self) -> impl Iterator<Item = (i32, i32, i32)> + '_ {
        self.spans.iter().enumerate().filter_map(move |(i, span)| match *span {
            Some((left, right)) if left != right => Some((self.min_y + i as i32, left, right)),
            _ => None,
        })
    }
}

/// Fills the interior of a primitive with `cell` at `depth`.
///
/// When `exclude_outline` is set the span bounds themselves are left alone,
/// since the wireframe pass draws over them. Returns the number of cells
/// that passed the depth test.
pub fn fill_primitive(
    target: &mut RenderTarget<'_>,
    vertices: &[Pixel],
    edges: &[Pixel],
    depth: f32,
    cell: Cell,
    exclude_outline: bool,
) -> usize {
    let Some(spans) = RowSpans::new(vertices, edges) else {
        return 0;
    };

    let mut written = 0;
    for (y, left, right) in spans.rows() {
        let (from, to) = if exclude_outline {
            (left + 1, right - 1)
        } else {
            (left, right)
        };
        for x in from..=to {
            if target.set_pixel_with_depth(x, y, depth, cell) {
                written += 1;
            }
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::buffer::{DepthBuffer, FrameBuffer};
    use crate::render::line::rasterize_edges;

    const RED: Cell = Cell::Lit("\x1b[38;5;196m");
    const GREEN: Cell = Cell::Lit("\x1b[38;5;46m");

    fn triangle() -> (Vec<Pixel>, Vec<Pixel>) {
        let verts = vec![Pixel::new(20, 20), Pixel::new(24, 20), Pixel::new(20, 16)];
        let edges = rasterize_edges(&verts, false);
        (verts, edges)
    }

    #[test]
    fn spans_skip_single_cell_rows() {
        let (verts, edges) = triangle();
        let spans = RowSpans::new(&verts, &edges).unwrap();
        let rows: Vec<_> = spans.rows().collect();
        assert_eq!(
            rows,
            vec![(17, 20, 21), (18, 20, 22), (19, 20, 23), (20, 20, 24)]
        );
    }

    #[test]
    fn fills_inclusive_span_without_wireframe() {
        let (verts, edges) = triangle();
        let mut fb = FrameBuffer::new(41, 41);
        let mut db = DepthBuffer::new(41, 41);
        let written = fill_primitive(&mut RenderTarget::new(&mut fb, &mut db), &verts, &edges, 5.0, RED, false);

        assert_eq!(written, 14);
        assert_eq!(fb.lit_count(), 14);
        assert_eq!(fb.get(24, 20), Some(RED));
        assert_eq!(fb.get(20, 16), Some(Cell::Empty));
    }

    #[test]
    fn bottom_row_of_bounding_box_is_filled() {
        let verts = vec![Pixel::new(4, 1), Pixel::new(1, 5), Pixel::new(7, 5)];
        let edges = rasterize_edges(&verts, false);
        let spans = RowSpans::new(&verts, &edges).unwrap();
        assert_eq!(spans.rows().last(), Some((5, 1, 7)));

        let mut fb = FrameBuffer::new(10, 10);
        let mut db = DepthBuffer::new(10, 10);
        fill_primitive(&mut RenderTarget::new(&mut fb, &mut db), &verts, &edges, 5.0, RED, false);
        for x in 1..=7 {
            assert_eq!(fb.get(x, 5), Some(RED), "cell ({x}, 5)");
        }
    }

    #[test]
    fn excludes_outline_with_wireframe() {
        let (verts, edges) = triangle();
        let mut fb = FrameBuffer::new(41, 41);
        let mut db = DepthBuffer::new(41, 41);
        let written = fill_primitive(&mut RenderTarget::new(&mut fb, &mut db), &verts, &edges, 5.0, RED, true);

        // Rows 17..=20 keep only their interior: 0 + 1 + 2 + 3.
        assert_eq!(written, 6);
        assert_eq!(fb.get(20, 18), Some(Cell::Empty));
        assert_eq!(fb.get(21, 18), Some(RED));
    }

    #[test]
    fn second_fill_is_a_no_op() {
        let (verts, edges) = triangle();
        let mut fb = FrameBuffer::new(41, 41);
        let mut db = DepthBuffer::new(41, 41);
        fill_primitive(&mut RenderTarget::new(&mut fb, &mut db), &verts, &edges, 5.0, RED, false);
        let (fb_once, db_once) = (fb.clone(), db.clone());

        let written = fill_primitive(&mut RenderTarget::new(&mut fb, &mut db), &verts, &edges, 5.0, RED, false);
        assert_eq!(written, 0);
        assert_eq!(fb, fb_once);
        assert_eq!(db, db_once);
    }

    #[test]
    fn nearer_primitive_occludes_regardless_of_order() {
        let (verts, edges) = triangle();
        for near_first in [true, false] {
            let mut fb = FrameBuffer::new(41, 41);
            let mut db = DepthBuffer::new(41, 41);
            let mut target = RenderTarget::new(&mut fb, &mut db);
            let passes = if near_first {
                [(3.0, GREEN), (9.0, RED)]
            } else {
                [(9.0, RED), (3.0, GREEN)]
            };
            for (depth, cell) in passes {
                fill_primitive(&mut target, &verts, &edges, depth, cell, false);
            }
            assert_eq!(fb.get(22, 19), Some(GREEN));
            assert_eq!(db.get(22, 19), Some(3.0));
        }
    }

    #[test]
    fn off_screen_cells_are_ignored() {
        let verts = vec![Pixel::new(-3, 0), Pixel::new(2, 0), Pixel::new(-3, 1)];
        let edges = rasterize_edges(&verts, false);
        let mut fb = FrameBuffer::new(4, 4);
        let mut db = DepthBuffer::new(4, 4);
        let written = fill_primitive(&mut RenderTarget::new(&mut fb, &mut db), &verts, &edges, 2.0, RED, false);
        assert_eq!(written, fb.lit_count());
        assert!(written > 0);
    }

    #[test]
    fn empty_vertex_list_writes_nothing() {
        let mut fb = FrameBuffer::new(4, 4);
        let mut db = DepthBuffer::new(4, 4);
        assert_eq!(fill_primitive(&mut RenderTarget::new(&mut fb, &mut db), &[], &[], 1.0, RED, false), 0);
    }
}
