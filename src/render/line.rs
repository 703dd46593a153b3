//! Line rasterization between two screen cells.
//!
//! # Algorithm
//!
//! Axis-aligned lines step directly along their constant axis. For general
//! slopes the rasterizer picks the axis that changes fastest:
//!
//! ```text
//!   |slope| >= 1  -> step Y, x = x0 + (y - y0) * dx / dy   (one cell per row)
//!   |slope| <  1  -> step X, y = y0 + (x - x0) * dy / dx   (one cell per column)
//! ```
//!
//! Stepping the major axis means steep lines never leave gaps between rows and
//! shallow lines never leave gaps between columns.
//!
//! The stepping range is half-open: the endpoint with the lower stepping
//! coordinate is included, the other is not. With `skip_first` the lower
//! endpoint is dropped as well, leaving room for a vertex marker there.
//!
//! The computation always starts from the lower endpoint, so `a -> b` and
//! `b -> a` produce the same cells.

use std::collections::HashSet;

use super::buffer::Pixel;

/// Rasterizes the line from `a` to `b`.
///
/// Returns cells ordered along the stepping axis. Coincident endpoints produce
/// no cells.
pub fn rasterize_line(a: Pixel, b: Pixel, skip_first: bool) -> Vec<Pixel> {
    let skip = i32::from(skip_first);
    let dx = b.x - a.x;
    let dy = b.y - a.y;

    if dx == 0 {
        let (start, end) = (a.y.min(b.y), a.y.max(b.y));
        return (start + skip..end).map(|y| Pixel::new(a.x, y)).collect();
    }

    if dy == 0 {
        let (start, end) = (a.x.min(b.x), a.x.max(b.x));
        return (start + skip..end).map(|x| Pixel::new(x, a.y)).collect();
    }

    if dy.abs() >= dx.abs() {
        // Steep: one cell per row.
        let (start, end) = if a.y <= b.y { (a, b) } else { (b, a) };
        let inverse_slope = (end.x - start.x) as f32 / (end.y - start.y) as f32;
        (start.y + skip..end.y)
            .map(|y| {
                let x = start.x as f32 + (y - start.y) as f32 * inverse_slope;
                Pixel::new(x.round() as i32, y)
            })
            .collect()
    } else {
        // Shallow: one cell per column.
        let (start, end) = if a.x <= b.x { (a, b) } else { (b, a) };
        let slope = (end.y - start.y) as f32 / (end.x - start.x) as f32;
        (start.x + skip..end.x)
            .map(|x| {
                let y = start.y as f32 + (x - start.x) as f32 * slope;
                Pixel::new(x, y.round() as i32)
            })
            .collect()
    }
}

/// Connects every unordered pair of `vertices` exactly once.
///
/// Pairs are keyed on their screen endpoints, so two vertices that land on
/// the same cells as an earlier pair are not rasterized again.
pub fn rasterize_edges(vertices: &[Pixel], skip_first: bool) -> Vec<Pixel> {
    let mut connected: HashSet<(Pixel, Pixel)> = HashSet::new();
    let mut pixels = Vec::new();

    for (i, &a) in vertices.iter().enumerate() {
        for &b in &vertices[i + 1..] {
            let key = if a <= b { (a, b) } else { (b, a) };
            if connected.insert(key) {
                pixels.extend(rasterize_line(a, b, skip_first));
            }
        }
    }

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pixels: Vec<Pixel>) -> HashSet<Pixel> {
        pixels.into_iter().collect()
    }

    #[test]
    fn horizontal_excludes_far_endpoint() {
        let line = rasterize_line(Pixel::new(0, 0), Pixel::new(4, 0), false);
        assert_eq!(
            line,
            vec![Pixel::new(0, 0), Pixel::new(1, 0), Pixel::new(2, 0), Pixel::new(3, 0)]
        );
    }

    #[test]
    fn skip_first_drops_near_endpoint() {
        let line = rasterize_line(Pixel::new(0, 0), Pixel::new(4, 0), true);
        assert_eq!(line, vec![Pixel::new(1, 0), Pixel::new(2, 0), Pixel::new(3, 0)]);

        let steep = rasterize_line(Pixel::new(0, 0), Pixel::new(2, 6), true);
        assert_eq!(steep.len(), 5);
        assert!(!steep.contains(&Pixel::new(0, 0)));
    }

    #[test]
    fn vertical_steps_rows() {
        let line = rasterize_line(Pixel::new(3, 5), Pixel::new(3, 2), false);
        assert_eq!(line, vec![Pixel::new(3, 2), Pixel::new(3, 3), Pixel::new(3, 4)]);
    }

    #[test]
    fn coincident_endpoints_are_empty() {
        assert!(rasterize_line(Pixel::new(7, 7), Pixel::new(7, 7), false).is_empty());
    }

    #[test]
    fn steep_lines_have_one_cell_per_row() {
        let line = rasterize_line(Pixel::new(0, 0), Pixel::new(3, 10), false);
        assert_eq!(line.len(), 10);
        for (i, p) in line.iter().enumerate() {
            assert_eq!(p.y, i as i32);
        }
    }

    #[test]
    fn shallow_lines_have_one_cell_per_column() {
        let line = rasterize_line(Pixel::new(10, 4), Pixel::new(0, 0), false);
        assert_eq!(line.len(), 10);
        for (i, p) in line.iter().enumerate() {
            assert_eq!(p.x, i as i32);
        }
    }

    #[test]
    fn direction_does_not_matter() {
        let pairs = [
            (Pixel::new(0, 0), Pixel::new(4, 0)),
            (Pixel::new(1, 1), Pixel::new(8, 4)),
            (Pixel::new(2, 9), Pixel::new(5, 0)),
            (Pixel::new(-3, 2), Pixel::new(6, -7)),
            (Pixel::new(0, 0), Pixel::new(5, 2)),
            (Pixel::new(4, 4), Pixel::new(4, -4)),
        ];
        for (a, b) in pairs {
            for skip in [false, true] {
                assert_eq!(
                    set(rasterize_line(a, b, skip)),
                    set(rasterize_line(b, a, skip)),
                    "{a:?} -> {b:?}, skip = {skip}"
                );
            }
        }
    }

    #[test]
    fn diagonal_is_stepped_along_y() {
        let line = rasterize_line(Pixel::new(24, 20), Pixel::new(20, 16), false);
        assert_eq!(
            line,
            vec![Pixel::new(20, 16), Pixel::new(21, 17), Pixel::new(22, 18), Pixel::new(23, 19)]
        );
    }

    #[test]
    fn triangle_edges_connect_each_pair_once() {
        let verts = [Pixel::new(20, 20), Pixel::new(24, 20), Pixel::new(20, 16)];
        let edges = rasterize_edges(&verts, false);
        // 4 horizontal + 4 vertical + 4 diagonal.
        assert_eq!(edges.len(), 12);
    }

    #[test]
    fn coincident_vertex_pairs_are_not_repeated() {
        let verts = [Pixel::new(0, 0), Pixel::new(5, 0), Pixel::new(5, 0)];
        let edges = rasterize_edges(&verts, false);
        // (0,0)-(5,0) once, (5,0)-(5,0) empty.
        assert_eq!(edges.len(), 5);
    }
}
