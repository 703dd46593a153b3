//! Frame and depth buffers.
//!
//! [`FrameBuffer`] holds one display cell per screen position and
//! [`DepthBuffer`] the nearest depth written there this frame. Both are owned
//! by the renderer and cleared every frame; [`RenderTarget`] borrows the pair
//! so the rasterizer can write colour and depth together with bounds checks.

use crate::colors::{BLANK, GLYPH, RESET};

/// Signed screen coordinate. Rows grow downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
}

impl Pixel {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A single display cell: either background or a lit glyph in some colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Lit(&'static str),
}

impl Cell {
    /// Appends the formatted colour + glyph string for this cell.
    pub fn write_to(self, out: &mut String) {
        match self {
            Cell::Empty => out.push_str(BLANK),
            Cell::Lit(color) => {
                out.push_str(color);
                out.push_str(GLYPH);
                out.push_str(RESET);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![Cell::Empty; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Writes a cell, silently ignoring out-of-bounds coordinates.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Get the cell at (x, y), or None if out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Iterates the rows of cells top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Number of non-empty cells.
    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }

    /// Formats every row into a display string.
    pub fn to_strings(&self) -> Vec<String> {
        self.rows()
            .map(|row| {
                let mut line = String::with_capacity(row.len() * 16);
                for cell in row {
                    cell.write_to(&mut line);
                }
                line
            })
            .collect()
    }
}

/// Per-cell nearest depth for the current frame. Smaller is nearer.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    depths: Vec<f32>,
    width: usize,
    height: usize,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            depths: vec![f32::INFINITY; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Resets every cell to +infinity.
    pub fn clear(&mut self) {
        self.depths.fill(f32::INFINITY);
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<f32> {
        if x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height {
            Some(self.depths[y as usize * self.width + x as usize])
        } else {
            None
        }
    }
}

/// A view into a frame buffer and its depth buffer.
///
/// This is a borrowed view, not an owning type - it's created temporarily
/// when the rasterizer needs both buffers at once.
pub struct RenderTarget<'a> {
    frame: &'a mut FrameBuffer,
    depth: &'a mut DepthBuffer,
}

impl<'a> RenderTarget<'a> {
    /// # Panics
    /// Panics in debug builds if the two buffers differ in size.
    pub fn new(frame: &'a mut FrameBuffer, depth: &'a mut DepthBuffer) -> Self {
        debug_assert_eq!(
            (frame.width, frame.height),
            (depth.width, depth.height),
            "Frame and depth buffer dimensions differ"
        );
        Self { frame, depth }
    }

    pub fn width(&self) -> usize {
        self.frame.width
    }

    pub fn height(&self) -> usize {
        self.frame.height
    }

    /// Set a cell without depth testing (wireframe, markers, overlay).
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, cell: Cell) {
        self.frame.set(x, y, cell);
    }

    /// Set a cell with depth testing.
    ///
    /// The cell is only written if the buffered depth is greater than `depth`
    /// (the new value is nearer). Silently ignores out-of-bounds coordinates.
    /// Returns whether the write happened.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: f32, cell: Cell) -> bool {
        match self.frame.index(x, y) {
            Some(i) if self.depth.depths[i] > depth => {
                self.depth.depths[i] = depth;
                self.frame.cells[i] = cell;
                true
            }
            _ => false,
        }
    }
}
