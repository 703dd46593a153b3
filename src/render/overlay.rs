//! Block-letter diagnostics overlay.
//!
//! Text is drawn straight into the frame buffer as 5x5 glyphs, one buffer
//! cell per glyph pixel. Characters advance 6 cells and lines are 6 rows
//! apart, leaving a one-cell gap in both directions.

use super::buffer::{Cell, FrameBuffer, Pixel};
use crate::colors::{Hue, ShadeLevel};
use crate::scheduler::FrameStats;

pub const GLYPH_SIZE: i32 = 5;
pub const CHAR_ADVANCE: i32 = 6;
pub const LINE_PITCH: i32 = 6;
pub const ORIGIN: Pixel = Pixel::new(5, 5);

const OVERLAY_SHADE: ShadeLevel = match ShadeLevel::new(6) {
    Some(level) => level,
    None => ShadeLevel::MID,
};

/// Rows of a 5x5 glyph, top first. Bit 4 is the leftmost column.
type Glyph = [u8; 5];

/// Bitmap for `c`, or `None` for characters with no glyph (including space).
pub fn glyph(c: char) -> Option<Glyph> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b11111, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b11110, 0b10001, 0b11110],
        'C' => [0b01111, 0b10000, 0b10000, 0b10000, 0b01111],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b11110, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b11110, 0b10000, 0b10000],
        'G' => [0b01111, 0b10000, 0b10011, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b11111, 0b10001, 0b10001],
        'I' => [0b11111, 0b00100, 0b00100, 0b00100, 0b11111],
        'J' => [0b00111, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10010, 0b10100, 0b11000, 0b10100, 0b10010],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b11110, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b11110, 0b10100, 0b10010],
        'S' => [0b01111, 0b10000, 0b01110, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10101, 0b11011, 0b10001],
        'X' => [0b10001, 0b01010, 0b00100, 0b01010, 0b10001],
        'Y' => [0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00010, 0b00100, 0b01000, 0b11111],
        '0' => [0b01110, 0b10011, 0b10101, 0b11001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b01110],
        '2' => [0b11110, 0b00001, 0b01110, 0b10000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00110, 0b00001, 0b11110],
        '4' => [0b10010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b11110],
        '6' => [0b01110, 0b10000, 0b11110, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b00100],
        '8' => [0b01110, 0b10001, 0b01110, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b01111, 0b00001, 0b01110],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00100],
        ':' => [0b00000, 0b00100, 0b00000, 0b00100, 0b00000],
        '%' => [0b11001, 0b11010, 0b00100, 0b01011, 0b10011],
        '-' => [0b00000, 0b00000, 0b01110, 0b00000, 0b00000],
        _ => return None,
    };
    Some(rows)
}

/// Draws `text` on overlay line `line`. Unknown characters still advance.
/// Cells outside the buffer are dropped.
pub fn draw_text(frame: &mut FrameBuffer, origin: Pixel, line: i32, text: &str, cell: Cell) {
    let top = origin.y + LINE_PITCH * line;

    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        let left = origin.x + CHAR_ADVANCE * i as i32;

        for (dy, bits) in rows.iter().enumerate() {
            for dx in 0..GLYPH_SIZE {
                if bits & (1 << (GLYPH_SIZE - 1 - dx)) != 0 {
                    frame.set(left + dx, top + dy as i32, cell);
                }
            }
        }
    }
}

/// The overlay's text lines and the overlay line each one goes on.
pub fn stats_lines(stats: &FrameStats, polygons: usize, lights: usize) -> [(i32, String, Hue); 9] {
    [
        (0, format!("FT:      {:.3}MS", stats.compute_ms), Hue::Red),
        (1, format!("FT UTIL: {:.3}%", stats.utilization), Hue::Red),
        (2, format!("P FPS:   {:.3}", stats.theoretical_fps), Hue::Red),
        (3, format!("RL FPS:  {:.3}", stats.measured_fps), Hue::Red),
        (4, format!("POLYS:   {polygons}"), Hue::Red),
        (5, format!("LIGHTS:  {lights}"), Hue::Red),
        (7, format!("FT AVG:     {:.3}MS", stats.avg_compute_ms), Hue::Cyan),
        (8, format!("FT UTL AVG: {:.3}%", stats.avg_utilization), Hue::Cyan),
        (9, format!("PT FPS AVG: {:.3}", stats.avg_fps), Hue::Cyan),
    ]
}

/// Draws frame statistics at [`ORIGIN`].
pub fn draw_stats(frame: &mut FrameBuffer, stats: &FrameStats, polygons: usize, lights: usize) {
    for (line, text, hue) in stats_lines(stats, polygons, lights) {
        draw_text(frame, ORIGIN, line, &text, Cell::Lit(hue.shade(OVERLAY_SHADE)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Cell = Cell::Lit("\x1b[38;5;51m");

    #[test]
    fn every_stats_character_has_a_glyph() {
        for (_, text, _) in stats_lines(&FrameStats::default(), 12, 3) {
            for c in text.chars().filter(|c| *c != ' ') {
                assert!(glyph(c).is_some(), "missing glyph for {c:?}");
            }
        }
    }

    #[test]
    fn glyphs_fit_five_columns() {
        for c in ('A'..='Z').chain('0'..='9') {
            for row in glyph(c).unwrap() {
                assert!(row < 0b100000, "{c}");
            }
        }
    }

    #[test]
    fn lowercase_uses_uppercase_glyphs() {
        assert_eq!(glyph('p'), glyph('P'));
    }

    #[test]
    fn draws_at_advance_and_pitch() {
        let mut frame = FrameBuffer::new(20, 20);
        draw_text(&mut frame, Pixel::new(0, 0), 1, " L", INK);
        // 'L' is the second character on line 1: columns 6..11, rows 6..11.
        assert_eq!(frame.get(6, 6), Some(INK));
        assert_eq!(frame.get(6, 10), Some(INK));
        assert_eq!(frame.get(10, 10), Some(INK));
        assert_eq!(frame.get(7, 6), Some(Cell::Empty));
        assert_eq!(frame.lit_count(), 9);
    }

    #[test]
    fn clips_at_buffer_edge() {
        let mut frame = FrameBuffer::new(8, 3);
        draw_text(&mut frame, Pixel::new(5, 0), 0, "T", INK);
        // Top bar cols 5..8 visible, stem col 7 rows 1..2 visible.
        assert_eq!(frame.lit_count(), 5);
    }

    #[test]
    fn stats_overlay_writes_cells() {
        let mut frame = FrameBuffer::new(160, 80);
        draw_stats(&mut frame, &FrameStats::default(), 1, 0);
        assert!(frame.lit_count() > 0);
        assert_eq!(frame.get(0, 0), Some(Cell::Empty));
    }
}
