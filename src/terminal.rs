//! Terminal output for flushed frames.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor, execute, queue,
    style::Print,
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::colors::{Hue, ShadeLevel, GLYPH, RESET};
use crate::engine::FrameSink;

const BORDER_SHADE: ShadeLevel = match ShadeLevel::new(4) {
    Some(level) => level,
    None => ShadeLevel::MID,
};

/// Builds the one-cell border rows drawn around a `width`-cell frame.
fn border_row(width: usize) -> String {
    let color = Hue::Blue.shade(BORDER_SHADE);
    let mut row = String::with_capacity((width + 2) * GLYPH.len() + color.len() + RESET.len());
    row.push_str(color);
    for _ in 0..width + 2 {
        row.push_str(GLYPH);
    }
    row.push_str(RESET);
    row
}

fn border_cell() -> String {
    format!("{}{}{}", Hue::Blue.shade(BORDER_SHADE), GLYPH, RESET)
}

/// Writes the rows of a `width`-cell frame inside a border, one
/// cursor-positioned write per row, followed by a status line.
pub fn write_frame<W: Write>(out: &mut W, rows: &[String], width: usize, status: &str) -> io::Result<()> {
    let border = border_row(width);
    let side = border_cell();

    queue!(out, cursor::MoveTo(0, 0), Print(&border))?;
    for (i, row) in rows.iter().enumerate() {
        let y = u16::try_from(i + 1).unwrap_or(u16::MAX);
        queue!(out, cursor::MoveTo(0, y), Print(&side), Print(row), Print(&side))?;
    }
    let bottom = u16::try_from(rows.len() + 1).unwrap_or(u16::MAX);
    queue!(
        out,
        cursor::MoveTo(0, bottom),
        Print(&border),
        cursor::MoveTo(0, bottom.saturating_add(1)),
        terminal::Clear(ClearType::CurrentLine),
        Print(status)
    )?;
    out.flush()
}

/// Raw-mode alternate-screen terminal. Restored on drop.
pub struct TerminalDisplay {
    out: BufWriter<Stdout>,
    status: String,
}

impl TerminalDisplay {
    pub fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        terminal::enable_raw_mode()?;
        execute!(stdout, terminal::Clear(ClearType::All))?;
        Ok(Self {
            out: BufWriter::new(stdout),
            status: String::new(),
        })
    }

    /// Terminal size in frame cells, leaving room for the border and a
    /// status line.
    pub fn frame_size() -> io::Result<(usize, usize)> {
        let (columns, rows) = terminal::size()?;
        let width = (usize::from(columns) / 2).saturating_sub(2);
        let height = usize::from(rows).saturating_sub(3);
        Ok((width, height))
    }

    /// Text shown under the frame from the next present on.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

impl FrameSink for TerminalDisplay {
    fn present(&mut self, rows: &[String], width: usize) -> io::Result<()> {
        write_frame(&mut self.out, rows, width, &self.status)
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = self.out.flush();
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), Print(RESET), cursor::Show, LeaveAlternateScreen);
    }
}
