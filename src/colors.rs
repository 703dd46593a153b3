//! Display colour table.
//!
//! Each [`Hue`] owns a ramp of ten ANSI 256-colour foreground prefixes, indexed
//! by a [`ShadeLevel`]. Hue names come from configuration; an unknown name is a
//! configuration error and never reaches the render loop.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Resets all terminal attributes.
pub const RESET: &str = "\x1b[0m";

/// Glyph drawn for a lit cell. Cells are two columns wide so they come out
/// roughly square in a terminal.
pub const GLYPH: &str = "██";

/// Glyph drawn for an empty cell.
pub const BLANK: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Hue {
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan,
    Gray,
}

impl Hue {
    pub const ALL: [Hue; 7] = [
        Hue::Red,
        Hue::Green,
        Hue::Blue,
        Hue::Yellow,
        Hue::Magenta,
        Hue::Cyan,
        Hue::Gray,
    ];

    /// Returns the colour prefix for this hue at the given shade.
    pub fn shade(self, level: ShadeLevel) -> &'static str {
        self.ramp()[(level.get() - 1) as usize]
    }

    fn ramp(self) -> &'static [&'static str; 10] {
        match self {
            Hue::Red => &RED,
            Hue::Green => &GREEN,
            Hue::Blue => &BLUE,
            Hue::Yellow => &YELLOW,
            Hue::Magenta => &MAGENTA,
            Hue::Cyan => &CYAN,
            Hue::Gray => &GRAY,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Hue::Red => "Red",
            Hue::Green => "Green",
            Hue::Blue => "Blue",
            Hue::Yellow => "Yellow",
            Hue::Magenta => "Magenta",
            Hue::Cyan => "Cyan",
            Hue::Gray => "Gray",
        }
    }
}

impl fmt::Display for Hue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown hue '{0}'")]
pub struct UnknownHue(pub String);

impl FromStr for Hue {
    type Err = UnknownHue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("grey") {
            return Ok(Hue::Gray);
        }
        Hue::ALL
            .into_iter()
            .find(|hue| hue.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownHue(s.to_string()))
    }
}

/// Discrete luminance index in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShadeLevel(u8);

impl ShadeLevel {
    pub const MIN: ShadeLevel = ShadeLevel(1);
    pub const MID: ShadeLevel = ShadeLevel(5);
    pub const MAX: ShadeLevel = ShadeLevel(10);

    /// Returns `None` outside `1..=10`.
    pub const fn new(level: u8) -> Option<Self> {
        if level >= 1 && level <= 10 {
            Some(Self(level))
        } else {
            None
        }
    }

    /// Clamps any integer into `1..=10`.
    pub fn clamped(level: i32) -> Self {
        Self(level.clamp(1, 10) as u8)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

// 8-bit palette ramps, darkest first.
const RED: [&str; 10] = [
    "\x1b[38;5;52m",
    "\x1b[38;5;88m",
    "\x1b[38;5;124m",
    "\x1b[38;5;160m",
    "\x1b[38;5;196m",
    "\x1b[38;5;197m",
    "\x1b[38;5;198m",
    "\x1b[38;5;199m",
    "\x1b[38;5;200m",
    "\x1b[38;5;201m",
];

const GREEN: [&str; 10] = [
    "\x1b[38;5;22m",
    "\x1b[38;5;28m",
    "\x1b[38;5;34m",
    "\x1b[38;5;40m",
    "\x1b[38;5;46m",
    "\x1b[38;5;47m",
    "\x1b[38;5;48m",
    "\x1b[38;5;49m",
    "\x1b[38;5;50m",
    "\x1b[38;5;51m",
];

const BLUE: [&str; 10] = [
    "\x1b[38;5;17m",
    "\x1b[38;5;18m",
    "\x1b[38;5;19m",
    "\x1b[38;5;20m",
    "\x1b[38;5;21m",
    "\x1b[38;5;27m",
    "\x1b[38;5;33m",
    "\x1b[38;5;39m",
    "\x1b[38;5;45m",
    "\x1b[38;5;51m",
];

const YELLOW: [&str; 10] = [
    "\x1b[38;5;58m",
    "\x1b[38;5;94m",
    "\x1b[38;5;136m",
    "\x1b[38;5;178m",
    "\x1b[38;5;220m",
    "\x1b[38;5;221m",
    "\x1b[38;5;222m",
    "\x1b[38;5;223m",
    "\x1b[38;5;224m",
    "\x1b[38;5;225m",
];

const MAGENTA: [&str; 10] = [
    "\x1b[38;5;53m",
    "\x1b[38;5;89m",
    "\x1b[38;5;125m",
    "\x1b[38;5;161m",
    "\x1b[38;5;197m",
    "\x1b[38;5;198m",
    "\x1b[38;5;199m",
    "\x1b[38;5;200m",
    "\x1b[38;5;201m",
    "\x1b[38;5;207m",
];

const CYAN: [&str; 10] = [
    "\x1b[38;5;23m",
    "\x1b[38;5;30m",
    "\x1b[38;5;37m",
    "\x1b[38;5;44m",
    "\x1b[38;5;51m",
    "\x1b[38;5;50m",
    "\x1b[38;5;49m",
    "\x1b[38;5;48m",
    "\x1b[38;5;47m",
    "\x1b[38;5;46m",
];

const GRAY: [&str; 10] = [
    "\x1b[38;5;232m",
    "\x1b[38;5;236m",
    "\x1b[38;5;240m",
    "\x1b[38;5;244m",
    "\x1b[38;5;248m",
    "\x1b[38;5;252m",
    "\x1b[38;5;253m",
    "\x1b[38;5;254m",
    "\x1b[38;5;255m",
    "\x1b[38;5;231m",
];
