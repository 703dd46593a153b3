//! Keyboard input.
//!
//! A listener thread reads terminal key events and records the most recent
//! key in a [`KeyState`]. The frame loop samples it once per frame through a
//! [`KeyReader`]. Terminals report key presses but not releases, so a key
//! counts as held until [`HOLD_DURATION`] after its last press (auto-repeat
//! keeps refreshing it while the key is physically down).
//!
//! The shared state is a handful of atomics: one writer, one reader, and a
//! reader that sees a value one frame late is fine.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, warn};

use crate::config::RenderConfig;

/// How long a key stays held after its last press.
pub const HOLD_DURATION: Duration = Duration::from_millis(500);

const NO_KEY: u32 = 0;
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Last key pressed, shared between the listener and the frame loop.
#[derive(Debug)]
pub struct KeyState {
    key: AtomicU32,
    /// Milliseconds since `epoch` of the last press.
    pressed_at: AtomicU64,
    presses: AtomicU64,
    quit: AtomicBool,
    epoch: Instant,
}

impl Default for KeyState {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyState {
    pub fn new() -> Self {
        Self {
            key: AtomicU32::new(NO_KEY),
            pressed_at: AtomicU64::new(0),
            presses: AtomicU64::new(0),
            quit: AtomicBool::new(false),
            epoch: Instant::now(),
        }
    }

    /// Records a press of `key` at `now`.
    pub fn press_at(&self, key: char, now: Instant) {
        let stamp = now.saturating_duration_since(self.epoch).as_millis() as u64;
        self.key.store(u32::from(key), Ordering::Relaxed);
        self.pressed_at.store(stamp, Ordering::Relaxed);
        self.presses.fetch_add(1, Ordering::Release);
    }

    pub fn press(&self, key: char) {
        self.press_at(key, Instant::now());
    }

    pub fn request_quit(&self) {
        self.quit.store(true, Ordering::Release);
    }

    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }

    /// Total presses recorded so far.
    pub fn press_count(&self) -> u64 {
        self.presses.load(Ordering::Acquire)
    }

    /// The key held at `now`, if its hold has not expired.
    pub fn held_at(&self, now: Instant) -> Option<char> {
        let key = char::from_u32(self.key.load(Ordering::Relaxed)).filter(|&c| u32::from(c) != NO_KEY)?;
        let pressed_at = self.epoch + Duration::from_millis(self.pressed_at.load(Ordering::Relaxed));
        (now.saturating_duration_since(pressed_at) <= HOLD_DURATION).then_some(key)
    }
}

/// One frame's view of the keyboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    /// Key currently held, for continuous actions like camera motion.
    pub held: Option<char>,
    /// Key pressed since the previous snapshot, for one-shot actions.
    pub pressed: Option<char>,
}

/// Frame-loop side of a [`KeyState`]. Remembers which presses it has seen.
#[derive(Debug, Clone)]
pub struct KeyReader {
    state: Arc<KeyState>,
    seen: u64,
}

impl KeyReader {
    pub fn new(state: Arc<KeyState>) -> Self {
        let seen = state.press_count();
        Self { state, seen }
    }

    pub fn snapshot_at(&mut self, now: Instant) -> KeySnapshot {
        let presses = self.state.press_count();
        let held = self.state.held_at(now);
        let fresh = presses != self.seen;
        self.seen = presses;
        KeySnapshot {
            held,
            pressed: if fresh { held } else { None },
        }
    }

    pub fn snapshot(&mut self) -> KeySnapshot {
        self.snapshot_at(Instant::now())
    }

    pub fn quit_requested(&self) -> bool {
        self.state.quit_requested()
    }
}

// =============================================================================
// Render toggles
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    DebugOverlay,
    Vertices,
    Wireframe,
    Faces,
    Lighting,
}

impl Toggle {
    pub fn from_key(key: char) -> Option<Toggle> {
        match key {
            'e' | 'E' => Some(Toggle::DebugOverlay),
            '7' => Some(Toggle::Vertices),
            '8' => Some(Toggle::Wireframe),
            '9' => Some(Toggle::Faces),
            '0' => Some(Toggle::Lighting),
            _ => None,
        }
    }

    pub fn apply(self, config: &mut RenderConfig) {
        let flag = match self {
            Toggle::DebugOverlay => &mut config.debug_overlay,
            Toggle::Vertices => &mut config.draw_vertices,
            Toggle::Wireframe => &mut config.draw_wireframe,
            Toggle::Faces => &mut config.fill_faces,
            Toggle::Lighting => &mut config.lighting,
        };
        *flag = !*flag;
    }
}

// =============================================================================
// Listener
// =============================================================================

/// What a single key event means to the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Key(char),
    Ignore,
}

pub fn classify(event: KeyEvent) -> KeyAction {
    if event.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }
    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char(c) => KeyAction::Key(c.to_ascii_lowercase()),
        _ => KeyAction::Ignore,
    }
}

/// Spawns the thread that feeds `state` from terminal key events. The thread
/// exits after a quit key or once [`KeyState::request_quit`] is called.
pub fn spawn_listener(state: Arc<KeyState>) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("key-listener".into())
        .spawn(move || listen(&state))
}

fn listen(state: &KeyState) {
    while !state.quit_requested() {
        let event = match event::poll(POLL_INTERVAL) {
            Ok(true) => event::read(),
            Ok(false) => continue,
            Err(e) => Err(e),
        };
        match event {
            Ok(Event::Key(key)) => match classify(key) {
                KeyAction::Quit => {
                    debug!("quit requested from keyboard");
                    state.request_quit();
                }
                KeyAction::Key(c) => state.press(c),
                KeyAction::Ignore => {}
            },
            Ok(_) => {}
            Err(e) => {
                warn!("keyboard input failed: {e}");
                state.request_quit();
            }
        }
    }
}
