//! Platform abstraction layer
//!
//! Handles terminal/native differences for:
//! - Time/ticks
//! - Input events and held-key state

pub mod terminal;

use std::collections::HashMap;
use std::time::{Duration, Instant};

pub use terminal::TerminalInput;

/// Keys the game reacts to while playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
}

/// Discrete input events, drained once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// A key with no gameplay meaning was pressed
    AnyKey,
    /// Reserved quit combination
    Quit,
    /// The input stream ended (window or terminal went away)
    Closed,
}

impl InputEvent {
    pub fn is_quit(&self) -> bool {
        matches!(self, InputEvent::Quit | InputEvent::Closed)
    }

    /// Fresh key press of any kind
    pub fn is_key_press(&self) -> bool {
        matches!(self, InputEvent::KeyDown(_) | InputEvent::AnyKey)
    }
}

/// Source of player input
pub trait InputSource {
    /// Events received since the previous poll; also advances held-key state
    fn poll(&mut self) -> Vec<InputEvent>;
    fn is_pressed(&self, key: Key) -> bool;
}

/// Monotonic time and tick pacing
pub trait Clock {
    /// Milliseconds since the clock was created
    fn now_ms(&self) -> u64;
    /// Sleep out the rest of the current tick period
    fn pace(&mut self, tick_ms: u64);
}

/// Held-key tracking for terminals that may never report key release
///
/// A key counts as held while its last press or repeat is at most
/// `hold_window` polls old, or until an explicit release.
#[derive(Debug, Clone)]
pub struct KeyState {
    last_seen: HashMap<Key, u64>,
    frame: u64,
    hold_window: u64,
}

impl KeyState {
    /// 4 polls at 30 Hz is about 133 ms, shorter than any OS key-repeat gap
    pub const DEFAULT_HOLD_WINDOW: u64 = 4;

    pub fn new(hold_window: u64) -> Self {
        Self {
            last_seen: HashMap::new(),
            frame: 0,
            hold_window,
        }
    }

    /// Start a new poll frame
    pub fn advance(&mut self) {
        self.frame += 1;
    }

    pub fn press(&mut self, key: Key) {
        self.last_seen.insert(key, self.frame);
    }

    pub fn release(&mut self, key: Key) {
        self.last_seen.remove(&key);
    }

    pub fn apply(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.press(*key),
            InputEvent::KeyUp(key) => self.release(*key),
            _ => {}
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.last_seen
            .get(&key)
            .is_some_and(|&last| self.frame.saturating_sub(last) <= self.hold_window)
    }
}

impl Default for KeyState {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HOLD_WINDOW)
    }
}

/// Wall-clock implementation backed by [`Instant`]
pub struct SystemClock {
    start: Instant,
    tick_start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            tick_start: now,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn pace(&mut self, tick_ms: u64) {
        let period = Duration::from_millis(tick_ms);
        let elapsed = self.tick_start.elapsed();
        if elapsed < period {
            std::thread::sleep(period - elapsed);
        }
        self.tick_start = Instant::now();
    }
}

/// Clock that only moves when paced; for deterministic runs and tests
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: u64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self { now_ms: start_ms }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn pace(&mut self, tick_ms: u64) {
        self.advance(tick_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_expires_after_hold_window() {
        let mut keys = KeyState::new(2);
        keys.advance();
        keys.press(Key::Fire);
        assert!(keys.is_held(Key::Fire));

        keys.advance();
        keys.advance();
        assert!(keys.is_held(Key::Fire));
        keys.advance();
        assert!(!keys.is_held(Key::Fire));
    }

    #[test]
    fn test_release_drops_key_immediately() {
        let mut keys = KeyState::default();
        keys.apply(&InputEvent::KeyDown(Key::Left));
        keys.apply(&InputEvent::KeyDown(Key::Right));
        keys.apply(&InputEvent::KeyUp(Key::Left));
        assert!(!keys.is_held(Key::Left));
        assert!(keys.is_held(Key::Right));
    }

    #[test]
    fn test_manual_clock_advances_on_pace() {
        let mut clock = ManualClock::new(100);
        clock.pace(33);
        clock.pace(33);
        assert_eq!(clock.now_ms(), 166);
    }

    #[test]
    fn test_event_classes() {
        assert!(InputEvent::Closed.is_quit());
        assert!(InputEvent::Quit.is_quit());
        assert!(InputEvent::AnyKey.is_key_press());
        assert!(!InputEvent::KeyUp(Key::Fire).is_key_press());
    }
}
