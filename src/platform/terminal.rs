//! Terminal input via crossterm
//!
//! A dedicated thread blocks on terminal events and forwards them through a
//! channel, so polling from the game loop never blocks on I/O.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{InputEvent, InputSource, Key, KeyState};

/// Gameplay key bound to a key code
fn game_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
        KeyCode::Char(' ') => Some(Key::Fire),
        _ => None,
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') | KeyCode::Char('q') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Translate a press or release into an input event; repeats yield nothing
pub fn translate_key(key: &KeyEvent) -> Option<InputEvent> {
    match key.kind {
        KeyEventKind::Press if is_quit(key) => Some(InputEvent::Quit),
        KeyEventKind::Press => Some(match game_key(key.code) {
            Some(k) => InputEvent::KeyDown(k),
            None => InputEvent::AnyKey,
        }),
        KeyEventKind::Release => game_key(key.code).map(InputEvent::KeyUp),
        KeyEventKind::Repeat => None,
    }
}

pub struct TerminalInput {
    rx: Receiver<Event>,
    keys: KeyState,
    closed: bool,
}

impl TerminalInput {
    /// Start the reader thread. The terminal must already be in raw mode.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<Event>();
        thread::spawn(move || {
            loop {
                match event::read() {
                    Ok(ev) => {
                        if tx.send(ev).is_err() {
                            // receiver dropped, program exiting
                            break;
                        }
                    }
                    Err(e) => {
                        log::warn!("Terminal input closed: {}", e);
                        break;
                    }
                }
            }
        });
        Self::from_receiver(rx)
    }

    /// Input fed from an existing event channel
    pub fn from_receiver(rx: Receiver<Event>) -> Self {
        Self {
            rx,
            keys: KeyState::default(),
            closed: false,
        }
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        self.keys.advance();
        let mut events = Vec::new();
        if self.closed {
            events.push(InputEvent::Closed);
            return events;
        }

        loop {
            match self.rx.try_recv() {
                Ok(Event::Key(key)) => {
                    // Without release reporting, auto-repeat arrives as more presses
                    let repeat = match key.kind {
                        KeyEventKind::Repeat => true,
                        KeyEventKind::Press => {
                            game_key(key.code).is_some_and(|k| self.keys.is_held(k))
                        }
                        KeyEventKind::Release => false,
                    };
                    if repeat {
                        // Keeps a held key alive
                        if let Some(k) = game_key(key.code) {
                            self.keys.press(k);
                        }
                        continue;
                    }
                    if let Some(ev) = translate_key(&key) {
                        self.keys.apply(&ev);
                        events.push(ev);
                    }
                }
                Ok(_) => {}
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    events.push(InputEvent::Closed);
                    break;
                }
            }
        }
        events
    }

    fn is_pressed(&self, key: Key) -> bool {
        self.keys.is_held(key)
    }
}
