//! Drives a full session with scripted input and recording collaborators

use std::collections::VecDeque;

use glam::Vec2;

use shmup::assets::{AssetStore, Rgb, Sprite};
use shmup::audio::{AudioSink, SoundEffect};
use shmup::platform::{InputEvent, InputSource, Key, ManualClock};
use shmup::renderer::{PROMPT_TEXT, RenderError, Renderer, TITLE_TEXT};
use shmup::settings::{Settings, Span};
use shmup::sim::{Aabb, PlayerState};
use shmup::Session;

/// One poll's worth of input: discrete events plus keys held during it
struct Frame {
    events: Vec<InputEvent>,
    held: Vec<Key>,
}

impl Frame {
    fn events(events: Vec<InputEvent>) -> Self {
        Self {
            events,
            held: Vec::new(),
        }
    }

    fn idle() -> Self {
        Self::events(Vec::new())
    }

    fn holding(keys: Vec<Key>) -> Self {
        Self {
            events: Vec::new(),
            held: keys,
        }
    }
}

/// Replays frames in order; once exhausted the stream reports closed
struct ScriptedInput {
    frames: VecDeque<Frame>,
    held: Vec<Key>,
}

impl ScriptedInput {
    fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
            held: Vec::new(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        match self.frames.pop_front() {
            Some(frame) => {
                self.held = frame.held;
                frame.events
            }
            None => {
                self.held.clear();
                vec![InputEvent::Closed]
            }
        }
    }

    fn is_pressed(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

#[derive(Default)]
struct RecordingRenderer {
    texts: Vec<String>,
    sprites: usize,
    presents: usize,
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self, _background: &Sprite) {}

    fn draw_sprite(&mut self, _sprite: &Sprite, _bounds: &Aabb, _rotation_deg: f32) {
        self.sprites += 1;
    }

    fn draw_bar(&mut self, _origin: Vec2, _ratio: f32, _color: Rgb) {}

    fn draw_text(&mut self, text: &str, _size: u32, _anchor: Vec2) {
        self.texts.push(text.to_string());
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.presents += 1;
        Ok(())
    }
}

#[derive(Default)]
struct RecordingAudio {
    played: Vec<SoundEffect>,
    music_starts: usize,
    music_stops: usize,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.played.push(effect);
    }

    fn start_music(&mut self) {
        self.music_starts += 1;
    }

    fn stop_music(&mut self) {
        self.music_stops += 1;
    }
}

type TestSession = Session<RecordingRenderer, ScriptedInput, RecordingAudio, ManualClock>;

fn session(settings: Settings, frames: Vec<Frame>) -> TestSession {
    Session::new(
        settings,
        7,
        AssetStore::empty(),
        RecordingRenderer::default(),
        ScriptedInput::new(frames),
        RecordingAudio::default(),
        ManualClock::new(0),
    )
}

fn count(texts: &[String], needle: &str) -> usize {
    texts.iter().filter(|t| t.as_str() == needle).count()
}

#[test]
fn test_first_round_starts_without_a_key() {
    let mut session = session(
        Settings::default(),
        vec![Frame::idle(), Frame::events(vec![InputEvent::Quit])],
    );
    session.run().expect("session runs");

    assert_eq!(session.state().ticks, 1);
    assert_eq!(session.renderer().presents, 1);
    assert_eq!(count(&session.renderer().texts, TITLE_TEXT), 0);
    assert_eq!(session.audio().music_starts, 1);
    assert_eq!(session.audio().music_stops, 1);
}

#[test]
fn test_quit_before_first_tick() {
    let mut session = session(
        Settings::default(),
        vec![Frame::events(vec![InputEvent::Quit])],
    );
    session.run().expect("session runs");

    assert_eq!(session.state().ticks, 0);
    assert_eq!(session.renderer().presents, 0);
    assert_eq!(session.audio().music_stops, 1);
}

#[test]
fn test_held_fire_shoots_after_cooldown() {
    let mut frames: Vec<Frame> = (0..12).map(|_| Frame::holding(vec![Key::Fire])).collect();
    frames.push(Frame::events(vec![InputEvent::Quit]));

    let mut settings = Settings::default();
    settings.mob.count = 0;
    let mut session = session(settings, frames);
    session.run().expect("session runs");

    let state = session.state();
    assert_eq!(state.ticks, 12);
    assert!(state.arena.bullet_count() >= 1);
    assert_eq!(
        session.audio().played.first(),
        Some(&SoundEffect::Shoot)
    );
    // one frame per tick
    assert_eq!(session.renderer().presents, 12);
    assert!(session.renderer().sprites > 0);
}

#[test]
fn test_closed_input_stops_mid_round() {
    let mut session = session(
        Settings::default(),
        vec![Frame::holding(vec![Key::Left])],
    );
    session.run().expect("session runs");

    assert_eq!(session.state().ticks, 1);
    assert_eq!(session.audio().music_stops, 1);
}

/// A single huge, fast mob lined up with the player: the first contact is fatal
fn doomed_settings() -> Settings {
    let mut settings = Settings::default();
    settings.player.lives = 1;
    settings.mob.count = 1;
    settings.mob.variants = vec![Vec2::new(350.0, 40.0)];
    settings.mob.spawn_y = Span::new(-50, -49);
    settings.mob.speed_x = Span::new(0, 1);
    settings.mob.speed_y = Span::new(20, 21);
    settings
}

#[test]
fn test_round_over_waits_then_resets() {
    let mut frames: Vec<Frame> = (0..80).map(|_| Frame::idle()).collect();
    frames.push(Frame::events(vec![InputEvent::AnyKey]));
    frames.push(Frame::events(vec![InputEvent::Quit]));

    let mut session = session(doomed_settings(), frames);
    session.run().expect("session runs");

    assert_eq!(session.rounds_played(), 1);
    let texts = &session.renderer().texts;
    // round-over screen with the final score, shown once
    assert_eq!(count(texts, TITLE_TEXT), 1);
    assert_eq!(count(texts, PROMPT_TEXT), 1);
    assert_eq!(count(texts, "Score: 0"), 1);

    // fresh round after the restart key
    let state = session.state();
    assert!(!state.is_round_over());
    assert_eq!(state.player.state, PlayerState::Active);
    assert_eq!(state.player.lives, 1);
    assert_eq!(state.player.score, 0);
    assert_eq!(state.arena.mob_count(), 1);
}

#[test]
fn test_quit_while_waiting_on_round_over() {
    let mut frames: Vec<Frame> = (0..80).map(|_| Frame::idle()).collect();
    frames.push(Frame::events(vec![InputEvent::Quit]));

    let mut session = session(doomed_settings(), frames);
    session.run().expect("session runs");

    assert!(session.state().is_round_over());
    assert_eq!(session.rounds_played(), 1);
    assert_eq!(session.audio().music_stops, 1);
}
