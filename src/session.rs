//! Game session
//!
//! Owns the fixed-timestep loop and the round lifecycle. Every iteration
//! either runs one simulation tick and draws the world, or (once the round is
//! over) shows the round-over screen and waits for a key before resetting.
//! Quit is checked on every poll, including while waiting.

use thiserror::Error;

use crate::assets::AssetStore;
use crate::audio::{AudioSink, SoundEffect};
use crate::platform::{Clock, InputSource, Key};
use crate::renderer::{self, RenderError, Renderer};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, tick};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Whether the loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<R, I, A, C> {
    state: GameState,
    assets: AssetStore,
    renderer: R,
    input: I,
    audio: A,
    clock: C,
    rounds_played: u32,
}

impl<R, I, A, C> Session<R, I, A, C>
where
    R: Renderer,
    I: InputSource,
    A: AudioSink,
    C: Clock,
{
    pub fn new(
        settings: Settings,
        seed: u64,
        assets: AssetStore,
        renderer: R,
        input: I,
        audio: A,
        clock: C,
    ) -> Self {
        log::info!("Session starting with seed {}", seed);
        let state = GameState::new(settings, seed, clock.now_ms());
        Self {
            state,
            assets,
            renderer,
            input,
            audio,
            clock,
            rounds_played: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Play rounds until quit, starting the first one immediately. Music
    /// plays throughout.
    pub fn run(&mut self) -> Result<(), SessionError> {
        self.audio.start_music();
        let result = self.run_rounds();
        self.audio.stop_music();
        log::info!("Session ended after {} rounds", self.rounds_played);
        result
    }

    fn run_rounds(&mut self) -> Result<(), SessionError> {
        while self.step()? == Flow::Continue {}
        Ok(())
    }

    /// One loop iteration
    pub fn step(&mut self) -> Result<Flow, SessionError> {
        if self.state.is_round_over() {
            let score = self.state.player.score;
            if self.wait_for_key(score)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
            self.state.reset(self.clock.now_ms());
            return Ok(Flow::Continue);
        }

        self.clock.pace(self.state.settings().tick_ms());
        if self.input.poll().iter().any(|ev| ev.is_quit()) {
            log::info!("Quit requested");
            return Ok(Flow::Quit);
        }

        let input = TickInput {
            left: self.input.is_pressed(Key::Left),
            right: self.input.is_pressed(Key::Right),
            fire: self.input.is_pressed(Key::Fire),
        };
        tick(&mut self.state, &input, self.clock.now_ms());

        for event in self.state.drain_events() {
            if let Some(effect) = SoundEffect::for_event(&event) {
                self.audio.play(effect);
            }
            if let GameEvent::RoundOver { score } = event {
                self.rounds_played += 1;
                log::info!("Round {} finished with score {}", self.rounds_played, score);
            }
        }

        renderer::draw_world(&mut self.renderer, &self.state, &self.assets);
        self.renderer.present()?;
        Ok(Flow::Continue)
    }

    /// Show the round-over screen and poll until a key press or quit
    fn wait_for_key(&mut self, final_score: u64) -> Result<Flow, SessionError> {
        renderer::draw_round_over(
            &mut self.renderer,
            self.state.settings(),
            &self.assets,
            final_score,
        );
        self.renderer.present()?;

        let tick_ms = self.state.settings().tick_ms();
        loop {
            self.clock.pace(tick_ms);
            let events = self.input.poll();
            if events.iter().any(|ev| ev.is_quit()) {
                log::info!("Quit requested from round-over screen");
                return Ok(Flow::Quit);
            }
            if events.iter().any(|ev| ev.is_key_press()) {
                return Ok(Flow::Continue);
            }
        }
    }
}
