//! Rendering module
//!
//! The [`Renderer`] trait is the display surface the session draws through;
//! scene composition (world, HUD, round-over screen) lives here so every
//! surface draws the same frame.

pub mod hud;
pub mod terminal;

use glam::Vec2;
use thiserror::Error;

use crate::assets::{self, AssetStore, Rgb, Sprite};
use crate::settings::Settings;
use crate::sim::{Aabb, GameState, PlayerState};

pub use hud::Hud;
pub use terminal::TerminalRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Display surface
///
/// Coordinates are field pixels with the origin at the top-left.
pub trait Renderer {
    /// Start a frame filled with the background
    fn clear(&mut self, background: &Sprite);
    fn draw_sprite(&mut self, sprite: &Sprite, bounds: &Aabb, rotation_deg: f32);
    /// Horizontal bar with its top-left corner at `origin`, filled to `ratio`
    fn draw_bar(&mut self, origin: Vec2, ratio: f32, color: Rgb);
    /// Text whose top edge is centred on `anchor`
    fn draw_text(&mut self, text: &str, size: u32, anchor: Vec2);
    /// Show the composed frame
    fn present(&mut self) -> Result<(), RenderError>;
}

/// Round-over screen text
pub const TITLE_TEXT: &str = "SHMUP!";
pub const INSTRUCTIONS_TEXT: &str = "Arrow keys move, Space to fire";
pub const PROMPT_TEXT: &str = "Press a key to begin";

/// Compose one gameplay frame: background, entities in id order, player, HUD
pub fn draw_world<R: Renderer + ?Sized>(renderer: &mut R, state: &GameState, assets: &AssetStore) {
    renderer.clear(&assets.image(assets::BACKGROUND_IMAGE));

    for entity in state.arena.iter() {
        let rotation = entity.as_mob().map_or(0.0, |mob| mob.rot);
        let sprite = assets.image(&assets::entity_image(&entity.kind));
        renderer.draw_sprite(&sprite, &entity.bounds(), rotation);
    }

    if state.player.state == PlayerState::Active {
        let sprite = assets.image(assets::PLAYER_IMAGE);
        renderer.draw_sprite(&sprite, &state.player.bounds(), 0.0);
    }

    Hud::from_state(state).draw(renderer, state.settings(), assets);
}

/// Round-over screen with the final score
pub fn draw_round_over<R: Renderer + ?Sized>(
    renderer: &mut R,
    settings: &Settings,
    assets: &AssetStore,
    final_score: u64,
) {
    let center_x = settings.field_width / 2.0;
    let height = settings.field_height;

    renderer.clear(&assets.image(assets::BACKGROUND_IMAGE));
    renderer.draw_text(TITLE_TEXT, 64, Vec2::new(center_x, height / 4.0));
    let line = format!("Score: {}", final_score);
    renderer.draw_text(&line, 22, Vec2::new(center_x, height * 3.0 / 8.0));
    renderer.draw_text(INSTRUCTIONS_TEXT, 22, Vec2::new(center_x, height / 2.0));
    renderer.draw_text(PROMPT_TEXT, 18, Vec2::new(center_x, height * 3.0 / 4.0));
}
