//! Heads-up display
//!
//! Score text, shield and shoot-cooldown bars, and a row of life icons.

use glam::Vec2;

use crate::assets::{self, AssetStore, Rgb};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::player::shoot_ready_ratio;
use crate::sim::{Aabb, GameState};

pub const SCORE_TEXT_SIZE: u32 = 18;
pub const SCORE_TEXT_Y: f32 = 10.0;
pub const SHIELD_BAR_ORIGIN: Vec2 = Vec2::new(5.0, 5.0);
pub const SHOOT_BAR_ORIGIN: Vec2 = Vec2::new(5.0, 25.0);
/// Life icons start this far left of the field's right edge
pub const LIVES_OFFSET_X: f32 = 100.0;
pub const LIVES_Y: f32 = 5.0;
pub const LIFE_ICON_SIZE: Vec2 = Vec2::new(25.0, 19.0);

/// HUD values derived from one state snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score_text: String,
    pub shield_ratio: f32,
    pub shoot_ratio: f32,
    pub lives: u32,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score_text: state.player.score.to_string(),
            shield_ratio: state.player.shield_ratio(),
            shoot_ratio: shoot_ready_ratio(&state.player, state.settings(), state.now_ms),
            lives: state.player.lives,
        }
    }

    /// Top-left corners of the life icons
    pub fn life_icon_positions(&self, settings: &Settings) -> Vec<Vec2> {
        let start = settings.field_width - LIVES_OFFSET_X;
        (0..self.lives)
            .map(|i| Vec2::new(start + LIFE_ICON_SPACING * i as f32, LIVES_Y))
            .collect()
    }

    pub fn draw<R: super::Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        settings: &Settings,
        assets: &AssetStore,
    ) {
        renderer.draw_text(
            &self.score_text,
            SCORE_TEXT_SIZE,
            Vec2::new(settings.field_width / 2.0, SCORE_TEXT_Y),
        );
        renderer.draw_bar(SHIELD_BAR_ORIGIN, self.shield_ratio, Rgb::GREEN);
        renderer.draw_bar(SHOOT_BAR_ORIGIN, self.shoot_ratio, Rgb::RED);

        let icon = assets.image(assets::PLAYER_MINI_IMAGE);
        for pos in self.life_icon_positions(settings) {
            let bounds = Aabb {
                min: pos,
                max: pos + LIFE_ICON_SIZE,
            };
            renderer.draw_sprite(&icon, &bounds, 0.0);
        }
    }
}

/// Filled width of a HUD bar, clamped to the bar length
pub fn bar_fill(ratio: f32) -> f32 {
    ratio.clamp(0.0, 1.0) * BAR_LENGTH
}
