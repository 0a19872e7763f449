//! Named images and sounds with placeholder fallback
//!
//! Assets are described by a JSON manifest mapping names to terminal sprites
//! and sound cues. Anything the manifest does not name (or a manifest that
//! cannot be read at all) resolves to a coloured placeholder rectangle or a
//! silent sound, so lookups never fail.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{EntityKind, ExplosionSize, PowerUpKind};

/// Default manifest location, relative to the working directory
pub const MANIFEST_FILE: &str = "assets/manifest.json";

/// Glyph used for placeholder rectangles
pub const PLACEHOLDER_GLYPH: char = '█';

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read asset manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed asset manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 24-bit colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
}

/// A drawable image: one glyph tiled over the entity bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    pub glyph: char,
    pub color: Rgb,
}

impl Sprite {
    /// Solid rectangle in a colour picked from the asset name
    pub fn placeholder(name: &str) -> Self {
        let color = match name.split('.').next().unwrap_or(name) {
            "player" => Rgb::GREEN,
            "bullet" => Rgb::YELLOW,
            "mob" => Rgb::RED,
            "powerup" => Rgb::BLUE,
            _ => Rgb::WHITE,
        };
        Self {
            glyph: PLACEHOLDER_GLYPH,
            color,
        }
    }
}

/// A sound cue; the terminal can only ring its bell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sound {
    #[serde(default)]
    pub bell: bool,
}

impl Sound {
    /// No-op sound used for anything missing
    pub fn silent() -> Self {
        Self::default()
    }
}

/// On-disk manifest layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct Manifest {
    images: HashMap<String, Sprite>,
    sounds: HashMap<String, Sound>,
}

/// Resolves asset names to sprites and sounds
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    manifest: Manifest,
}

impl AssetStore {
    /// A store with no entries; every lookup yields a placeholder
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        let manifest: Manifest = serde_json::from_str(json)?;
        Ok(Self { manifest })
    }

    /// Load the manifest at `path`, falling back to placeholders on failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let result = std::fs::read_to_string(path)
            .map_err(AssetError::from)
            .and_then(|json| Self::from_json(&json));
        match result {
            Ok(store) => {
                log::info!(
                    "Loaded {} images and {} sounds from {}",
                    store.manifest.images.len(),
                    store.manifest.sounds.len(),
                    path.display()
                );
                store
            }
            Err(e) => {
                log::warn!("{}; using placeholder assets", e);
                Self::empty()
            }
        }
    }

    pub fn image(&self, name: &str) -> Sprite {
        match self.manifest.images.get(name) {
            Some(sprite) => sprite.clone(),
            None => {
                log::trace!("Missing image `{}`", name);
                Sprite::placeholder(name)
            }
        }
    }

    pub fn sound(&self, name: &str) -> Sound {
        match self.manifest.sounds.get(name) {
            Some(sound) => sound.clone(),
            None => {
                log::trace!("Missing sound `{}`", name);
                Sound::silent()
            }
        }
    }
}

// Asset naming

pub const PLAYER_IMAGE: &str = "player";
pub const PLAYER_MINI_IMAGE: &str = "player.mini";
pub const BULLET_IMAGE: &str = "bullet";
pub const BACKGROUND_IMAGE: &str = "background";

pub fn mob_image(variant: usize) -> String {
    format!("mob.{}", variant)
}

pub fn powerup_image(kind: PowerUpKind) -> String {
    format!("powerup.{}", kind.as_str())
}

pub fn explosion_image(size: ExplosionSize, frame: usize) -> String {
    format!("explosion.{}.{}", size.as_str(), frame)
}

/// Image name for an arena entity in its current animation state
pub fn entity_image(kind: &EntityKind) -> String {
    match kind {
        EntityKind::Mob(mob) => mob_image(mob.variant),
        EntityKind::Bullet => BULLET_IMAGE.to_string(),
        EntityKind::PowerUp(kind) => powerup_image(*kind),
        EntityKind::Explosion(explosion) => explosion_image(explosion.size, explosion.frame),
    }
}
