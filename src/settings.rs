//! Game tuning
//!
//! One immutable struct handed to the simulation and spawner at construction.
//! Defaults reproduce the classic arcade feel; a JSON document may override
//! any subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default location of the optional override document
pub const SETTINGS_FILE: &str = "shmup.json";

/// Reasons a settings document is rejected
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// A half-open integer range `[min, max)` sampled uniformly by the spawner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub min: i32,
    pub max: i32,
}

impl Span {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.max <= self.min
    }
}

/// Player ship tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub size: Vec2,
    /// Collision circle radius
    pub radius: f32,
    /// Horizontal pixels per tick while a direction is held
    pub speed: f32,
    /// Gap between the ship's bottom edge and the field bottom at spawn
    pub bottom_margin: f32,
    /// How far below the field the ship is parked while hidden
    pub hidden_offset: f32,
    pub lives: u32,
    pub shoot_delay_ms: u64,
    pub shield_regen_ms: u64,
    pub hide_ms: u64,
    /// Weapon power decays one level after this long without a pickup
    pub power_timeout_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            size: Vec2::new(50.0, 38.0),
            radius: 20.0,
            speed: 8.0,
            bottom_margin: 10.0,
            hidden_offset: 200.0,
            lives: 1,
            shoot_delay_ms: 300,
            shield_regen_ms: 1000,
            hide_ms: 1000,
            power_timeout_ms: 5000,
        }
    }
}

/// Mob (meteor) tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MobSettings {
    /// Live mobs kept on the field during a round
    pub count: usize,
    /// Sprite bounds of each variant; a mob picks one uniformly
    pub variants: Vec<Vec2>,
    /// Collision radius is `width * radius_factor / 2`
    pub radius_factor: f32,
    pub spawn_y: Span,
    pub speed_x: Span,
    pub speed_y: Span,
    /// Degrees added per rotation step
    pub rot_speed: Span,
    pub rotate_ms: u64,
    /// Extra distance below the field before a mob is recycled
    pub recycle_margin: f32,
}

impl Default for MobSettings {
    fn default() -> Self {
        Self {
            count: 15,
            variants: vec![
                Vec2::new(101.0, 84.0),
                Vec2::new(43.0, 43.0),
                Vec2::new(43.0, 43.0),
                Vec2::new(28.0, 28.0),
                Vec2::new(28.0, 28.0),
                Vec2::new(29.0, 26.0),
                Vec2::new(18.0, 18.0),
            ],
            radius_factor: 0.85,
            spawn_y: Span::new(-100, -40),
            speed_x: Span::new(-2, 2),
            speed_y: Span::new(1, 8),
            rot_speed: Span::new(-8, 8),
            rotate_ms: 50,
            recycle_margin: 10.0,
        }
    }
}

/// Bullet tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletSettings {
    pub size: Vec2,
    /// Vertical pixels per tick (negative is up)
    pub speed: f32,
    /// Fraction of the smaller rectangle that must overlap a mob to count as a hit
    pub hit_ratio: f32,
}

impl Default for BulletSettings {
    fn default() -> Self {
        Self {
            size: Vec2::new(10.0, 20.0),
            speed: -10.0,
            hit_ratio: 0.5,
        }
    }
}

/// Power-up tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpSettings {
    pub size: Vec2,
    pub speed: f32,
    /// Chance that a bullet kill drops a power-up
    pub drop_chance: f64,
    /// Shield restored by a shield pickup
    pub shield_bonus: Span,
}

impl Default for PowerUpSettings {
    fn default() -> Self {
        Self {
            size: Vec2::new(30.0, 30.0),
            speed: 2.0,
            drop_chance: 0.1,
            shield_bonus: Span::new(10, 30),
        }
    }
}

/// Explosion animation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionSettings {
    pub small_size: Vec2,
    pub large_size: Vec2,
    pub player_size: Vec2,
    pub frames: usize,
    pub frame_ms: u64,
}

impl Default for ExplosionSettings {
    fn default() -> Self {
        Self {
            small_size: Vec2::splat(32.0),
            large_size: Vec2::splat(75.0),
            player_size: Vec2::splat(96.0),
            frames: 9,
            frame_ms: 50,
        }
    }
}

/// Sound output levels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume, 0.0 - 1.0
    pub volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 0.8,
            muted: false,
        }
    }
}

/// Complete game tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub field_width: f32,
    pub field_height: f32,
    /// Simulation and render passes per second
    pub tick_hz: u32,
    /// Score for a kill is `score_numerator / mob radius`
    pub score_numerator: u32,
    /// Number of interchangeable explosion sounds
    pub explosion_sounds: usize,
    pub player: PlayerSettings,
    pub mob: MobSettings,
    pub bullet: BulletSettings,
    pub powerup: PowerUpSettings,
    pub explosion: ExplosionSettings,
    pub audio: AudioSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: 360.0,
            field_height: 480.0,
            tick_hz: 30,
            score_numerator: 100,
            explosion_sounds: 2,
            player: PlayerSettings::default(),
            mob: MobSettings::default(),
            bullet: BulletSettings::default(),
            powerup: PowerUpSettings::default(),
            explosion: ExplosionSettings::default(),
            audio: AudioSettings::default(),
        }
    }
}

impl Settings {
    /// Parse a (possibly partial) JSON override document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load overrides from `path`, falling back to defaults when the file is
    /// absent or unusable
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No {} found, using default settings", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(path)
            .map_err(SettingsError::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject values that would make the simulation degenerate
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), SettingsError> {
            Err(SettingsError::Invalid { field, reason })
        }

        if !(self.field_width > 0.0 && self.field_height > 0.0) {
            return invalid("field_width/field_height", "must be positive");
        }
        if self.tick_hz == 0 {
            return invalid("tick_hz", "must be at least 1");
        }
        if self.explosion_sounds == 0 {
            return invalid("explosion_sounds", "must be at least 1");
        }
        if self.player.lives == 0 {
            return invalid("player.lives", "must be at least 1");
        }
        let ship = self.player.size;
        if !(ship.x > 0.0 && ship.y > 0.0) || ship.x > self.field_width {
            return invalid("player.size", "must be positive and fit inside the field");
        }
        if self.mob.variants.is_empty() {
            return invalid("mob.variants", "needs at least one sprite size");
        }
        if self
            .mob
            .variants
            .iter()
            .any(|v| v.x <= 0.0 || v.y <= 0.0 || v.x >= self.field_width)
        {
            return invalid("mob.variants", "sizes must be positive and narrower than the field");
        }
        let spans = [
            ("mob.spawn_y", self.mob.spawn_y),
            ("mob.speed_x", self.mob.speed_x),
            ("mob.speed_y", self.mob.speed_y),
            ("mob.rot_speed", self.mob.rot_speed),
            ("powerup.shield_bonus", self.powerup.shield_bonus),
        ];
        if let Some(&(field, _)) = spans.iter().find(|(_, span)| span.is_empty()) {
            return invalid(field, "range is empty");
        }
        if !(self.bullet.hit_ratio > 0.0 && self.bullet.hit_ratio <= 1.0) {
            return invalid("bullet.hit_ratio", "must be in (0, 1]");
        }
        if !(0.0..=1.0).contains(&self.powerup.drop_chance) {
            return invalid("powerup.drop_chance", "must be a probability");
        }
        if self.explosion.frames == 0 {
            return invalid("explosion.frames", "must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return invalid("audio.volume", "must be in [0, 1]");
        }
        Ok(())
    }

    /// Duration of one tick in milliseconds
    pub fn tick_ms(&self) -> u64 {
        1000 / u64::from(self.tick_hz.max(1))
    }

    /// Centre of the player ship at (re)spawn
    pub fn player_spawn(&self) -> Vec2 {
        Vec2::new(
            self.field_width / 2.0,
            self.field_height - self.player.bottom_margin - self.player.size.y / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let settings = Settings::from_json(r#"{ "tick_hz": 60, "mob": { "count": 4 } }"#)
            .expect("valid override");
        assert_eq!(settings.tick_hz, 60);
        assert_eq!(settings.mob.count, 4);
        assert_eq!(settings.mob.variants.len(), 7);
        assert_eq!(settings.player.shoot_delay_ms, 300);
    }

    #[test]
    fn test_empty_range_rejected() {
        let err = Settings::from_json(r#"{ "mob": { "speed_y": { "min": 3, "max": 3 } } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "mob.speed_y",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_lives_rejected() {
        let err = Settings::from_json(r#"{ "player": { "lives": 0 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "player.lives", .. }));
    }

    #[test]
    fn test_ship_wider_than_field_rejected() {
        let err = Settings::from_json(r#"{ "player": { "size": [400, 38] } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "player.size", .. }));

        let err = Settings::from_json(r#"{ "player": { "size": [50, 0] } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "player.size", .. }));

        // Exactly as wide as the field still leaves a valid clamp range
        assert!(Settings::from_json(r#"{ "player": { "size": [360, 38] } }"#).is_ok());
    }

    #[test]
    fn test_audio_overrides() {
        let settings = Settings::from_json(r#"{ "audio": { "muted": true } }"#)
            .expect("valid override");
        assert!(settings.audio.muted);
        assert_eq!(settings.audio.volume, 0.8);

        let err = Settings::from_json(r#"{ "audio": { "volume": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "audio.volume", .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            Settings::from_json("{ tick_hz: "),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = Settings::load("definitely/not/here/shmup.json");
        assert_eq!(settings.tick_hz, 30);
    }

    #[test]
    fn test_player_spawn_sits_above_bottom_margin() {
        let settings = Settings::default();
        let spawn = settings.player_spawn();
        assert_eq!(spawn.x, 180.0);
        assert_eq!(spawn.y + settings.player.size.y / 2.0, 470.0);
    }
}
