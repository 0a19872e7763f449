//! Shmup - a fixed-timestep vertical shoot-'em-up
//!
//! Core modules:
//! - `sim`: Simulation core (entities, collisions, player state machine, tick)
//! - `session`: Fixed-timestep loop and round lifecycle
//! - `settings`: Immutable game tuning
//! - `assets`, `audio`, `platform`, `renderer`: collaborators driven by the session

pub mod assets;
pub mod audio;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::Session;
pub use settings::Settings;

/// Fixed game constants (not tunable)
pub mod consts {
    /// Upper bound of the player's shield
    pub const SHIELD_MAX: i32 = 100;
    /// Weapon power never decays below this level
    pub const MIN_WEAPON_POWER: u32 = 1;
    /// Full circle in degrees (mob rotation wraps here)
    pub const FULL_TURN_DEG: f32 = 360.0;

    /// HUD bar geometry, in field pixels
    pub const BAR_LENGTH: f32 = 100.0;
    pub const BAR_HEIGHT: f32 = 10.0;
    /// Horizontal spacing between life icons
    pub const LIFE_ICON_SPACING: f32 = 30.0;
}

/// Milliseconds elapsed between two monotonic timestamps (never negative)
#[inline]
pub fn elapsed_ms(now: u64, since: u64) -> u64 {
    now.saturating_sub(since)
}
