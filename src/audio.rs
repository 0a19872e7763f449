//! Audio collaborator
//!
//! The session maps simulation events to [`SoundEffect`]s and hands them to an
//! [`AudioSink`]. The shipped sink rings the terminal bell for cues the asset
//! manifest marks as audible.

use std::collections::HashMap;
use std::io::{self, Write};

use crate::assets::{AssetStore, Sound};
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player fired
    Shoot,
    /// Mob destroyed; the index picks one of the explosion variants
    Explosion(usize),
    /// Background loop
    Music,
}

impl SoundEffect {
    /// Name of the sound in the asset manifest
    pub fn asset_name(&self) -> String {
        match self {
            SoundEffect::Shoot => "shoot".to_string(),
            SoundEffect::Explosion(variant) => format!("explosion.{}", variant),
            SoundEffect::Music => "music".to_string(),
        }
    }

    /// Sound triggered by a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::Shot => Some(SoundEffect::Shoot),
            GameEvent::MobDestroyed { sound, .. } => Some(SoundEffect::Explosion(*sound)),
            _ => None,
        }
    }
}

/// Anything that can play the game's sounds
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
    fn start_music(&mut self);
    fn stop_music(&mut self);
}

/// Terminal audio: the bell is the only voice
pub struct TerminalAudio {
    sounds: HashMap<SoundEffect, Sound>,
    volume: f32,
    muted: bool,
    music_playing: bool,
}

impl TerminalAudio {
    /// Resolve every cue up front so playback never touches the manifest
    pub fn new(assets: &AssetStore, settings: &Settings) -> Self {
        let mut effects = vec![SoundEffect::Shoot, SoundEffect::Music];
        effects.extend((0..settings.explosion_sounds).map(SoundEffect::Explosion));
        let sounds = effects
            .into_iter()
            .map(|effect| (effect, assets.sound(&effect.asset_name())))
            .collect();
        Self {
            sounds,
            volume: settings.audio.volume.clamp(0.0, 1.0),
            muted: settings.audio.muted,
            music_playing: false,
        }
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Whether `effect` would produce audible output right now
    fn audible(&self, effect: SoundEffect) -> bool {
        self.effective_volume() > 0.0 && self.sounds.get(&effect).is_some_and(|s| s.bell)
    }

    fn ring_bell() -> io::Result<()> {
        let mut out = io::stdout();
        out.write_all(b"\x07")?;
        out.flush()
    }
}

impl AudioSink for TerminalAudio {
    fn play(&mut self, effect: SoundEffect) {
        if !self.audible(effect) {
            return;
        }
        if let Err(e) = Self::ring_bell() {
            log::debug!("Bell failed for {:?}: {}", effect, e);
        }
    }

    fn start_music(&mut self) {
        // The bell cannot loop; only the state is tracked
        self.music_playing = true;
        log::debug!("Music started");
    }

    fn stop_music(&mut self) {
        self.music_playing = false;
        log::debug!("Music stopped");
    }
}
