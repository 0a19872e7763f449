//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`]; renderers only
//! ever see it through a shared reference.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::{Arena, EntityId};
use super::collision::Aabb;
use super::spawner::Spawner;
use crate::consts::*;
use crate::settings::Settings;

/// Round lifecycle as seen by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation running
    Playing,
    /// Lives exhausted and the death explosion finished; waiting for restart
    RoundOver,
}

/// Player controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    /// Visible, controllable, vulnerable
    Active,
    /// Post-death: immobile, invisible, invulnerable
    Hidden,
    /// Lives exhausted (terminal for the round)
    Dead,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Restores part of the shield
    Shield,
    /// Raises weapon power by one level
    Gun,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::Shield, PowerUpKind::Gun];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "shield",
            PowerUpKind::Gun => "gun",
        }
    }
}

/// Explosion size classes (select bounds and animation frames)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExplosionSize {
    /// Mob rammed the player
    Small,
    /// Mob destroyed by a bullet
    Large,
    /// Player ship destroyed
    Player,
}

impl ExplosionSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExplosionSize::Small => "sm",
            ExplosionSize::Large => "lg",
            ExplosionSize::Player => "player",
        }
    }

    pub fn bounds(&self, settings: &Settings) -> Vec2 {
        match self {
            ExplosionSize::Small => settings.explosion.small_size,
            ExplosionSize::Large => settings.explosion.large_size,
            ExplosionSize::Player => settings.explosion.player_size,
        }
    }
}

/// Per-mob attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mob {
    /// Index into the configured sprite variants
    pub variant: usize,
    /// Collision radius (always at least 1)
    pub radius: u32,
    /// Current rotation in degrees (cosmetic)
    pub rot: f32,
    /// Degrees added per rotation step
    pub rot_speed: f32,
    pub last_rotate_ms: u64,
}

/// Animation progress of an explosion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub size: ExplosionSize,
    pub frame: usize,
    pub last_frame_ms: u64,
}

/// Closed set of arena entity kinds; each has its own update rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    Mob(Mob),
    Bullet,
    PowerUp(PowerUpKind),
    Explosion(Explosion),
}

/// An arena-owned simulated object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Centre position
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Sprite bounds
    pub size: Vec2,
    pub kind: EntityKind,
}

impl Entity {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Collision radius, for kinds that collide as circles
    pub fn radius(&self) -> Option<u32> {
        match &self.kind {
            EntityKind::Mob(mob) => Some(mob.radius),
            _ => None,
        }
    }

    pub fn as_mob(&self) -> Option<&Mob> {
        match &self.kind {
            EntityKind::Mob(mob) => Some(mob),
            _ => None,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Centre position
    pub pos: Vec2,
    pub size: Vec2,
    pub radius: f32,
    pub state: PlayerState,
    /// 0..=100 at tick boundaries; may dip below zero mid-tick
    pub shield: i32,
    pub lives: u32,
    /// Weapon power level (>= 1)
    pub power: u32,
    pub score: u64,
    pub last_shot_ms: u64,
    pub shield_update_ms: u64,
    pub power_time_ms: u64,
    pub hide_timer_ms: u64,
    /// Explosion spawned by the most recent death
    pub death_explosion: Option<EntityId>,
}

impl Player {
    pub fn new(settings: &Settings, now_ms: u64) -> Self {
        Self {
            pos: settings.player_spawn(),
            size: settings.player.size,
            radius: settings.player.radius,
            state: PlayerState::Active,
            shield: SHIELD_MAX,
            lives: settings.player.lives,
            power: MIN_WEAPON_POWER,
            score: 0,
            last_shot_ms: now_ms,
            shield_update_ms: now_ms,
            power_time_ms: now_ms,
            hide_timer_ms: now_ms,
            death_explosion: None,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    pub fn is_active(&self) -> bool {
        self.state == PlayerState::Active
    }

    /// Shield as a 0..=1 fill ratio
    pub fn shield_ratio(&self) -> f32 {
        (self.shield as f32 / SHIELD_MAX as f32).clamp(0.0, 1.0)
    }
}

/// Something the session should react to (sound, logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player fired (one event per trigger pull, regardless of bullet count)
    Shot,
    /// A bullet destroyed a mob; `sound` picks the explosion variant
    MobDestroyed { sound: usize, score: u32 },
    /// A mob rammed the player
    PlayerHit { damage: i32 },
    PowerUpCollected(PowerUpKind),
    /// Shield ran out and a life was lost
    PlayerDied { lives_left: u32 },
    PlayerRespawned,
    WeaponDecayed { power: u32 },
    /// Raised once per round
    RoundOver { score: u64 },
}

/// Disjoint mutable views of a [`GameState`] for the simulation passes
pub(crate) struct StateMut<'a> {
    pub settings: &'a Settings,
    pub rng: &'a mut Pcg32,
    pub arena: &'a mut Arena,
    pub player: &'a mut Player,
    pub events: &'a mut Vec<GameEvent>,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    settings: Settings,
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub arena: Arena,
    pub player: Player,
    pub phase: GamePhase,
    /// Ticks simulated this round
    pub ticks: u64,
    /// Clock reading of the latest tick
    pub now_ms: u64,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a round-ready state: player at spawn, full mob population
    pub fn new(settings: Settings, seed: u64, now_ms: u64) -> Self {
        let player = Player::new(&settings, now_ms);
        let mut state = Self {
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            arena: Arena::new(),
            player,
            phase: GamePhase::Playing,
            ticks: 0,
            now_ms,
            events: Vec::new(),
        };
        state.populate_mobs();
        state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn split_mut(&mut self) -> StateMut<'_> {
        StateMut {
            settings: &self.settings,
            rng: &mut self.rng,
            arena: &mut self.arena,
            player: &mut self.player,
            events: &mut self.events,
        }
    }

    /// Start a fresh round, keeping the RNG stream
    pub fn reset(&mut self, now_ms: u64) {
        self.arena.clear();
        self.player = Player::new(&self.settings, now_ms);
        self.phase = GamePhase::Playing;
        self.ticks = 0;
        self.now_ms = now_ms;
        self.events.clear();
        self.populate_mobs();
        log::info!(
            "Round reset: {} mobs, {} lives",
            self.arena.mob_count(),
            self.player.lives
        );
    }

    /// Fill the field up to the configured mob count
    fn populate_mobs(&mut self) {
        let spawner = Spawner::new(&self.settings);
        while self.arena.mob_count() < self.settings.mob.count {
            spawner.spawn_mob(&mut self.arena, &mut self.rng, self.now_ms);
        }
    }

    pub fn is_round_over(&self) -> bool {
        self.phase == GamePhase::RoundOver
    }

    /// Take the events accumulated since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
