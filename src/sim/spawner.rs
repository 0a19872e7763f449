//! Entity factories
//!
//! Mobs and power-ups get randomized but bounded attributes; mobs leaving the
//! field are recycled in place so their id and role membership survive.

use glam::Vec2;
use rand::Rng;

use super::arena::{Arena, EntityId};
use super::state::{Entity, EntityKind, Explosion, ExplosionSize, Mob, PowerUpKind};
use crate::settings::{Settings, Span};

/// Uniform draw from a half-open span; an empty span yields its lower bound
pub fn sample_span(rng: &mut impl Rng, span: Span) -> i32 {
    if span.is_empty() {
        span.min
    } else {
        rng.random_range(span.min..span.max)
    }
}

/// Collision radius for a sprite of the given width (never zero)
pub fn mob_radius(width: f32, radius_factor: f32) -> u32 {
    ((width * radius_factor / 2.0) as u32).max(1)
}

/// Entity factory bound to one immutable settings snapshot
#[derive(Debug, Clone, Copy)]
pub struct Spawner<'s> {
    settings: &'s Settings,
}

impl<'s> Spawner<'s> {
    pub fn new(settings: &'s Settings) -> Self {
        Self { settings }
    }

    /// Fresh random mob attributes, entering from above the field
    fn roll_mob(&self, rng: &mut impl Rng, now_ms: u64) -> (Vec2, Vec2, Vec2, Mob) {
        let cfg = &self.settings.mob;
        let variant = rng.random_range(0..cfg.variants.len().max(1));
        let size = cfg.variants.get(variant).copied().unwrap_or(Vec2::splat(30.0));

        let max_x = (self.settings.field_width - size.x).max(0.0) as i32;
        let left = sample_span(rng, Span::new(0, max_x)) as f32;
        let top = sample_span(rng, cfg.spawn_y) as f32;
        let pos = Vec2::new(left, top) + size / 2.0;

        let vel = Vec2::new(
            sample_span(rng, cfg.speed_x) as f32,
            sample_span(rng, cfg.speed_y) as f32,
        );
        let mob = Mob {
            variant,
            radius: mob_radius(size.x, cfg.radius_factor),
            rot: 0.0,
            rot_speed: sample_span(rng, cfg.rot_speed) as f32,
            last_rotate_ms: now_ms,
        };
        (pos, vel, size, mob)
    }

    /// Add a new mob to the arena
    pub fn spawn_mob(&self, arena: &mut Arena, rng: &mut impl Rng, now_ms: u64) -> EntityId {
        let (pos, vel, size, mob) = self.roll_mob(rng, now_ms);
        arena.insert(Entity {
            id: 0,
            pos,
            vel,
            size,
            kind: EntityKind::Mob(mob),
        })
    }

    /// Reinitialize a mob in place with fresh random attributes
    pub fn recycle_mob(&self, entity: &mut Entity, rng: &mut impl Rng, now_ms: u64) {
        let (pos, vel, size, mob) = self.roll_mob(rng, now_ms);
        entity.pos = pos;
        entity.vel = vel;
        entity.size = size;
        entity.kind = EntityKind::Mob(mob);
    }

    /// Drop a power-up of random type centred on `at`
    pub fn spawn_powerup(&self, arena: &mut Arena, rng: &mut impl Rng, at: Vec2) -> EntityId {
        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        self.spawn_powerup_of(arena, kind, at)
    }

    pub fn spawn_powerup_of(&self, arena: &mut Arena, kind: PowerUpKind, at: Vec2) -> EntityId {
        arena.insert(Entity {
            id: 0,
            pos: at,
            vel: Vec2::new(0.0, self.settings.powerup.speed),
            size: self.settings.powerup.size,
            kind: EntityKind::PowerUp(kind),
        })
    }

    /// Bullet whose bottom edge starts at `bottom_center`
    pub fn spawn_bullet(&self, arena: &mut Arena, bottom_center: Vec2) -> EntityId {
        let size = self.settings.bullet.size;
        arena.insert(Entity {
            id: 0,
            pos: bottom_center - Vec2::new(0.0, size.y / 2.0),
            vel: Vec2::new(0.0, self.settings.bullet.speed),
            size,
            kind: EntityKind::Bullet,
        })
    }

    pub fn spawn_explosion(
        &self,
        arena: &mut Arena,
        at: Vec2,
        size: ExplosionSize,
        now_ms: u64,
    ) -> EntityId {
        arena.insert(Entity {
            id: 0,
            pos: at,
            vel: Vec2::ZERO,
            size: size.bounds(self.settings),
            kind: EntityKind::Explosion(Explosion {
                size,
                frame: 0,
                last_frame_ms: now_ms,
            }),
        })
    }
}
