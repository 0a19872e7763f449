//! Fixed timestep simulation tick
//!
//! One call advances the world by one tick, in this order:
//! 1. kinematics and animation timers for every entity, then player input
//! 2. player vs mob (circles)
//! 3. bullet vs mob (partial-overlap ratio)
//! 4. player vs power-up (rectangles)
//! 5. player timers and state transitions
//! 6. round-over check
//!
//! Collision passes only consider mobs that were alive when the collision
//! phase began; anything destroyed earlier in the tick is skipped.

use rand::Rng;

use super::arena::{EntityId, Role};
use super::collision::{circles_overlap, overlap_ratio_hit};
use super::player;
use super::spawner::{Spawner, sample_span};
use super::state::{
    Entity, EntityKind, ExplosionSize, GameEvent, GamePhase, GameState, PlayerState, PowerUpKind,
    StateMut,
};
use crate::consts::*;
use crate::elapsed_ms;
use crate::settings::Settings;

/// Input intents for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// What happens to an entity after its own update
enum Fate {
    Keep,
    Recycle,
    Remove,
}

/// Advance the game state by one fixed tick
///
/// `now_ms` is the session clock reading; every timer is measured against it.
/// Does nothing once the round is over.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    if state.phase == GamePhase::RoundOver {
        return;
    }

    state.ticks += 1;
    state.now_ms = now_ms;

    advance_entities(state, now_ms);
    {
        let StateMut {
            settings,
            arena,
            player,
            events,
            ..
        } = state.split_mut();
        player::control(player, arena, events, settings, input, now_ms);
    }

    let mobs_at_start = state.arena.role_ids(Role::Mob);
    collide_player_mobs(state, &mobs_at_start, now_ms);
    collide_bullets_mobs(state, &mobs_at_start, now_ms);
    collide_player_powerups(state, now_ms);

    {
        let StateMut {
            settings,
            arena,
            player,
            events,
            ..
        } = state.split_mut();
        player::update(player, arena, events, settings, now_ms);
    }

    if state.player.state == PlayerState::Dead {
        state.phase = GamePhase::RoundOver;
        log::info!(
            "Round over after {} ticks, score {}",
            state.ticks,
            state.player.score
        );
        state.events.push(GameEvent::RoundOver {
            score: state.player.score,
        });
    }
}

/// Kinematics and timers for every arena entity, dispatched by kind
fn advance_entities(state: &mut GameState, now_ms: u64) {
    let StateMut {
        settings,
        rng,
        arena,
        ..
    } = state.split_mut();
    let spawner = Spawner::new(settings);

    for id in arena.ids() {
        let Some(entity) = arena.get_mut(id) else {
            continue;
        };
        let fate = match entity.kind {
            EntityKind::Mob(_) => update_mob(entity, settings, now_ms),
            EntityKind::Bullet => update_bullet(entity),
            EntityKind::PowerUp(_) => update_powerup(entity, settings),
            EntityKind::Explosion(_) => update_explosion(entity, settings, now_ms),
        };
        match fate {
            Fate::Keep => {}
            Fate::Recycle => spawner.recycle_mob(entity, rng, now_ms),
            Fate::Remove => {
                arena.remove(id);
            }
        }
    }
}

fn update_mob(entity: &mut Entity, settings: &Settings, now_ms: u64) -> Fate {
    if let EntityKind::Mob(mob) = &mut entity.kind {
        if elapsed_ms(now_ms, mob.last_rotate_ms) > settings.mob.rotate_ms {
            mob.last_rotate_ms = now_ms;
            mob.rot = (mob.rot + mob.rot_speed).rem_euclid(FULL_TURN_DEG);
        }
    }
    entity.pos += entity.vel;

    let bounds = entity.bounds();
    let below = bounds.top() > settings.field_height + settings.mob.recycle_margin;
    if below || bounds.right() < 0.0 || bounds.left() > settings.field_width {
        Fate::Recycle
    } else {
        Fate::Keep
    }
}

fn update_bullet(entity: &mut Entity) -> Fate {
    entity.pos += entity.vel;
    if entity.bounds().bottom() < 0.0 {
        Fate::Remove
    } else {
        Fate::Keep
    }
}

fn update_powerup(entity: &mut Entity, settings: &Settings) -> Fate {
    entity.pos += entity.vel;
    if entity.bounds().top() > settings.field_height {
        Fate::Remove
    } else {
        Fate::Keep
    }
}

fn update_explosion(entity: &mut Entity, settings: &Settings, now_ms: u64) -> Fate {
    let EntityKind::Explosion(explosion) = &mut entity.kind else {
        return Fate::Keep;
    };
    if elapsed_ms(now_ms, explosion.last_frame_ms) > settings.explosion.frame_ms {
        explosion.last_frame_ms = now_ms;
        explosion.frame += 1;
        if explosion.frame >= settings.explosion.frames {
            return Fate::Remove;
        }
    }
    Fate::Keep
}

/// Mobs ramming the player: each hit costs `2 * radius` shield
fn collide_player_mobs(state: &mut GameState, mobs: &[EntityId], now_ms: u64) {
    let StateMut {
        settings,
        rng,
        arena,
        player,
        events,
    } = state.split_mut();
    if !player.is_active() {
        return;
    }
    let spawner = Spawner::new(settings);

    for &id in mobs {
        let Some(mob) = arena.get(id) else {
            continue;
        };
        let Some(radius) = mob.radius() else {
            continue;
        };
        if !circles_overlap(player.pos, player.radius, mob.pos, radius as f32) {
            continue;
        }

        let at = mob.pos;
        arena.remove(id);
        let damage = 2 * radius as i32;
        player.shield -= damage;
        log::trace!("Mob {} hit player for {}", id, damage);

        spawner.spawn_explosion(arena, at, ExplosionSize::Small, now_ms);
        spawner.spawn_mob(arena, rng, now_ms);
        events.push(GameEvent::PlayerHit { damage });
    }
}

/// Bullets destroying mobs: one kill per bullet, one credit per mob
fn collide_bullets_mobs(state: &mut GameState, mobs: &[EntityId], now_ms: u64) {
    let StateMut {
        settings,
        rng,
        arena,
        player,
        events,
    } = state.split_mut();
    let spawner = Spawner::new(settings);
    let ratio = settings.bullet.hit_ratio;

    for bullet_id in arena.role_ids(Role::Bullet) {
        let Some(bullet) = arena.get(bullet_id) else {
            continue;
        };
        let bullet_bounds = bullet.bounds();
        let hit = mobs.iter().copied().find(|&mob_id| {
            arena
                .get(mob_id)
                .is_some_and(|mob| overlap_ratio_hit(&bullet_bounds, &mob.bounds(), ratio))
        });
        let Some(mob_id) = hit else {
            continue;
        };

        arena.remove(bullet_id);
        let Some(mob) = arena.remove(mob_id) else {
            continue;
        };

        let radius = mob.radius().unwrap_or(1).max(1);
        let score = settings.score_numerator / radius;
        player.score += u64::from(score);
        let sound = rng.random_range(0..settings.explosion_sounds.max(1));
        events.push(GameEvent::MobDestroyed { sound, score });
        log::trace!("Bullet {} destroyed mob {} (+{})", bullet_id, mob_id, score);

        spawner.spawn_explosion(arena, mob.pos, ExplosionSize::Large, now_ms);
        spawner.spawn_mob(arena, rng, now_ms);
        if rng.random::<f64>() < settings.powerup.drop_chance {
            spawner.spawn_powerup(arena, rng, mob.pos);
        }
    }
}

/// Player picking up power-ups
fn collide_player_powerups(state: &mut GameState, now_ms: u64) {
    let StateMut {
        settings,
        rng,
        arena,
        player,
        events,
    } = state.split_mut();
    if !player.is_active() {
        return;
    }
    let player_bounds = player.bounds();

    for id in arena.role_ids(Role::PowerUp) {
        let Some(pow) = arena.get(id) else {
            continue;
        };
        let EntityKind::PowerUp(kind) = pow.kind else {
            continue;
        };
        if !player_bounds.intersects(&pow.bounds()) {
            continue;
        }

        arena.remove(id);
        match kind {
            PowerUpKind::Shield => {
                let amount = sample_span(rng, settings.powerup.shield_bonus);
                player::restore_shield(player, amount);
            }
            PowerUpKind::Gun => player::power_up(player, now_ms),
        }
        events.push(GameEvent::PowerUpCollected(kind));
    }
}
