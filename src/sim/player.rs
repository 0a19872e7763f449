//! Player controller
//!
//! State machine over [`PlayerState`]:
//! - `Active -> Hidden` when the shield runs out (explosion, life lost, shield refilled)
//! - `Hidden -> Active` after the hide delay, back at the spawn point
//! - `Active/Hidden -> Dead` once lives hit zero and the death explosion is gone
//!
//! Shooting cadence, weapon decay and shield regeneration also live here.

use glam::Vec2;

use super::arena::Arena;
use super::spawner::Spawner;
use super::state::{ExplosionSize, GameEvent, Player, PlayerState};
use super::tick::TickInput;
use crate::consts::*;
use crate::elapsed_ms;
use crate::settings::Settings;

/// Apply directional and fire intents for this tick
pub fn control(
    player: &mut Player,
    arena: &mut Arena,
    events: &mut Vec<GameEvent>,
    settings: &Settings,
    input: &TickInput,
    now_ms: u64,
) {
    if !player.is_active() {
        return;
    }

    let mut speed_x = 0.0;
    if input.left {
        speed_x = -settings.player.speed;
    }
    if input.right {
        speed_x = settings.player.speed;
    }
    let half_width = player.size.x / 2.0;
    player.pos.x = (player.pos.x + speed_x).clamp(half_width, settings.field_width - half_width);

    if input.fire && elapsed_ms(now_ms, player.last_shot_ms) >= settings.player.shoot_delay_ms {
        shoot(player, arena, settings);
        player.last_shot_ms = now_ms;
        events.push(GameEvent::Shot);
    }
}

/// Fire according to the current weapon power
pub fn shoot(player: &Player, arena: &mut Arena, settings: &Settings) {
    let spawner = Spawner::new(settings);
    let bounds = player.bounds();
    if player.power <= MIN_WEAPON_POWER {
        spawner.spawn_bullet(arena, Vec2::new(bounds.center().x, bounds.top()));
    } else {
        let y = bounds.center().y;
        spawner.spawn_bullet(arena, Vec2::new(bounds.left(), y));
        spawner.spawn_bullet(arena, Vec2::new(bounds.right(), y));
    }
}

/// Raise weapon power and restart its decay timer
pub fn power_up(player: &mut Player, now_ms: u64) {
    player.power += 1;
    player.power_time_ms = now_ms;
    log::debug!("Weapon power up: {}", player.power);
}

/// Add shield from a pickup, capped at the maximum
pub fn restore_shield(player: &mut Player, amount: i32) {
    player.shield = (player.shield + amount).min(SHIELD_MAX);
}

/// Per-tick timers and state transitions
pub fn update(
    player: &mut Player,
    arena: &mut Arena,
    events: &mut Vec<GameEvent>,
    settings: &Settings,
    now_ms: u64,
) {
    let cfg = &settings.player;

    // Regenerate shield
    if elapsed_ms(now_ms, player.shield_update_ms) > cfg.shield_regen_ms {
        player.shield_update_ms = now_ms;
        player.shield = (player.shield + 1).min(SHIELD_MAX);
    }

    // Active -> Hidden
    if player.state == PlayerState::Active && player.shield <= 0 {
        let explosion =
            Spawner::new(settings).spawn_explosion(arena, player.pos, ExplosionSize::Player, now_ms);
        player.death_explosion = Some(explosion);
        hide(player, settings, now_ms);
        player.lives = player.lives.saturating_sub(1);
        player.shield = SHIELD_MAX;
        log::debug!("Player destroyed, {} lives left", player.lives);
        events.push(GameEvent::PlayerDied {
            lives_left: player.lives,
        });
    }

    // Hidden -> Active
    if player.state == PlayerState::Hidden
        && player.lives > 0
        && elapsed_ms(now_ms, player.hide_timer_ms) > cfg.hide_ms
    {
        player.state = PlayerState::Active;
        player.pos = settings.player_spawn();
        log::debug!("Player respawned");
        events.push(GameEvent::PlayerRespawned);
    }

    // -> Dead
    if player.state != PlayerState::Dead && player.lives == 0 {
        let explosion_done = player
            .death_explosion
            .is_none_or(|id| !arena.is_alive(id));
        if explosion_done {
            player.state = PlayerState::Dead;
            log::debug!("Player out of lives");
        }
    }

    // Weapon decay
    if player.power > MIN_WEAPON_POWER
        && elapsed_ms(now_ms, player.power_time_ms) > cfg.power_timeout_ms
    {
        player.power -= 1;
        player.power_time_ms = now_ms;
        events.push(GameEvent::WeaponDecayed {
            power: player.power,
        });
    }
}

/// Park the ship below the field and start the hide timer
fn hide(player: &mut Player, settings: &Settings, now_ms: u64) {
    player.state = PlayerState::Hidden;
    player.hide_timer_ms = now_ms;
    player.pos = Vec2::new(
        settings.field_width / 2.0,
        settings.field_height + settings.player.hidden_offset,
    );
}

/// Shoot-cooldown progress as a 0..=1 fill ratio
pub fn shoot_ready_ratio(player: &Player, settings: &Settings, now_ms: u64) -> f32 {
    let delay = settings.player.shoot_delay_ms.max(1);
    let since = elapsed_ms(now_ms, player.last_shot_ms).min(delay);
    since as f32 / delay as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::arena::Role;

    fn setup() -> (Settings, Player, Arena, Vec<GameEvent>) {
        let settings = Settings::default();
        let player = Player::new(&settings, 0);
        (settings, player, Arena::new(), Vec::new())
    }

    #[test]
    fn test_shield_exhaustion_hides_player() {
        let (settings, mut player, mut arena, mut events) = setup();
        player.shield = 0;

        update(&mut player, &mut arena, &mut events, &settings, 10);

        assert_eq!(player.state, PlayerState::Hidden);
        assert_eq!(player.lives, settings.player.lives - 1);
        assert_eq!(player.shield, SHIELD_MAX);
        let explosion = player.death_explosion.expect("explosion spawned");
        assert!(arena.is_alive(explosion));
        assert_eq!(arena.len(), 1);
        assert!(events.contains(&GameEvent::PlayerDied {
            lives_left: settings.player.lives - 1
        }));
    }

    #[test]
    fn test_hidden_player_reappears_after_delay() {
        let (settings, mut player, mut arena, mut events) = setup();
        player.lives = 3;
        player.shield = -3;
        update(&mut player, &mut arena, &mut events, &settings, 100);
        assert!(player.pos.y > settings.field_height);

        update(&mut player, &mut arena, &mut events, &settings, 1_100);
        assert_eq!(player.state, PlayerState::Hidden);

        update(&mut player, &mut arena, &mut events, &settings, 1_101);
        assert_eq!(player.state, PlayerState::Active);
        assert_eq!(player.pos, settings.player_spawn());
    }

    #[test]
    fn test_last_life_waits_for_explosion() {
        let (settings, mut player, mut arena, mut events) = setup();
        player.lives = 1;
        player.shield = 0;
        update(&mut player, &mut arena, &mut events, &settings, 0);
        assert_eq!(player.lives, 0);
        assert_eq!(player.state, PlayerState::Hidden);

        // Explosion still animating
        update(&mut player, &mut arena, &mut events, &settings, 5_000);
        assert_eq!(player.state, PlayerState::Hidden);

        if let Some(id) = player.death_explosion {
            arena.remove(id);
        }
        update(&mut player, &mut arena, &mut events, &settings, 5_001);
        assert_eq!(player.state, PlayerState::Dead);
    }

    #[test]
    fn test_shield_regen_caps_at_max() {
        let (settings, mut player, mut arena, mut events) = setup();
        player.shield = 99;
        update(&mut player, &mut arena, &mut events, &settings, 1_001);
        assert_eq!(player.shield, 100);
        update(&mut player, &mut arena, &mut events, &settings, 2_002);
        assert_eq!(player.shield, 100);
    }

    #[test]
    fn test_shoot_cooldown_gates_fire() {
        let (settings, mut player, mut arena, mut events) = setup();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };

        control(&mut player, &mut arena, &mut events, &settings, &fire, 299);
        assert_eq!(arena.bullet_count(), 0);

        control(&mut player, &mut arena, &mut events, &settings, &fire, 300);
        assert_eq!(arena.bullet_count(), 1);

        control(&mut player, &mut arena, &mut events, &settings, &fire, 400);
        assert_eq!(arena.bullet_count(), 1);
        assert_eq!(events, vec![GameEvent::Shot]);
    }

    #[test]
    fn test_double_shot_from_ship_edges() {
        let (settings, mut player, mut arena, mut events) = setup();
        player.power = 2;
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        control(&mut player, &mut arena, &mut events, &settings, &fire, 1_000);

        let bounds = player.bounds();
        let xs: Vec<f32> = arena
            .role_ids(Role::Bullet)
            .into_iter()
            .filter_map(|id| arena.get(id))
            .map(|b| b.pos.x)
            .collect();
        assert_eq!(xs, vec![bounds.left(), bounds.right()]);
    }

    #[test]
    fn test_movement_clamped_to_field() {
        let (settings, mut player, mut arena, mut events) = setup();
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..100 {
            control(&mut player, &mut arena, &mut events, &settings, &left, 0);
        }
        assert_eq!(player.bounds().left(), 0.0);

        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        control(&mut player, &mut arena, &mut events, &settings, &both, 0);
        assert_eq!(player.bounds().left(), settings.player.speed);
    }

    #[test]
    fn test_hidden_player_ignores_input() {
        let (settings, mut player, mut arena, mut events) = setup();
        player.state = PlayerState::Hidden;
        let pos = player.pos;
        let input = TickInput {
            right: true,
            fire: true,
            ..Default::default()
        };
        control(&mut player, &mut arena, &mut events, &settings, &input, 10_000);
        assert_eq!(player.pos, pos);
        assert_eq!(arena.bullet_count(), 0);
    }

    #[test]
    fn test_weapon_decays_to_one() {
        let (settings, mut player, mut arena, mut events) = setup();
        power_up(&mut player, 0);
        power_up(&mut player, 0);
        assert_eq!(player.power, 3);

        update(&mut player, &mut arena, &mut events, &settings, 5_001);
        assert_eq!(player.power, 2);
        update(&mut player, &mut arena, &mut events, &settings, 10_002);
        assert_eq!(player.power, 1);
        update(&mut player, &mut arena, &mut events, &settings, 20_000);
        assert_eq!(player.power, 1);
    }

    #[test]
    fn test_shield_pickup_is_capped() {
        let (_, mut player, _, _) = setup();
        player.shield = 95;
        restore_shield(&mut player, 20);
        assert_eq!(player.shield, SHIELD_MAX);
    }

    #[test]
    fn test_shoot_ready_ratio() {
        let (settings, player, _, _) = setup();
        assert_eq!(shoot_ready_ratio(&player, &settings, 0), 0.0);
        assert_eq!(shoot_ready_ratio(&player, &settings, 150), 0.5);
        assert_eq!(shoot_ready_ratio(&player, &settings, 9_000), 1.0);
    }
}
