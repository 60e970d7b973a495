//! Per-tick movement and spawning
//!
//! Displacements are per tick (the loop runs at a fixed interval); cooldowns
//! compare wall-clock timestamps in milliseconds.

use glam::Vec2;

use super::state::{Bank, BankProjectile, Direction, GameEvent, GameState, Player, Soundwave};
use crate::consts::*;
use crate::input::Intent;
use crate::tuning::Tuning;

/// Move the player. Left and right are independent clamped steps, applied
/// left first, so holding both is not guaranteed to cancel out.
pub fn move_player(player: &mut Player, intent: &Intent, tuning: &Tuning) {
    if intent.move_left && player.pos.x > 0.0 {
        player.pos.x -= tuning.player_speed;
    }
    if intent.move_right && player.pos.x < tuning.arena_width - player.size.x {
        player.pos.x += tuning.player_speed;
    }
}

/// Slide the bank and reflect it off the arena walls.
/// Returns true when the bank reached a wall this tick.
pub fn move_bank(bank: &mut Bank, tuning: &Tuning) -> bool {
    let max_x = tuning.arena_width - bank.size.x;
    let new_x = bank.pos.x + tuning.bank_move_speed * bank.direction.sign();

    if new_x <= 0.0 {
        bank.pos.x = 0.0;
        bank.direction = Direction::Right;
        true
    } else if new_x >= max_x {
        bank.pos.x = max_x;
        bank.direction = Direction::Left;
        true
    } else {
        bank.pos.x = new_x;
        false
    }
}

/// Whether the soundwave cooldown has elapsed. The newest soundwave still
/// in flight is the only clock; an empty pool always allows a shot.
pub fn can_fire(soundwaves: &[Soundwave], now_ms: f64, cooldown_ms: f64) -> bool {
    match soundwaves.last() {
        Some(last) => now_ms - last.created_ms > cooldown_ms,
        None => true,
    }
}

/// Spawn a soundwave at the player's muzzle if the cooldown allows
pub fn fire_soundwave(state: &mut GameState, now_ms: f64) -> bool {
    if !can_fire(&state.soundwaves, now_ms, state.tuning.fire_cooldown_ms) {
        return false;
    }
    state.soundwaves.push(Soundwave {
        pos: state.player.muzzle(),
        radius: state.tuning.soundwave_radius,
        speed: state.tuning.soundwave_speed,
        created_ms: now_ms,
    });
    state.emit(GameEvent::SoundwaveFired);
    true
}

/// Advance soundwaves upward and drop those past the top edge
pub fn advance_soundwaves(soundwaves: &mut Vec<Soundwave>) {
    for wave in soundwaves.iter_mut() {
        wave.pos.y -= wave.speed;
    }
    soundwaves.retain(|wave| wave.pos.y > -wave.radius);
}

/// Build a volley of `count` projectiles spread evenly under the bank
pub fn volley(bank: &Bank, count: u32, speed: f32) -> Vec<BankProjectile> {
    let spacing = bank.size.x / (count + 1) as f32;
    (0..count)
        .map(|i| BankProjectile {
            pos: Vec2::new(
                bank.pos.x + spacing * (i + 1) as f32 - BANK_PROJECTILE_WIDTH / 2.0,
                bank.pos.y + bank.size.y,
            ),
            size: Vec2::new(BANK_PROJECTILE_WIDTH, BANK_PROJECTILE_HEIGHT),
            speed,
        })
        .collect()
}

/// Fire a volley when the bank is standing and its shoot rate has elapsed
pub fn bank_auto_fire(state: &mut GameState, now_ms: f64) -> bool {
    if state.bank.is_destroyed() {
        return false;
    }
    let ready = match state.bank.last_shot_ms {
        Some(last) => now_ms - last > state.tuning.bank_shoot_rate_ms,
        None => true,
    };
    if !ready {
        return false;
    }

    state.bank.last_shot_ms = Some(now_ms);
    let count = state.tuning.volley_size(state.level);
    let speed = state.tuning.projectile_speed(state.level);
    let shots = volley(&state.bank, count, speed);
    state.bank_projectiles.extend(shots);
    state.emit(GameEvent::BankVolley { count });
    true
}

/// Advance bank projectiles downward and drop those past the bottom edge
pub fn advance_bank_projectiles(projectiles: &mut Vec<BankProjectile>, arena_height: f32) {
    for proj in projectiles.iter_mut() {
        proj.pos.y += proj.speed;
    }
    projectiles.retain(|proj| proj.pos.y < arena_height);
}

/// One kinematics step, in cabinet order: player, bank, fire, soundwaves,
/// bank volley, bank projectiles
pub fn step(state: &mut GameState, intent: &Intent, now_ms: f64) {
    move_player(&mut state.player, intent, &state.tuning);
    move_bank(&mut state.bank, &state.tuning);

    state.firing = intent.fire;
    if intent.fire {
        fire_soundwave(state, now_ms);
    }
    advance_soundwaves(&mut state.soundwaves);

    bank_auto_fire(state, now_ms);
    let arena_height = state.tuning.arena_height;
    advance_bank_projectiles(&mut state.bank_projectiles, arena_height);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(move_left: bool, move_right: bool, fire: bool) -> Intent {
        Intent {
            move_left,
            move_right,
            fire,
        }
    }

    #[test]
    fn test_player_moves_and_clamps() {
        let tuning = Tuning::default();
        let mut player = Player::new(100);

        move_player(&mut player, &intent(true, false, false), &tuning);
        assert_eq!(player.pos.x, 395.0);

        player.pos.x = 0.0;
        move_player(&mut player, &intent(true, false, false), &tuning);
        assert_eq!(player.pos.x, 0.0);

        player.pos.x = ARENA_WIDTH - PLAYER_WIDTH;
        move_player(&mut player, &intent(false, true, false), &tuning);
        assert_eq!(player.pos.x, ARENA_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn test_both_directions_cancel_mid_arena() {
        let tuning = Tuning::default();
        let mut player = Player::new(100);
        move_player(&mut player, &intent(true, true, false), &tuning);
        assert_eq!(player.pos.x, 400.0);
    }

    #[test]
    fn test_both_directions_at_left_wall_drift_right() {
        // Left is clamped, right still applies
        let tuning = Tuning::default();
        let mut player = Player::new(100);
        player.pos.x = 0.0;
        move_player(&mut player, &intent(true, true, false), &tuning);
        assert_eq!(player.pos.x, 5.0);
    }

    #[test]
    fn test_bank_bounces_at_right_wall() {
        let tuning = Tuning::default();
        let mut bank = Bank::new(300);
        assert_eq!(bank.pos.x, 250.0);

        let mut ticks = 0;
        while bank.direction == Direction::Right {
            let bounced = move_bank(&mut bank, &tuning);
            ticks += 1;
            assert_eq!(bounced, bank.direction == Direction::Left);
        }
        assert_eq!(ticks, 250);
        assert_eq!(bank.pos.x, 500.0);

        move_bank(&mut bank, &tuning);
        assert_eq!(bank.pos.x, 499.0);
    }

    #[test]
    fn test_bank_bounces_at_left_wall() {
        let tuning = Tuning::default();
        let mut bank = Bank::spawned_at(0.5, Direction::Left, 300);
        assert!(move_bank(&mut bank, &tuning));
        assert_eq!(bank.pos.x, 0.0);
        assert_eq!(bank.direction, Direction::Right);
    }

    #[test]
    fn test_fire_cooldown() {
        let mut state = GameState::new(1);
        assert!(fire_soundwave(&mut state, 0.0));
        assert!(!fire_soundwave(&mut state, 200.0));
        assert!(!fire_soundwave(&mut state, 250.0));
        assert_eq!(state.soundwaves.len(), 1);
        assert!(fire_soundwave(&mut state, 251.0));
        assert_eq!(state.soundwaves.len(), 2);
    }

    #[test]
    fn test_soundwave_spawns_at_player_centre() {
        let mut state = GameState::new(1);
        fire_soundwave(&mut state, 0.0);
        assert_eq!(state.soundwaves[0].pos, Vec2::new(420.0, 500.0));
    }

    #[test]
    fn test_soundwaves_leave_top_edge() {
        let mut waves = vec![Soundwave {
            pos: Vec2::new(100.0, 4.0),
            radius: 5.0,
            speed: 8.0,
            created_ms: 0.0,
        }];
        advance_soundwaves(&mut waves);
        assert_eq!(waves[0].pos.y, -4.0);
        advance_soundwaves(&mut waves);
        assert!(waves.is_empty());
    }

    #[test]
    fn test_volley_spacing() {
        let bank = Bank::new(300);
        let shots = volley(&bank, 3, 5.0);
        let xs: Vec<f32> = shots.iter().map(|p| p.pos.x).collect();
        assert_eq!(xs, vec![320.0, 395.0, 470.0]);
        assert!(shots.iter().all(|p| p.pos.y == 230.0 && p.speed == 5.0));
    }

    #[test]
    fn test_bank_fires_on_rate() {
        let mut state = GameState::new(1);
        assert!(bank_auto_fire(&mut state, 0.0));
        assert_eq!(state.bank_projectiles.len(), 1);
        assert!(!bank_auto_fire(&mut state, 1500.0));
        assert!(bank_auto_fire(&mut state, 1501.0));

        state.level = 4;
        state.bank.last_shot_ms = None;
        state.bank_projectiles.clear();
        bank_auto_fire(&mut state, 5000.0);
        assert_eq!(state.bank_projectiles.len(), 3);
        assert_eq!(state.bank_projectiles[0].speed, 6.0);
    }

    #[test]
    fn test_destroyed_bank_holds_fire() {
        let mut state = GameState::new(1);
        state.bank.health = 0;
        assert!(!bank_auto_fire(&mut state, 0.0));
        assert!(state.bank_projectiles.is_empty());
    }

    #[test]
    fn test_bank_projectiles_leave_bottom_edge() {
        let mut projectiles = vec![BankProjectile {
            pos: Vec2::new(10.0, 595.0),
            size: Vec2::new(10.0, 20.0),
            speed: 5.0,
        }];
        advance_bank_projectiles(&mut projectiles, 600.0);
        assert!(projectiles.is_empty());
    }
}
