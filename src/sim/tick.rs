//! Fixed timestep simulation tick
//!
//! Core game loop that advances the arena by one step.

use serde::{Deserialize, Serialize};

use super::collision::resolve;
use super::kinematics;
use super::progression::{apply_damage, respawn_if_due};
use super::state::{GameState, Mode};
use crate::highscores::HighScores;
use crate::input::Intent;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Aggregated keyboard/touch intent
    pub intent: Intent,
    /// Wall-clock time of this tick (ms)
    pub now_ms: f64,
}

/// Advance the game state by one fixed step. Does nothing outside Playing.
///
/// `board` decides whether a fatal hit leads to initials entry.
pub fn tick(state: &mut GameState, input: &TickInput, board: &HighScores) -> bool {
    if state.mode != Mode::Playing {
        return false;
    }

    let now_ms = input.now_ms;
    state.now_ms = now_ms;
    state.time_ticks += 1;

    respawn_if_due(state, now_ms);

    kinematics::step(state, &input.intent, now_ms);

    let damage = resolve(state);
    apply_damage(state, &damage, board);

    if state.mode != Mode::Playing {
        state.firing = false;
    }
    true
}

/// Explicit state passing: consume the current state, return the next one
pub fn advance(mut state: GameState, input: &TickInput, board: &HighScores) -> GameState {
    tick(&mut state, input, board);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::progression::start_round;
    use crate::sim::state::{GameEvent, Soundwave};
    use glam::Vec2;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        start_round(&mut state);
        state
    }

    fn input_at(now_ms: f64, intent: Intent) -> TickInput {
        TickInput { intent, now_ms }
    }

    #[test]
    fn test_idle_does_not_tick() {
        let mut state = GameState::new(1);
        assert!(!tick(&mut state, &TickInput::default(), &HighScores::new()));
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.bank.pos.x, BANK_START_X);
    }

    #[test]
    fn test_first_tick_moves_and_fires() {
        let mut state = playing(1);
        let board = HighScores::new();
        let fire = Intent {
            fire: true,
            ..Default::default()
        };
        assert!(tick(&mut state, &input_at(16.0, fire), &board));

        assert_eq!(state.bank.pos.x, 251.0);
        assert_eq!(state.soundwaves.len(), 1);
        // Spawned at y=500 then moved once
        assert_eq!(state.soundwaves[0].pos.y, 492.0);
        // The bank opens fire immediately
        assert_eq!(state.bank_projectiles.len(), 1);
        assert_eq!(state.bank_projectiles[0].pos.y, 230.0 + 4.5);
        assert!(state.firing);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::SoundwaveFired));
        assert!(events.contains(&GameEvent::BankVolley { count: 1 }));
    }

    #[test]
    fn test_cooldown_across_ticks() {
        let mut state = playing(1);
        let board = HighScores::new();
        let fire = Intent {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input_at(0.0, fire), &board);
        tick(&mut state, &input_at(200.0, fire), &board);
        assert_eq!(state.soundwaves.len(), 1);
    }

    #[test]
    fn test_killing_blow_and_respawn() {
        let mut state = playing(9);
        let board = HighScores::new();
        state.bank.health = 10;
        state.bank.last_shot_ms = Some(0.0);
        // Wave that will sit inside the bank after moving 8px up
        state.soundwaves.push(Soundwave {
            pos: Vec2::new(400.0, 108.0),
            radius: 5.0,
            speed: 8.0,
            created_ms: 0.0,
        });

        tick(&mut state, &input_at(100.0, Intent::default()), &board);
        assert_eq!(state.bank.health, 0);
        assert_eq!(state.score, 1010);
        assert_eq!(state.level, 2);

        // Wreck keeps drifting but is inert until the delay passes
        tick(&mut state, &input_at(1099.0, Intent::default()), &board);
        assert_eq!(state.bank.health, 0);
        assert_eq!(state.score, 1010);

        tick(&mut state, &input_at(1100.0, Intent::default()), &board);
        assert_eq!(state.bank.health, 450);
        assert_eq!(state.bank.max_health, 450);
        assert!(state.pending_respawn.is_none());
        // Fresh bank fires straight away at the new level (2 shots)
        assert_eq!(state.bank_projectiles.len(), 2);
    }

    #[test]
    fn test_death_stops_ticking() {
        let mut state = playing(1);
        let board = HighScores::new();
        state.player.health = 20;
        state.bank.last_shot_ms = Some(0.0);
        state
            .bank_projectiles
            .push(crate::sim::state::BankProjectile {
                pos: Vec2::new(405.0, 480.0),
                size: Vec2::new(10.0, 20.0),
                speed: 4.5,
            });

        tick(&mut state, &input_at(16.0, Intent::default()), &board);
        assert_eq!(state.player.health, 0);
        assert_eq!(state.mode, Mode::EnteringInitials);

        let ticks = state.time_ticks;
        assert!(!tick(&mut state, &input_at(32.0, Intent::default()), &board));
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_advance_by_value() {
        let state = playing(1);
        let next = advance(state, &input_at(16.0, Intent::default()), &HighScores::new());
        assert_eq!(next.time_ticks, 1);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let board = HighScores::new();
        let mut state1 = playing(99999);
        let mut state2 = playing(99999);
        state1.bank.health = 10;
        state2.bank.health = 10;

        for i in 0..200 {
            let input = input_at(
                i as f64 * TICK_MS,
                Intent {
                    move_left: i % 3 == 0,
                    move_right: i % 5 == 0,
                    fire: true,
                },
            );
            tick(&mut state1, &input, &board);
            tick(&mut state2, &input, &board);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.bank, state2.bank);
        assert_eq!(state1.player, state2.player);
    }
}
