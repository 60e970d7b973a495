//! Score, level and mode transitions
//!
//! Mode graph:
//! Idle -> Playing -> {GameOver | EnteringInitials}
//! GameOver <-> ShowingHighScores, EnteringInitials -> ShowingHighScores
//! Any non-playing mode -> Playing on start. Leaving EnteringInitials any
//! way other than submitting drops the typed initials unrecorded.

use rand::Rng;

use super::collision::DamageEvent;
use super::state::{Bank, Direction, GameEvent, GameState, Mode, PendingRespawn};
use crate::highscores::{HighScores, INITIALS_LEN};

/// Begin a fresh round: score 0, level 1, all entities reset
pub fn start_round(state: &mut GameState) -> bool {
    if state.mode == Mode::Playing {
        return false;
    }
    state.reset_entities();
    state.score = 0;
    state.level = 1;
    state.round_over = false;
    state.initials.clear();
    state.mode = Mode::Playing;
    state.emit(GameEvent::RoundStarted);
    log::info!("Round started (seed {}, stream {})", state.seed, state.rng_state.stream);
    true
}

/// Apply the score/level/mode consequences of one resolve pass
pub fn apply_damage(state: &mut GameState, damage: &[DamageEvent], board: &HighScores) {
    for event in damage {
        match *event {
            DamageEvent::Bank { health, destroyed } => {
                state.score = state.score.saturating_add(state.tuning.score_per_hit);
                state.emit(GameEvent::BankHit { health });
                if destroyed {
                    bank_destroyed(state);
                }
            }
            DamageEvent::Player { health, destroyed } => {
                state.emit(GameEvent::PlayerHit { health });
                if destroyed {
                    player_destroyed(state, board);
                }
            }
        }
    }
}

/// Bonus, level up and a delayed respawn with more health
fn bank_destroyed(state: &mut GameState) {
    state.score = state.score.saturating_add(state.tuning.score_per_bank);
    state.level = state.level.saturating_add(1);
    let max_health = state.tuning.respawn_health(state.level);
    state.pending_respawn = Some(PendingRespawn {
        due_ms: state.now_ms + state.tuning.respawn_delay_ms,
        max_health,
    });
    state.emit(GameEvent::BankDestroyed { level: state.level });
    log::info!(
        "Bank destroyed! Level {} (score {}), respawn with {} HP",
        state.level,
        state.score,
        max_health
    );
}

/// End the round, routing to initials entry when the score makes the board
fn player_destroyed(state: &mut GameState, board: &HighScores) {
    let high_score = board.qualifies(state.score);
    state.mode = if high_score {
        Mode::EnteringInitials
    } else {
        Mode::GameOver
    };
    state.round_over = true;
    state.initials.clear();
    // A respawn scheduled in this round must never fire in the next one
    state.pending_respawn = None;
    state.emit(GameEvent::PlayerDestroyed {
        score: state.score,
        high_score,
    });
    log::info!(
        "Game over - score {}, level {}, high score: {}",
        state.score,
        state.level,
        high_score
    );
}

/// Respawn the bank once its delay has elapsed
pub fn respawn_if_due(state: &mut GameState, now_ms: f64) -> bool {
    let Some(pending) = state.pending_respawn else {
        return false;
    };
    if now_ms < pending.due_ms {
        return false;
    }

    let mut rng = state.rng_state.next_rng();
    let max_x = (state.tuning.arena_width - state.bank.size.x).max(0.0);
    let x = if max_x > 0.0 {
        rng.random_range(0.0..max_x)
    } else {
        0.0
    };
    let direction = if rng.random_bool(0.5) {
        Direction::Right
    } else {
        Direction::Left
    };

    state.bank = Bank::spawned_at(x, direction, pending.max_health);
    state.bank_projectiles.clear();
    state.pending_respawn = None;
    state.emit(GameEvent::BankRespawned {
        max_health: pending.max_health,
    });
    log::debug!("Bank respawned at x={x:.1} heading {direction:?}");
    true
}

/// HIGH SCORES: show the board from any resting mode, or hide it again.
/// From initials entry the pending score is abandoned.
pub fn toggle_high_scores(state: &mut GameState) -> bool {
    match state.mode {
        Mode::Idle | Mode::GameOver => {
            state.mode = Mode::ShowingHighScores;
            true
        }
        Mode::EnteringInitials => {
            state.initials.clear();
            state.mode = Mode::ShowingHighScores;
            true
        }
        Mode::ShowingHighScores => close_high_scores(state),
        Mode::Playing => false,
    }
}

/// Escape: leave the board, back to the game over screen or the title
pub fn close_high_scores(state: &mut GameState) -> bool {
    if state.mode != Mode::ShowingHighScores {
        return false;
    }
    state.mode = if state.round_over {
        Mode::GameOver
    } else {
        Mode::Idle
    };
    true
}

/// Type one initial (letters only, uppercased, at most three)
pub fn push_initial(state: &mut GameState, c: char) -> bool {
    if state.mode != Mode::EnteringInitials
        || !c.is_ascii_alphabetic()
        || state.initials.len() >= INITIALS_LEN
    {
        return false;
    }
    state.initials.push(c.to_ascii_uppercase());
    true
}

/// Remove the last typed initial
pub fn pop_initial(state: &mut GameState) -> bool {
    if state.mode != Mode::EnteringInitials {
        return false;
    }
    state.initials.pop().is_some()
}

/// Record the score under the typed initials and show the board.
/// Returns the rank achieved; `None` leaves the state untouched.
pub fn submit_initials(state: &mut GameState, board: &mut HighScores, date: &str) -> Option<usize> {
    if state.mode != Mode::EnteringInitials || state.initials.len() != INITIALS_LEN {
        return None;
    }
    let rank = board.add_score(&state.initials, state.score, date);
    state.mode = Mode::ShowingHighScores;
    log::info!(
        "High score {} recorded for {} (rank {:?})",
        state.score,
        state.initials,
        rank
    );
    rank
}

/// Stop the round without a game over (session teardown)
pub fn abort_round(state: &mut GameState) {
    if state.mode == Mode::Playing {
        state.mode = Mode::Idle;
    }
    state.pending_respawn = None;
    state.firing = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> GameState {
        let mut state = GameState::new(3);
        assert!(start_round(&mut state));
        state.drain_events();
        state
    }

    #[test]
    fn test_start_round_resets_progress() {
        let mut state = playing();
        state.score = 5000;
        state.level = 4;
        state.mode = Mode::GameOver;
        state.round_over = true;

        assert!(start_round(&mut state));
        assert_eq!(state.mode, Mode::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert!(!state.round_over);
        assert!(!start_round(&mut state));
    }

    #[test]
    fn test_hit_and_kill_scores_1010() {
        let mut state = playing();
        state.now_ms = 2000.0;
        let board = HighScores::new();
        apply_damage(
            &mut state,
            &[DamageEvent::Bank {
                health: 0,
                destroyed: true,
            }],
            &board,
        );
        assert_eq!(state.score, 1010);
        assert_eq!(state.level, 2);
        assert_eq!(
            state.pending_respawn,
            Some(PendingRespawn {
                due_ms: 3000.0,
                max_health: 450
            })
        );
    }

    #[test]
    fn test_respawn_waits_for_delay() {
        let mut state = playing();
        state.bank.health = 0;
        state.bank_projectiles.push(super::super::state::BankProjectile {
            pos: glam::Vec2::new(0.0, 300.0),
            size: glam::Vec2::new(10.0, 20.0),
            speed: 4.5,
        });
        state.pending_respawn = Some(PendingRespawn {
            due_ms: 1000.0,
            max_health: 450,
        });

        assert!(!respawn_if_due(&mut state, 999.0));
        assert!(respawn_if_due(&mut state, 1000.0));
        assert_eq!(state.bank.health, 450);
        assert_eq!(state.bank.max_health, 450);
        assert!(state.bank.pos.x >= 0.0 && state.bank.pos.x < 500.0);
        assert!(state.bank_projectiles.is_empty());
        assert!(state.pending_respawn.is_none());
    }

    #[test]
    fn test_player_death_routes_by_board() {
        let mut state = playing();
        state.score = 10;
        apply_damage(
            &mut state,
            &[DamageEvent::Player {
                health: 0,
                destroyed: true,
            }],
            &HighScores::new(),
        );
        assert_eq!(state.mode, Mode::EnteringInitials);

        let mut board = HighScores::new();
        for _ in 0..10 {
            board.add_score("TOP", 9999, "");
        }
        let mut state = playing();
        state.score = 10;
        state.pending_respawn = Some(PendingRespawn {
            due_ms: 1.0,
            max_health: 1,
        });
        apply_damage(
            &mut state,
            &[DamageEvent::Player {
                health: 0,
                destroyed: true,
            }],
            &board,
        );
        assert_eq!(state.mode, Mode::GameOver);
        assert!(state.pending_respawn.is_none());
    }

    #[test]
    fn test_initials_entry() {
        let mut state = playing();
        state.mode = Mode::EnteringInitials;
        state.score = 1234;

        assert!(push_initial(&mut state, 'a'));
        assert!(!push_initial(&mut state, '1'));
        assert!(push_initial(&mut state, 'b'));
        assert!(pop_initial(&mut state));
        assert!(push_initial(&mut state, 'c'));

        let mut board = HighScores::new();
        assert_eq!(submit_initials(&mut state, &mut board, "1/1/2025"), None);

        assert!(push_initial(&mut state, 'd'));
        assert!(!push_initial(&mut state, 'e'));
        assert_eq!(state.initials, "ACD");

        assert_eq!(submit_initials(&mut state, &mut board, "1/1/2025"), Some(1));
        assert_eq!(state.mode, Mode::ShowingHighScores);
        assert_eq!(board.entries[0].initials, "ACD");
        assert_eq!(board.entries[0].score, 1234);
    }

    #[test]
    fn test_high_score_screen_toggle() {
        let mut state = GameState::new(1);
        assert!(toggle_high_scores(&mut state));
        assert_eq!(state.mode, Mode::ShowingHighScores);
        assert!(toggle_high_scores(&mut state));
        assert_eq!(state.mode, Mode::Idle);

        state.mode = Mode::GameOver;
        state.round_over = true;
        assert!(toggle_high_scores(&mut state));
        assert!(close_high_scores(&mut state));
        assert_eq!(state.mode, Mode::GameOver);

        state.mode = Mode::Playing;
        assert!(!toggle_high_scores(&mut state));
    }

    #[test]
    fn test_leaving_initials_entry_abandons_it() {
        let mut state = playing();
        state.mode = Mode::EnteringInitials;
        state.round_over = true;
        state.score = 700;
        push_initial(&mut state, 'q');

        assert!(toggle_high_scores(&mut state));
        assert_eq!(state.mode, Mode::ShowingHighScores);
        assert!(state.initials.is_empty());
        assert!(close_high_scores(&mut state));
        assert_eq!(state.mode, Mode::GameOver);

        state.mode = Mode::EnteringInitials;
        push_initial(&mut state, 'q');
        assert!(start_round(&mut state));
        assert_eq!(state.mode, Mode::Playing);
        assert_eq!(state.score, 0);
        assert!(state.initials.is_empty());
    }
}
