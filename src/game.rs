//! Game session
//!
//! Owns everything a running page needs: simulation state, the high score
//! board and its store, settings, the taunt rotation and held input. The
//! host feeds it key/touch events and frame times, then reads `snapshot()`
//! and drains events for sound.

use crate::audio::AudioMixer;
use crate::consts::{MAX_SUBSTEPS, TICK_MS};
use crate::highscores::{self, HighScores};
use crate::input::{Key, KeyboardState, TouchButton, TouchState, aggregate};
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::sim::progression::{
    abort_round, close_high_scores, pop_initial, push_initial, start_round, submit_initials,
    toggle_high_scores,
};
use crate::sim::{GameEvent, GameState, Mode, Snapshot, TickInput, tick};
use crate::taunts::{DEFAULT_TAUNT_COUNT, TauntCycle, TauntProvider, load_taunts};
use crate::tuning::Tuning;

/// Salt so taunt picks do not share a stream with respawns
const TAUNT_SEED_SALT: u64 = 0x7a75_6e74_5f72_6e67;

pub struct Session {
    state: GameState,
    board: HighScores,
    settings: Settings,
    store: Box<dyn KeyValueStore>,
    taunt_provider: Box<dyn TauntProvider>,
    taunts: TauntCycle,
    keyboard: KeyboardState,
    touch: TouchState,
    accumulator: f64,
    rounds: u64,
}

impl Session {
    pub fn new(
        seed: u64,
        store: Box<dyn KeyValueStore>,
        taunt_provider: Box<dyn TauntProvider>,
    ) -> Self {
        Self::with_tuning(seed, Tuning::default(), store, taunt_provider)
    }

    pub fn with_tuning(
        seed: u64,
        tuning: Tuning,
        store: Box<dyn KeyValueStore>,
        taunt_provider: Box<dyn TauntProvider>,
    ) -> Self {
        let board = HighScores::load(store.as_ref());
        let settings = Settings::load(store.as_ref());
        Self {
            state: GameState::with_tuning(seed, tuning),
            board,
            settings,
            store,
            taunt_provider,
            taunts: TauntCycle::new(Vec::new(), seed ^ TAUNT_SEED_SALT),
            keyboard: KeyboardState::default(),
            touch: TouchState::default(),
            accumulator: 0.0,
            rounds: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.board
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace and persist settings
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
        self.settings.save(self.store.as_mut());
        if !self.settings.taunts_enabled {
            self.taunts.stop();
        }
    }

    pub fn mixer(&self) -> AudioMixer {
        AudioMixer::from_settings(&self.settings)
    }

    /// START button: begin a fresh round, abandoning any initials entry
    pub fn start(&mut self, now_ms: f64) -> bool {
        if !start_round(&mut self.state) {
            return false;
        }
        self.state.now_ms = now_ms;
        self.accumulator = 0.0;
        self.rounds += 1;

        if self.settings.taunts_enabled {
            let lines = load_taunts(self.taunt_provider.as_mut(), DEFAULT_TAUNT_COUNT);
            let seed = self.state.seed ^ TAUNT_SEED_SALT ^ self.rounds;
            self.taunts = TauntCycle::new(lines, seed);
            self.taunts.start(now_ms);
        }
        true
    }

    /// Tear the round down without a game over
    pub fn stop(&mut self) {
        abort_round(&mut self.state);
        self.taunts.stop();
        self.accumulator = 0.0;
    }

    /// Handle a DOM key name; returns true if it was consumed
    pub fn key_down(&mut self, name: &str) -> bool {
        let Some(key) = Key::from_name(name) else {
            return false;
        };

        // Initials capture swallows every key
        if self.state.mode == Mode::EnteringInitials {
            return match key {
                Key::Enter => self.submit_initials(),
                Key::Backspace => pop_initial(&mut self.state),
                other => other
                    .as_letter()
                    .is_some_and(|c| push_initial(&mut self.state, c)),
            };
        }

        match key {
            Key::Left | Key::Right | Key::Space => {
                self.keyboard.key_down(key);
                true
            }
            Key::HighScores => self.toggle_high_scores(),
            Key::Escape => close_high_scores(&mut self.state),
            Key::Enter | Key::Backspace | Key::Letter(_) => false,
        }
    }

    /// HIGH SCORES button (and `h` outside initials entry)
    pub fn toggle_high_scores(&mut self) -> bool {
        let toggled = toggle_high_scores(&mut self.state);
        if toggled && self.state.mode == Mode::ShowingHighScores {
            self.board = HighScores::load(self.store.as_ref());
        }
        toggled
    }

    pub fn key_up(&mut self, name: &str) -> bool {
        Key::from_name(name).is_some_and(|key| self.keyboard.key_up(key))
    }

    pub fn touch_press(&mut self, button: TouchButton) {
        self.touch.press(button);
    }

    pub fn touch_release(&mut self, button: TouchButton) {
        self.touch.release(button);
    }

    fn submit_initials(&mut self) -> bool {
        let date = highscores::today();
        if submit_initials(&mut self.state, &mut self.board, &date).is_none()
            && self.state.mode == Mode::EnteringInitials
        {
            return false;
        }
        self.board.save(self.store.as_mut());
        true
    }

    /// Run as many fixed ticks as `elapsed_ms` covers (at most `MAX_SUBSTEPS`).
    /// Tick timestamps are spaced `TICK_MS` apart and end at or before `now_ms`.
    pub fn update(&mut self, elapsed_ms: f64, now_ms: f64) -> u32 {
        let elapsed = if elapsed_ms.is_finite() {
            elapsed_ms.clamp(0.0, TICK_MS * f64::from(MAX_SUBSTEPS))
        } else {
            0.0
        };
        self.accumulator += elapsed;

        let mut substeps = 0;
        while self.accumulator >= TICK_MS && substeps < MAX_SUBSTEPS {
            self.accumulator -= TICK_MS;
            let input = TickInput {
                intent: aggregate(&self.keyboard, &self.touch),
                now_ms: now_ms - self.accumulator,
            };
            if !tick(&mut self.state, &input, &self.board) {
                self.accumulator = 0.0;
                break;
            }
            substeps += 1;
        }

        if self.state.mode == Mode::Playing {
            if self.settings.taunts_enabled {
                self.taunts.update(now_ms);
            }
        } else if self.taunts.is_running() {
            self.taunts.stop();
        }
        substeps
    }

    /// Events since the last drain, for sound and HUD effects
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = self.state.snapshot();
        if self.settings.taunts_enabled {
            snapshot.current_taunt = self.taunts.current().map(str::to_string);
        }
        snapshot
    }
}
