//! Rasta Blasta - a retro arcade shooter
//!
//! Core modules:
//! - `sim`: Fixed-timestep arena simulation (entities, kinematics, collisions, progression)
//! - `input`: Keyboard/touch aggregation into a per-tick intent
//! - `game`: Session glue (fixed-step scheduling, key routing, high score entry)
//! - `highscores`: Top 10 leaderboard
//! - `persistence`: Key-value stores (memory, file, LocalStorage)
//! - `taunts`: Bank taunt lines with a built-in fallback list
//! - `embed`: Spotify/SoundCloud embed HTML builder
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `audio`: Sound cues derived from simulation events
//! - `web`: Browser bindings (wasm32)

pub mod audio;
pub mod embed;
pub mod game;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod taunts;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::Session;
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation interval (~60 Hz)
    pub const TICK_MS: f64 = 16.0;
    /// Maximum substeps per update to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 400.0;
    pub const PLAYER_START_Y: f32 = 500.0;
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_MAX_HEALTH: u32 = 100;

    /// Bank defaults
    pub const BANK_START_X: f32 = 250.0;
    pub const BANK_Y: f32 = 30.0;
    pub const BANK_WIDTH: f32 = 300.0;
    pub const BANK_HEIGHT: f32 = 200.0;

    /// Soundwave radius
    pub const SOUNDWAVE_RADIUS: f32 = 5.0;

    /// Bank projectile size
    pub const BANK_PROJECTILE_WIDTH: f32 = 10.0;
    pub const BANK_PROJECTILE_HEIGHT: f32 = 20.0;

    /// Storage keys
    pub const HIGH_SCORES_KEY: &str = "rastaBlastaHighScores";
    pub const SETTINGS_KEY: &str = "rastaBlastaSettings";
}
