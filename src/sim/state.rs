//! Game state and core simulation types
//!
//! Everything a round needs lives in `GameState`; rendering only ever sees
//! an owned `Snapshot` copied out of it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current UI mode. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Title screen, before the first round
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Round ended without a qualifying score
    GameOver,
    /// Round ended with a qualifying score; capturing 3 letters
    EnteringInitials,
    /// Leaderboard on screen
    ShowingHighScores,
}

/// Horizontal heading of the bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// The player's speaker box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub health: u32,
    pub max_health: u32,
}

impl Player {
    pub fn new(max_health: u32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            health: max_health,
            max_health,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Spawn point for soundwaves (horizontal centre, top edge)
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// The bank building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bank {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub health: u32,
    pub max_health: u32,
    /// Time of the last volley (ms); `None` fires on the next tick
    pub last_shot_ms: Option<f64>,
    pub direction: Direction,
}

impl Bank {
    pub fn new(max_health: u32) -> Self {
        Self::spawned_at(BANK_START_X, Direction::Right, max_health)
    }

    pub fn spawned_at(x: f32, direction: Direction, max_health: u32) -> Self {
        Self {
            pos: Vec2::new(x, BANK_Y),
            size: Vec2::new(BANK_WIDTH, BANK_HEIGHT),
            health: max_health,
            max_health,
            last_shot_ms: None,
            direction,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// A destroyed bank awaits respawn: it cannot be hit and does not fire
    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }
}

/// A soundwave fired by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Soundwave {
    /// Centre
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    /// Spawn time (ms), used only for the fire cooldown
    pub created_ms: f64,
}

/// A projectile dropped by the bank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankProjectile {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl BankProjectile {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// A bank respawn waiting for its delay to elapse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingRespawn {
    pub due_ms: f64,
    pub max_health: u32,
}

/// One-way notifications for audio/UI consumers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted,
    SoundwaveFired,
    BankVolley { count: u32 },
    BankHit { health: u32 },
    BankDestroyed { level: u32 },
    BankRespawned { max_health: u32 },
    PlayerHit { health: u32 },
    PlayerDestroyed { score: u64, high_score: bool },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Hand out a fresh generator; each call advances the stream
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::seed_from_u64(self.seed ^ self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.stream += 1;
        rng
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    /// Balance parameters for this run
    pub tuning: Tuning,
    pub mode: Mode,
    pub score: u64,
    /// Starts at 1, +1 per destroyed bank
    pub level: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Timestamp of the most recent tick (ms)
    pub now_ms: f64,
    pub player: Player,
    pub bank: Bank,
    pub soundwaves: Vec<Soundwave>,
    pub bank_projectiles: Vec<BankProjectile>,
    pub pending_respawn: Option<PendingRespawn>,
    /// Fire intent seen on the last tick (speaker glow)
    pub firing: bool,
    /// Set once the player has died this round
    pub round_over: bool,
    /// Letters typed so far while entering initials
    pub initials: String,
    /// Events emitted since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle game state with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng_state: RngState::new(seed),
            player: Player::new(tuning.player_max_health),
            bank: Bank::new(tuning.bank_start_health),
            tuning,
            mode: Mode::Idle,
            score: 0,
            level: 1,
            time_ticks: 0,
            now_ms: 0.0,
            soundwaves: Vec::new(),
            bank_projectiles: Vec::new(),
            pending_respawn: None,
            firing: false,
            round_over: false,
            initials: String::new(),
            events: Vec::new(),
        }
    }

    /// Put every entity back at its starting position
    pub fn reset_entities(&mut self) {
        self.player = Player::new(self.tuning.player_max_health);
        self.bank = Bank::new(self.tuning.bank_start_health);
        self.soundwaves.clear();
        self.bank_projectiles.clear();
        self.pending_respawn = None;
        self.firing = false;
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Immutable copy for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            score: self.score,
            level: self.level,
            player: self.player.clone(),
            bank: self.bank.clone(),
            soundwaves: self.soundwaves.clone(),
            bank_projectiles: self.bank_projectiles.clone(),
            firing: self.firing,
            initials: self.initials.clone(),
            current_taunt: None,
        }
    }
}

/// Read-only view handed to rendering once per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: Mode,
    pub score: u64,
    pub level: u32,
    pub player: Player,
    pub bank: Bank,
    pub soundwaves: Vec<Soundwave>,
    pub bank_projectiles: Vec<BankProjectile>,
    pub firing: bool,
    pub initials: String,
    pub current_taunt: Option<String>,
}

impl Snapshot {
    /// Player health as a 0-1 fraction (health bar)
    pub fn player_health_fraction(&self) -> f32 {
        if self.player.max_health == 0 {
            0.0
        } else {
            self.player.health as f32 / self.player.max_health as f32
        }
    }

    /// Bank health as a 0-1 fraction (health bar)
    pub fn bank_health_fraction(&self) -> f32 {
        if self.bank.max_health == 0 {
            0.0
        } else {
            self.bank.health as f32 / self.bank.max_health as f32
        }
    }
}
