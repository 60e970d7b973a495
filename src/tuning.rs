//! Data-driven game balance
//!
//! Every number the simulation rules depend on. Defaults reproduce the
//! arcade cabinet feel; a JSON override may replace any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised when loading a tuning override
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value out of range: {field} = {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Player ===
    /// Horizontal displacement per tick
    pub player_speed: f32,
    pub player_max_health: u32,
    /// Damage taken per bank projectile
    pub player_damage: u32,

    // === Soundwaves ===
    /// Upward displacement per tick
    pub soundwave_speed: f32,
    pub soundwave_radius: f32,
    /// Minimum gap between two soundwaves (ms)
    pub fire_cooldown_ms: f64,

    // === Bank ===
    /// Horizontal displacement per tick
    pub bank_move_speed: f32,
    pub bank_start_health: u32,
    /// Damage taken per soundwave
    pub bank_damage: u32,
    /// Gap between volleys (ms)
    pub bank_shoot_rate_ms: f64,
    /// Maximum projectiles per volley
    pub bank_max_volley: u32,
    /// Projectile speed at level 0
    pub bank_projectile_speed: f32,
    /// Extra projectile speed per level
    pub bank_projectile_speed_per_level: f32,
    /// Respawn delay after destruction (ms)
    pub respawn_delay_ms: f64,
    /// Respawned bank health: base + (level + 1) * per_level
    pub respawn_health_base: u32,
    pub respawn_health_per_level: u32,

    // === Scoring ===
    pub score_per_hit: u64,
    pub score_per_bank: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            player_speed: 5.0,
            player_max_health: PLAYER_MAX_HEALTH,
            player_damage: 20,

            soundwave_speed: 8.0,
            soundwave_radius: SOUNDWAVE_RADIUS,
            fire_cooldown_ms: 250.0,

            bank_move_speed: 1.0,
            bank_start_health: 300,
            bank_damage: 10,
            bank_shoot_rate_ms: 1500.0,
            bank_max_volley: 3,
            bank_projectile_speed: 4.0,
            bank_projectile_speed_per_level: 0.5,
            respawn_delay_ms: 1000.0,
            respawn_health_base: 300,
            respawn_health_per_level: 50,

            score_per_hit: 10,
            score_per_bank: 1000,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would let entities escape the arena or stall the loop
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("arena_width", self.arena_width as f64),
            ("arena_height", self.arena_height as f64),
            ("player_speed", self.player_speed as f64),
            ("soundwave_speed", self.soundwave_speed as f64),
            ("soundwave_radius", self.soundwave_radius as f64),
            ("bank_move_speed", self.bank_move_speed as f64),
            ("bank_projectile_speed", self.bank_projectile_speed as f64),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::OutOfRange { field, value });
            }
        }

        // Both entities spawn at fixed positions and must start inside
        let min_width = (PLAYER_START_X + PLAYER_WIDTH).max(BANK_START_X + BANK_WIDTH);
        if self.arena_width < min_width {
            return Err(TuningError::OutOfRange {
                field: "arena_width",
                value: self.arena_width as f64,
            });
        }
        let min_height = (PLAYER_START_Y + PLAYER_HEIGHT).max(BANK_Y + BANK_HEIGHT);
        if self.arena_height < min_height {
            return Err(TuningError::OutOfRange {
                field: "arena_height",
                value: self.arena_height as f64,
            });
        }
        if self.player_max_health == 0 {
            return Err(TuningError::OutOfRange {
                field: "player_max_health",
                value: 0.0,
            });
        }
        if self.bank_max_volley == 0 {
            return Err(TuningError::OutOfRange {
                field: "bank_max_volley",
                value: 0.0,
            });
        }
        if self.fire_cooldown_ms < 0.0 || self.bank_shoot_rate_ms < 0.0 {
            return Err(TuningError::OutOfRange {
                field: "cooldown",
                value: self.fire_cooldown_ms.min(self.bank_shoot_rate_ms),
            });
        }
        Ok(())
    }

    /// Projectiles per bank volley at a given level
    pub fn volley_size(&self, level: u32) -> u32 {
        self.bank_max_volley.min(1 + level / 2)
    }

    /// Bank projectile speed at a given level
    pub fn projectile_speed(&self, level: u32) -> f32 {
        self.bank_projectile_speed + level as f32 * self.bank_projectile_speed_per_level
    }

    /// Health of a bank respawned while the round is at `level`
    pub fn respawn_health(&self, level: u32) -> u32 {
        self.respawn_health_base
            .saturating_add(level.saturating_add(1).saturating_mul(self.respawn_health_per_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volley_size_caps_at_three() {
        let t = Tuning::default();
        assert_eq!(t.volley_size(1), 1);
        assert_eq!(t.volley_size(2), 2);
        assert_eq!(t.volley_size(3), 2);
        assert_eq!(t.volley_size(4), 3);
        assert_eq!(t.volley_size(40), 3);
    }

    #[test]
    fn test_projectile_speed_scales_with_level() {
        let t = Tuning::default();
        assert_eq!(t.projectile_speed(1), 4.5);
        assert_eq!(t.projectile_speed(4), 6.0);
    }

    #[test]
    fn test_respawn_health() {
        let t = Tuning::default();
        assert_eq!(t.respawn_health(2), 450);
        assert_eq!(t.respawn_health(5), 600);
    }

    #[test]
    fn test_partial_override() {
        let t = Tuning::from_json(r#"{ "player_speed": 7.5, "score_per_bank": 500 }"#).unwrap();
        assert_eq!(t.player_speed, 7.5);
        assert_eq!(t.score_per_bank, 500);
        assert_eq!(t.fire_cooldown_ms, 250.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json(r#"{ "player_speed": 0 }"#),
            Err(TuningError::OutOfRange { field: "player_speed", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "arena_width": 200 }"#),
            Err(TuningError::OutOfRange { field: "arena_width", .. })
        ));
        assert!(matches!(Tuning::from_json("not json"), Err(TuningError::Parse(_))));
    }

    #[test]
    fn test_arena_must_contain_spawn_points() {
        // Wider than the bank but narrower than the player's start + width
        assert!(matches!(
            Tuning::from_json(r#"{ "arena_width": 350 }"#),
            Err(TuningError::OutOfRange { field: "arena_width", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "arena_width": 549 }"#),
            Err(TuningError::OutOfRange { field: "arena_width", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "arena_height": 520 }"#),
            Err(TuningError::OutOfRange { field: "arena_height", .. })
        ));
        let tight = Tuning::from_json(r#"{ "arena_width": 550, "arena_height": 560 }"#).unwrap();
        assert_eq!(tight.arena_width, 550.0);
    }
}
