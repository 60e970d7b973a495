//! Collision detection and damage
//!
//! Everything in the arena is an axis-aligned box except soundwaves, which
//! are tested by their centre point. All soundwave/bank pairs are resolved
//! before any bank-projectile/player pair.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GameState;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict containment: points on the border are outside
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x > self.min.x && p.x < max.x && p.y > self.min.y && p.y < max.y
    }

    /// Strict overlap: touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Damage dealt during one resolve pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageEvent {
    /// A soundwave hit the bank
    Bank { health: u32, destroyed: bool },
    /// A bank projectile hit the player
    Player { health: u32, destroyed: bool },
}

/// Hit-test every projectile, apply damage and remove spent projectiles
pub fn resolve(state: &mut GameState) -> Vec<DamageEvent> {
    let mut damage = Vec::new();

    // Soundwaves vs bank
    let bank_damage = state.tuning.bank_damage;
    let bank = &mut state.bank;
    state.soundwaves.retain(|wave| {
        if bank.is_destroyed() || !bank.rect().contains_point(wave.pos) {
            return true;
        }
        bank.health = bank.health.saturating_sub(bank_damage);
        damage.push(DamageEvent::Bank {
            health: bank.health,
            destroyed: bank.health == 0,
        });
        false
    });

    // Bank projectiles vs player
    let player_damage = state.tuning.player_damage;
    let player = &mut state.player;
    let player_rect = player.rect();
    state.bank_projectiles.retain(|proj| {
        if !proj.rect().overlaps(&player_rect) {
            return true;
        }
        let was_alive = player.is_alive();
        player.health = player.health.saturating_sub(player_damage);
        damage.push(DamageEvent::Player {
            health: player.health,
            destroyed: was_alive && player.health == 0,
        });
        false
    });

    damage
}
